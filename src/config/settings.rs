//! Configuration settings for the witness registry and soundness sweep

use crate::grid::MAX_COLOR;
use crate::semantics::Operation;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest grid side the sweep may enumerate
pub const MAX_SWEEP_SIDE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub witness: WitnessConfig,
    pub verify: VerifyConfig,
}

/// Which operations get witnesses in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WitnessConfig {
    pub operations: Vec<Operation>,
}

/// Parameters of the exhaustive soundness sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Grids of every size up to max_side x max_side are enumerated
    pub max_side: usize,
    /// Cell values used for enumeration; nonzero entries double as color parameters
    pub palette: Vec<u8>,
    /// Offset every enumerated grid is placed at
    pub offset: (i32, i32),
    /// Run the sweep on the rayon thread pool
    pub parallel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            witness: WitnessConfig {
                operations: vec![
                    Operation::Recolor,
                    Operation::FilterColor,
                    Operation::Orthogonal,
                    Operation::Identity,
                ],
            },
            verify: VerifyConfig {
                max_side: 2,
                palette: vec![0, 1, 2],
                offset: (0, 0),
                parallel: true,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.witness.operations.is_empty() {
            anyhow::bail!("At least one operation must be enabled");
        }

        if self.verify.max_side == 0 || self.verify.max_side > MAX_SWEEP_SIDE {
            anyhow::bail!("Sweep side must be in 1..={}, got {}", MAX_SWEEP_SIDE, self.verify.max_side);
        }

        if self.verify.palette.is_empty() {
            anyhow::bail!("Sweep palette cannot be empty");
        }

        if let Some(value) = self.verify.palette.iter().find(|&&value| value > MAX_COLOR) {
            anyhow::bail!("Palette value {} is not a color in 0..={}", value, MAX_COLOR);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/witness.yaml");

        let mut settings = Settings::default();
        settings.verify.offset = (3, -1);
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_yaml_uses_snake_case_operations() {
        let yaml = serde_yaml::to_string(&Settings::default()).unwrap();
        assert!(yaml.contains("filter_color"));
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        settings.verify.palette = vec![0, 12];
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.verify.max_side = 5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.witness.operations.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "witness: [").unwrap();
        assert!(Settings::from_file(&path).is_err());
    }
}
