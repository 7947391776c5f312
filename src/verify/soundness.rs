//! Soundness checking: evaluate forward, invert, and confirm the inputs are admitted

use crate::config::{Settings, VerifyConfig};
use crate::grid::{GridError, Image};
use crate::semantics::{EvalError, Operation, Orientation, Value};
use crate::witness::{Conflict, Registry, StateId, WitnessError, WitnessRequest};
use anyhow::{Context, Result};
use itertools::Itertools;
use log::warn;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

/// One concrete application of an operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub operation: Operation,
    pub args: Vec<Value>,
}

/// Outcome of inverting one parameter of one sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The witness admits the argument actually used
    Sound,
    /// The output carries no color, so the color cannot be recovered
    Pruned { conflict: Conflict },
    /// The witness rejected or failed on a reachable output
    Unsound { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub param: usize,
    pub verdict: Verdict,
}

/// A sample whose inversion did not admit its own argument
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub sample: Sample,
    pub param: usize,
    pub reason: String,
}

/// Aggregate result of a sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct SoundnessReport {
    pub samples: usize,
    pub checks: usize,
    pub sound: usize,
    pub pruned: usize,
    pub skipped: usize,
    pub violations: Vec<Violation>,
}

impl SoundnessReport {
    pub fn is_sound(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn record(&mut self, sample: &Sample, outcome: Result<Vec<CheckResult>, EvalError>) {
        self.samples += 1;
        let results = match outcome {
            Ok(results) => results,
            Err(_) => {
                self.skipped += 1;
                return;
            }
        };

        for result in results {
            self.checks += 1;
            match result.verdict {
                Verdict::Sound => self.sound += 1,
                Verdict::Pruned { .. } => self.pruned += 1,
                Verdict::Unsound { reason } => self.violations.push(Violation {
                    sample: sample.clone(),
                    param: result.param,
                    reason,
                }),
            }
        }
    }
}

impl fmt::Display for SoundnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Soundness Report:")?;
        writeln!(f, "  Samples: {} ({} skipped)", self.samples, self.skipped)?;
        writeln!(f, "  Checks: {}", self.checks)?;
        writeln!(f, "  Sound: {}", self.sound)?;
        writeln!(f, "  Pruned (no color signal): {}", self.pruned)?;
        writeln!(f, "  Violations: {}", self.violations.len())?;
        for violation in &self.violations {
            writeln!(f, "    - {} parameter {}: {}", violation.sample.operation, violation.param, violation.reason)?;
        }
        Ok(())
    }
}

/// Runs every registered witness against forward results
pub struct SoundnessChecker {
    registry: Registry,
    config: VerifyConfig,
}

impl SoundnessChecker {
    pub fn new(registry: Registry, config: VerifyConfig) -> Self {
        Self { registry, config }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate().context("Invalid sweep settings")?;
        let registry = Registry::from_settings(settings).context("Failed to build witness registry")?;
        Ok(Self::new(registry, settings.verify.clone()))
    }

    /// Evaluate `sample`, then invert each witnessed parameter in dependency order
    ///
    /// Every parameter is resolved to the value actually used, so each witness
    /// is checked in isolation.
    pub fn check(&self, sample: &Sample) -> Result<Vec<CheckResult>, EvalError> {
        let output = match sample.operation.apply(&sample.args)? {
            Value::Image(image) => image,
            other => unreachable!("grid operations produce images, got {:?}", other.kind()),
        };

        let request = sample
            .args
            .iter()
            .enumerate()
            .fold(WitnessRequest::single(output.to_partial()), |request, (param, arg)| {
                request.with_resolved_all(param, arg.clone())
            });

        let results = self
            .registry
            .witnesses(sample.operation)
            .iter()
            .map(|entry| {
                let actual = &sample.args[entry.param];
                let verdict = match self.registry.invoke(sample.operation, entry.param, &request) {
                    Ok(spec) if spec.admits(StateId(0), actual) => Verdict::Sound,
                    Ok(_) => Verdict::Unsound {
                        reason: format!("result does not admit the argument {:?}", actual),
                    },
                    Err(WitnessError::Unsatisfiable { conflict: Conflict::NoColorSignal, .. }) => {
                        Verdict::Pruned { conflict: Conflict::NoColorSignal }
                    }
                    Err(err) => Verdict::Unsound { reason: err.to_string() },
                };
                CheckResult { param: entry.param, verdict }
            })
            .collect();

        Ok(results)
    }

    /// Every sample the sweep covers: each enumerated grid with each parameter choice
    pub fn samples(&self) -> Result<Vec<Sample>, GridError> {
        let images = enumerate_images(self.config.max_side, &self.config.palette, self.config.offset)?;
        let colors: Vec<u8> = self.config.palette.iter().copied().filter(|&c| c != 0).unique().collect();
        let operations: Vec<Operation> = self.registry.operations().collect();

        let mut samples = Vec::new();
        for image in &images {
            for &operation in &operations {
                let extra: Vec<Option<Value>> = match operation {
                    Operation::Recolor | Operation::FilterColor => {
                        colors.iter().map(|&c| Some(Value::Color(c))).collect()
                    }
                    Operation::Orthogonal => Orientation::ALL.iter().map(|&m| Some(Value::Orientation(m))).collect(),
                    _ => vec![None],
                };
                for arg in extra {
                    let args = std::iter::once(Value::Image(image.clone())).chain(arg).collect();
                    samples.push(Sample { operation, args });
                }
            }
        }
        Ok(samples)
    }

    /// Check every sample and aggregate the verdicts
    pub fn sweep(&self) -> Result<SoundnessReport, GridError> {
        let samples = self.samples()?;

        let outcomes: Vec<_> = if self.config.parallel {
            samples.par_iter().map(|sample| self.check(sample)).collect()
        } else {
            samples.iter().map(|sample| self.check(sample)).collect()
        };

        let mut report = SoundnessReport::default();
        for (sample, outcome) in samples.iter().zip(outcomes) {
            report.record(sample, outcome);
        }

        if !report.is_sound() {
            warn!("soundness sweep found {} violation(s)", report.violations.len());
        }
        Ok(report)
    }
}

/// Every grid up to `max_side` x `max_side` over `palette`, placed at `offset`
pub fn enumerate_images(max_side: usize, palette: &[u8], offset: (i32, i32)) -> Result<Vec<Image>, GridError> {
    let mut images = Vec::new();
    for (height, width) in (1..=max_side).cartesian_product(1..=max_side) {
        for cells in itertools::repeat_n(palette.iter().copied(), width * height).multi_cartesian_product() {
            images.push(Image::new(offset.0, offset.1, width, height, cells)?);
        }
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::witness::{Spec, StateMap};

    #[test]
    fn test_enumerate_images() {
        let images = enumerate_images(2, &[0, 1, 2], (0, 0)).unwrap();
        // 1x1 + 1x2 + 2x1 + 2x2
        assert_eq!(images.len(), 3 + 9 + 9 + 81);

        let moved = enumerate_images(1, &[4], (2, 3)).unwrap();
        assert_eq!(moved, vec![Image::new(2, 3, 1, 1, vec![4]).unwrap()]);

        assert!(enumerate_images(1, &[11], (0, 0)).is_err());
    }

    #[test]
    fn test_default_sweep_is_sound() {
        let checker = SoundnessChecker::from_settings(&Settings::default()).unwrap();
        let report = checker.sweep().unwrap();

        // 102 grids, each with 2 recolors, 2 filters, 3 orientations and identity
        assert_eq!(report.samples, 102 * 8);
        assert_eq!(report.checks, 102 * (2 * 2 + 2 * 2 + 3 + 1));
        assert_eq!(report.skipped, 0);
        assert!(report.pruned > 0);
        assert!(report.is_sound(), "{}", report);
    }

    #[test]
    fn test_sweep_with_offset_and_sequential() {
        let mut settings = Settings::default();
        settings.verify.offset = (-2, 5);
        settings.verify.palette = vec![0, 3];
        settings.verify.parallel = false;
        let report = SoundnessChecker::from_settings(&settings).unwrap().sweep().unwrap();
        assert!(report.is_sound(), "{}", report);
        assert_eq!(report.sound + report.pruned, report.checks);
    }

    fn always_one(request: &WitnessRequest) -> std::result::Result<Spec, WitnessError> {
        Ok(Spec::Disjunctive(
            request.outputs.keys().map(|&state| (state, vec![Value::Color(1)])).collect::<StateMap<_>>(),
        ))
    }

    #[test]
    fn test_broken_witness_is_reported() {
        let registry = Registry::builder()
            .register(Operation::Recolor, 1, &[], always_one)
            .build()
            .unwrap();
        let mut config = Settings::default().verify;
        config.max_side = 1;
        let report = SoundnessChecker::new(registry, config).sweep().unwrap();

        // Recoloring with 2 is never explained by color 1
        assert!(!report.is_sound());
        assert!(report
            .violations
            .iter()
            .all(|v| v.sample.args[1] == Value::Color(2) && v.param == 1));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"violations\""));
    }

    #[test]
    fn test_unevaluable_sample_is_skipped() {
        let registry = Registry::standard().unwrap();
        let checker = SoundnessChecker::new(registry, Settings::default().verify);
        let sample = Sample {
            operation: Operation::Compress,
            args: vec![Value::Image(Image::blank(0, 0, 2, 2))],
        };
        assert_eq!(checker.check(&sample).unwrap_err(), EvalError::EmptyImage { op: Operation::Compress });

        let mut report = SoundnessReport::default();
        report.record(&sample, checker.check(&sample));
        assert_eq!((report.samples, report.skipped, report.checks), (1, 1, 0));
    }
}
