//! Configuration management for the witness registry and soundness sweep

pub mod settings;

pub use settings::{Settings, VerifyConfig, WitnessConfig, MAX_SWEEP_SIDE};
