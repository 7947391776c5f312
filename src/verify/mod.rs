//! Runtime soundness checks for the witness procedures

pub mod soundness;

pub use soundness::{enumerate_images, CheckResult, Sample, SoundnessChecker, SoundnessReport, Verdict, Violation};
