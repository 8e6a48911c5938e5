//! # lametest
//!
//! Regression harness for LAME-compatible MP3 encoders. Every line of an
//! options file becomes one test case: the encoder is run with those options
//! on a fixed input file and the output is compared byte for byte, either
//! against a stored reference output or against the output of a second
//! encoder build.
//!
//! The three run modes are described by [`config::RunMode`]. A run goes
//! through [`config::RunConfig::resolve`], [`precheck::check_preconditions`]
//! and finally [`runner::run`].

pub mod compare;
pub mod config;
pub mod encoder;
pub mod error;
pub mod precheck;
pub mod runner;
pub mod util;

pub use compare::{fdiff, FileDiff, Outcome};
pub use config::{RunConfig, RunMode};
pub use encoder::{Encoder, Encoders};
pub use error::{HarnessError, Result};
pub use runner::{run, RunSummary};

#[cfg(test)]
mod tests;
