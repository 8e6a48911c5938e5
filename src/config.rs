//! Run configuration for the regression harness
//!
//! Resolves the run mode from the command-line flags and the number of
//! positional arguments, and normalises every path argument.

use crate::error::{HarnessError, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// How the test loop treats each option line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Encode with lame1 and compare against a stored reference output
    Reference,
    /// Encode with lame1 straight into the reference output, no comparison
    MakeReference,
    /// Encode with lame1 and lame2 and compare the two outputs
    Compare,
}

impl RunMode {
    /// Whether the mode ends with a pass/fail summary
    pub fn reports_summary(self) -> bool {
        !matches!(self, RunMode::MakeReference)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunMode::Reference => "ref",
            RunMode::MakeReference => "makeref",
            RunMode::Compare => "compare",
        };
        f.write_str(name)
    }
}

/// Fully resolved run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// File with one encoder option string per line
    pub options_file: PathBuf,
    /// Audio file fed to every encoder invocation
    pub input_file: PathBuf,
    /// First (or only) encoder
    pub lame1: PathBuf,
    /// Second encoder, present only in [`RunMode::Compare`]
    pub lame2: Option<PathBuf>,
    /// Decode outputs to `.wav` before comparing
    pub decode: bool,
    pub mode: RunMode,
}

impl RunConfig {
    /// Resolve the run mode and paths from parsed flags and positionals.
    ///
    /// Three positionals select [`RunMode::Reference`], or
    /// [`RunMode::MakeReference`] when `make_reference` is set. Four select
    /// [`RunMode::Compare`]; combining four with `make_reference` is a usage
    /// error.
    pub fn resolve<S: AsRef<str>>(
        decode: bool,
        make_reference: bool,
        positionals: &[S],
    ) -> Result<Self> {
        if positionals.len() < 3 {
            return Err(HarnessError::Usage("Not enough arguments.".to_string()));
        }
        if positionals.len() > 4 {
            return Err(HarnessError::Usage("Too many arguments.".to_string()));
        }

        let mode = match (make_reference, positionals.len()) {
            (true, 3) => RunMode::MakeReference,
            (true, _) => {
                return Err(HarnessError::Usage(
                    "Too many arguments for -m mode.".to_string(),
                ))
            }
            (false, 3) => RunMode::Reference,
            (false, _) => RunMode::Compare,
        };

        let config = RunConfig {
            options_file: normalize_path(positionals[0].as_ref()),
            input_file: normalize_path(positionals[1].as_ref()),
            lame1: normalize_path(positionals[2].as_ref()),
            lame2: positionals.get(3).map(|p| normalize_path(p.as_ref())),
            decode,
            mode,
        };
        log::debug!("resolved run configuration: {:?}", config);
        Ok(config)
    }
}

/// Expand a leading `~` and lexically normalise a path.
///
/// `.` components disappear, `dir/..` pairs collapse and `..` directly under
/// the root is dropped. Leading `..` of a relative path is kept. The file
/// system is never consulted, so symlinks are not resolved.
pub fn normalize_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in Path::new(expanded.as_ref()).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.iter().collect()
    }
}
