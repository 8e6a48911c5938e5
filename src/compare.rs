//! Byte-level comparison of encoder outputs
//!
//! [`fdiff`] counts differing byte positions between two files and adds the
//! size difference. [`compare`] wraps it with the optional decode step and
//! prints the verdict for one test case.

use crate::encoder::{wav_path, Encoder};
use crate::util::remove_stale;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A file could not be read for comparison
#[derive(Debug, Error)]
#[error("cannot read {}: {source}", path.display())]
pub struct CompareError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Result of diffing two files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDiff {
    /// Differing byte positions plus the absolute size difference
    pub diff_count: u64,
    /// Size of the larger file
    pub total_size: u64,
}

impl FileDiff {
    /// Diff two in-memory buffers.
    pub fn between(a: &[u8], b: &[u8]) -> Self {
        let positional = a.iter().zip(b).filter(|(x, y)| x != y).count() as u64;
        let (len_a, len_b) = (a.len() as u64, b.len() as u64);
        FileDiff {
            diff_count: positional + len_a.abs_diff(len_b),
            total_size: len_a.max(len_b),
        }
    }

    pub fn is_identical(&self) -> bool {
        self.diff_count == 0
    }

    /// Differing share of the larger file, in percent
    pub fn percent(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            100.0 * self.diff_count as f64 / self.total_size as f64
        }
    }
}

/// Compare two files byte by byte.
pub fn fdiff(a: &Path, b: &Path) -> Result<FileDiff, CompareError> {
    let read = |path: &Path| {
        fs::read(path).map_err(|source| CompareError {
            path: path.to_path_buf(),
            source,
        })
    };
    let first = read(a)?;
    let second = read(b)?;
    Ok(FileDiff::between(&first, &second))
}

/// Verdict for one test case
#[derive(Debug)]
pub enum Outcome {
    Identical(FileDiff),
    Different(FileDiff),
    /// Neither a pass nor a fail
    Error(CompareError),
}

impl Outcome {
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Identical(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

/// Compare two encoder outputs and print the verdict to `out`.
///
/// With a `decoder`, both files are first decoded to `<file>.wav` and the
/// decoded files are compared instead.
pub fn compare<W: Write>(
    first: &Path,
    second: &Path,
    decoder: Option<&Encoder>,
    out: &mut W,
) -> io::Result<Outcome> {
    let (first, second) = match decoder {
        Some(decoder) => {
            writeln!(out, "converting mp3 to wav for comparison...")?;
            (decode_for_compare(decoder, first), decode_for_compare(decoder, second))
        }
        None => (first.to_path_buf(), second.to_path_buf()),
    };

    let outcome = match fdiff(&first, &second) {
        Ok(diff) if diff.is_identical() => {
            writeln!(
                out,
                "output identical:  diff={}  total={}",
                diff.diff_count, diff.total_size
            )?;
            Outcome::Identical(diff)
        }
        Ok(diff) => {
            writeln!(
                out,
                "output different: diff={}  total={}  {:2.0}%",
                diff.diff_count,
                diff.total_size,
                diff.percent()
            )?;
            Outcome::Different(diff)
        }
        Err(err) => {
            log::debug!("comparison failed: {}", err);
            writeln!(out, "Error comparing files:")?;
            writeln!(out, "File 1: {}", first.display())?;
            writeln!(out, "File 2: {}", second.display())?;
            Outcome::Error(err)
        }
    };
    Ok(outcome)
}

fn decode_for_compare(decoder: &Encoder, mp3: &Path) -> PathBuf {
    remove_stale(&wav_path(mp3));
    let (wav, result) = decoder.decode(mp3);
    if let Err(failure) = result {
        log::warn!(
            "{} could not decode {}: {}",
            decoder.name().display(),
            mp3.display(),
            failure
        );
        // A partial decode must not be compared
        remove_stale(&wav);
    }
    wav
}
