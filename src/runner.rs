//! The test loop
//!
//! One test case per option line. Depending on the [`RunMode`] each case
//! encodes with one or both encoders, then compares against the stored
//! reference, stores a new reference, or compares the two encoders.

use crate::compare::{compare, Outcome};
use crate::config::{RunConfig, RunMode};
use crate::encoder::{Encoder, Encoders};
use crate::error::{HarnessError, Result};
use crate::util::remove_stale;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One line of the options file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// 1-based position in the options file
    pub number: usize,
    pub options: String,
}

impl TestCase {
    /// Primary output `<basename>.<n>.mp3`
    pub fn primary_output(&self, basename: &str) -> PathBuf {
        PathBuf::from(format!("{}.{}.mp3", basename, self.number))
    }

    /// Reference output `<basename>.<n>ref.mp3`
    pub fn reference_output(&self, basename: &str) -> PathBuf {
        PathBuf::from(format!("{}.{}ref.mp3", basename, self.number))
    }
}

/// Counters accumulated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Test cases that ended in a comparison
    pub attempted: usize,
    /// Comparisons with byte-identical files
    pub passed: usize,
    /// Comparisons that could not be carried out
    pub errors: usize,
    /// Reference outputs written in reference generation mode
    pub generated: usize,
}

impl RunSummary {
    /// Comparisons that found a difference
    pub fn failed(&self) -> usize {
        self.attempted - self.passed - self.errors
    }

    fn record(&mut self, outcome: &Outcome) {
        self.attempted += 1;
        if outcome.passed() {
            self.passed += 1;
        } else if outcome.is_error() {
            self.errors += 1;
        }
    }
}

/// Read option lines up to the first blank line or end of file.
///
/// Trailing whitespace is stripped from every line. A line that is not valid
/// UTF-8 (a Latin-1 tag, say) is decoded lossily instead of ending the run.
pub fn read_option_lines(path: &Path) -> Result<Vec<String>> {
    let io_error = |source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = BufReader::new(File::open(path).map_err(io_error)?);

    let mut lines = Vec::new();
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).map_err(io_error)? == 0 {
            break;
        }
        let trimmed = raw.trim_ascii_end();
        if trimmed.is_empty() {
            break;
        }
        let line = match std::str::from_utf8(trimmed) {
            Ok(line) => line.to_string(),
            Err(_) => {
                let line = String::from_utf8_lossy(trimmed).into_owned();
                log::warn!(
                    "{}: line {} is not valid UTF-8, using {:?}",
                    path.display(),
                    lines.len() + 1,
                    line
                );
                line
            }
        };
        lines.push(line);
    }
    Ok(lines)
}

/// Output name stem shared by every test case.
///
/// The input path loses a trailing `.wav`, then gains `.` and the options
/// file's name: `song.wav` + `tests/options` gives `song.options`.
pub fn output_basename(input: &Path, options_file: &Path) -> String {
    let input = input.to_string_lossy();
    let stem = input.strip_suffix(".wav").unwrap_or(input.as_ref());
    let options_name = options_file
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| options_file.to_string_lossy());
    format!("{}.{}", stem, options_name)
}

/// Run every test case and print the report to `out`.
pub fn run<W: Write>(config: &RunConfig, encoders: &Encoders, out: &mut W) -> Result<RunSummary> {
    let basename = output_basename(&config.input_file, &config.options_file);
    let lines = read_option_lines(&config.options_file)?;
    log::debug!(
        "{} test cases from {}, mode {}",
        lines.len(),
        config.options_file.display(),
        config.mode
    );

    let mut summary = RunSummary::default();
    for (index, options) in lines.into_iter().enumerate() {
        let case = TestCase {
            number: index + 1,
            options,
        };
        writeln!(out)?;

        match config.mode {
            RunMode::Reference => {
                let outcome = run_against_reference(config, encoders, &case, &basename, out)?;
                summary.record(&outcome);
            }
            RunMode::MakeReference => {
                make_reference(config, encoders, &case, &basename, out)?;
                summary.generated += 1;
            }
            RunMode::Compare => {
                let outcome = run_comparison(config, encoders, &case, &basename, out)?;
                summary.record(&outcome);
            }
        }
    }

    if config.mode.reports_summary() {
        print_summary(&summary, out)?;
    }
    Ok(summary)
}

/// Print the closing pass/fail counts.
pub fn print_summary<W: Write>(summary: &RunSummary, out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Number of tests which passed:  {}", summary.passed)?;
    writeln!(out, "Number of tests which failed:  {}", summary.failed())?;
    if summary.errors > 0 {
        writeln!(out, "Number of comparison errors:   {}", summary.errors)?;
    }
    Ok(())
}

fn run_against_reference<W: Write>(
    config: &RunConfig,
    encoders: &Encoders,
    case: &TestCase,
    basename: &str,
    out: &mut W,
) -> Result<Outcome> {
    let lame1 = &encoders.lame1;
    let output = case.primary_output(basename);
    let reference = case.reference_output(basename);
    remove_stale(&output);

    writeln!(out, "executable:       {}", lame1.name().display())?;
    writeln!(out, "options:          {}", case.options)?;
    writeln!(out, "input:            {}", config.input_file.display())?;
    writeln!(out, "reference output: {}", reference.display())?;
    writeln!(out, "{}", lame1.command_line(&case.options, &config.input_file, &output))?;
    out.flush()?;

    encode(lame1, case, &config.input_file, &output);
    let decoder = config.decode.then_some(lame1);
    Ok(compare(&output, &reference, decoder, out)?)
}

fn make_reference<W: Write>(
    config: &RunConfig,
    encoders: &Encoders,
    case: &TestCase,
    basename: &str,
    out: &mut W,
) -> Result<()> {
    let lame1 = &encoders.lame1;
    let reference = case.reference_output(basename);
    remove_stale(&reference);

    writeln!(out, "executable:  {}", lame1.name().display())?;
    writeln!(out, "options:     {}", case.options)?;
    writeln!(out, "input:       {}", config.input_file.display())?;
    writeln!(out, "output:      {}", reference.display())?;
    out.flush()?;

    encode(lame1, case, &config.input_file, &reference);
    Ok(())
}

fn run_comparison<W: Write>(
    config: &RunConfig,
    encoders: &Encoders,
    case: &TestCase,
    basename: &str,
    out: &mut W,
) -> Result<Outcome> {
    let lame1 = &encoders.lame1;
    let lame2 = encoders.lame2.as_ref().ok_or_else(|| {
        HarnessError::Usage("compare mode needs a second encoder".to_string())
    })?;
    let first = case.primary_output(basename);
    let second = case.reference_output(basename);
    remove_stale(&first);
    remove_stale(&second);

    writeln!(out, "executable:   {}", lame1.name().display())?;
    writeln!(out, "executable2:  {}", lame2.name().display())?;
    writeln!(out, "options:      {}", case.options)?;
    writeln!(out, "input:        {}", config.input_file.display())?;
    out.flush()?;

    encode(lame1, case, &config.input_file, &first);
    encode(lame2, case, &config.input_file, &second);
    let decoder = config.decode.then_some(lame1);
    Ok(compare(&first, &second, decoder, out)?)
}

fn encode(encoder: &Encoder, case: &TestCase, input: &Path, output: &Path) {
    if let Err(failure) = encoder.encode(&case.options, input, output) {
        log::warn!(
            "test {}: {} {}",
            case.number,
            encoder.name().display(),
            failure
        );
    }
}
