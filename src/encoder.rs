//! Encoder process invocation
//!
//! Wraps an external LAME-compatible executable. Every call blocks until the
//! child exits; there is no timeout.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Why an encoder invocation did not succeed
#[derive(Debug, Error)]
pub enum InvocationFailure {
    /// The option string has unbalanced quotes
    #[error("cannot split options: {0}")]
    BadOptions(#[source] shell_words::ParseError),

    /// The process could not be started
    #[error("failed to start: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process ran and exited unsuccessfully
    #[error("exited with {0}")]
    Exit(ExitStatus),
}

/// An encoder executable that passed the precondition checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    /// Path as given on the command line, used in reports
    name: PathBuf,
    /// Resolved executable that is actually spawned
    path: PathBuf,
}

impl Encoder {
    pub fn new(name: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &Path {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Arguments for `--quiet <options> <input> <output>`.
    pub fn encode_args(
        options: &str,
        input: &Path,
        output: &Path,
    ) -> Result<Vec<OsString>, shell_words::ParseError> {
        let mut args: Vec<OsString> = vec!["--quiet".into()];
        args.extend(shell_words::split(options)?.into_iter().map(OsString::from));
        args.push(input.into());
        args.push(output.into());
        Ok(args)
    }

    /// The encode command line as it would be typed in a shell.
    pub fn command_line(&self, options: &str, input: &Path, output: &Path) -> String {
        format!(
            "{} --quiet {} {} {}",
            self.name.display(),
            options,
            input.display(),
            output.display()
        )
    }

    /// Encode `input` into `output` with the given option string.
    pub fn encode(
        &self,
        options: &str,
        input: &Path,
        output: &Path,
    ) -> Result<(), InvocationFailure> {
        let args =
            Self::encode_args(options, input, output).map_err(InvocationFailure::BadOptions)?;
        self.run(&args)
    }

    /// Decode an MP3 into `<mp3>.wav` and return the `.wav` path.
    ///
    /// The returned path is valid even when decoding failed; the comparison
    /// that follows reports the missing file.
    pub fn decode(&self, mp3: &Path) -> (PathBuf, Result<(), InvocationFailure>) {
        let wav = wav_path(mp3);
        let args: Vec<OsString> = vec![
            "--quiet".into(),
            "--mp3input".into(),
            "--decode".into(),
            mp3.into(),
            wav.clone().into(),
        ];
        let result = self.run(&args);
        (wav, result)
    }

    fn run(&self, args: &[OsString]) -> Result<(), InvocationFailure> {
        log::debug!("spawning {} {:?}", self.path.display(), args);
        let status = Command::new(&self.path)
            .args(args)
            .status()
            .map_err(InvocationFailure::Spawn)?;

        if status.success() {
            Ok(())
        } else {
            Err(InvocationFailure::Exit(status))
        }
    }
}

/// `<file>.wav`, keeping the existing extension in place.
pub fn wav_path(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(".wav");
    PathBuf::from(name)
}

/// The encoders a run needs, resolved once before the test loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoders {
    pub lame1: Encoder,
    /// Present only when comparing two builds
    pub lame2: Option<Encoder>,
}
