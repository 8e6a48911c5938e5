//! Precondition checks run before any encoder is invoked
//!
//! Any failure here aborts the run before a single output file is touched.

use crate::config::{RunConfig, RunMode};
use crate::encoder::{Encoder, Encoders};
use crate::error::{HarnessError, Result};
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Check that `path` can be opened for reading.
pub fn check_readable(path: &Path) -> Result<()> {
    match File::open(path) {
        Ok(_) if path.is_file() => Ok(()),
        Ok(_) => Err(HarnessError::NotReadable {
            path: path.to_path_buf(),
        }),
        Err(err) => {
            log::debug!("{} cannot be opened: {}", path.display(), err);
            Err(HarnessError::NotReadable {
                path: path.to_path_buf(),
            })
        }
    }
}

/// Build the executable search list: every `PATH` entry, then `cwd`.
pub fn search_path(path_var: Option<&OsStr>, cwd: &Path) -> OsString {
    let mut dirs: Vec<PathBuf> = path_var
        .map(|value| std::env::split_paths(value).collect())
        .unwrap_or_default();
    dirs.push(cwd.to_path_buf());

    match std::env::join_paths(dirs) {
        Ok(joined) => joined,
        Err(err) => {
            log::warn!("PATH cannot be rebuilt ({}), searching only {}", err, cwd.display());
            cwd.as_os_str().to_owned()
        }
    }
}

/// Resolve `program` to an executable file.
///
/// A bare name is looked up in each directory of `search` in order. A name
/// with a directory part is resolved against `cwd`.
pub fn find_executable(program: &Path, search: Option<&OsStr>, cwd: &Path) -> Result<PathBuf> {
    which::which_in(program, search, cwd).map_err(|err| {
        log::debug!("{} not found: {}", program.display(), err);
        HarnessError::NotExecutable {
            program: program.to_path_buf(),
        }
    })
}

/// Run every precondition check for `config` in order, failing fast.
///
/// Returns the resolved encoders on success.
pub fn check_preconditions(config: &RunConfig) -> Result<Encoders> {
    check_readable(&config.options_file)?;
    check_readable(&config.input_file)?;

    let cwd = std::env::current_dir().map_err(|source| HarnessError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    let path_var = std::env::var_os("PATH");
    let search = search_path(path_var.as_deref(), &cwd);

    let resolve = |program: &Path| -> Result<Encoder> {
        let resolved = find_executable(program, Some(search.as_os_str()), &cwd)?;
        log::debug!("{} resolved to {}", program.display(), resolved.display());
        Ok(Encoder::new(program, resolved))
    };

    let lame1 = resolve(&config.lame1)?;
    let lame2 = match (config.mode, &config.lame2) {
        (RunMode::Compare, Some(program)) => Some(resolve(program)?),
        (RunMode::Compare, None) => {
            return Err(HarnessError::Usage(
                "compare mode needs a second encoder".to_string(),
            ))
        }
        _ => None,
    };

    Ok(Encoders { lame1, lame2 })
}
