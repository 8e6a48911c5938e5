//! Test fixtures for the regression harness
//!
//! Provides fake LAME-compatible encoders as small POSIX shell scripts, plus
//! helpers for writing options files and input files into a scratch
//! directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How a fake encoder behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeEncoder<'a> {
    /// Writes `<tag>|<options>` followed by the input bytes.
    /// Two encoders with the same tag produce identical output.
    Deterministic(&'a str),
    /// Exits with status 1 without writing anything
    Failing,
}

impl FakeEncoder<'_> {
    fn script(&self) -> String {
        match self {
            FakeEncoder::Deterministic(tag) => format!(
                r#"#!/bin/sh
tag='{tag}'
decode=0
opts=
prev=
last=
for arg in "$@"; do
  if [ "$arg" = "--decode" ]; then decode=1; fi
  if [ -n "$prev" ]; then opts="$opts $prev"; fi
  prev=$last
  last=$arg
done
if [ $decode -eq 1 ]; then
  {{ printf 'WAV\n'; cat "$prev"; }} > "$last"
else
  {{ printf '%s|%s\n' "$tag" "$opts"; cat "$prev"; }} > "$last"
fi
"#
            ),
            FakeEncoder::Failing => "#!/bin/sh\nexit 1\n".to_string(),
        }
    }
}

/// Write an executable fake encoder named `name` into `dir`.
#[cfg(unix)]
pub fn write_fake_encoder(dir: &Path, name: &str, kind: FakeEncoder<'_>) -> io::Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, kind.script())?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// Write an options file with one option string per line.
pub fn write_options_file(dir: &Path, name: &str, lines: &[&str]) -> io::Result<PathBuf> {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content)?;
    Ok(path)
}

/// Write a stand-in input file; the fake encoders never parse it.
pub fn write_input(dir: &Path, name: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    let mut data = b"RIFF\0\0\0\0WAVEfmt ".to_vec();
    data.extend((0u8..=255).cycle().take(4096));
    fs::write(&path, data)?;
    Ok(path)
}
