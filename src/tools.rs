//! External programs the converters delegate to, and the scratch files they read.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

/// Names (or paths) of the external programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub pandoc: String,
    pub xsltproc: String,
    pub htmldoc: String,
    pub faketime: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            pandoc: "pandoc".into(),
            xsltproc: "xsltproc".into(),
            htmldoc: "htmldoc".into(),
            faketime: "faketime".into(),
        }
    }
}

fn env_or(var: &str, default: String) -> String {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default,
    }
}

impl Toolchain {
    /// Default program names, each overridable with an `MD2X_*` variable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            pandoc: env_or("MD2X_PANDOC", defaults.pandoc),
            xsltproc: env_or("MD2X_XSLTPROC", defaults.xsltproc),
            htmldoc: env_or("MD2X_HTMLDOC", defaults.htmldoc),
            faketime: env_or("MD2X_FAKETIME", defaults.faketime),
        }
    }
}

/// Locates `program` on the PATH (or checks it, when given as a path).
pub fn locate(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|_| Error::MissingTool {
        program: program.to_string(),
    })
}

/// A command for `program`, failing early when it cannot be found.
pub fn command(program: &str) -> Result<Command> {
    Ok(Command::new(locate(program)?))
}

pub fn command_line(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `command` to completion and returns what it wrote to stdout.
///
/// A non-zero exit status becomes [`Error::CommandFailed`] carrying everything
/// the program printed.
pub fn run(command: &mut Command) -> Result<Vec<u8>> {
    let line = command_line(command);
    tracing::debug!(command = %line, "running");

    let output = command.output().map_err(|source| Error::Spawn {
        command: line.clone(),
        source,
    })?;

    if !output.status.success() {
        let mut printed = String::from_utf8_lossy(&output.stderr).into_owned();
        printed.push_str(&String::from_utf8_lossy(&output.stdout));
        return Err(Error::CommandFailed {
            command: line,
            output: printed.trim_end().to_string(),
        });
    }

    if !output.stderr.is_empty() {
        tracing::debug!(
            command = %line,
            stderr = %String::from_utf8_lossy(&output.stderr).trim_end(),
            "command wrote to stderr"
        );
    }
    Ok(output.stdout)
}

/// Writes `contents` to a fresh temporary file, deleted when the handle drops.
pub fn scratch_file(prefix: &str, suffix: &str, contents: &[u8]) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile()
        .map_err(Error::TempFile)?;
    file.write_all(contents).map_err(Error::TempFile)?;
    file.flush().map_err(Error::TempFile)?;
    Ok(file)
}
