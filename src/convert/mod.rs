//! The three conversion pipelines, split into the stages their binaries drive.

pub mod epub;
pub mod pdf;
pub mod xml;

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the Markdown document to convert.
pub fn read_source(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "reading");
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "written");
    Ok(())
}

/// `output` when given, else `input` with its extension replaced by `extension`.
pub fn output_path(input: &Path, output: Option<&Path>, extension: &str) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension(extension),
    }
}
