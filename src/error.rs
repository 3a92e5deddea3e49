use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a conversion.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write to standard output: {0}")]
    Stdout(#[source] std::io::Error),

    #[error("could not create temporary file: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("could not make {} absolute: {source}", .path.display())]
    AbsolutePath {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("{program} was not found in PATH")]
    MissingTool { program: String },

    #[error("could not start \"{command}\": {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("running \"{command}\" failed:\n{output}")]
    CommandFailed { command: String, output: String },

    #[error("no input file given")]
    NoInput,
}
