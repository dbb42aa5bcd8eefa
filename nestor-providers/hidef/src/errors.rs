use std::{io, path::PathBuf, sync::Arc};

use nestor_core::ClusterProducerError;
use thiserror::Error;

/// A line of a `.nodes` file that could not be interpreted.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("line {line}: {reason}")]
pub struct NodesFormatError {
    /// One-based line number.
    pub line: usize,
    /// Description of the problem.
    pub reason: String,
}

/// Failures while running HiDeF or reading its output.
#[derive(Debug, Error)]
pub enum HidefError {
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` exited with status {status:?}: {stderr}")]
    Exit {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("HiDeF output `{}` was not written", path.display())]
    MissingOutput { path: PathBuf },
    #[error("failed to read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed HiDeF output `{}`: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: NodesFormatError,
    },
}

impl From<HidefError> for ClusterProducerError {
    fn from(error: HidefError) -> Self {
        match error {
            HidefError::Launch { command, source } => Self::Launch {
                command: Arc::from(command),
                message: Arc::from(source.to_string()),
            },
            HidefError::Exit { status, stderr, .. } => Self::Exit {
                status,
                stderr: Arc::from(stderr.trim_end()),
            },
            HidefError::MissingOutput { path } => Self::MissingOutput { path },
            HidefError::Read { path, source } => Self::MalformedOutput {
                path,
                line: 0,
                reason: Arc::from(source.to_string()),
            },
            HidefError::Format { path, source } => Self::MalformedOutput {
                path,
                line: source.line,
                reason: Arc::from(source.reason),
            },
        }
    }
}
