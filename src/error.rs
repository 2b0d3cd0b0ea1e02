use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("markdown rendering failed: {0}")]
    Render(#[source] io::Error),

    #[error("could not launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{stderr}")]
    Automation { code: Option<i32>, stderr: String },

    #[error("{source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse failure category, used for logging and protocol metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transform,
    Automation,
    Persistence,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Render(_) => ErrorKind::Transform,
            Error::Launch { .. } | Error::Automation { .. } => {
                ErrorKind::Automation
            }
            Error::Persistence { .. } => ErrorKind::Persistence,
        }
    }
}

/// The status string handed back to a caller. Built only at the edge of a
/// tool call; everything beneath works with `Result<_, Error>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub success: bool,
    pub message: String,
}

impl ToolOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }

    pub fn from_save(result: Result<PathBuf, Error>) -> Self {
        match result {
            Ok(path) => {
                Self::ok(format!("Successfully saved to {}", path.display()))
            }
            Err(err) => Self::failed(format!("Error saving file: {err}")),
        }
    }

    pub fn from_note(result: Result<(), Error>) -> Self {
        match result {
            Ok(()) => Self::ok("Note created successfully"),
            Err(err) => Self::failed(format!("Error creating note: {err}")),
        }
    }
}

impl fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
