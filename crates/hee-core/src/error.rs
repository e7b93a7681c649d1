use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HeeError>;

#[derive(Debug, Error)]
pub enum HeeError {
    /// Missing or invalid argument; carries a usage hint.
    #[error("{message}\nusage: {usage}")]
    Usage { message: String, usage: &'static str },

    #[error("cannot access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no card named `{name}`\navailable cards: {}", available.join(", "))]
    NotFound { name: String, available: Vec<String> },

    #[error("config error: {0}")]
    Config(String),

    #[error("malformed mark on line {line}: {reason}")]
    MalformedMark { line: usize, reason: String },
}

impl HeeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HeeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            HeeError::Usage { .. } => 2,
            HeeError::Io { .. }
            | HeeError::NotFound { .. }
            | HeeError::Config(_)
            | HeeError::MalformedMark { .. } => 1,
        }
    }
}
