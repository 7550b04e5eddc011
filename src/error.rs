use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the fallible parts of the crate.
///
/// Log emission itself never fails; these come from persisting the lifecycle
/// history and from parsing names of levels, message kinds, actions and
/// buffers.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a state file failed.
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A persisted document is not valid JSON of the expected shape.
    #[error("malformed state document: {0}")]
    Json(#[from] serde_json::Error),

    /// A name did not match any variant of the named enum.
    #[error("unknown {kind} `{name}`")]
    UnknownName { kind: &'static str, name: String },
}

impl Error {
    pub(crate) fn unknown(kind: &'static str, name: &str) -> Self {
        Error::UnknownName {
            kind,
            name: name.to_owned(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
