use std::fmt;

use thiserror::Error as TError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, TError)]
pub enum Error {
    #[error("ConfigurationError: {0}")]
    Configuration(String),

    #[error("NotFoundError: {0}")]
    NotFound(NotFoundTarget),

    #[error("RemoteOperationError: {0}")]
    RemoteOperation(String),

    #[error("ConflictError: {0}")]
    Conflict(String),

    #[error("InvalidResource: {0}")]
    InvalidResource(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundTarget {
    PathMatcher(String),
    TargetPath(String),
}

impl fmt::Display for NotFoundTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathMatcher(name) => write!(f, "path matcher `{}` not found in url map", name),
            Self::TargetPath(path) => write!(f, "target path `{}` not found in path matcher", path),
        }
    }
}

impl From<NotFoundTarget> for Error {
    fn from(target: NotFoundTarget) -> Self {
        Self::NotFound(target)
    }
}
