//! Service error types

use contracts::OverlayError;
use thiserror::Error;

/// Errors raised by the overlay service and its sensor sources
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error("replay file {path} line {line}: {message}")]
    ReplayFormat {
        path: String,
        line: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("service worker failed: {0}")]
    Worker(String),
}

impl ServiceError {
    pub fn replay_format(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::ReplayFormat {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
