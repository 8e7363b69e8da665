use thiserror::Error;

use crate::text::BufferId;

#[derive(Error, Debug)]
pub enum DocketError {
    #[error("Edit rejected: {buffer}: {message}")]
    Edit { buffer: String, message: String },

    #[error("Unknown buffer: {0}")]
    UnknownBuffer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocketError {
    pub fn edit(buffer: &BufferId, message: impl Into<String>) -> Self {
        Self::Edit {
            buffer: buffer.to_string(),
            message: message.into(),
        }
    }

    pub fn unknown_buffer(buffer: &BufferId) -> Self {
        Self::UnknownBuffer(buffer.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocketError>;
