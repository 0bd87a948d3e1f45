//! Error types for send-window operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("Invalid weekday index: {0} (expected 0-6, Sunday = 0)")]
    InvalidWeekday(u8),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),
}

pub type Result<T> = std::result::Result<T, WindowError>;
