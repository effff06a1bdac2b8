use thiserror::Error;

use super::shape::CursorShape;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CursorError {
    /// The platform has no realization for this standard shape.
    #[error("Cursor shape '{0}' is not supported on this platform")]
    UnsupportedShape(CursorShape),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unrecognized cursor type '{0}'.")]
    UnrecognizedCursorName(String),

    /// Native cursor allocation failed.
    #[error("Failed to create native cursor: {0}")]
    ResourceCreation(String),
}

pub type Result<T> = std::result::Result<T, CursorError>;
