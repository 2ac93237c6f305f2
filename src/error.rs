//! Error types for the WTS core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// The text contains no `STRING` block at all.
    #[error("not a WTS file: no STRING block found")]
    Format,

    /// A `STRING` token is not followed by an integer.
    #[error("invalid string number {found:?} in block {block}")]
    InvalidNumber { block: usize, found: String },

    /// Nothing left to write after purpose filtering.
    #[error("no translated data available")]
    NoContent,

    #[error("invalid base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("content is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    InvalidPayload(String),
}

impl CoreError {
    /// Stable code reported to the UI alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Format | CoreError::InvalidNumber { .. } => "format_error",
            CoreError::NoContent => "no_content",
            CoreError::InvalidBase64(_) | CoreError::InvalidUtf8(_) => "decode_error",
            CoreError::Io(_) => "io_error",
            CoreError::InvalidPayload(_) => "invalid_payload",
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_codes() {
        assert_eq!(CoreError::Format.code(), "format_error");
        assert_eq!(
            CoreError::InvalidNumber { block: 1, found: "x".into() }.code(),
            "format_error"
        );
        assert_eq!(CoreError::NoContent.code(), "no_content");
        assert_eq!(CoreError::NoContent.to_string(), "no translated data available");
    }
}
