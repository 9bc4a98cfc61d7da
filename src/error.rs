use thiserror::Error;

use crate::validation::ValidationErrors;

/// Message shown when the backend rejects a recipe.
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create recipe";

/// Errors that can occur while editing or submitting a recipe form
#[derive(Error, Debug)]
pub enum FormError {
    /// One or more fields failed client-side validation
    #[error("Please correct the highlighted fields ({} errors)", .0.len())]
    Validation(ValidationErrors),

    /// Selected image is larger than the configured ceiling
    #[error("File size exceeds the maximum allowed limit of {}", human_size(.limit))]
    FileTooLarge { size: u64, limit: u64 },

    /// Selected image could not be read
    #[error("Failed to read image file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Backend answered with a non-success status or an unusable body
    #[error("{0}")]
    Submit(String),

    /// Network-level failure while talking to the backend
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// A submission is already in flight
    #[error("A submission is already in progress")]
    SubmitInFlight,

    /// The recipe was already created from this form
    #[error("This recipe has already been submitted")]
    AlreadySubmitted,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Draft document could not be parsed
    #[error("Invalid draft document: {0}")]
    Draft(#[from] serde_json::Error),
}

/// Render a byte count in the largest unit that divides it exactly.
fn human_size(bytes: &u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    match *bytes {
        b if b >= MB && b % MB == 0 => format!("{} MB", b / MB),
        b if b >= KB && b % KB == 0 => format!("{} KB", b / KB),
        b => format!("{} bytes", b),
    }
}

impl FormError {
    /// The generic failure reported for any non-success response.
    pub fn create_failed() -> Self {
        FormError::Submit(CREATE_FAILED_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_too_large_message_uses_megabytes() {
        let err = FormError::FileTooLarge {
            size: 1_048_577,
            limit: 1_048_576,
        };
        assert_eq!(
            err.to_string(),
            "File size exceeds the maximum allowed limit of 1 MB"
        );
    }

    #[test]
    fn test_file_too_large_message_keeps_fractional_limits() {
        let message = |limit: u64| FormError::FileTooLarge { size: limit + 1, limit }.to_string();
        assert!(message(512 * 1024).ends_with("limit of 512 KB"));
        assert!(message(1_572_864).ends_with("limit of 1536 KB"));
        assert!(message(1000).ends_with("limit of 1000 bytes"));
        assert!(message(4).ends_with("limit of 4 bytes"));
        assert!(message(3 * 1024 * 1024).ends_with("limit of 3 MB"));
    }

    #[test]
    fn test_create_failed_message() {
        assert_eq!(FormError::create_failed().to_string(), "Failed to create recipe");
    }

    #[test]
    fn test_file_read_wraps_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err: FormError = io.into();
        assert!(err.to_string().starts_with("Failed to read image file"));
        assert!(err.to_string().contains("missing.png"));
    }
}
