//! Stable error codes shared by every fallible collaborator.

use canvas::codec::ExportError;
use canvas::doc::StoreError;
use canvas::surface::ValidationError;

/// Machine-readable classification attached to user-visible notices.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "E_INDEX_OUT_OF_RANGE",
        }
    }
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Dimension { .. } => "E_INVALID_DIMENSION",
            Self::Color(_) => "E_INVALID_COLOR",
        }
    }
}

impl ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRegion { .. } => "E_EMPTY_REGION",
            Self::Decode { .. } => "E_LAYER_DECODE",
            Self::Background(_) => "E_BACKGROUND_DECODE",
            Self::TooLarge { .. } => "E_EXPORT_TOO_LARGE",
            Self::Encode(_) => "E_RASTER_ENCODE",
        }
    }
}

/// `true` for statuses worth retrying: throttling and server errors.
#[must_use]
pub fn retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500..=599)
}
