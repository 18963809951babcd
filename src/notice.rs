//! User-visible notices: one per terminal I/O outcome.

use std::fmt;

use crate::error::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Error code of the failure behind an error notice.
    pub code: Option<&'static str>,
    /// Whether repeating the action may succeed.
    pub retryable: bool,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into(), code: None, retryable: false }
    }

    /// Error notice for `err`, headed by `message`.
    #[must_use]
    pub fn failure(message: impl Into<String>, err: &(impl ErrorCode + ?Sized)) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            code: Some(err.error_code()),
            retryable: err.retryable(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.level, self.code) {
            (NoticeLevel::Info, _) => f.write_str(&self.message),
            (NoticeLevel::Error, Some(code)) => write!(f, "{} [{code}]", self.message),
            (NoticeLevel::Error, None) => f.write_str(&self.message),
        }
    }
}
