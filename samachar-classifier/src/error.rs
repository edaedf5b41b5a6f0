use samachar_http::HttpError;

/// Shown when the service gave no `detail` of its own.
pub const FALLBACK_MESSAGE: &str =
    "An error occurred while classifying the news. Please try again.";

/// The single user-facing failure of a classification attempt.
///
/// Transport failures and service-reported failures collapse into one
/// message here; the underlying [`HttpError`] is only logged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ClassificationFailed {
    pub message: String,
}

impl ClassificationFailed {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_MESSAGE)
    }
}

impl From<&HttpError> for ClassificationFailed {
    fn from(err: &HttpError) -> Self {
        match err.detail() {
            Some(detail) => Self::new(detail),
            None => Self::fallback(),
        }
    }
}

impl From<HttpError> for ClassificationFailed {
    fn from(err: HttpError) -> Self {
        Self::from(&err)
    }
}
