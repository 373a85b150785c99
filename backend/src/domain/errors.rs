use thiserror::Error;

/// Failure classes the domain layer exposes to callers.
///
/// None of these is fatal: a `SourceUnavailable` is recovered by serving
/// locally generated demo data, a `Validation` is surfaced to the user and
/// not retried, and a `Persistence` degrades the session to in-memory state.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("{0}")]
    Validation(String),

    #[error("persistence failed: {0}")]
    Persistence(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl CalendarError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CalendarError::Validation(msg.into())
    }
}
