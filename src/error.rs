//! Error types for the announcement pipeline.

/// Top-level error type for the announcer.
#[derive(Debug, thiserror::Error)]
pub enum CrierError {
    /// Configuration file or value error.
    #[error("config error: {0}")]
    Config(String),

    /// Clock construction error (bad timezone or simulated start).
    #[error("clock error: {0}")]
    Clock(String),

    /// Schedule validation error (missing or malformed timetable data).
    #[error("schedule error: {0}")]
    Schedule(String),

    /// Room-to-channel routing error.
    #[error("channel error: {0}")]
    Channel(String),

    /// Announcement delivery error.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Material protection error.
    #[error("protect error: {0}")]
    Protect(String),

    /// Indico API error.
    #[error("indico error: {0}")]
    Indico(#[from] indico_client::IndicoError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, CrierError>;
