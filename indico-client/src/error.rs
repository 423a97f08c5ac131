//! Error types for the indico-client crate.

/// Errors returned by Indico API operations.
#[derive(Debug, thiserror::Error)]
pub enum IndicoError {
    /// HTTP transport failure, including client construction.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status code.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// An attachment record cannot be mapped to a manage endpoint.
    #[error("attachment error: {0}")]
    Attachment(String),
}

/// Convenience type alias for indico-client results.
pub type Result<T> = std::result::Result<T, IndicoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http() {
        let err = IndicoError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn display_api() {
        let err = IndicoError::Api {
            status: 403,
            body: "forbidden".into(),
        };
        assert_eq!(err.to_string(), "API error (403): forbidden");
    }

    #[test]
    fn display_decode() {
        let err = IndicoError::Decode("missing results".into());
        assert_eq!(err.to_string(), "decode error: missing results");
    }

    #[test]
    fn display_attachment() {
        let err = IndicoError::Attachment("no contributions segment".into());
        assert_eq!(err.to_string(), "attachment error: no contributions segment");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IndicoError>();
    }
}
