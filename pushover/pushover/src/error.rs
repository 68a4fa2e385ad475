use thiserror::Error;

/// Notification error.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// Error from [`ureq`] crate, e.g. connection refused or TLS failure.
    #[error("ureq error: {0}")]
    UReq(#[from] Box<ureq::Error>),
    /// Failed to read the response body.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to encode the request document.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Response body is not JSON.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    /// Error from [`url`] crate.
    #[error("API URL error: {0}")]
    Url(#[from] url::ParseError),
    /// Response field is missing or has the wrong type. <https://pushover.net/api#response>
    #[error("response field `{0}` is missing or has the wrong type")]
    Malformed(&'static str),
    /// No interpretable response is held, either nothing was sent yet
    /// or the last response could not be parsed.
    #[error("no response available")]
    NoResponse,
    /// Error index is beyond the errors of the last response.
    #[error("error index {index} is out of range, {len} error(s) available")]
    ErrorIndex {
        /// Requested index.
        index: usize,
        /// Number of errors in the last response.
        len: usize,
    },
}
