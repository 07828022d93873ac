use thiserror::Error;

/// Result type for every rendering entry point.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Errors that can occur while rendering a feed.
///
/// There is no validation category: incomplete input still renders as a
/// minimal document. Failures come only from the serializers or the sink.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The XML tree serializer rejected the tree.
    #[error("XML serialization failed: {0}")]
    Xml(String),

    /// The JSON encoder failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The output sink failed. Anything written before the failure is incomplete.
    #[error("Failed to write feed output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rendered output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
