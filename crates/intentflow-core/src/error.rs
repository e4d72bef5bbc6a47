use thiserror::Error;

/// Problems with the routing configuration.
///
/// Always detected before any record is touched and never recoverable by
/// continue-on-fail, since without a valid topology there is nowhere to route.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("duplicate intent key: {0}")]
    DuplicateIntentKey(String),

    #[error("intent at position {0} has an empty key")]
    EmptyIntentKey(usize),

    #[error("intent '{intent}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { intent: String, parameter: String },

    #[error("no output channels: at least one intent is required unless fallback behavior is route_to_fallback")]
    NoChannels,

    #[error("confidence threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),

    #[error("intent '{0}' is not part of the output topology")]
    UnknownIntent(String),

    #[error("reading configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing configuration: {0}")]
    Json(#[from] serde_json::Error),
}
