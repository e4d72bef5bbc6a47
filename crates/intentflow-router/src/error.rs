use intentflow_core::ConfigurationError;
use thiserror::Error;

/// Failure of a single record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("no intent matched input: {input_text}")]
    NoIntentMatched { input_text: String },

    #[error("classifier failed: {0}")]
    Classifier(#[source] anyhow::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Failure of a whole batch.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("item {item_index}: {source}")]
    Record {
        item_index: usize,
        #[source]
        source: RecordError,
    },
}

impl RouteError {
    /// Batch position of the offending record, if the failure was per-record.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::Record { item_index, .. } => Some(*item_index),
            Self::Configuration(_) => None,
        }
    }
}
