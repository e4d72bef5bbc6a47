//! Intent classification: keyword-overlap scoring and parameter extraction.

pub mod keyword;
pub mod params;

pub use keyword::{ClassificationResult, IntentClassifier, KeywordClassifier};
pub use params::{ExtractedParameters, Extraction, extract, extract_with_diagnostics};
