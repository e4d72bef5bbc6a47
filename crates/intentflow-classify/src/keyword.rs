//! Keyword-overlap intent classification.
//!
//! Each intent scores the fraction of its keywords found as substrings of the
//! input. Intents are checked in declaration order and the first one whose
//! score reaches the threshold wins; later intents are not looked at, even if
//! they would score higher.

use intentflow_core::IntentSpec;
use serde::Serialize;

/// Outcome of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub matched_intent_key: Option<String>,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

impl ClassificationResult {
    pub fn unmatched(confidence: f64) -> Self {
        Self {
            matched_intent_key: None,
            confidence,
            matched_keywords: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched_intent_key.is_some()
    }
}

/// Seam for substituting a different scoring backend (e.g. a remote service).
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str, intents: &[IntentSpec]) -> anyhow::Result<ClassificationResult>;
}

/// First-match-wins keyword classifier.
#[derive(Debug, Clone, Copy)]
pub struct KeywordClassifier {
    case_sensitive: bool,
    threshold: f64,
}

impl KeywordClassifier {
    pub fn new(case_sensitive: bool, threshold: f64) -> Self {
        Self {
            case_sensitive,
            threshold,
        }
    }

    /// Classify `text` against `intents`.
    ///
    /// When nothing reaches the threshold, `confidence` is the score of the
    /// last intent evaluated, not the best one.
    pub fn score(&self, text: &str, intents: &[IntentSpec]) -> ClassificationResult {
        let haystack = self.normalize(text);
        let mut last_confidence = 0.0;

        for intent in intents {
            if intent.keywords.is_empty() {
                last_confidence = 0.0;
                continue;
            }

            let matched: Vec<String> = intent
                .keywords
                .iter()
                .filter(|k| haystack.contains(self.normalize(k).as_str()))
                .cloned()
                .collect();
            let confidence = matched.len() as f64 / intent.keywords.len() as f64;

            if confidence >= self.threshold {
                tracing::trace!(intent = %intent.key, confidence, "intent matched");
                return ClassificationResult {
                    matched_intent_key: Some(intent.key.clone()),
                    confidence,
                    matched_keywords: matched,
                };
            }
            last_confidence = confidence;
        }

        ClassificationResult::unmatched(last_confidence)
    }

    fn normalize(&self, s: &str) -> String {
        if self.case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(
        &self,
        text: &str,
        intents: &[IntentSpec],
    ) -> anyhow::Result<ClassificationResult> {
        Ok(self.score(text, intents))
    }
}
