//! Output topology: the ordered channels records are routed into.
//!
//! Channel count is a function of configuration, so it is represented as a
//! descriptor rebuilt per batch rather than anything fixed at compile time.
//! All routing is by integer index into this descriptor.
//!
//! Layout rules:
//!
//! - One channel per intent, in declaration order, starting at 0.
//! - A fallback channel exists iff the policy is `route_to_fallback`, and it
//!   always takes the last index.
//! - With no intents and `route_to_fallback`, the fallback is the only channel.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::FallbackPolicy;
use crate::error::ConfigurationError;
use crate::intent::IntentSpec;

pub const FALLBACK_LABEL: &str = "Fallback";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDescriptor {
    pub index: usize,
    pub source_intent_key: Option<String>,
    pub is_fallback: bool,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct OutputTopology {
    channels: Vec<ChannelDescriptor>,
    by_key: HashMap<String, usize>,
    fallback: Option<usize>,
}

impl OutputTopology {
    /// Derive the channel layout from the configured intents and policy.
    pub fn build(
        intents: &[IntentSpec],
        policy: FallbackPolicy,
    ) -> Result<Self, ConfigurationError> {
        let with_fallback = policy == FallbackPolicy::RouteToFallback;
        if intents.is_empty() && !with_fallback {
            return Err(ConfigurationError::NoChannels);
        }

        let mut channels = Vec::with_capacity(intents.len() + usize::from(with_fallback));
        let mut by_key = HashMap::with_capacity(intents.len());

        for (index, intent) in intents.iter().enumerate() {
            if intent.key.is_empty() {
                return Err(ConfigurationError::EmptyIntentKey(index));
            }
            if by_key.insert(intent.key.clone(), index).is_some() {
                return Err(ConfigurationError::DuplicateIntentKey(intent.key.clone()));
            }
            channels.push(ChannelDescriptor {
                index,
                source_intent_key: Some(intent.key.clone()),
                is_fallback: false,
                label: intent.label().to_string(),
            });
        }

        let fallback = with_fallback.then(|| {
            let index = channels.len();
            channels.push(ChannelDescriptor {
                index,
                source_intent_key: None,
                is_fallback: true,
                label: FALLBACK_LABEL.to_string(),
            });
            index
        });

        tracing::debug!(
            channels = channels.len(),
            fallback = ?fallback,
            "built output topology"
        );

        Ok(Self {
            channels,
            by_key,
            fallback,
        })
    }

    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channel index for an intent key.
    pub fn channel_for(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn fallback_index(&self) -> Option<usize> {
        self.fallback
    }

    /// Where error-annotated records go: the fallback channel, else channel 0.
    pub fn error_index(&self) -> usize {
        self.fallback.unwrap_or(0)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intents(keys: &[&str]) -> Vec<IntentSpec> {
        keys.iter().map(|k| IntentSpec::new(*k, k)).collect()
    }

    #[test]
    fn fallback_channel_is_last() {
        let t = OutputTopology::build(
            &intents(&["book", "greeting", "cancel"]),
            FallbackPolicy::RouteToFallback,
        )
        .unwrap();
        assert_eq!(t.len(), 4);
        assert_eq!(t.fallback_index(), Some(3));
        assert!(t.channels()[3].is_fallback);
        assert!(t.channels()[3].source_intent_key.is_none());
        assert_eq!(t.channels().iter().filter(|c| c.is_fallback).count(), 1);
    }

    #[test]
    fn k_intents_yield_k_plus_one_channels() {
        for k in 1..6 {
            let keys: Vec<String> = (0..k).map(|i| format!("intent_{i}")).collect();
            let refs: Vec<&str> = keys.iter().map(|s| s.as_str()).collect();
            let t = OutputTopology::build(&intents(&refs), FallbackPolicy::RouteToFallback)
                .unwrap();
            assert_eq!(t.len(), k + 1);
            assert_eq!(t.fallback_index(), Some(k));
        }
    }

    #[test]
    fn no_fallback_channel_for_discard_or_error() {
        for policy in [FallbackPolicy::Discard, FallbackPolicy::Error] {
            let t = OutputTopology::build(&intents(&["a", "b"]), policy).unwrap();
            assert_eq!(t.len(), 2);
            assert_eq!(t.fallback_index(), None);
            assert!(t.channels().iter().all(|c| !c.is_fallback));
            assert_eq!(t.error_index(), 0);
        }
    }

    #[test]
    fn indices_follow_declaration_order() {
        let t = OutputTopology::build(&intents(&["c", "a", "b"]), FallbackPolicy::Discard)
            .unwrap();
        assert_eq!(t.channel_for("c"), Some(0));
        assert_eq!(t.channel_for("a"), Some(1));
        assert_eq!(t.channel_for("b"), Some(2));
        assert_eq!(t.channel_for("missing"), None);
        for (i, c) in t.channels().iter().enumerate() {
            assert_eq!(c.index, i);
        }
    }

    #[test]
    fn rebuild_is_deterministic() {
        let specs = intents(&["x", "y", "z"]);
        let a = OutputTopology::build(&specs, FallbackPolicy::RouteToFallback).unwrap();
        let b = OutputTopology::build(&specs, FallbackPolicy::RouteToFallback).unwrap();
        assert_eq!(a.channels(), b.channels());
    }

    #[test]
    fn duplicate_keys_rejected() {
        let err = OutputTopology::build(&intents(&["a", "b", "a"]), FallbackPolicy::Discard)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateIntentKey(ref k) if k == "a"));
    }

    #[test]
    fn key_comparison_is_case_sensitive() {
        let t = OutputTopology::build(&intents(&["Book", "book"]), FallbackPolicy::Discard);
        assert!(t.is_ok());
    }

    #[test]
    fn empty_key_rejected() {
        let err = OutputTopology::build(&intents(&["a", ""]), FallbackPolicy::RouteToFallback)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyIntentKey(1)));
    }

    #[test]
    fn empty_intents_need_fallback() {
        for policy in [FallbackPolicy::Discard, FallbackPolicy::Error] {
            let err = OutputTopology::build(&[], policy).unwrap_err();
            assert!(matches!(err, ConfigurationError::NoChannels));
        }

        let t = OutputTopology::build(&[], FallbackPolicy::RouteToFallback).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.fallback_index(), Some(0));
        assert_eq!(t.error_index(), 0);
    }

    #[test]
    fn labels_use_output_label_then_key() {
        let specs = vec![
            IntentSpec::new("book", "book").with_output_label("Bookings"),
            IntentSpec::new("greeting", "hello"),
        ];
        let t = OutputTopology::build(&specs, FallbackPolicy::RouteToFallback).unwrap();
        let labels: Vec<&str> = t.labels().collect();
        assert_eq!(labels, vec!["Bookings", "greeting", "Fallback"]);
    }
}
