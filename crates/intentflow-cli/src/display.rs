//! Human-readable and JSON rendering for CLI output.

use intentflow_classify::ClassificationResult;
use intentflow_core::OutputTopology;
use intentflow_router::RoutedBatch;
use serde_json::Value;

// ── Topology ──

pub fn print_topology(topology: &OutputTopology) {
    println!("{:<6} {:<24} {:<24} {}", "index", "label", "intent", "fallback");
    for channel in topology.channels() {
        println!(
            "{:<6} {:<24} {:<24} {}",
            channel.index,
            channel.label,
            channel.source_intent_key.as_deref().unwrap_or("-"),
            if channel.is_fallback { "yes" } else { "no" }
        );
    }
}

// ── Classification ──

pub fn print_classification(result: &ClassificationResult) {
    println!(
        "  {:<18} {}",
        "intent",
        result.matched_intent_key.as_deref().unwrap_or("(none)")
    );
    println!("  {:<18} {:.3}", "confidence", result.confidence);
    if !result.matched_keywords.is_empty() {
        println!("  {:<18} {}", "matched keywords", result.matched_keywords.join(", "));
    }
}

/// Classification as a JSON object.
pub fn classification_json(result: &ClassificationResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string(result)?)
}

// ── Batch output ──

/// Channels as a JSON array, each with its descriptor and routed records.
pub fn channels_json(topology: &OutputTopology, batch: &RoutedBatch) -> anyhow::Result<Value> {
    let mut channels = Vec::with_capacity(topology.len());
    for (descriptor, records) in topology.channels().iter().zip(&batch.channels) {
        let mut channel = match serde_json::to_value(descriptor)? {
            Value::Object(map) => map,
            other => anyhow::bail!("channel descriptor serialised to {other}"),
        };
        let items: Vec<Value> = records
            .iter()
            .map(|r| Value::Object(r.fields.clone()))
            .collect();
        channel.insert("records".into(), Value::Array(items));
        channels.push(Value::Object(channel));
    }
    Ok(Value::Array(channels))
}

/// One-line-per-channel summary written to stderr.
pub fn print_summary(topology: &OutputTopology, batch: &RoutedBatch) {
    for (descriptor, records) in topology.channels().iter().zip(&batch.channels) {
        eprintln!("  [{}] {:<24} {}", descriptor.index, descriptor.label, records.len());
    }
    eprintln!(
        "  emitted {}, discarded {}, failed {}{}",
        batch.emitted(),
        batch.discarded,
        batch.failed,
        if batch.cancelled { " (cancelled)" } else { "" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentflow_core::{FallbackPolicy, IntentSpec, Record, RouterConfig};
    use intentflow_router::Router;
    use serde_json::json;

    #[test]
    fn classification_json_uses_wire_names() {
        let result = ClassificationResult {
            matched_intent_key: Some("book".into()),
            confidence: 0.5,
            matched_keywords: vec!["reserve".into()],
        };
        let parsed: Value = serde_json::from_str(&classification_json(&result).unwrap()).unwrap();
        assert_eq!(
            parsed,
            json!({"matchedIntentKey": "book", "confidence": 0.5, "matchedKeywords": ["reserve"]})
        );
    }

    #[test]
    fn channels_json_lists_every_channel() {
        let config = RouterConfig::new(
            vec![IntentSpec::new("greeting", "hello,hi").with_output_label("Greetings")],
            FallbackPolicy::RouteToFallback,
        );
        let router = Router::new(config).unwrap();
        let records = vec![
            Record::from_value(0, json!({"message": "hi"}), "message"),
            Record::from_value(1, json!({"message": "zzz"}), "message"),
        ];
        let batch = router.route_batch(records).unwrap();
        let out = channels_json(router.topology(), &batch).unwrap();

        let channels = out.as_array().unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0]["label"], json!("Greetings"));
        assert_eq!(channels[0]["records"][0]["recognizedIntent"], json!("greeting"));
        assert_eq!(channels[0]["sourceIntentKey"], json!("greeting"));
        assert_eq!(channels[1]["isFallback"], json!(true));
        assert_eq!(channels[1]["sourceIntentKey"], Value::Null);
        assert_eq!(channels[1]["records"][0]["message"], json!("zzz"));
    }
}
