//! Parameter extraction for a matched intent.
//!
//! Parameters resolve in declared order: a record field with the same name
//! wins (even when its value is `null`), then a non-empty default. Anything else is left out of the result.
//! Types are advisory and never coerced here.

use intentflow_core::{IntentSpec, Record};
use serde_json::{Map, Value};

pub type ExtractedParameters = Map<String, Value>;

/// Extracted parameters plus required ones that could not be resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub parameters: ExtractedParameters,
    pub missing_required: Vec<String>,
}

pub fn extract(intent: &IntentSpec, record: &Record) -> ExtractedParameters {
    extract_with_diagnostics(intent, record).parameters
}

/// Like [`extract`], also listing required parameters left unresolved.
///
/// Missing required parameters are still omitted from `parameters`; the list
/// is for callers that want to surface the gap.
pub fn extract_with_diagnostics(intent: &IntentSpec, record: &Record) -> Extraction {
    let mut out = Extraction::default();

    for spec in &intent.parameters {
        let value = match record.get(&spec.name) {
            Some(v) => Some(v.clone()),
            _ => spec
                .default_value
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| Value::String(d.to_string())),
        };

        match value {
            Some(v) => {
                out.parameters.insert(spec.name.clone(), v);
            }
            None if spec.required => {
                tracing::debug!(
                    intent = %intent.key,
                    parameter = %spec.name,
                    item = record.item_index,
                    "required parameter unresolved"
                );
                out.missing_required.push(spec.name.clone());
            }
            None => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentflow_core::{ParameterSpec, ParameterType};
    use serde_json::json;

    fn booking() -> IntentSpec {
        IntentSpec::new("book", "book,reserve")
            .with_parameter(ParameterSpec::new("guests", ParameterType::Number).required())
            .with_parameter(ParameterSpec::new("date", ParameterType::Date).with_default("today"))
            .with_parameter(ParameterSpec::new("notes", ParameterType::String))
    }

    fn record(value: Value) -> Record {
        Record::from_value(0, value, "message")
    }

    #[test]
    fn field_value_used_verbatim() {
        let r = record(json!({"message": "book", "guests": "four", "date": "2026-01-02"}));
        let params = extract(&booking(), &r);
        // No coercion: a string in a number parameter stays a string.
        assert_eq!(params["guests"], json!("four"));
        assert_eq!(params["date"], json!("2026-01-02"));
        assert!(!params.contains_key("notes"));
    }

    #[test]
    fn default_used_when_field_absent() {
        let r = record(json!({"message": "book", "guests": 2}));
        let params = extract(&booking(), &r);
        assert_eq!(params["guests"], json!(2));
        assert_eq!(params["date"], json!("today"));
    }

    #[test]
    fn required_without_source_is_omitted() {
        let r = record(json!({"message": "book"}));
        let extraction = extract_with_diagnostics(&booking(), &r);
        assert!(!extraction.parameters.contains_key("guests"));
        assert_eq!(extraction.missing_required, vec!["guests"]);
        // Never a placeholder.
        assert_eq!(extraction.parameters.len(), 1);
    }

    #[test]
    fn empty_default_is_ignored() {
        let intent = IntentSpec::new("x", "x")
            .with_parameter(ParameterSpec::new("p", ParameterType::String).with_default(""));
        let params = extract(&intent, &record(json!({})));
        assert!(params.is_empty());
    }

    #[test]
    fn null_field_is_kept_verbatim() {
        let r = record(json!({"date": null, "guests": null}));
        let extraction = extract_with_diagnostics(&booking(), &r);
        assert_eq!(extraction.parameters["date"], Value::Null);
        assert_eq!(extraction.parameters["guests"], Value::Null);
        assert!(extraction.missing_required.is_empty());
    }

    #[test]
    fn declared_order_preserved() {
        let r = record(json!({"notes": "window", "date": "fri", "guests": 3}));
        let params = extract(&booking(), &r);
        let keys: Vec<&str> = params.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["guests", "date", "notes"]);
    }

    #[test]
    fn intent_without_parameters() {
        let extraction = extract_with_diagnostics(&IntentSpec::new("hi", "hi"), &record(json!({"a": 1})));
        assert_eq!(extraction, Extraction::default());
    }
}
