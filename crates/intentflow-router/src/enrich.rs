//! Output annotation of routed records.
//!
//! Enrichment only adds keys. Original fields stay where they were; the
//! router's own keys are appended after them.

use intentflow_classify::{ClassificationResult, ExtractedParameters};
use intentflow_core::Record;
use intentflow_core::record::truncate_utf16;
use serde_json::{Map, Value, json};

/// Maximum UTF-16 code units of input text echoed back in metadata.
pub const INPUT_TEXT_LIMIT: usize = 200;

pub const RECOGNIZED_INTENT: &str = "recognizedIntent";
pub const EXTRACTED_PARAMETERS: &str = "extractedParameters";
pub const METADATA: &str = "metadata";
pub const ERROR: &str = "error";

/// What the router learned about one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub recognized_intent: Option<String>,
    pub extracted_parameters: ExtractedParameters,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
    pub input_text: String,
    pub missing_parameters: Vec<String>,
}

impl Enrichment {
    pub fn new(classification: ClassificationResult, input_text: &str) -> Self {
        Self {
            recognized_intent: classification.matched_intent_key,
            extracted_parameters: Map::new(),
            confidence: classification.confidence,
            matched_keywords: classification.matched_keywords,
            input_text: truncate_utf16(input_text, INPUT_TEXT_LIMIT),
            missing_parameters: Vec::new(),
        }
    }

    pub fn apply(self, record: &mut Record, processing_time: &str) {
        let mut metadata = Map::new();
        metadata.insert("confidence".into(), json!(self.confidence));
        metadata.insert("processingTime".into(), json!(processing_time));
        metadata.insert("inputText".into(), Value::String(self.input_text));
        metadata.insert("matchedKeywords".into(), json!(self.matched_keywords));
        if !self.missing_parameters.is_empty() {
            metadata.insert("missingParameters".into(), json!(self.missing_parameters));
        }

        let fields = &mut record.fields;
        fields.insert(
            RECOGNIZED_INTENT.into(),
            self.recognized_intent.map_or(Value::Null, Value::String),
        );
        fields.insert(
            EXTRACTED_PARAMETERS.into(),
            Value::Object(self.extracted_parameters),
        );
        fields.insert(METADATA.into(), Value::Object(metadata));
    }
}

/// Mark a record as failed, keeping its original fields.
pub fn annotate_error(record: &mut Record, message: &str, processing_time: &str) {
    let fields = &mut record.fields;
    fields.insert(ERROR.into(), Value::String(message.to_string()));
    fields.insert(RECOGNIZED_INTENT.into(), Value::Null);
    fields.insert(EXTRACTED_PARAMETERS.into(), Value::Object(Map::new()));
    fields.insert(
        METADATA.into(),
        json!({
            "confidence": 0,
            "processingTime": processing_time,
            "error": true,
        }),
    );
}
