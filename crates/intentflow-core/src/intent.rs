//! Operator-defined intents and their parameter declarations.

use serde::{Deserialize, Deserializer, Serialize};

/// A named category of input the router can recognise.
///
/// Identity is `key`. Keywords are already tokenised: configuration may give
/// them as a comma-separated string or a list, and both end up as trimmed,
/// non-empty tokens in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentSpec {
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_label: Option<String>,
}

impl IntentSpec {
    /// Build an intent from a key and a comma-separated keyword string.
    pub fn new(key: impl Into<String>, keywords: &str) -> Self {
        Self {
            key: key.into(),
            description: String::new(),
            keywords: split_keywords(keywords),
            parameters: Vec::new(),
            output_label: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_output_label(mut self, label: impl Into<String>) -> Self {
        self.output_label = Some(label.into());
        self
    }

    /// Label shown for this intent's output channel.
    pub fn label(&self) -> &str {
        match self.output_label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.key,
        }
    }
}

/// Advisory value type of a parameter. Not enforced during extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: ParameterType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default_value: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Split a comma-separated keyword string into trimmed, non-empty tokens.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordsRepr {
    Joined(String),
    List(Vec<String>),
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let keywords = match Option::<KeywordsRepr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(KeywordsRepr::Joined(raw)) => split_keywords(&raw),
        Some(KeywordsRepr::List(list)) => list
            .iter()
            .flat_map(|entry| split_keywords(entry))
            .collect(),
    };
    Ok(keywords)
}
