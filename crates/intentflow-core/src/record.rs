//! Records flowing through the router.

use serde_json::{Map, Value};

/// One input item.
///
/// `fields` keeps insertion order so enriched output lists original fields
/// first. The attachment is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub item_index: usize,
    pub fields: Map<String, Value>,
    pub attachment: Option<Vec<u8>>,
}

impl Record {
    pub fn new(item_index: usize, fields: Map<String, Value>) -> Self {
        Self {
            item_index,
            fields,
            attachment: None,
        }
    }

    /// Build a record from an arbitrary JSON value.
    ///
    /// Objects become the field map as-is; any other value is wrapped under
    /// `field` so it still has somewhere to live.
    pub fn from_value(item_index: usize, value: Value, field: &str) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert(field.to_string(), other);
                map
            }
        };
        Self::new(item_index, fields)
    }

    pub fn with_attachment(mut self, bytes: Vec<u8>) -> Self {
        self.attachment = Some(bytes);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Text to classify: the named field, or the whole record serialised.
    ///
    /// A missing, null or empty field falls back to the serialised record;
    /// treating `""` and `null` like an absent field is intentional.
    /// Non-string scalars use their JSON text.
    pub fn text(&self, field: &str) -> String {
        match self.fields.get(field) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Null) | Some(Value::String(_)) | None => self.to_json_string(),
            Some(other) => other.to_string(),
        }
    }

    fn to_json_string(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

/// Truncate to at most `max` UTF-16 code units.
///
/// Cuts only on char boundaries, so a surrogate pair that would straddle the
/// limit is dropped whole rather than split.
pub fn truncate_utf16(text: &str, max: usize) -> String {
    let mut units = 0;
    for (byte_idx, c) in text.char_indices() {
        units += c.len_utf16();
        if units > max {
            return text[..byte_idx].to_string();
        }
    }
    text.to_string()
}
