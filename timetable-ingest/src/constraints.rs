//! Editing of constraint blobs (subject and teacher constraints) as JSON text.
//!
//! The editor always holds the last valid object. Invalid text produces a
//! [`ValidationNotice`] and leaves the held value untouched.

use std::fmt;

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationNotice {
    pub title: String,
    pub message: String,
}

impl fmt::Display for ValidationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintsEditor {
    section: String,
    current: Map<String, Value>,
}

impl ConstraintsEditor {
    pub fn new(section: impl Into<String>, current: Map<String, Value>) -> Self {
        Self {
            section: section.into(),
            current,
        }
    }

    pub fn current(&self) -> &Map<String, Value> {
        &self.current
    }

    /// Pretty-printed current value, for editing.
    pub fn text(&self) -> String {
        serde_json::to_string_pretty(&self.current).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the held value with `text` if it parses to a JSON object.
    pub fn apply_text(&mut self, text: &str) -> Result<(), ValidationNotice> {
        let parsed: Value = serde_json::from_str(text).map_err(|e| ValidationNotice {
            title: "Invalid JSON".to_string(),
            message: format!("Please check your {} JSON format ({e})", self.section),
        })?;

        match parsed {
            Value::Object(map) => {
                self.current = map;
                Ok(())
            }
            other => Err(ValidationNotice {
                title: "Invalid JSON".to_string(),
                message: format!(
                    "{} must be a JSON object, got {}",
                    self.section,
                    kind_of(&other)
                ),
            }),
        }
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn editor() -> ConstraintsEditor {
        let Value::Object(map) = json!({"Mathematics": {"max_per_day": 2}}) else {
            unreachable!()
        };
        ConstraintsEditor::new("subject constraints", map)
    }

    #[test]
    fn test_valid_text_replaces() {
        let mut e = editor();
        e.apply_text(r#"{"Physics": {"double_period": true}}"#).unwrap();
        assert!(e.current().contains_key("Physics"));
        assert!(!e.current().contains_key("Mathematics"));
    }

    #[test]
    fn test_malformed_text_keeps_previous() {
        let mut e = editor();
        let before = e.clone();
        let notice = e.apply_text(r#"{"Physics": "#).unwrap_err();
        assert!(notice.message.contains("subject constraints"));
        assert_eq!(e, before);

        assert!(e.apply_text("[1, 2]").is_err());
        assert_eq!(e, before);
    }
}
