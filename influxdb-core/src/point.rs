//! Measurement points and field values

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::line_protocol;
use crate::time::Timestamp;

/// A value that can be stored in a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating point number
    Float(f64),

    /// UTF-8 string
    Text(String),
}

impl FieldValue {
    /// Format this value for the line protocol.
    ///
    /// - Integer: decimal literal suffixed with `i` (e.g., `42i`)
    /// - Float: shortest decimal form, no suffix (e.g., `10.1`)
    /// - Text: double-quoted, inner quotes and backslashes escaped
    pub fn to_line_protocol(&self) -> String {
        match self {
            FieldValue::Integer(v) => format!("{}i", v),
            FieldValue::Float(v) => format!("{}", v),
            FieldValue::Text(v) => {
                let escaped = v.replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{}\"", escaped)
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line_protocol())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Integer(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// A single measurement sample: name, tags, fields, optional timestamp.
///
/// Tags and fields keep their insertion order, which is the order they are
/// rendered in on the wire. A tag with an empty key or empty value, a field
/// with an empty key, and a string field with an empty value are silently
/// dropped; the remote store would reject them line-wide otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    name: String,
    tags: Vec<(String, String)>,
    fields: Vec<(String, FieldValue)>,
    timestamp: Option<Timestamp>,
}

impl Point {
    /// Create a new point for the given measurement name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            fields: Vec::new(),
            timestamp: None,
        }
    }

    /// Add a tag. Empty keys and empty values are silently dropped.
    pub fn add_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        let value = value.into();
        if key.is_empty() || value.is_empty() {
            return self;
        }
        self.tags.push((key, value));
        self
    }

    /// Add a field. Empty keys and empty string values are silently dropped.
    pub fn add_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let key = key.into();
        let value = value.into();
        if key.is_empty() {
            return self;
        }
        if matches!(&value, FieldValue::Text(text) if text.is_empty()) {
            return self;
        }
        self.fields.push((key, value));
        self
    }

    /// Set the timestamp. Without one the remote store assigns its own.
    pub fn set_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Get the measurement name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the tags in insertion order
    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    /// Get the fields in insertion order
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Get the timestamp, if one was set
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    /// Encode this point into its line protocol representation
    pub fn to_line_protocol(&self) -> String {
        line_protocol::encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_integer() {
        assert_eq!(FieldValue::Integer(42).to_line_protocol(), "42i");
        assert_eq!(FieldValue::from(10i64).to_line_protocol(), "10i");
    }

    #[test]
    fn test_field_value_float() {
        assert_eq!(FieldValue::Float(10.10).to_line_protocol(), "10.1");
        assert_eq!(FieldValue::Float(3.15).to_line_protocol(), "3.15");
    }

    #[test]
    fn test_field_value_text() {
        let v = FieldValue::from("a_string_value");
        assert_eq!(v.to_line_protocol(), "\"a_string_value\"");
    }

    #[test]
    fn test_field_value_text_with_quotes() {
        let v = FieldValue::from("say \"hi\"");
        assert_eq!(v.to_line_protocol(), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_point_builder() {
        let point = Point::new("test")
            .add_tag("host", "localhost")
            .add_field("value", 10i64)
            .set_timestamp(Timestamp::from_nanos(0));

        assert_eq!(point.name(), "test");
        assert_eq!(point.tags(), &[("host".to_string(), "localhost".to_string())]);
        assert_eq!(point.fields().len(), 1);
        assert!(point.timestamp().is_some());
    }

    #[test]
    fn test_empty_tags_are_dropped() {
        let point = Point::new("test").add_tag("", "tag_val").add_tag("tag_name", "");
        assert!(point.tags().is_empty());
    }

    #[test]
    fn test_empty_fields_are_dropped() {
        let point = Point::new("test")
            .add_field("", "field_value")
            .add_field("field_name", "");
        assert!(point.fields().is_empty());
    }

    #[test]
    fn test_zero_valued_fields_are_kept() {
        let point = Point::new("test").add_field("value", 0i64).add_field("dvalue", 0.0);
        assert_eq!(point.fields().len(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let point = Point::new("test")
            .add_tag("b", "2")
            .add_tag("a", "1")
            .add_field("y", 1i64)
            .add_field("x", 2i64);

        assert_eq!(point.tags()[0].0, "b");
        assert_eq!(point.tags()[1].0, "a");
        assert_eq!(point.fields()[0].0, "y");
        assert_eq!(point.fields()[1].0, "x");
    }
}
