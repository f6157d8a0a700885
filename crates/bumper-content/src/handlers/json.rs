//! JSON format handler

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::handlers::FormatHandler;
use crate::indent::StyleInfo;
use crate::path::Tree;

/// Handler for JSON files
///
/// Key order and number spelling are kept as written; output uses the
/// detected indent unit and ends with exactly one newline.
#[derive(Debug, Default)]
pub struct JsonHandler;

impl JsonHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for JsonHandler {
    type Tree = Value;

    fn parse(&self, source: &str) -> Result<Value> {
        serde_json::from_str(source).map_err(|e| Error::parse("JSON", e.to_string()))
    }

    fn empty(&self) -> Value {
        Value::Object(Map::new())
    }

    fn render(&self, tree: &Value, style: &StyleInfo) -> Result<String> {
        let indent = style.indent.to_string();
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        tree.serialize(&mut serializer)
            .map_err(|e| Error::serialize("JSON", e.to_string()))?;

        let mut out =
            String::from_utf8(buf).map_err(|e| Error::serialize("JSON", e.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}

impl Tree for Value {
    fn new_mapping() -> Self {
        Value::Object(Map::new())
    }

    fn new_sequence() -> Self {
        Value::Array(Vec::new())
    }

    fn from_text(text: &str) -> Self {
        Value::String(text.to_string())
    }

    fn child(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }

    fn child_or_insert(&mut self, key: &str, fresh: Self) -> Option<&mut Self> {
        if !self.is_object() {
            *self = Value::Object(Map::new());
        }
        self.as_object_mut()
            .map(|map| map.entry(key).or_insert(fresh))
    }

    fn items(&self) -> Option<&[Self]> {
        self.as_array().map(Vec::as_slice)
    }

    fn items_mut(&mut self) -> Option<&mut Vec<Self>> {
        self.as_array_mut()
    }

    fn scalar_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}
