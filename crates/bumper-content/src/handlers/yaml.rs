//! YAML format handler using serde_yaml
//!
//! Parsing goes through `serde_yaml`; rendering uses a small block-style
//! emitter so the indentation width of the original file can be kept.
//! Scalars whose value did not change are written with their original
//! spelling (see [`SourceScalars`]). Comments do not survive a rewrite.

use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::handlers::FormatHandler;
use crate::indent::{Indent, StyleInfo};
use crate::path::Tree;

pub use super::yaml_source::SourceScalars;

/// Handler for YAML files using serde_yaml
#[derive(Debug, Default)]
pub struct YamlHandler;

impl YamlHandler {
    pub fn new() -> Self {
        Self
    }

    /// Render `tree`, reusing the original text of unchanged scalars.
    pub fn render_preserving(
        &self,
        tree: &Value,
        style: &StyleInfo,
        originals: &SourceScalars,
    ) -> Result<String> {
        // tabs are not valid YAML indentation
        let unit = match style.indent {
            Indent::Spaces(n) if n > 0 => n,
            _ => Indent::DEFAULT.width(),
        };
        let mut emitter = Emitter {
            unit,
            originals,
            path: Vec::new(),
            out: String::new(),
        };
        emitter.document(tree)?;
        Ok(emitter.out)
    }
}

impl FormatHandler for YamlHandler {
    type Tree = Value;

    fn parse(&self, source: &str) -> Result<Value> {
        serde_yaml::from_str(source).map_err(|e| Error::parse("YAML", e.to_string()))
    }

    fn empty(&self) -> Value {
        Value::Mapping(Mapping::new())
    }

    fn render(&self, tree: &Value, style: &StyleInfo) -> Result<String> {
        self.render_preserving(tree, style, &SourceScalars::default())
    }
}

struct Emitter<'a> {
    unit: usize,
    originals: &'a SourceScalars,
    /// Keys and indices leading to the value being emitted
    path: Vec<String>,
    out: String,
}

impl Emitter<'_> {
    fn document(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Mapping(map) if !map.is_empty() => self.mapping(map, 0, false),
            Value::Sequence(seq) if !seq.is_empty() => self.sequence(seq, 0, false),
            Value::Tagged(tagged) if is_block(&tagged.value) => {
                self.out.push_str(&tagged.tag.to_string());
                self.out.push('\n');
                self.document(&tagged.value)
            }
            scalar => {
                self.out.push_str(&inline_text(scalar)?);
                self.out.push('\n');
                Ok(())
            }
        }
    }

    /// Emit mapping entries with keys at column `col`.
    ///
    /// With `continues_line` the first key goes on the current line, right
    /// after a sequence dash.
    fn mapping(&mut self, map: &Mapping, col: usize, continues_line: bool) -> Result<()> {
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 || !continues_line {
                self.pad(col);
            }
            if is_block(key) {
                return Err(Error::serialize(
                    "YAML",
                    "mapping and sequence keys are not supported",
                ));
            }
            self.out.push_str(&inline_text(key)?);
            self.out.push(':');
            self.path.push(segment(key)?);
            self.nested(value, col, false)?;
            self.path.pop();
        }
        Ok(())
    }

    fn sequence(&mut self, seq: &[Value], col: usize, continues_line: bool) -> Result<()> {
        for (i, item) in seq.iter().enumerate() {
            if i > 0 || !continues_line {
                self.pad(col);
            }
            self.out.push('-');
            self.path.push(i.to_string());
            self.nested(item, col, true)?;
            self.path.pop();
        }
        Ok(())
    }

    /// Emit a value whose introducer (`key:` or `-`) sits at column `col`.
    fn nested(&mut self, value: &Value, col: usize, after_dash: bool) -> Result<()> {
        match value {
            Value::Mapping(map) if !map.is_empty() => {
                if after_dash {
                    let inner = col + self.unit.max(2);
                    self.pad(inner - col - 1);
                    self.mapping(map, inner, true)
                } else {
                    self.out.push('\n');
                    self.mapping(map, col + self.unit, false)
                }
            }
            Value::Sequence(seq) if !seq.is_empty() => {
                if after_dash {
                    let inner = col + self.unit.max(2);
                    self.pad(inner - col - 1);
                    self.sequence(seq, inner, true)
                } else {
                    self.out.push('\n');
                    self.sequence(seq, col + self.unit, false)
                }
            }
            Value::Tagged(tagged) if is_block(&tagged.value) => self.tagged_block(tagged, col),
            scalar => {
                let text = self.scalar(scalar)?;
                if !text.is_empty() {
                    self.out.push(' ');
                    self.out.push_str(&text);
                }
                self.out.push('\n');
                Ok(())
            }
        }
    }

    /// The original spelling when it still means `value`, else the
    /// canonical one. A changed string keeps the original quote style.
    fn scalar(&self, value: &Value) -> Result<String> {
        let Some(raw) = self.originals.get(&self.path) else {
            return inline_text(value);
        };
        if serde_yaml::from_str::<Value>(raw).is_ok_and(|original| original == *value) {
            return Ok(raw.to_string());
        }
        match value {
            Value::String(text) if !text.contains(['\n', '\r']) && raw.starts_with('\'') => {
                Ok(format!("'{}'", text.replace('\'', "''")))
            }
            Value::String(text) if raw.starts_with('"') => double_quoted(text),
            _ => inline_text(value),
        }
    }

    fn tagged_block(&mut self, tagged: &TaggedValue, col: usize) -> Result<()> {
        self.out.push(' ');
        self.out.push_str(&tagged.tag.to_string());
        self.out.push('\n');
        let inner = col + self.unit.max(2);
        match &tagged.value {
            Value::Mapping(map) => self.mapping(map, inner, false),
            Value::Sequence(seq) => self.sequence(seq, inner, false),
            other => self.nested(other, col, false),
        }
    }

    fn pad(&mut self, width: usize) {
        self.out.extend(std::iter::repeat_n(' ', width));
    }
}

fn segment(key: &Value) -> Result<String> {
    match key {
        Value::String(text) => Ok(text.clone()),
        other => inline_text(other),
    }
}

fn is_block(value: &Value) -> bool {
    match value {
        Value::Mapping(map) => !map.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Tagged(tagged) => is_block(&tagged.value),
        _ => false,
    }
}

/// Inline representation of a scalar or empty collection.
///
/// Quoting follows `serde_yaml`; text with line breaks is double-quoted so
/// it stays on one line.
fn inline_text(value: &Value) -> Result<String> {
    match value {
        Value::Mapping(map) if map.is_empty() => Ok("{}".to_string()),
        Value::Sequence(seq) if seq.is_empty() => Ok("[]".to_string()),
        Value::Mapping(_) | Value::Sequence(_) => Err(Error::serialize(
            "YAML",
            "collection cannot be written inline",
        )),
        Value::Tagged(tagged) => Ok(format!("{} {}", tagged.tag, inline_text(&tagged.value)?)),
        Value::String(text) if text.contains(['\n', '\r']) => double_quoted(text),
        _ => {
            let rendered = serde_yaml::to_string(value)
                .map_err(|e| Error::serialize("YAML", e.to_string()))?;
            let rendered = rendered.trim_end_matches('\n');
            match value {
                Value::String(text) if rendered.contains('\n') => double_quoted(text),
                _ => Ok(rendered.to_string()),
            }
        }
    }
}

fn double_quoted(text: &str) -> Result<String> {
    serde_json::to_string(text).map_err(|e| Error::serialize("YAML", e.to_string()))
}

impl Tree for Value {
    fn new_mapping() -> Self {
        Value::Mapping(Mapping::new())
    }

    fn new_sequence() -> Self {
        Value::Sequence(Vec::new())
    }

    fn from_text(text: &str) -> Self {
        Value::String(text.to_string())
    }

    fn child(&self, key: &str) -> Option<&Self> {
        match self {
            Value::Mapping(map) => map.get(key),
            Value::Tagged(tagged) => tagged.value.child(key),
            _ => None,
        }
    }

    fn child_or_insert(&mut self, key: &str, fresh: Self) -> Option<&mut Self> {
        if !self.is_mapping() {
            *self = Value::Mapping(Mapping::new());
        }
        self.as_mapping_mut()
            .map(|map| map.entry(Value::String(key.to_string())).or_insert(fresh))
    }

    fn items(&self) -> Option<&[Self]> {
        self.as_sequence().map(Vec::as_slice)
    }

    fn items_mut(&mut self) -> Option<&mut Vec<Self>> {
        self.as_sequence_mut()
    }

    fn scalar_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Tagged(tagged) => tagged.value.scalar_text(),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }
}
