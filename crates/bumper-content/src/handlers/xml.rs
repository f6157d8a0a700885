//! XML format handler using quick-xml
//!
//! Elements become JSON-style trees so the same path accessor works on
//! them:
//!
//! - `{ "<root>": element }` at the top
//! - an element with only text becomes that text (`""` when empty)
//! - otherwise a mapping with `$` for attributes, `_` for text and one key
//!   per child element name holding an array of those children
//!
//! Comments, processing instructions and the doctype are dropped; the
//! declaration is always re-emitted as `version="1.0" encoding="utf-8"`.

use quick_xml::Reader;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::handlers::FormatHandler;
use crate::indent::StyleInfo;

/// Key holding an element's attributes
pub const ATTRIBUTES_KEY: &str = "$";
/// Key holding an element's text when it also has attributes or children
pub const TEXT_KEY: &str = "_";
/// Root element name used when the tree does not name exactly one root
pub const DEFAULT_ROOT: &str = "root";
/// Declaration written as the first line of every rendered document
pub const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Handler for XML files
#[derive(Debug, Default)]
pub struct XmlHandler;

impl XmlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for XmlHandler {
    type Tree = Value;

    fn parse(&self, source: &str) -> Result<Value> {
        let mut reader = Reader::from_str(source);
        let mut open: Vec<PendingElement> = Vec::new();
        let mut root: Option<(String, Value)> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::parse(
                    "XML",
                    format!("{e} (at byte {})", reader.buffer_position()),
                )
            })?;

            match event {
                Event::Start(start) => open.push(PendingElement::open(&start)?),
                Event::Empty(start) => {
                    let element = PendingElement::open(&start)?;
                    attach(element, &mut open, &mut root)?;
                }
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| Error::parse("XML", "closing tag without opening tag"))?;
                    attach(element, &mut open, &mut root)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::parse("XML", e.to_string()))?;
                    push_text(&mut open, &text)?;
                }
                Event::CData(cdata) => {
                    let text = std::str::from_utf8(&cdata)
                        .map_err(|e| Error::parse("XML", e.to_string()))?;
                    push_text(&mut open, text)?;
                }
                Event::Eof => break,
                // declaration, comments, processing instructions, doctype
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(Error::parse(
                "XML",
                format!("element <{}> is never closed", unclosed.name),
            ));
        }

        let (name, element) =
            root.ok_or_else(|| Error::parse("XML", "document has no root element"))?;
        let mut tree = Map::new();
        tree.insert(name, element);
        Ok(Value::Object(tree))
    }

    fn empty(&self) -> Value {
        Value::Object(Map::new())
    }

    /// Lines continuing an open tag (wrapped attributes) are aligned to
    /// the tag, not to the nesting step, so they do not vote.
    fn detect_style(&self, source: &str) -> StyleInfo {
        let lines = structural_lines(source);
        StyleInfo::detect_lines(lines.iter().copied())
    }

    /// Pretty-print with the declaration as the first line.
    ///
    /// The result has no trailing line terminator.
    fn render(&self, tree: &Value, style: &StyleInfo) -> Result<String> {
        let indent = style.indent.to_string();
        let mut lines = vec![DECLARATION.to_string()];
        write_element(&build_root(tree), 0, &indent, &mut lines);
        Ok(lines.join("\n"))
    }
}

/// An element whose closing tag has not been seen yet
struct PendingElement {
    name: String,
    attributes: Map<String, Value>,
    text: String,
    children: Map<String, Value>,
}

impl PendingElement {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = utf8(start.name().as_ref())?.to_string();

        let mut attributes = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| Error::parse("XML", e.to_string()))?;
            let key = utf8(attribute.key.as_ref())?.to_string();
            let value = attribute
                .unescape_value()
                .map_err(|e| Error::parse("XML", e.to_string()))?;
            attributes.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name,
            attributes,
            text: String::new(),
            children: Map::new(),
        })
    }

    fn push_child(&mut self, name: String, element: Value) {
        if let Value::Array(siblings) = self
            .children
            .entry(name)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            siblings.push(element);
        }
    }

    fn finish(self) -> (String, Value) {
        let has_text = !self.text.trim().is_empty();

        if self.attributes.is_empty() && self.children.is_empty() {
            let text = if has_text { self.text } else { String::new() };
            return (self.name, Value::String(text));
        }

        let mut node = Map::new();
        if !self.attributes.is_empty() {
            node.insert(ATTRIBUTES_KEY.to_string(), Value::Object(self.attributes));
        }
        if has_text {
            node.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        node.extend(self.children);
        (self.name, Value::Object(node))
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::parse("XML", e.to_string()))
}

fn push_text(open: &mut [PendingElement], text: &str) -> Result<()> {
    match open.last_mut() {
        Some(element) => {
            element.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(Error::parse("XML", "text outside the root element")),
    }
}

fn attach(
    element: PendingElement,
    open: &mut [PendingElement],
    root: &mut Option<(String, Value)>,
) -> Result<()> {
    let (name, value) = element.finish();
    match open.last_mut() {
        Some(parent) => {
            parent.push_child(name, value);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some((name, value));
            Ok(())
        }
        None => Err(Error::parse("XML", "document has more than one root element")),
    }
}

/// Rendering model built from a tree
#[derive(Debug, PartialEq)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, PartialEq)]
struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    fn new(name: &str, body: &Value) -> Self {
        let mut element = Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        };
        element.fill(body);
        element
    }

    fn fill(&mut self, body: &Value) {
        match body {
            Value::Null => {}
            Value::Object(map) => {
                for (key, child) in map {
                    match key.as_str() {
                        ATTRIBUTES_KEY => {
                            if let Value::Object(attributes) = child {
                                for (name, value) in attributes {
                                    self.attributes.push((name.clone(), text_of(value)));
                                }
                            }
                        }
                        TEXT_KEY => self.children.push(XmlNode::Text(text_of(child))),
                        _ => match child {
                            Value::Array(entries) => {
                                for entry in entries {
                                    self.children
                                        .push(XmlNode::Element(XmlElement::new(key, entry)));
                                }
                            }
                            other => self
                                .children
                                .push(XmlNode::Element(XmlElement::new(key, other))),
                        },
                    }
                }
            }
            Value::Array(entries) => {
                for entry in entries {
                    match entry {
                        Value::Object(_) => self.fill(entry),
                        other => self.children.push(XmlNode::Text(text_of(other))),
                    }
                }
            }
            scalar => self.children.push(XmlNode::Text(text_of(scalar))),
        }
    }

    fn is_empty(&self) -> bool {
        self.children
            .iter()
            .all(|child| matches!(child, XmlNode::Text(text) if text.is_empty()))
    }
}

fn build_root(tree: &Value) -> XmlElement {
    if let Value::Object(map) = tree
        && map.len() == 1
        && let Some((name, body)) = map.iter().next()
    {
        return XmlElement::new(name, body);
    }
    XmlElement::new(DEFAULT_ROOT, tree)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_attribute(value: &str) -> String {
    partial_escape(value).replace('"', "&quot;")
}

fn write_element(element: &XmlElement, depth: usize, indent: &str, lines: &mut Vec<String>) {
    let pad = indent.repeat(depth);
    let mut open = format!("{pad}<{}", element.name);
    for (name, value) in &element.attributes {
        open.push_str(&format!(" {name}=\"{}\"", escape_attribute(value)));
    }

    if element.is_empty() {
        lines.push(format!("{open} />"));
        return;
    }

    if let [XmlNode::Text(text)] = element.children.as_slice() {
        lines.push(format!("{open}>{}</{}>", partial_escape(text.as_str()), element.name));
        return;
    }

    lines.push(format!("{open}>"));
    for child in &element.children {
        match child {
            XmlNode::Element(child) => write_element(child, depth + 1, indent, lines),
            XmlNode::Text(text) if text.is_empty() => {}
            XmlNode::Text(text) => {
                lines.push(format!("{pad}{indent}{}", partial_escape(text.as_str())))
            }
        }
    }
    lines.push(format!("{pad}</{}>", element.name));
}

/// Lines that do not start inside a tag.
fn structural_lines(source: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut in_tag = false;
    let mut quote: Option<char> = None;
    for line in source.lines() {
        if !in_tag {
            lines.push(line);
        }
        let mut previous = ' ';
        for ch in line.chars() {
            match quote {
                Some(open) if ch == open => quote = None,
                Some(_) => {}
                None => match ch {
                    '<' => in_tag = true,
                    '>' => in_tag = false,
                    '"' | '\'' if in_tag && previous == '=' => quote = Some(ch),
                    _ => {}
                },
            }
            if !ch.is_whitespace() {
                previous = ch;
            }
        }
    }
    lines
}
