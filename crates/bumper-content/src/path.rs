//! Path parsing and traversal utilities
//!
//! A path expression addresses one value inside a parsed document tree.
//!
//! # Path Syntax
//!
//! - Dot-separated keys: `deep.sub.version`
//! - Array indexing: `items[0].name` or `items.0.name`
//! - Quoted keys containing dots: `content['app.version']`
//! - XML attributes through the `$` mapping: `widget.$.version`
//!
//! # Examples
//!
//! ```
//! use bumper_content::path::{PathExpression, Step};
//!
//! let path: PathExpression = "content['app.version']".parse().unwrap();
//! assert_eq!(path.steps(), &[
//!     Step::Key("content".to_string()),
//!     Step::Key("app.version".to_string()),
//! ]);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A single step of a path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A mapping key (or, on a sequence, a decimal index)
    Key(String),
    /// A bracketed numeric index such as `[0]`
    Index(usize),
}

impl Step {
    /// The index this step selects when applied to a sequence.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(idx) => Some(*idx),
            Self::Key(key) if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) => {
                key.parse().ok()
            }
            Self::Key(_) => None,
        }
    }

    /// The key this step selects when applied to a mapping.
    pub fn as_key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(idx) => idx.to_string(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(idx) => write!(f, "[{idx}]"),
        }
    }
}

/// How sequences encountered along a path are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayMode {
    /// A sequence is only entered through an index.
    #[default]
    Strict,
    /// A non-index key applied to a one-element sequence descends into
    /// that element, and a lookup ending on a one-element sequence yields
    /// the element. Used for XML trees where every child element is held
    /// in a sequence.
    UnwrapSingle,
}

/// The minimal tree interface the path accessor walks.
///
/// Implemented for `serde_json::Value` (JSON and XML trees) and
/// `serde_yaml::Value`.
pub trait Tree: Sized {
    fn new_mapping() -> Self;

    fn new_sequence() -> Self;

    fn from_text(text: &str) -> Self;

    /// Look up `key` if this node is a mapping.
    fn child(&self, key: &str) -> Option<&Self>;

    /// Get the child at `key`, inserting `fresh` when it is absent.
    ///
    /// A node that is not a mapping is replaced by an empty mapping first.
    fn child_or_insert(&mut self, key: &str, fresh: Self) -> Option<&mut Self>;

    fn items(&self) -> Option<&[Self]>;

    fn items_mut(&mut self) -> Option<&mut Vec<Self>>;

    /// Render a scalar node as text; `None` for mappings, sequences and null.
    fn scalar_text(&self) -> Option<String>;
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    raw: String,
    steps: Vec<Step>,
}

impl PathExpression {
    /// Parse a path expression.
    ///
    /// An empty expression addresses the document root.
    pub fn parse(raw: &str) -> Result<Self> {
        let steps = parse_steps(raw).map_err(|reason| Error::invalid_path(raw, reason))?;
        Ok(Self {
            raw: raw.to_string(),
            steps,
        })
    }

    /// The expression as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the node this path addresses, if every step resolves.
    pub fn get_in<'a, T: Tree>(&self, root: &'a T, mode: ArrayMode) -> Option<&'a T> {
        let mut node = root;
        for step in &self.steps {
            node = child_of(node, step, mode)?;
        }

        if mode == ArrayMode::UnwrapSingle
            && let Some([only]) = node.items()
        {
            return Some(only);
        }
        Some(node)
    }

    /// Set the node this path addresses, creating intermediate mappings.
    ///
    /// Returns the reason as text when a step cannot be satisfied; callers
    /// attach the document format.
    pub fn set_in<T: Tree>(
        &self,
        root: &mut T,
        value: T,
        mode: ArrayMode,
    ) -> std::result::Result<(), String> {
        set_steps(root, &self.steps, value, mode)
    }
}

impl FromStr for PathExpression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Default for PathExpression {
    /// The conventional `version` key.
    fn default() -> Self {
        Self {
            raw: "version".to_string(),
            steps: vec![Step::Key("version".to_string())],
        }
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_steps(raw: &str) -> std::result::Result<Vec<Step>, String> {
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();
    // `]` was the last thing consumed; only `.`, `[` or the end may follow
    let mut after_bracket = false;

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if after_bracket {
                    after_bracket = false;
                    if chars.peek().is_none() {
                        return Err("path ends with `.`".to_string());
                    }
                    continue;
                }
                if current.is_empty() {
                    return Err("empty key between dots".to_string());
                }
                if chars.peek().is_none() {
                    return Err("path ends with `.`".to_string());
                }
                steps.push(Step::Key(std::mem::take(&mut current)));
            }
            '[' => {
                if !current.is_empty() {
                    steps.push(Step::Key(std::mem::take(&mut current)));
                }
                steps.push(parse_bracket(&mut chars)?);
                after_bracket = true;
            }
            ']' => return Err("unmatched `]`".to_string()),
            _ if after_bracket => {
                return Err(format!("unexpected `{ch}` after `]`"));
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        steps.push(Step::Key(current));
    }

    Ok(steps)
}

/// Parse the inside of `[...]`; the opening bracket is already consumed.
fn parse_bracket(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> std::result::Result<Step, String> {
    match chars.peek().copied() {
        Some(quote @ ('\'' | '"')) => {
            chars.next();
            let mut key = String::new();
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some(escaped) => key.push(escaped),
                        None => return Err("unterminated quoted key".to_string()),
                    },
                    Some(ch) if ch == quote => break,
                    Some(ch) => key.push(ch),
                    None => return Err("unterminated quoted key".to_string()),
                }
            }
            match chars.next() {
                Some(']') => Ok(Step::Key(key)),
                _ => Err("expected `]` after quoted key".to_string()),
            }
        }
        _ => {
            let mut inner = String::new();
            loop {
                match chars.next() {
                    Some(']') => break,
                    Some(ch) => inner.push(ch),
                    None => return Err("unterminated `[`".to_string()),
                }
            }
            let inner = inner.trim();
            if inner.is_empty() {
                return Err("empty brackets".to_string());
            }
            Ok(match inner.parse::<usize>() {
                Ok(idx) => Step::Index(idx),
                Err(_) => Step::Key(inner.to_string()),
            })
        }
    }
}

fn child_of<'a, T: Tree>(node: &'a T, step: &Step, mode: ArrayMode) -> Option<&'a T> {
    if let Some(items) = node.items() {
        return match step.as_index() {
            Some(idx) => items.get(idx),
            None if mode == ArrayMode::UnwrapSingle && items.len() == 1 => {
                child_of(&items[0], step, mode)
            }
            None => None,
        };
    }
    node.child(&step.as_key())
}

/// Where a write step lands in its parent
enum Slot {
    Item(usize),
    Append,
    Unwrap,
    Key(String),
}

fn placeholder<T: Tree>(rest: &[Step]) -> T {
    match rest.first() {
        Some(Step::Index(_)) => T::new_sequence(),
        _ => T::new_mapping(),
    }
}

fn set_steps<T: Tree>(
    node: &mut T,
    steps: &[Step],
    value: T,
    mode: ArrayMode,
) -> std::result::Result<(), String> {
    let Some((step, rest)) = steps.split_first() else {
        if mode == ArrayMode::UnwrapSingle
            && let Some(items) = node.items_mut()
            && items.len() == 1
        {
            items[0] = value;
            return Ok(());
        }
        *node = value;
        return Ok(());
    };

    let child = child_for_write(node, step, rest, mode)?;
    set_steps(child, rest, value, mode)
}

fn child_for_write<'a, T: Tree>(
    node: &'a mut T,
    step: &Step,
    rest: &[Step],
    mode: ArrayMode,
) -> std::result::Result<&'a mut T, String> {
    let slot = match node.items() {
        Some(items) => match step.as_index() {
            Some(idx) if idx < items.len() => Slot::Item(idx),
            Some(idx) if idx == items.len() => Slot::Append,
            Some(idx) => {
                return Err(format!(
                    "index {idx} is out of bounds for a sequence of {} items",
                    items.len()
                ));
            }
            None if mode == ArrayMode::UnwrapSingle && items.len() == 1 => Slot::Unwrap,
            None => return Err(format!("key `{step}` cannot address a sequence")),
        },
        None => Slot::Key(step.as_key()),
    };

    let child = match slot {
        Slot::Item(idx) => node.items_mut().and_then(|items| items.get_mut(idx)),
        Slot::Append => node.items_mut().and_then(|items| {
            items.push(placeholder(rest));
            items.last_mut()
        }),
        Slot::Unwrap => {
            let only = node
                .items_mut()
                .and_then(|items| items.first_mut())
                .ok_or_else(|| format!("cannot descend into `{step}`"))?;
            return child_for_write(only, step, rest, mode);
        }
        Slot::Key(key) => node.child_or_insert(&key, placeholder(rest)),
    };

    child.ok_or_else(|| format!("cannot descend into `{step}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> PathExpression {
        raw.parse().unwrap()
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(path("version").steps(), &[Step::Key("version".into())]);
    }

    #[test]
    fn test_parse_dotted() {
        assert_eq!(
            path("deep.sub.version").steps(),
            &[
                Step::Key("deep".into()),
                Step::Key("sub".into()),
                Step::Key("version".into()),
            ]
        );
    }

    #[test]
    fn test_parse_quoted_key_keeps_dots() {
        assert_eq!(
            path("content[\"app.version\"].x").steps(),
            &[
                Step::Key("content".into()),
                Step::Key("app.version".into()),
                Step::Key("x".into()),
            ]
        );
    }

    #[test]
    fn test_parse_escaped_quote() {
        assert_eq!(
            path(r"a['it\'s']").steps(),
            &[Step::Key("a".into()), Step::Key("it's".into())]
        );
    }

    #[test]
    fn test_parse_index_chain() {
        assert_eq!(
            path("matrix[1][2]").steps(),
            &[
                Step::Key("matrix".into()),
                Step::Index(1),
                Step::Index(2)
            ]
        );
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert!(path("").is_root());
    }

    #[test]
    fn test_get_missing_intermediate_is_none() {
        let value = json!({"deep": {"other": 1}});
        assert_eq!(path("deep.sub.version").get_in(&value, ArrayMode::Strict), None);
        assert_eq!(path("deep.other.x").get_in(&value, ArrayMode::Strict), None);
    }

    #[test]
    fn test_get_index_out_of_range_is_none() {
        let value = json!({"items": ["a"]});
        assert_eq!(path("items[3]").get_in(&value, ArrayMode::Strict), None);
    }

    #[test]
    fn test_set_creates_intermediate_mappings() {
        let mut value = json!({});
        path("deep.sub.version")
            .set_in(&mut value, json!("1.2.3"), ArrayMode::Strict)
            .unwrap();
        assert_eq!(value, json!({"deep": {"sub": {"version": "1.2.3"}}}));
    }

    #[test]
    fn test_set_replaces_scalar_intermediate() {
        let mut value = json!({"deep": "flat"});
        path("deep.version")
            .set_in(&mut value, json!("2.0.0"), ArrayMode::Strict)
            .unwrap();
        assert_eq!(value, json!({"deep": {"version": "2.0.0"}}));
    }

    #[test]
    fn test_set_creates_sequence_for_index_step() {
        let mut value = json!({});
        path("releases[0].version")
            .set_in(&mut value, json!("0.1.0"), ArrayMode::Strict)
            .unwrap();
        assert_eq!(value, json!({"releases": [{"version": "0.1.0"}]}));
    }

    #[test]
    fn test_set_index_past_end_fails() {
        let mut value = json!({"items": []});
        let err = path("items[2]")
            .set_in(&mut value, json!("x"), ArrayMode::Strict)
            .unwrap_err();
        assert!(err.contains("out of bounds"));
    }

    #[test]
    fn test_unwrap_single_descends_and_keeps_shape() {
        let mut value = json!({"project": {"version": ["1.0"]}});
        let p = path("project.version");
        assert_eq!(
            p.get_in(&value, ArrayMode::UnwrapSingle),
            Some(&json!("1.0"))
        );
        p.set_in(&mut value, json!("2.0"), ArrayMode::UnwrapSingle)
            .unwrap();
        assert_eq!(value, json!({"project": {"version": ["2.0"]}}));
    }
}
