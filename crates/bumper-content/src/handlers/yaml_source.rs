//! Original spelling of YAML scalars
//!
//! `serde_yaml::Value` forgets how a scalar was written (`3.10`, `0o755`,
//! `~`, quoting). A line scanner over block-style YAML records the raw text
//! of each scalar by path so the emitter can write untouched values back the
//! way they were. Flow collections, multi-line scalars and block scalars are
//! not recorded.

use std::collections::HashMap;

/// Raw scalar text from a YAML source, keyed by key/index path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceScalars {
    by_path: HashMap<Vec<String>, String>,
}

impl SourceScalars {
    pub fn scan(source: &str) -> Self {
        let mut scanner = Scanner::default();
        for line in source.lines() {
            scanner.line(line);
        }
        scanner.found
    }

    /// Raw text at `path`; `""` for a key written without a value.
    pub fn get(&self, path: &[String]) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }
}

/// An open mapping key or sequence item
struct Frame {
    col: usize,
    segment: String,
    item: bool,
    next_index: usize,
}

#[derive(Default)]
struct Scanner {
    frames: Vec<Frame>,
    root_next_index: usize,
    /// Lines deeper than this column belong to a `|` or `>` scalar
    block_scalar_col: Option<usize>,
    found: SourceScalars,
}

impl Scanner {
    fn line(&mut self, line: &str) {
        let content = line.trim_start_matches(' ');
        let mut col = line.len() - content.len();
        if content.is_empty() || content.starts_with('#') || content.starts_with('\t') {
            return;
        }
        if let Some(block_col) = self.block_scalar_col {
            if col > block_col {
                return;
            }
            self.block_scalar_col = None;
        }
        if col == 0 && ["---", "...", "%"].iter().any(|m| content.starts_with(m)) {
            self.frames.clear();
            self.root_next_index = 0;
            return;
        }

        let mut rest = content;
        let mut item_col = None;
        while rest == "-" || rest.starts_with("- ") {
            while let Some(top) = self.frames.last() {
                if top.col > col || (top.col == col && top.item) {
                    self.frames.pop();
                } else {
                    break;
                }
            }
            let counter = match self.frames.last_mut() {
                Some(top) => &mut top.next_index,
                None => &mut self.root_next_index,
            };
            let index = *counter;
            *counter += 1;
            self.frames.push(Frame {
                col,
                segment: index.to_string(),
                item: true,
                next_index: 0,
            });

            let after = &rest[1..];
            let trimmed = after.trim_start_matches(' ');
            item_col = Some(col);
            col += 1 + after.len() - trimmed.len();
            rest = trimmed;
        }
        if rest.is_empty() {
            return;
        }

        match split_key(rest) {
            Some((key, value)) => {
                while self.frames.last().is_some_and(|top| top.col >= col) {
                    self.frames.pop();
                }
                let value = strip_comment(value);
                let path = self.path_with(Some(&key));
                if value.is_empty() {
                    self.found.by_path.insert(path, String::new());
                    self.frames.push(Frame {
                        col,
                        segment: key,
                        item: false,
                        next_index: 0,
                    });
                } else if is_block_indicator(value) {
                    self.block_scalar_col = Some(col);
                } else {
                    self.found.by_path.insert(path, value.to_string());
                }
            }
            // a scalar sequence item
            None => {
                if let Some(item_col) = item_col {
                    let value = strip_comment(rest);
                    if is_block_indicator(value) {
                        self.block_scalar_col = Some(item_col);
                    } else {
                        let path = self.path_with(None);
                        self.found.by_path.insert(path, value.to_string());
                    }
                }
            }
        }
    }

    fn path_with(&self, key: Option<&str>) -> Vec<String> {
        self.frames
            .iter()
            .map(|frame| frame.segment.clone())
            .chain(key.map(str::to_string))
            .collect()
    }
}

fn is_block_indicator(value: &str) -> bool {
    value.starts_with('|') || value.starts_with('>')
}

/// Split `key: value` (or `key:`) into the unquoted key and the raw rest.
fn split_key(rest: &str) -> Option<(String, &str)> {
    let (key, after) = match rest.chars().next()? {
        quote @ ('"' | '\'') => {
            let end = quoted_end(rest, quote)?;
            let key = serde_yaml::from_str::<String>(&rest[..end]).ok()?;
            (key, rest[end..].trim_start_matches(' '))
        }
        '?' | '[' | '{' | '&' | '*' | '!' | '|' | '>' => return None,
        _ => {
            let colon = rest
                .match_indices(':')
                .map(|(i, _)| i)
                .find(|&i| matches!(rest.as_bytes().get(i + 1), None | Some(b' ')))?;
            let key = rest[..colon].trim_end();
            if key.is_empty() || key.contains(" #") {
                return None;
            }
            (key.to_string(), &rest[colon..])
        }
    };

    let value = after.strip_prefix(':')?;
    if !(value.is_empty() || value.starts_with(' ')) {
        return None;
    }
    Some((key, value.trim_start_matches(' ')))
}

/// Byte offset just past the closing quote, when it is on this line.
fn quoted_end(text: &str, quote: char) -> Option<usize> {
    let mut chars = text.char_indices().skip(1).peekable();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' if quote == '"' => {
                chars.next();
            }
            '\'' if quote == '\'' => {
                if chars.peek().is_some_and(|(_, next)| *next == '\'') {
                    chars.next();
                } else {
                    return Some(i + 1);
                }
            }
            '"' if quote == '"' => return Some(i + 1),
            _ => {}
        }
    }
    None
}

fn strip_comment(value: &str) -> &str {
    let end = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => quoted_end(value, quote).unwrap_or(value.len()),
        _ => value.find(" #").unwrap_or(value.len()),
    };
    value[..end].trim_end()
}
