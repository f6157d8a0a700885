//! Indentation detection for rewritten documents

use std::fmt;

/// One level of indentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(usize),
    Tab,
}

impl Indent {
    /// Two spaces, the fallback for every structured format
    pub const DEFAULT: Indent = Indent::Spaces(2);

    /// Width in columns, counting a tab as one
    pub fn width(&self) -> usize {
        match self {
            Self::Spaces(n) => *n,
            Self::Tab => 1,
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spaces(n) => f.write_str(&" ".repeat(*n)),
            Self::Tab => f.write_str("\t"),
        }
    }
}

/// Formatting inferred from a file before it is rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleInfo {
    pub indent: Indent,
    /// `false` when `indent` is the fallback rather than observed
    pub detected: bool,
}

impl StyleInfo {
    /// Style used when nothing could be observed.
    pub fn fallback() -> Self {
        Self::default()
    }

    /// Infer the indentation unit from the steps between lines of `raw`.
    ///
    /// Every change in leading whitespace between consecutive non-blank
    /// lines is one vote for that step width; the most voted step wins,
    /// with ties going to the step followed by more equally indented lines.
    /// Single-space indents are ignored unless nothing else is found.
    pub fn detect(raw: &str) -> Self {
        Self::detect_lines(raw.lines())
    }

    /// Like [`StyleInfo::detect`], over lines already selected by a caller.
    pub fn detect_lines<'a>(lines: impl Iterator<Item = &'a str> + Clone) -> Self {
        let votes = count_steps(lines.clone(), true);
        let votes = if votes.is_empty() {
            count_steps(lines, false)
        } else {
            votes
        };

        let best = votes
            .iter()
            .enumerate()
            .max_by(|(ia, (_, a)), (ib, (_, b))| {
                (a.uses, a.weight).cmp(&(b.uses, b.weight)).then(ib.cmp(ia))
            })
            .map(|(_, (step, _))| *step);

        match best {
            Some(Step { tab: true, .. }) => Self {
                indent: Indent::Tab,
                detected: true,
            },
            Some(Step { width, .. }) => Self {
                indent: Indent::Spaces(width),
                detected: true,
            },
            None => Self::fallback(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    tab: bool,
    width: usize,
}

#[derive(Debug, Default)]
struct Votes {
    uses: usize,
    weight: usize,
}

/// Tally indent steps in first-seen order.
fn count_steps<'a>(
    lines: impl Iterator<Item = &'a str>,
    skip_single_spaces: bool,
) -> Vec<(Step, Votes)> {
    let mut votes: Vec<(Step, Votes)> = Vec::new();
    let mut previous = 0;
    let mut previous_tab = None;
    let mut last: Option<Step> = None;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let tab = line.starts_with('\t');
        let leading = if tab { '\t' } else { ' ' };
        let width = line.chars().take_while(|c| *c == leading).count();
        if width == 0 {
            previous = 0;
            previous_tab = None;
            continue;
        }
        if skip_single_spaces && !tab && width == 1 {
            continue;
        }
        if previous_tab != Some(tab) {
            previous = 0;
        }
        previous_tab = Some(tab);

        let step = width.abs_diff(previous);
        previous = width;
        let (key, counted) = if step == 0 {
            match last {
                Some(key) => (key, false),
                None => continue,
            }
        } else {
            (Step { tab, width: step }, true)
        };
        last = Some(key);

        let index = match votes.iter().position(|(seen, _)| *seen == key) {
            Some(index) => index,
            None => {
                votes.push((key, Votes::default()));
                votes.len() - 1
            }
        };
        let entry = &mut votes[index].1;
        if counted {
            entry.uses += 1;
        } else {
            entry.weight += 1;
        }
    }

    votes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_four_spaces() {
        let style = StyleInfo::detect("{\n    \"version\": \"1.0.0\"\n}\n");
        assert_eq!(style.indent, Indent::Spaces(4));
        assert!(style.detected);
    }

    #[test]
    fn test_detect_tab() {
        let style = StyleInfo::detect("{\n\t\"version\": \"1.0.0\"\n}");
        assert_eq!(style.indent, Indent::Tab);
        assert_eq!(style.indent.to_string(), "\t");
    }

    #[test]
    fn test_detect_skips_blank_lines() {
        let style = StyleInfo::detect("content:\n   \n          app.version: 3.0.3\n");
        assert_eq!(style.indent, Indent::Spaces(10));
    }

    #[test]
    fn test_most_frequent_step_beats_first_indented_line() {
        let raw = "root:\n       wrapped\n  a:\n    b: 1\n  c:\n    d: 2\n";
        assert_eq!(StyleInfo::detect(raw).indent, Indent::Spaces(2));
    }

    #[test]
    fn test_equal_lines_break_ties() {
        // one step of 3 and one of 4, but the 4-space block is longer
        let raw = "a\n   b\nc\n    d\n    e\n    f\n";
        assert_eq!(StyleInfo::detect(raw).indent, Indent::Spaces(4));
    }

    #[test]
    fn test_single_spaces_used_only_as_last_resort() {
        let raw = "/**\n * doc\n */\nfn main() {\n    body();\n}\n";
        assert_eq!(StyleInfo::detect(raw).indent, Indent::Spaces(4));
        assert_eq!(StyleInfo::detect("l:\n - a\n - b\n").indent, Indent::Spaces(1));
    }

    #[test]
    fn test_no_indented_lines_falls_back() {
        let style = StyleInfo::detect("{\"version\": \"1.0.0\"}");
        assert_eq!(style, StyleInfo::fallback());
        assert!(!style.detected);
        assert_eq!(style.indent.to_string(), "  ");
        assert_eq!(StyleInfo::detect(""), StyleInfo::fallback());
    }
}
