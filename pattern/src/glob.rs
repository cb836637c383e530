//! Shell-style glob patterns.

use regex_lite::Regex;
use std::fmt;

/// A compiled glob pattern.
///
/// Matching is case-sensitive and anchored at both ends. `*` matches any run
/// of characters, `?` a single character, and `[...]` a character class with
/// `!` or `^` negation and `a-z` ranges. A backslash escapes the next
/// character. An unterminated `[` matches itself.
#[derive(Clone)]
pub struct Glob {
    source: String,
    matcher: Matcher,
}

#[derive(Clone)]
enum Matcher {
    Literal,
    Regex(Regex),
}

impl Glob {
    /// Compile a pattern. Compilation never fails.
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let matcher = if is_literal(&source) {
            Matcher::Literal
        } else {
            match Regex::new(&translate(&source)) {
                Ok(regex) => Matcher::Regex(regex),
                Err(_) => Matcher::Literal,
            }
        };
        Self { source, matcher }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the pattern contains no wildcard syntax.
    pub fn is_literal(&self) -> bool {
        matches!(self.matcher, Matcher::Literal)
    }

    /// Check whether `name` matches the whole pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::Literal => self.source == name,
            Matcher::Regex(regex) => regex.is_match(name),
        }
    }
}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Glob").field(&self.source).finish()
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Glob {}

fn is_literal(pattern: &str) -> bool {
    !pattern.contains(['*', '?', '[', '\\'])
}

/// Translate glob syntax into an anchored regex.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("(?s)^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                // Consecutive stars collapse into one.
                while i + 1 < chars.len() && chars[i + 1] == '*' {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    push_literal(&mut out, next);
                    i += 1;
                } else {
                    push_literal(&mut out, '\\');
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i + 1..end]);
                    i = end;
                }
                None => push_literal(&mut out, '['),
            },
            c => push_literal(&mut out, c),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Index of the `]` closing the class opened at `start`, if any.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if matches!(chars.get(j), Some('!') | Some('^')) {
        j += 1;
    }
    // A leading `]` is a member of the class.
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() {
        match chars[j] {
            ']' => return Some(j),
            '\\' => j += 2,
            _ => j += 1,
        }
    }
    None
}

fn push_class(out: &mut String, body: &[char]) {
    let (negated, body) = match body.first() {
        Some('!') | Some('^') => (true, &body[1..]),
        _ => (false, body),
    };

    let mut members = String::new();
    let mut k = 0;
    while k < body.len() {
        let mut c = body[k];
        if c == '\\' && k + 1 < body.len() {
            k += 1;
            c = body[k];
        }
        let is_range = k + 2 < body.len() && body[k + 1] == '-';
        if is_range {
            let upper = body[k + 2];
            // A reversed range is empty.
            if c <= upper {
                push_literal(&mut members, c);
                members.push('-');
                push_literal(&mut members, upper);
            }
            k += 3;
        } else {
            push_literal(&mut members, c);
            k += 1;
        }
    }

    match (members.is_empty(), negated) {
        (true, false) => out.push_str(r"[^\s\S]"),
        (true, true) => out.push('.'),
        (false, negated) => {
            out.push('[');
            if negated {
                out.push('^');
            }
            out.push_str(&members);
            out.push(']');
        }
    }
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex_lite::escape(c.encode_utf8(&mut buf)));
}
