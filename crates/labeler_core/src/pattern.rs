//! Compiled path glob patterns.
//!
//! Patterns follow shell-glob conventions: `*` matches within a single path
//! segment, `**` matches across any number of segments (including none),
//! `?` matches one character, `[...]` matches a character class and
//! `{a,b}` matches either alternative. Matching is case-sensitive and
//! wildcards also match dot-files, so `**/*.{yml,yaml}` matches
//! `.github/workflows/ci.yml`.
//!
//! A `**` that is not a whole path segment (as in `docs/**.rst`) behaves
//! like `*`. A leading `!` negates the pattern.

use globset::{GlobBuilder, GlobMatcher};
use std::fmt;

use crate::errors::PatternError;

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;

/// A single compiled glob pattern, optionally negated.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    matcher: GlobMatcher,
    negated: bool,
}

impl PathPattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the glob syntax is malformed (for example
    /// an unterminated `[` or `{`, or a dangling `\`) or if the pattern is empty.
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let (negated, body) = match source.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, source),
        };

        if body.is_empty() {
            return Err(PatternError {
                reason: "pattern is empty".to_string(),
            });
        }

        let glob = GlobBuilder::new(&normalize_recursive_wildcards(body))
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| PatternError {
                reason: e.kind().to_string(),
            })?;

        Ok(Self {
            source: source.to_string(),
            matcher: glob.compile_matcher(),
            negated,
        })
    }

    /// Returns true if `path` satisfies this pattern, taking negation into account.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path) != self.negated
    }

    /// The pattern text as written in the rule file, including any `!`.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Collapses every run of `*` to `*`, unless the run is a whole path
/// segment, in which case it becomes `**`.
///
/// Segment boundaries are `/`, the ends of the pattern and, inside
/// `{...}`, the braces and commas. Escaped characters and character classes
/// are copied unchanged.
fn normalize_recursive_wildcards(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut output = String::with_capacity(pattern.len());
    let mut brace_depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                output.push('\\');
                if let Some(&escaped) = chars.get(i + 1) {
                    output.push(escaped);
                }
                i += 2;
            }
            '[' => {
                let end = class_end(&chars, i);
                output.extend(&chars[i..end]);
                i = end;
            }
            '*' => {
                let start = i;
                while i < chars.len() && chars[i] == '*' {
                    i += 1;
                }
                let inside_braces = brace_depth > 0;
                let starts_segment = start == 0
                    || chars[start - 1] == '/'
                    || (inside_braces && matches!(chars[start - 1], '{' | ','));
                let ends_segment = i == chars.len()
                    || chars[i] == '/'
                    || (inside_braces && matches!(chars[i], '}' | ','));

                if i - start >= 2 && starts_segment && ends_segment {
                    output.push_str("**");
                } else {
                    output.push('*');
                }
            }
            c => {
                match c {
                    '{' => brace_depth += 1,
                    '}' => brace_depth = brace_depth.saturating_sub(1),
                    _ => {}
                }
                output.push(c);
                i += 1;
            }
        }
    }

    output
}

/// Index just past the `]` closing the class opened at `open`, or the end
/// of the pattern when the class is unterminated.
fn class_end(chars: &[char], open: usize) -> usize {
    let mut i = open + 1;
    if matches!(chars.get(i), Some('!') | Some('^')) {
        i += 1;
    }
    // A `]` right after the opening bracket is a literal member.
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    while i < chars.len() {
        if chars[i] == ']' {
            return i + 1;
        }
        i += 1;
    }
    chars.len()
}
