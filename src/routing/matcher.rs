//! Route pattern compilation and path matching.
//!
//! # Responsibilities
//! - Compile a validated pattern into an anchored, case-insensitive matcher
//! - Extract named variables from a matching path
//! - Compute the unmatched path suffix forwarded upstream
//!
//! # Translation
//! ```text
//! Match(lit)        → escaped literal
//! SegmentSeparator  → /
//! Variable(name)    → (?P<name>[^/]+)
//! Wildcard          → [^/]+
//! Optional(child)   → (?:child)?
//! whole pattern     → \A/? body (?:/|\z)
//! ```
//! One leading and one trailing separator of the pattern are folded into the
//! `/?` prefix and the `(?:/|\z)` boundary, so `/product/` and `/product`
//! accept the same paths and the match always ends on a segment boundary.
//!
//! # Design Decisions
//! - The `regex` crate executes in time linear in the path length; there is
//!   no backtracking to run away on hostile input
//! - The compiled program size is capped so a large pattern fails at
//!   configuration time rather than at request time

use std::collections::HashMap;
use std::convert::Infallible;

use regex::{Regex, RegexBuilder};

use crate::routing::error::PatternError;
use crate::routing::node::{walk, PatternNode, PatternVisitor};

const PATH_PREFIX: &str = r"\A/?";
const PATH_BOUNDARY: &str = r"(?:/|\z)";
const SEGMENT_CHARS: &str = "[^/]+";
const COMPILED_SIZE_LIMIT: usize = 1 << 20;

/// The result of matching a path against a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// Declared variable name → captured value. Variables inside an optional
    /// group that did not participate map to the empty string.
    pub variables: HashMap<String, String>,
    /// The part of the path after the matched prefix and its boundary `/`.
    pub suffix: String,
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    variable_names: Vec<String>,
}

impl PatternMatcher {
    /// Compile a validated pattern.
    pub fn compile(pattern: &PatternNode) -> Result<Self, PatternError> {
        let mut source = String::from(PATH_PREFIX);
        let mut builder = RegexSource(&mut source);
        for node in trim_separators(pattern) {
            match walk(node, &mut builder) {
                Ok(()) => {}
                Err(never) => match never {},
            }
        }
        source.push_str(PATH_BOUNDARY);

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .size_limit(COMPILED_SIZE_LIMIT)
            .build()
            .map_err(|e| PatternError::Compile(e.to_string()))?;

        Ok(Self {
            regex,
            variable_names: pattern.variable_names(),
        })
    }

    /// Declared variable names in pattern order.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// The generated regular expression, for diagnostics.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match a request path, returning its variables and unmatched suffix.
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        let captures = self.regex.captures(path)?;
        let end = captures.get(0)?.end();

        let variables = self
            .variable_names
            .iter()
            .map(|name| {
                let value = captures.name(name).map(|m| m.as_str()).unwrap_or_default();
                (name.clone(), value.to_string())
            })
            .collect();

        Some(PathMatch {
            variables,
            suffix: path[end..].to_string(),
        })
    }
}

/// Top-level nodes without one leading and one trailing separator.
fn trim_separators(pattern: &PatternNode) -> &[PatternNode] {
    let mut nodes = match pattern {
        PatternNode::Sequence(children) => children.as_slice(),
        single => std::slice::from_ref(single),
    };

    if let [PatternNode::SegmentSeparator, rest @ ..] = nodes {
        nodes = rest;
    }
    if let [rest @ .., PatternNode::SegmentSeparator] = nodes {
        nodes = rest;
    }
    nodes
}

struct RegexSource<'a>(&'a mut String);

impl PatternVisitor for RegexSource<'_> {
    type Error = Infallible;

    fn visit_match(&mut self, value: &str) -> Result<(), Infallible> {
        self.0.push_str(&regex::escape(value));
        Ok(())
    }

    fn visit_segment_separator(&mut self) -> Result<(), Infallible> {
        self.0.push('/');
        Ok(())
    }

    fn visit_variable(&mut self, name: &str) -> Result<(), Infallible> {
        // Names are restricted to [A-Za-z_][A-Za-z0-9_]* by the parser.
        self.0.push_str(&format!("(?P<{}>{})", name, SEGMENT_CHARS));
        Ok(())
    }

    fn visit_wildcard(&mut self) -> Result<(), Infallible> {
        self.0.push_str(SEGMENT_CHARS);
        Ok(())
    }

    fn enter_optional(&mut self) -> Result<(), Infallible> {
        self.0.push_str("(?:");
        Ok(())
    }

    fn exit_optional(&mut self) -> Result<(), Infallible> {
        self.0.push_str(")?");
        Ok(())
    }
}
