//! Route pattern syntax tree.
//!
//! # Responsibilities
//! - Represent a parsed route pattern as an immutable tree
//! - Provide a visitor-style walk shared by validators and the matcher compiler
//! - Render a tree back into pattern syntax (diagnostics, tests)
//!
//! # Design Decisions
//! - A tagged enum rather than a class hierarchy; visitors `match` on the tag
//! - `Sequence` never directly contains another `Sequence` (flattened on build)
//! - The empty pattern is `Match("")`

use std::fmt;

pub const SEGMENT_SEPARATOR: char = '/';
pub const VARIABLE_START: char = ':';
pub const OPTIONAL_START: char = '(';
pub const OPTIONAL_END: char = ')';
pub const WILDCARD: char = '*';
pub const ESCAPE: char = '\\';

/// Characters that lose their special meaning when preceded by [`ESCAPE`].
pub fn is_escapable(c: char) -> bool {
    matches!(c, VARIABLE_START | OPTIONAL_START | OPTIONAL_END | WILDCARD)
}

/// A node of a parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternNode {
    /// Literal text, matched case-insensitively.
    Match(String),
    /// The `/` boundary between segments.
    SegmentSeparator,
    /// `:name`, captures one or more non-`/` characters.
    Variable(String),
    /// `*`, one or more non-`/` characters, not captured.
    Wildcard,
    /// `( ... )`, zero or one occurrence of the child.
    Optional(Box<PatternNode>),
    /// Ordered children, never nested sequences.
    Sequence(Vec<PatternNode>),
}

impl PatternNode {
    /// The node produced by an empty pattern.
    pub fn empty() -> Self {
        PatternNode::Match(String::new())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        PatternNode::Match(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        PatternNode::Variable(name.into())
    }

    pub fn optional(child: PatternNode) -> Self {
        PatternNode::Optional(Box::new(child))
    }

    /// Build the root node for a list of parsed nodes.
    ///
    /// Nested sequences are flattened; a single node is returned as-is and an
    /// empty list yields [`PatternNode::empty`].
    pub fn concat(nodes: impl IntoIterator<Item = PatternNode>) -> Self {
        let mut flat = Vec::new();
        for node in nodes {
            match node {
                PatternNode::Sequence(children) => flat.extend(children),
                other => flat.push(other),
            }
        }

        match flat.len() {
            0 => PatternNode::empty(),
            1 => flat.pop().unwrap_or_else(PatternNode::empty),
            _ => PatternNode::Sequence(flat),
        }
    }

    /// Variable names in traversal order.
    pub fn variable_names(&self) -> Vec<String> {
        struct Collect(Vec<String>);

        impl PatternVisitor for Collect {
            type Error = std::convert::Infallible;

            fn visit_variable(&mut self, name: &str) -> Result<(), Self::Error> {
                self.0.push(name.to_string());
                Ok(())
            }
        }

        let mut collect = Collect(Vec::new());
        match walk(self, &mut collect) {
            Ok(()) => collect.0,
            Err(never) => match never {},
        }
    }
}

/// Renders the node in pattern syntax, escaping special characters in literals.
///
/// Every tree returned by `parser::parse` renders to text that parses back to
/// the same tree. Hand-built trees the parser cannot produce have no exact
/// rendering: a literal ending in `\` before `:`, `(`, `)` or `*`, a variable
/// followed by a literal starting with a name character, or two adjacent
/// literals.
impl fmt::Display for PatternNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternNode::Match(value) => {
                for c in value.chars() {
                    if is_escapable(c) {
                        write!(f, "{}", ESCAPE)?;
                    }
                    write!(f, "{}", c)?;
                }
                Ok(())
            }
            PatternNode::SegmentSeparator => write!(f, "{}", SEGMENT_SEPARATOR),
            PatternNode::Variable(name) => write!(f, "{}{}", VARIABLE_START, name),
            PatternNode::Wildcard => write!(f, "{}", WILDCARD),
            PatternNode::Optional(child) => write!(f, "{}{}{}", OPTIONAL_START, child, OPTIONAL_END),
            PatternNode::Sequence(children) => {
                for child in children {
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
        }
    }
}

/// Per-node callbacks for [`walk`].
///
/// Leaf callbacks default to doing nothing. `enter_optional`/`exit_optional`
/// bracket the traversal of an optional's child.
pub trait PatternVisitor {
    type Error;

    fn visit_match(&mut self, _value: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_segment_separator(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_variable(&mut self, _name: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_wildcard(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_optional(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_optional(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Depth-first, left-to-right traversal. Stops at the first callback error.
pub fn walk<V: PatternVisitor + ?Sized>(node: &PatternNode, visitor: &mut V) -> Result<(), V::Error> {
    match node {
        PatternNode::Match(value) => visitor.visit_match(value),
        PatternNode::SegmentSeparator => visitor.visit_segment_separator(),
        PatternNode::Variable(name) => visitor.visit_variable(name),
        PatternNode::Wildcard => visitor.visit_wildcard(),
        PatternNode::Optional(child) => {
            visitor.enter_optional()?;
            walk(child, visitor)?;
            visitor.exit_optional()
        }
        PatternNode::Sequence(children) => {
            for child in children {
                walk(child, visitor)?;
            }
            Ok(())
        }
    }
}
