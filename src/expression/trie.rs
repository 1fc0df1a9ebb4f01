//! Character trie over variable names.
//!
//! Variable references in expressions have no closing delimiter (`$hostname`
//! vs `$host`), so names are resolved by greedy longest match against the set
//! of registered names.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieError {
    #[error("Variable name '{name}' contains the unsupported character '{ch}'")]
    InvalidCharacter { name: String, ch: char },
}

/// Returns true for characters that may start a variable reference: `[A-Za-z_]`.
pub fn is_variable_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true for characters allowed in a variable name: `[A-Za-z0-9_]`.
pub fn is_variable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Debug, Clone)]
struct TrieNode<V> {
    value: Option<V>,
    children: HashMap<char, TrieNode<V>>,
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self {
            value: None,
            children: HashMap::new(),
        }
    }
}

/// A trie keyed by variable name.
#[derive(Debug, Clone)]
pub struct VariableTrie<V> {
    root: TrieNode<V>,
    len: usize,
}

impl<V> Default for VariableTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> VariableTrie<V> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::default(),
            len: 0,
        }
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Register `name`. Registering the same name again replaces its value.
    pub fn add_value(&mut self, name: &str, value: V) -> Result<(), TrieError> {
        if let Some(ch) = name.chars().find(|c| !is_variable_char(*c)) {
            return Err(TrieError::InvalidCharacter {
                name: name.to_string(),
                ch,
            });
        }

        let mut node = &mut self.root;
        for c in name.chars() {
            node = node.children.entry(c).or_default();
        }

        if node.value.replace(value).is_none() {
            self.len += 1;
        }
        Ok(())
    }

    /// Longest registered name that prefixes `input`.
    ///
    /// Returns the value and the number of bytes of `input` it covers.
    pub fn try_get_best_match(&self, input: &str) -> Option<(&V, usize)> {
        let mut node = &self.root;
        let mut best = None;

        for (index, c) in input.char_indices() {
            match node.children.get(&c) {
                Some(child) => {
                    node = child;
                    if let Some(value) = &node.value {
                        best = Some((value, index + c.len_utf8()));
                    }
                }
                None => break,
            }
        }

        best
    }

    /// Every registered name that prefixes `input`, longest first.
    pub fn get_matches(&self, input: &str) -> Vec<(&V, usize)> {
        let mut node = &self.root;
        let mut matches = Vec::new();

        for (index, c) in input.char_indices() {
            match node.children.get(&c) {
                Some(child) => {
                    node = child;
                    if let Some(value) = &node.value {
                        matches.push((value, index + c.len_utf8()));
                    }
                }
                None => break,
            }
        }

        matches.reverse();
        matches
    }
}
