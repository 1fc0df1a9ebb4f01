//! Route pattern errors.

use thiserror::Error;

use crate::config::validation::ValidationError;

/// Errors raised while turning a pattern string into a matcher.
///
/// Parse errors are lexical/structural and carry the byte offset of the
/// offending character. Validation errors are semantic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("There is a missing ')' for the '(' at position {position}")]
    MissingOptionalEnd { position: usize },

    #[error("There is an unexpected ')' at position {position}")]
    UnexpectedOptionalEnd { position: usize },

    #[error("The optional segment at position {position} is empty or invalid")]
    EmptyOptional { position: usize },

    #[error("The variable at position {position} has an invalid name")]
    InvalidVariableName { position: usize },

    #[error("The variable name already used: '{name}'")]
    DuplicateVariable { name: String },

    #[error("The variable name '{name}' collides with a system variable")]
    ReservedVariable { name: String },

    #[error("The wild-card character '*' cannot follow a variable")]
    WildcardAfterVariable,

    #[error("Failed to compile the route matcher: {0}")]
    Compile(String),
}

impl PatternError {
    /// True for errors detected by the scanner rather than the validators.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            PatternError::MissingOptionalEnd { .. }
                | PatternError::UnexpectedOptionalEnd { .. }
                | PatternError::EmptyOptional { .. }
                | PatternError::InvalidVariableName { .. }
        )
    }
}

/// Why a single route was excluded from the route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Route '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    #[error(transparent)]
    Settings(#[from] ValidationError),
}

/// A configuration that cannot be installed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Configuration rejected: {}", join(.0))]
    Rejected(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
