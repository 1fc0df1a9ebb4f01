//! Expression subsystem.
//!
//! # Data Flow
//! ```text
//! Expression text (header values, hosts, timeouts, proxy name)
//!     → cache.rs (snapshot lookup, lock-free)
//!     → on miss: parser.rs (text → instructions)
//!         → trie.rs (longest-match variable names)
//!         → variables.rs (system variable set)
//!     → evaluator.rs (instructions + request context → String)
//! ```
//!
//! # Design Decisions
//! - Evaluation never fails; unresolved `$name` is emitted as written
//! - Longest variable name wins; system variables win a tie
//! - Compiled expressions are immutable and shared between requests

pub mod cache;
pub mod evaluator;
pub mod parser;
pub mod trie;
pub mod variables;

pub use cache::ExpressionCache;
pub use evaluator::ExpressionEvaluator;
pub use parser::{parse_expression, Instruction, ParsedExpression};
pub use trie::{TrieError, VariableTrie};
pub use variables::{RequestContext, RequestInfo, SystemVariable};
