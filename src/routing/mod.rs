//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at load and on every reload):
//!     RouteConfig[]
//!     → parser.rs (pattern text → PatternNode tree)
//!     → validation.rs (unique names, no system names, no '*' after a variable)
//!     → matcher.rs (PatternNode → anchored case-insensitive regex)
//!     → router.rs (freeze as immutable RouteSnapshot, swap atomically)
//!
//! Incoming Request (path)
//!     → router.rs (ordered scan of the current snapshot)
//!     → matcher.rs (variables + unmatched suffix)
//!     → Return: ResolvedRoute or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled at load time, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (configuration order)
//! - A pattern that fails to compile excludes only its own route

pub mod error;
pub mod matcher;
pub mod node;
pub mod parser;
pub mod router;
pub mod validation;

pub use error::{ConfigError, PatternError, RouteError};
pub use matcher::{PathMatch, PatternMatcher};
pub use node::{PatternNode, PatternVisitor};
pub use parser::parse;
pub use router::{normalize_route, CompiledRoute, LoadReport, ResolvedRoute, RouteRejection, RouteSnapshot, RouteTable};
pub use validation::{validate, PatternValidator};
