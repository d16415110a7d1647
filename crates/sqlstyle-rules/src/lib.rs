//! # sqlstyle-rules
//!
//! Built-in style rules for sqlstyle.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | L033 | `union-qualifier` | Requires `UNION DISTINCT` or `UNION ALL` instead of a bare `UNION` |
//!
//! ## Usage
//!
//! ```ignore
//! use sqlstyle_core::Linter;
//! use sqlstyle_rules::UnionQualifier;
//!
//! let linter = Linter::builder()
//!     .root("./queries")
//!     .rule(UnionQualifier::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod presets;
mod union_qualifier;

pub use presets::{all_rules, find_rule, recommended_rules, Preset};
pub use union_qualifier::UnionQualifier;

/// Re-export core types for convenience.
pub use sqlstyle_core::{Rule, Severity, Violation};
