//! # sqlstyle-core
//!
//! Core framework for SQL style linting over a lossless syntax tree.
//!
//! This crate provides the foundational traits and types for building
//! SQL style rules. It includes:
//!
//! - [`SyntaxNode`] for the parsed, lossless tree and [`parse`] to build it
//! - [`Rule`] trait, evaluated once per node with its ancestors
//! - [`LintOutcome`] and [`Edit`] for violations and their fixes
//! - [`apply_edits`] for rewriting a tree from a fix
//! - [`Linter`] for orchestrating lint and fix runs
//!
//! ## Example
//!
//! ```ignore
//! use sqlstyle_core::Linter;
//!
//! let linter = Linter::builder()
//!     .root("./queries")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = linter.lint_paths()?;
//! let fixed = linter.fix_source(Path::new("q.sql"), "SELECT 1 UNION SELECT 2")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod fix;
mod linter;
mod noqa;
mod parser;
mod rule;
mod tree;
mod types;

pub use config::{Config, ConfigError, LinterConfig, RuleConfig, DEFAULT_MAX_FIX_PASSES};
pub use context::FileContext;
pub use fix::{apply_edits, FixError};
pub use linter::{FixOutcome, Linter, LinterBuilder, LinterError};
pub use noqa::{AllowState, NoqaDirective, NoqaIndex};
pub use parser::{is_keyword, parse, ParseError};
pub use rule::{Edit, EditKind, LintOutcome, Rule, RuleBox, RuleViolation};
pub use tree::{NodeId, NodeKind, PositionMarker, SyntaxNode};
pub use types::{FixPreview, LintResult, Location, Severity, Violation, ViolationDiagnostic};
