//! Scope tracking and semantic validation for Cypher documents.
//!
//! The parser records clause kinds into a [`ScopeTracker`] while it builds
//! the tree. Once a [`Document`](crate::ast::Document) exists, the
//! [`SemanticValidator`] walks it again with the same tracker and reports
//! problems that are valid grammar but invalid meaning:
//!
//! - clause ordering (CYP300)
//! - duplicate projection aliases (CYP301)
//! - UNION column and ALL consistency (CYP302, CYP303)
//! - deprecated syntax warnings (CYP310)
//!
//! Semantic diagnostics never abort anything: the validator always runs to
//! completion and records every violation.
//!
//! # Example
//!
//! ```
//! use cypher_parser::semantic::{ScopeTracker, SemanticValidator};
//! use cypher_parser::{CypherParseOptions, Dialect, diag::DiagnosticSink, parse};
//!
//! let result = parse("RETURN 1 AS a, 2 AS a", &CypherParseOptions::default());
//! let document = result.document.expect("parses");
//!
//! let mut scopes = ScopeTracker::new();
//! let mut sink = DiagnosticSink::new();
//! SemanticValidator::new(Dialect::OpenCypher).validate(&document, &mut scopes, &mut sink);
//! assert_eq!(sink.len(), 1);
//! ```

pub mod scope;
pub mod validator;

pub use scope::{ScopeFrame, ScopeKind, ScopeTracker};
pub use validator::{SemanticValidator, ValidationConfig, validate};
