//! Semantic validator coordinating the post-parse passes.
//!
//! Each pass walks the finished [`Document`] on its own and appends to the
//! shared [`DiagnosticSink`]. Passes that depend on nesting push a scope
//! frame for every statement, UNION branch and subquery body, so rules are
//! evaluated per frame and nothing leaks between levels.

mod alias_validation;
mod clause_order;
mod deprecation;
mod union_validation;

use std::ops::ControlFlow;

use crate::ast::visit::{Visit, VisitResult};
use crate::ast::{Clause, Document, Query};
use crate::diag::DiagnosticSink;
use crate::dialect::{Dialect, DialectRules};
use crate::semantic::ScopeTracker;

/// Switches for the individual validation passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Check clause sequences against the dialect's ordering table (CYP300).
    pub clause_order: bool,

    /// Check projection aliases for duplicates (CYP301).
    pub aliases: bool,

    /// Check UNION branches for matching columns and consistent ALL (CYP302, CYP303).
    pub unions: bool,

    /// Warn about deprecated syntax (CYP310).
    pub deprecations: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            clause_order: true,
            aliases: true,
            unions: true,
            deprecations: true,
        }
    }
}

impl ValidationConfig {
    /// The passes a dialect enables.
    pub fn for_rules(rules: &DialectRules) -> Self {
        Self {
            clause_order: rules.check_clause_order,
            aliases: rules.check_aliases,
            unions: true,
            deprecations: rules.deprecated_exists_function,
        }
    }
}

/// Runs the semantic passes for one dialect.
#[derive(Debug, Clone)]
pub struct SemanticValidator {
    pub(super) rules: &'static DialectRules,
    pub(super) config: ValidationConfig,
}

impl SemanticValidator {
    /// Creates a validator with the passes the dialect enables.
    pub fn new(dialect: Dialect) -> Self {
        let rules = dialect.rules();
        Self {
            rules,
            config: ValidationConfig::for_rules(rules),
        }
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clause_order(mut self, enabled: bool) -> Self {
        self.config.clause_order = enabled;
        self
    }

    pub fn with_aliases(mut self, enabled: bool) -> Self {
        self.config.aliases = enabled;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates a document, appending every violation to `sink`.
    ///
    /// Validation never stops early. `scopes` must be balanced on entry and
    /// is balanced again on return.
    pub fn validate(
        &self,
        document: &Document,
        scopes: &mut ScopeTracker,
        sink: &mut DiagnosticSink,
    ) {
        let before = sink.len();

        if self.config.clause_order {
            clause_order::run_clause_order(self, document, scopes, sink);
        }
        if self.config.aliases {
            alias_validation::run_alias_validation(document, scopes, sink);
        }
        if self.config.unions {
            union_validation::run_union_validation(document, sink);
        }
        if self.config.deprecations {
            deprecation::run_deprecation_check(document, sink);
        }

        tracing::debug!(
            dialect = %self.rules.dialect,
            statements = document.statements.len(),
            diagnostics = sink.len() - before,
            "semantic validation finished"
        );
    }
}

/// Validates `document` with the passes `dialect` enables.
pub fn validate(
    document: &Document,
    dialect: Dialect,
    scopes: &mut ScopeTracker,
    sink: &mut DiagnosticSink,
) {
    SemanticValidator::new(dialect).validate(document, scopes, sink);
}

/// Calls `each` with the body of every subquery directly inside `clause`.
///
/// Subqueries nested inside those bodies are not visited; the callee
/// recurses when it needs them.
pub(super) fn for_each_subquery(clause: &Clause, mut each: impl FnMut(&Query)) {
    let mut finder = Subqueries { each: &mut each };
    let _ = finder.visit_clause(clause);
}

struct Subqueries<'f> {
    each: &'f mut dyn FnMut(&Query),
}

impl Visit for Subqueries<'_> {
    type Break = ();

    fn visit_subquery(&mut self, body: &Query) -> VisitResult<()> {
        (self.each)(body);
        ControlFlow::Continue(())
    }
}
