use super::{Diag, DiagCode, DiagSeverity};

/// Ordered, append-only accumulator of diagnostics for one parse.
///
/// The pipeline creates one sink per invocation and lends it to the lexer,
/// parser and validator in turn. Emission order is preserved.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diag>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, diag: Diag) {
        tracing::trace!(code = ?diag.code, span = ?diag.span(), "{}", diag.message);
        self.diagnostics.push(diag);
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diag>) {
        for diag in diags {
            self.push(diag);
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// True when at least one diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == DiagSeverity::Error)
    }

    /// Number of diagnostics carrying `code`.
    pub fn count_code(&self, code: DiagCode) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.code == Some(code))
            .count()
    }

    pub fn as_slice(&self) -> &[Diag] {
        &self.diagnostics
    }

    pub fn into_vec(self) -> Vec<Diag> {
        self.diagnostics
    }
}
