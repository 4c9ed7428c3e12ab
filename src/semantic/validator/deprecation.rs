//! Deprecated syntax warnings (CYP310).

use crate::ast::visit::{Visit, VisitResult, walk_expression};
use crate::ast::{Document, Expression, FunctionCall};
use crate::diag::{Diag, DiagCode, DiagnosticSink};

pub(super) fn run_deprecation_check(document: &Document, sink: &mut DiagnosticSink) {
    let _ = DeprecatedSyntax { sink }.visit_document(document);
}

struct DeprecatedSyntax<'a> {
    sink: &'a mut DiagnosticSink,
}

impl Visit for DeprecatedSyntax<'_> {
    type Break = ();

    fn visit_expression(&mut self, expression: &Expression) -> VisitResult<()> {
        if let Expression::FunctionCall(call) = expression {
            if is_exists_on_property(call) {
                self.sink.push(
                    Diag::warning("`exists()` on a property is deprecated")
                        .with_primary_label(call.span.clone(), "deprecated function")
                        .with_help("use `IS NOT NULL` instead")
                        .with_code(DiagCode::Deprecated),
                );
            }
        }
        walk_expression(self, expression)
    }
}

fn is_exists_on_property(call: &FunctionCall) -> bool {
    call.name.eq_ignore_ascii_case("exists")
        && matches!(call.arguments.as_slice(), [Expression::Property(..)])
}
