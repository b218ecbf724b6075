use crate::error::Diagnostic;

/// Receives diagnostics as the parser encounters them.
///
/// A sink is handed to each [`parse`](crate::parser::parse) call, so two
/// parses never share diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Collects syntax diagnostics for one parse run, in encounter order.
#[derive(Debug, Clone, Default)]
pub struct SyntaxDiagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl SyntaxDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for SyntaxDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Category, Span};

    #[test]
    fn test_starts_empty() {
        let sink = SyntaxDiagnostics::new();
        assert!(sink.is_empty());
        assert!(sink.diagnostics().is_empty());
        assert!(sink.into_vec().is_empty());
    }

    #[test]
    fn test_keeps_report_order() {
        let mut sink = SyntaxDiagnostics::new();
        sink.report(Diagnostic::new(Category::Syntax, "first", Span::new(1, 1, 0, 1)));
        sink.report(Diagnostic::new(Category::Syntax, "second", Span::new(2, 1, 5, 6)));

        let messages: Vec<_> = sink.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
    }
}
