use bufrcheck_syntax::Diagnostic;
use serde::Serialize;

/// Syntax and iteration diagnostics for one input.
///
/// Built fresh for every input. Both channels are plain lists that start
/// empty, so "checked and clean" is simply two empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    syntax: Vec<Diagnostic>,
    iteration: Vec<Diagnostic>,
}

impl Report {
    pub fn new(syntax: Vec<Diagnostic>, iteration: Vec<Diagnostic>) -> Self {
        Self { name: None, syntax, iteration }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn has_syntax_errors(&self) -> bool {
        !self.syntax.is_empty()
    }

    pub fn has_iteration_errors(&self) -> bool {
        !self.iteration.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_syntax_errors() && !self.has_iteration_errors()
    }

    pub fn syntax(&self) -> &[Diagnostic] {
        &self.syntax
    }

    pub fn iteration(&self) -> &[Diagnostic] {
        &self.iteration
    }

    /// Syntax messages in encounter order, or `None` when there are none.
    pub fn syntax_messages(&self) -> Option<Vec<&str>> {
        messages(&self.syntax)
    }

    /// Iteration messages in report order, or `None` when there are none.
    pub fn iteration_messages(&self) -> Option<Vec<&str>> {
        messages(&self.iteration)
    }

    /// All diagnostics, syntax first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.syntax.iter().chain(self.iteration.iter())
    }

    pub fn error_count(&self) -> usize {
        self.syntax.len() + self.iteration.len()
    }
}

fn messages(diagnostics: &[Diagnostic]) -> Option<Vec<&str>> {
    if diagnostics.is_empty() {
        return None;
    }
    Some(diagnostics.iter().map(|d| d.message.as_str()).collect())
}
