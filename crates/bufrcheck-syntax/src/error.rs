use serde::Serialize;
use std::fmt;

/// Source position of a token or node. `line` and `col` are 1-based,
/// `start`/`end` are byte offsets into the template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub line: usize,
    pub col: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, col: usize, start: usize, end: usize) -> Self {
        Self { line, col, start, end }
    }

    /// Zero-width span, used for the end-of-input token.
    pub fn point(line: usize, col: usize, offset: usize) -> Self {
        Self { line, col, start: offset, end: offset }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Grammar violations found while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    InvalidLexeme { text: String, span: Span },
    MalformedCode { text: String, span: Span },
    UnknownClass { text: String, class: u8, span: Span },
    ZeroWidthReplication { text: String, span: Span },
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::InvalidLexeme { span, .. } => *span,
            SyntaxError::MalformedCode { span, .. } => *span,
            SyntaxError::UnknownClass { span, .. } => *span,
            SyntaxError::ZeroWidthReplication { span, .. } => *span,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::InvalidLexeme { text, .. } => {
                write!(f, "expected descriptor code, found unrecognized input '{}'", text)
            }
            SyntaxError::MalformedCode { text, .. } => {
                write!(f, "expected descriptor code FXXYYY or F-XX-YYY, found '{}'", text)
            }
            SyntaxError::UnknownClass { text, class, .. } => {
                write!(f, "descriptor '{}' has unknown class {}, expected 0-3", text, class)
            }
            SyntaxError::ZeroWidthReplication { text, .. } => {
                write!(f, "replication header '{}' must govern at least one descriptor", text)
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Which channel a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Syntax,
    Iteration,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Syntax => write!(f, "syntax"),
            Category::Iteration => write!(f, "iteration"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: Category,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(category: Category, message: impl Into<String>, span: Span) -> Self {
        Self { category, message: message.into(), span }
    }
}

impl From<SyntaxError> for Diagnostic {
    fn from(err: SyntaxError) -> Self {
        Diagnostic::new(Category::Syntax, err.to_string(), err.span())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error at {}: {}", self.category, self.span, self.message)
    }
}
