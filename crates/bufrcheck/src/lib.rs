pub use bufrcheck_syntax::{
    Category, Descriptor, DescriptorClass, Diagnostic, DiagnosticSink, Node, Span, SyntaxDiagnostics, Template,
    parse, parse_source, tokenize,
};
pub use bufrcheck_validate::{Batch, Config, Input, IterationError, Report, check_file, check_source, validate};

pub mod prelude {
    pub use crate::{check_file, check_source, parse_source, validate};
    pub use crate::{Diagnostic, Report, SyntaxDiagnostics, Template};
}
