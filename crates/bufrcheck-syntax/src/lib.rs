//! # bufrcheck-syntax
//!
//! Lexer, recovering parser and tree types for textual BUFR descriptor
//! templates.
//!
//! ## Overview
//!
//! - **Lexer**: lazily turns template text into [`SpannedToken`]s
//! - **Parser**: builds a [`Template`] tree, recovering from bad input
//! - **Sink**: collects syntax [`Diagnostic`]s for one parse run
//!
//! ## Architecture
//!
//! ```text
//! Template text
//!     ↓
//! Lexer (lazy iterator)
//!     ↓
//! SpannedToken stream
//!     ↓
//! Parser ──→ DiagnosticSink (syntax diagnostics)
//!     ↓
//! Template (tree)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bufrcheck_syntax::{parse_source, Node, SyntaxDiagnostics};
//!
//! let mut sink = SyntaxDiagnostics::new();
//! let template = parse_source("102003 001001 001002", &mut sink);
//!
//! assert!(sink.is_empty());
//! assert!(matches!(template.children[0], Node::Replication(_)));
//! ```
//!
//! ## Grammar
//!
//! ```text
//! template      := item* EOF
//! item          := descriptor | replication | ',' | ';'
//! replication   := 1XXYYY delayed_count? item{XX}
//! delayed_count := 031YYY            (only when YYY of the header is 000)
//! descriptor    := FXXYYY | F-XX-YYY
//! ```
//!
//! Whitespace and `#` comments are ignored. The parser never pads or trims a
//! replication to fit its width: a group cut short by the end of input keeps
//! the items it got, and the replication validator reports the shortfall.

pub mod ast;
pub mod descriptor;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod sink;

pub use ast::*;
pub use descriptor::{CodeError, Descriptor, DescriptorClass};
pub use error::{Category, Diagnostic, Span, SyntaxError};
pub use lexer::{Lexer, SpannedToken, Token, tokenize};
pub use parser::{Parser, parse, parse_source};
pub use sink::{DiagnosticSink, SyntaxDiagnostics};
