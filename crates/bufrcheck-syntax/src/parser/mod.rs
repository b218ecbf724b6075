mod descriptors;

use crate::ast::*;
use crate::error::{Diagnostic, SyntaxError};
use crate::lexer::{Lexer, SpannedToken, Token};
use crate::sink::DiagnosticSink;
use smallvec::SmallVec;
use std::iter::Peekable;

/// Outcome of consuming one item from the token stream.
pub(super) enum Step {
    Node(Node),
    Open(ReplicationNode),
    Skip,
    End,
}

/// Recovering recursive-descent parser for descriptor templates.
///
/// Replication groups are parsed with an explicit stack of open groups
/// rather than by recursion: each header opens a group, and a group closes
/// as soon as it holds `width` items or the stream ends. Syntax errors go
/// to the [`DiagnosticSink`] and never stop the parse.
pub struct Parser<'s, I: Iterator<Item = SpannedToken>> {
    pub(super) tokens: Peekable<I>,
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s, I: Iterator<Item = SpannedToken>> Parser<'s, I> {
    pub fn new(tokens: I, sink: &'s mut dyn DiagnosticSink) -> Self {
        Self { tokens: tokens.peekable(), sink }
    }

    #[inline]
    pub(super) fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek().map(|st| &st.token)
    }

    #[inline]
    pub(super) fn advance(&mut self) -> Option<SpannedToken> {
        self.tokens.next()
    }

    #[inline]
    pub(super) fn skip_separators(&mut self) {
        while self.peek().is_some_and(Token::is_separator) {
            self.advance();
        }
    }

    pub(super) fn report(&mut self, error: SyntaxError) {
        self.sink.report(Diagnostic::from(error));
    }

    pub fn parse_template(mut self) -> Template {
        let mut template = Template::default();
        let mut open: SmallVec<[ReplicationNode; 4]> = SmallVec::new();

        loop {
            match self.step() {
                Step::Node(node) => close_into(node, &mut open, &mut template.children),
                Step::Open(replication) => open.push(replication),
                Step::Skip => {}
                Step::End => break,
            }
        }

        // Input ran out inside these groups; they keep what they got.
        while let Some(replication) = open.pop() {
            close_into(Node::Replication(replication), &mut open, &mut template.children);
        }

        template
    }
}

/// Appends `node` to the innermost open group, closing every group that
/// becomes full on the way out.
fn close_into(mut node: Node, open: &mut SmallVec<[ReplicationNode; 4]>, root: &mut Vec<Node>) {
    loop {
        let Some(innermost) = open.last_mut() else {
            root.push(node);
            return;
        };

        innermost.children.push(node);
        if innermost.children.len() < usize::from(innermost.spec.width) {
            return;
        }

        match open.pop() {
            Some(full) => node = Node::Replication(full),
            None => return,
        }
    }
}

/// Parses a token stream into a [`Template`], reporting syntax errors to `sink`.
pub fn parse<T>(tokens: T, sink: &mut dyn DiagnosticSink) -> Template
where
    T: IntoIterator<Item = SpannedToken>,
{
    Parser::new(tokens.into_iter(), sink).parse_template()
}

/// Tokenizes and parses `source` in one go.
pub fn parse_source(source: &str, sink: &mut dyn DiagnosticSink) -> Template {
    parse(Lexer::new(source), sink)
}
