use super::{Parser, Step};
use crate::ast::*;
use crate::descriptor::{CodeError, Descriptor};
use crate::error::{Span, SyntaxError};
use crate::lexer::{SpannedToken, Token};

impl<I: Iterator<Item = SpannedToken>> Parser<'_, I> {
    pub(super) fn step(&mut self) -> Step {
        let Some(SpannedToken { token, span }) = self.advance() else {
            return Step::End;
        };

        match token {
            Token::Eof => Step::End,
            Token::Comma | Token::Semicolon => Step::Skip,
            Token::Invalid(text) => {
                self.report(SyntaxError::InvalidLexeme { text, span });
                self.recover();
                Step::Skip
            }
            Token::Code(text) => self.parse_code(text, span),
        }
    }

    fn parse_code(&mut self, text: String, span: Span) -> Step {
        let error = match Descriptor::from_code(&text) {
            Ok(descriptor) => return self.parse_descriptor(descriptor, text, span),
            Err(CodeError::Shape) => SyntaxError::MalformedCode { text: text.clone(), span },
            Err(CodeError::UnknownClass(class)) => SyntaxError::UnknownClass {
                text: text.clone(),
                class,
                span,
            },
        };

        self.report(error);
        self.recover();
        Step::Node(Node::Invalid { text, span })
    }

    fn parse_descriptor(&mut self, descriptor: Descriptor, text: String, span: Span) -> Step {
        let Some(spec) = ReplicationSpec::from_descriptor(&descriptor) else {
            return Step::Node(Node::Descriptor(DescriptorNode { descriptor, span }));
        };

        if spec.width == 0 {
            self.report(SyntaxError::ZeroWidthReplication { text: text.clone(), span });
            self.recover();
            return Step::Node(Node::Invalid { text, span });
        }

        let delayed_count = if spec.is_delayed() {
            self.parse_delayed_count()
        } else {
            None
        };

        Step::Open(ReplicationNode {
            header: descriptor,
            spec,
            span,
            delayed_count,
            children: Vec::with_capacity(usize::from(spec.width)),
        })
    }

    /// Takes the `0-31-YYY` descriptor after a delayed header, if one is
    /// there. Unrecognized input in front of it is reported and skipped, so
    /// the slot is still filled afterwards. Anything else is left for the
    /// body; the validator decides whether a missing or unknown factor is an
    /// error.
    fn parse_delayed_count(&mut self) -> Option<DescriptorNode> {
        self.skip_separators();

        if matches!(self.peek(), Some(Token::Invalid(_)))
            && let Some(SpannedToken { token: Token::Invalid(text), span }) = self.advance()
        {
            self.report(SyntaxError::InvalidLexeme { text, span });
            self.recover();
        }

        let descriptor = match self.peek() {
            Some(Token::Code(text)) => Descriptor::from_code(text).ok()?,
            _ => return None,
        };

        if !descriptor.occupies_delayed_count_slot() {
            return None;
        }

        let st = self.advance()?;
        Some(DescriptorNode { descriptor, span: st.span })
    }

    /// Skips ahead to the next well-formed descriptor code or end of input.
    fn recover(&mut self) {
        loop {
            let resumable = match self.peek() {
                None | Some(Token::Eof) => true,
                Some(Token::Code(text)) => Descriptor::from_code(text).is_ok(),
                Some(_) => false,
            };
            if resumable {
                break;
            }
            self.advance();
        }
    }
}
