use crate::error::Span;
use std::fmt;
use std::iter::{FusedIterator, Peekable};
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of digits and dashes starting with a digit. Its shape is
    /// checked by the parser, not here.
    Code(String),
    Comma,
    Semicolon,
    /// A run of characters the lexer does not recognize.
    Invalid(String),
    Eof,
}

impl Token {
    pub fn display_name(&self) -> String {
        match self {
            Token::Code(s) => format!("descriptor code '{}'", s),
            Token::Comma => "','".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::Invalid(s) => format!("unrecognized input '{}'", s),
            Token::Eof => "end of input".to_string(),
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Comma | Token::Semicolon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

fn is_unrecognized(ch: char) -> bool {
    !(ch.is_whitespace() || ch.is_ascii_digit() || matches!(ch, ',' | ';' | '#'))
}

/// Lazy tokenizer over a template.
///
/// Whitespace and `#` comments are skipped. The stream always ends with a
/// single [`Token::Eof`] and never fails: unrecognized characters come out as
/// [`Token::Invalid`] so the parser can decide how to recover. To start over,
/// build a new `Lexer` over the same text.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    col: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            col: 1,
            finished: false,
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map(|&(idx, _)| idx).unwrap_or(self.source.len())
    }

    fn bump(&mut self) {
        if let Some((_, ch)) = self.chars.next() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<SpannedToken> {
        loop {
            let start_line = self.line;
            let start_col = self.col;
            let start = self.offset();

            let Some(&(_, ch)) = self.chars.peek() else {
                if self.finished {
                    return None;
                }
                self.finished = true;
                return Some(SpannedToken {
                    token: Token::Eof,
                    span: Span::point(start_line, start_col, start),
                });
            };

            let token = match ch {
                _ if ch.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '#' => {
                    self.bump_while(|c| c != '\n');
                    continue;
                }
                ',' => {
                    self.bump();
                    Token::Comma
                }
                ';' => {
                    self.bump();
                    Token::Semicolon
                }
                '0'..='9' => {
                    self.bump_while(|c| c.is_ascii_digit() || c == '-');
                    let end = self.offset();
                    Token::Code(self.source[start..end].to_string())
                }
                _ => {
                    self.bump_while(is_unrecognized);
                    let end = self.offset();
                    Token::Invalid(self.source[start..end].to_string())
                }
            };

            let end = self.offset();
            return Some(SpannedToken {
                token,
                span: Span::new(start_line, start_col, start, end),
            });
        }
    }
}

impl FusedIterator for Lexer<'_> {}

/// Tokenizes the whole input eagerly. The last token is always [`Token::Eof`].
pub fn tokenize(input: &str) -> Vec<SpannedToken> {
    Lexer::new(input).collect()
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Code(s) => write!(f, "{}", s),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Invalid(s) => write!(f, "{}", s),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}
