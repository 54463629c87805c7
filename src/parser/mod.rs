//! # Requires-String Parser
//!
//! Classic recursive descent over a token stream into the logic DAG.
//! AND and OR are right-associative and of equal precedence; the
//! simplifier, not the grammar, is responsible for normalisation.
//!
//! The parser never panics and never returns an error value: on any
//! mismatch it describes the failure to the [`Diagnostics`] sink and
//! yields `None`.

use std::sync::Arc;

use crate::diagnostics::{Diagnostics, ParseDiagnostic};
use crate::logic::{simplify, Logic};
use crate::token::{detokenize, tokenize, Token};

/// Tokenize and parse a `requires` string in one step.
pub fn parse_requires<'a>(source: &'a str, diagnostics: &Diagnostics) -> Option<Arc<Logic<'a>>> {
    parse(&tokenize(source), diagnostics)
}

/// Parse a token stream. A successful parse consumes every token, with
/// exactly one trailing [`Token::Eol`].
pub fn parse<'a>(tokens: &[Token<'a>], diagnostics: &Diagnostics) -> Option<Arc<Logic<'a>>> {
    // A stream that is nothing but a bare identifier is accepted as an
    // item, so `requires: "Sword"` works without the pipes.
    if let &[Token::Ident(name), Token::Eol] = tokens {
        return Some(Logic::item(name));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        diagnostics,
    };
    let expr = parser.binary()?;
    if matches!(parser.peek(), Token::Eol) && parser.pos + 1 == tokens.len() {
        Some(expr)
    } else {
        parser.fail()
    }
}

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    diagnostics: &'t Diagnostics,
}

impl<'t, 'a> Parser<'t, 'a> {
    /// `binary := unary ( (AND | OR) binary )?` — right-associative.
    fn binary(&mut self) -> Option<Arc<Logic<'a>>> {
        let left = self.unary()?;
        match self.peek() {
            Token::And => {
                self.advance();
                let right = self.binary()?;
                simplify::and(Some(left), Some(right))
            }
            Token::Or => {
                self.advance();
                let right = self.binary()?;
                simplify::or(Some(left), Some(right))
            }
            _ => Some(left),
        }
    }

    /// `unary := pipe | curly | '(' binary ')'`
    fn unary(&mut self) -> Option<Arc<Logic<'a>>> {
        match self.peek() {
            Token::LeftParen => {
                self.advance();
                let inner = self.binary()?;
                self.expect(Token::RightParen)?;
                Some(Logic::grouping(inner))
            }
            Token::Pipe => self.pipe_reference(),
            Token::LeftCurly => self.function_call(),
            _ => self.fail(),
        }
    }

    /// `pipe := '|' ['@'] Ident [':' (ALL | HALF | Ident) ['%']] '|'`
    ///
    /// The combinations select one of the eight leaf variants; `ALL`
    /// lowers to 100 and `HALF` to 50.
    fn pipe_reference(&mut self) -> Option<Arc<Logic<'a>>> {
        self.advance(); // opening pipe
        let category = if matches!(self.peek(), Token::At) {
            self.advance();
            true
        } else {
            false
        };
        let name = self.ident()?;

        if !matches!(self.peek(), Token::Colon) {
            self.expect(Token::Pipe)?;
            return Some(if category {
                Logic::category(name)
            } else {
                Logic::item(name)
            });
        }

        self.advance(); // colon
        let count = match self.peek() {
            Token::All => {
                self.advance();
                "100"
            }
            Token::Half => {
                self.advance();
                "50"
            }
            Token::Ident(text) => {
                self.advance();
                text
            }
            _ => return self.fail(),
        };
        let percent = if matches!(self.peek(), Token::Percent) {
            self.advance();
            true
        } else {
            false
        };
        self.expect(Token::Pipe)?;

        Some(match (category, percent) {
            (false, false) => Logic::item_count(name, count),
            (true, false) => Logic::category_count(name, count),
            (false, true) => Logic::item_percent(name, count),
            (true, true) => Logic::category_percent(name, count),
        })
    }

    /// `curly := '{' Ident '(' Ident ')' '}'` — the argument run stays an
    /// unparsed slice of the source.
    fn function_call(&mut self) -> Option<Arc<Logic<'a>>> {
        self.advance(); // opening curly
        let name = self.ident()?;
        self.expect(Token::LeftParen)?;
        let args = self.ident()?;
        self.expect(Token::RightParen)?;
        self.expect(Token::RightCurly)?;
        Some(Logic::function(name, args))
    }

    fn peek(&self) -> Token<'a> {
        self.tokens.get(self.pos).copied().unwrap_or(Token::Eol)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect(&mut self, expected: Token<'a>) -> Option<()> {
        if self.peek() == expected {
            self.advance();
            Some(())
        } else {
            self.fail()
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        match self.peek() {
            Token::Ident(text) => {
                self.advance();
                Some(text)
            }
            _ => self.fail(),
        }
    }

    /// Describe the failure at the current token and give up.
    fn fail<T>(&mut self) -> Option<T> {
        let failing = self.peek();
        let start = self.pos.saturating_sub(1);
        let end = (self.pos + 2).min(self.tokens.len());
        let window = detokenize(&self.tokens[start.min(self.tokens.len())..end]);
        let prefix = detokenize(&self.tokens[..self.pos.min(self.tokens.len())]);
        let diagnostic = ParseDiagnostic {
            token: format!("{failing:?}"),
            window,
            line: detokenize(self.tokens),
            line_number: 1 + prefix.matches('\n').count(),
        };
        self.diagnostics.parse_failure(&diagnostic);
        None
    }
}
