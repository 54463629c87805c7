//! # Requires-String Tokenizer
//!
//! Converts a location's `requires` string into a flat token stream.
//! The tokenizer is a five-state machine: top-level Boolean algebra,
//! `|…|` item/category references, the `:quantity` tail of a reference,
//! `{…}` function calls, and the parenthesised argument run of a call.
//!
//! Tokens never copy text: every [`Token::Ident`] borrows a slice of the
//! source buffer, so the stream is only valid while the source string is.

use std::fmt;

/// A single token, borrowing its text from the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// End of line; always the final token of a stream.
    Eol,
    And,
    Or,
    LeftParen,
    RightParen,
    Pipe,
    At,
    Colon,
    /// The quantity literal `ALL` (lowered to `100` at parse time).
    All,
    /// The quantity literal `HALF` (lowered to `50` at parse time).
    Half,
    Percent,
    LeftCurly,
    RightCurly,
    /// An identifier run: an item/category/function name, a numeric
    /// quantity, or a raw function-argument slice.
    Ident(&'a str),
}

impl Token<'_> {
    /// Canonical text of this token. [`Token::Eol`] prints as nothing.
    pub fn text(&self) -> &str {
        match self {
            Token::Eol => "",
            Token::And => "AND",
            Token::Or => "OR",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::Pipe => "|",
            Token::At => "@",
            Token::Colon => ":",
            Token::All => "ALL",
            Token::Half => "HALF",
            Token::Percent => "%",
            Token::LeftCurly => "{",
            Token::RightCurly => "}",
            Token::Ident(text) => text,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Tokenizer states. See the module docs for the transitions.
enum State {
    ReadingToken,
    ReadingIdentifier,
    ReadingIdentifierQuantity,
    ReadingFunction,
    ReadingFunctionArguments,
}

/// A contiguous, not-yet-emitted slice of the source.
#[derive(Clone, Copy)]
struct Run {
    start: usize,
    end: usize,
}

impl Run {
    fn extend(run: &mut Option<Run>, start: usize, end: usize) {
        match run {
            Some(r) => r.end = end,
            None => *run = Some(Run { start, end }),
        }
    }
}

/// Number of token slots sufficient for a source of `len` characters.
///
/// The smallest valid logic per token is eight characters (`|a:1%|OR…`),
/// so `len - (len + 1) / 8` slots always suffice; one more for the EOL.
fn buffer_slots(len: usize) -> usize {
    len.saturating_sub((len + 1) / 8) + 1
}

/// Tokenize a `requires` string. A final [`Token::Eol`] is always appended.
///
/// The tokenizer never fails: malformed input produces a token stream the
/// parser will reject, not an error here.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::with_capacity(buffer_slots(source.len()));
    let mut state = State::ReadingToken;
    let mut run: Option<Run> = None;
    let mut paren_depth = 0usize;
    // True only for the first character after an opening `|`.
    let mut just_opened_pipe = false;

    for (i, c) in source.char_indices() {
        match state {
            State::ReadingToken => match c {
                c if c.is_whitespace() => {
                    let at_end = source[i..].chars().all(char::is_whitespace);
                    flush_word(&mut tokens, source, &mut run, at_end);
                }
                '(' => {
                    flush_word(&mut tokens, source, &mut run, false);
                    tokens.push(Token::LeftParen);
                }
                ')' => {
                    flush_word(&mut tokens, source, &mut run, false);
                    tokens.push(Token::RightParen);
                }
                '|' => {
                    flush_word(&mut tokens, source, &mut run, false);
                    tokens.push(Token::Pipe);
                    state = State::ReadingIdentifier;
                    just_opened_pipe = true;
                }
                '{' => {
                    flush_word(&mut tokens, source, &mut run, false);
                    tokens.push(Token::LeftCurly);
                    state = State::ReadingFunction;
                }
                _ => Run::extend(&mut run, i, i + c.len_utf8()),
            },
            State::ReadingIdentifier => {
                match c {
                    '@' if just_opened_pipe => tokens.push(Token::At),
                    ':' => {
                        flush_ident(&mut tokens, source, &mut run);
                        tokens.push(Token::Colon);
                        state = State::ReadingIdentifierQuantity;
                    }
                    '|' => {
                        flush_ident(&mut tokens, source, &mut run);
                        tokens.push(Token::Pipe);
                        state = State::ReadingToken;
                    }
                    _ => Run::extend(&mut run, i, i + c.len_utf8()),
                }
                just_opened_pipe = false;
            }
            State::ReadingIdentifierQuantity => match c {
                c if c.is_whitespace() => {}
                '%' => {
                    flush_quantity(&mut tokens, source, &mut run);
                    tokens.push(Token::Percent);
                }
                '|' => {
                    flush_quantity(&mut tokens, source, &mut run);
                    tokens.push(Token::Pipe);
                    state = State::ReadingToken;
                }
                _ => Run::extend(&mut run, i, i + c.len_utf8()),
            },
            State::ReadingFunction => match c {
                c if c.is_whitespace() => {}
                '(' => {
                    flush_ident(&mut tokens, source, &mut run);
                    tokens.push(Token::LeftParen);
                    paren_depth = 1;
                    state = State::ReadingFunctionArguments;
                }
                '}' => {
                    flush_ident(&mut tokens, source, &mut run);
                    tokens.push(Token::RightCurly);
                    state = State::ReadingToken;
                }
                _ => Run::extend(&mut run, i, i + c.len_utf8()),
            },
            State::ReadingFunctionArguments => match c {
                '(' => {
                    paren_depth += 1;
                    Run::extend(&mut run, i, i + c.len_utf8());
                }
                ')' => {
                    paren_depth -= 1;
                    if paren_depth == 0 {
                        // The argument run may be empty; emit it regardless
                        // so the parser always sees `( Ident )`.
                        let text = run.map_or("", |r| &source[r.start..r.end]);
                        run = None;
                        tokens.push(Token::Ident(text));
                        tokens.push(Token::RightParen);
                        state = State::ReadingFunction;
                    } else {
                        Run::extend(&mut run, i, i + c.len_utf8());
                    }
                }
                _ => Run::extend(&mut run, i, i + c.len_utf8()),
            },
        }
    }

    // Flush whatever is pending. Inside `|…|` or `{…}` this means the input
    // was truncated; the parser reports that, not the tokenizer.
    match state {
        State::ReadingToken => flush_word(&mut tokens, source, &mut run, true),
        State::ReadingIdentifierQuantity => flush_quantity(&mut tokens, source, &mut run),
        _ => flush_ident(&mut tokens, source, &mut run),
    }

    tokens.push(Token::Eol);
    tokens
}

/// Flush a top-level run: `AND` / `OR` (case-insensitive) become operator
/// tokens, everything else an identifier. A run that began at offset 0 and
/// ends at end-of-input is always an identifier, so a requires string that
/// is nothing but a bare name still parses as an item.
fn flush_word<'a>(tokens: &mut Vec<Token<'a>>, source: &'a str, run: &mut Option<Run>, at_end: bool) {
    let Some(r) = run.take() else { return };
    let text = &source[r.start..r.end];
    if at_end && r.start == 0 {
        tokens.push(Token::Ident(text));
    } else if text.eq_ignore_ascii_case("AND") {
        tokens.push(Token::And);
    } else if text.eq_ignore_ascii_case("OR") {
        tokens.push(Token::Or);
    } else {
        tokens.push(Token::Ident(text));
    }
}

/// Flush a run as a plain identifier, if one is pending.
fn flush_ident<'a>(tokens: &mut Vec<Token<'a>>, source: &'a str, run: &mut Option<Run>) {
    if let Some(r) = run.take() {
        tokens.push(Token::Ident(&source[r.start..r.end]));
    }
}

/// Flush a quantity run: the literals `ALL` and `HALF` get their own
/// tokens, any other run is an identifier.
fn flush_quantity<'a>(tokens: &mut Vec<Token<'a>>, source: &'a str, run: &mut Option<Run>) {
    let Some(r) = run.take() else { return };
    match &source[r.start..r.end] {
        "ALL" => tokens.push(Token::All),
        "HALF" => tokens.push(Token::Half),
        text => tokens.push(Token::Ident(text)),
    }
}

/// Render a token stream back to text.
///
/// This is the structural inverse of [`tokenize`]: re-tokenizing the output
/// yields the same stream. Relative to the original source, only the
/// whitespace around `AND` / `OR` is normalised to single spaces.
pub fn detokenize(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::And | Token::Or => {
                if !out.ends_with(' ') && !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(token.text());
                out.push(' ');
            }
            _ => out.push_str(token.text()),
        }
    }
    out
}
