//! Hand-written scanner for Fable source text.
//!
//! Produces a flat token stream with 1-based line numbers. Multi-character
//! operators are matched longest-first, so `<?=`, `<=>`, `<<`, `<-`, and
//! `<=` never split apart. String literals accept either quote style and
//! decode escapes eagerly; an unknown escape is a lex error.

use fable_diagnostic::{Diagnostic, ErrorKind};
use fable_ir::{Line, Token, TokenKind};

#[cfg(test)]
mod tests;

/// Tokenize a complete source text.
///
/// The returned stream always ends with a single [`TokenKind::Eof`] token
/// carrying the last line seen.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut scanner = Scanner::new(source);
    scanner.run()?;
    Ok(scanner.tokens)
}

struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
    line: Line,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner {
            src: source.as_bytes(),
            pos: 0,
            line: Line::new(1),
            tokens: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), Diagnostic> {
        while let Some(c) = self.peek() {
            match c {
                b' ' | b'\t' | b'\r' => {
                    self.bump();
                }
                b'\n' => {
                    self.bump();
                    self.line = self.line.next();
                }
                b'0'..=b'9' => self.number()?,
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.name(),
                b'"' | b'\'' => self.text(c)?,
                _ => self.operator(c)?,
            }
        }
        self.push(TokenKind::Eof);
        Ok(())
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.line));
    }

    fn error(&self, message: String) -> Diagnostic {
        Diagnostic::new(ErrorKind::Lex, self.line, message)
    }

    fn number(&mut self) -> Result<(), Diagnostic> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.bump();
        }
        // A dot starts the fractional part only when a digit follows, so
        // `1..5` lexes as `1` `..` `5`.
        let mut is_float = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_float = true;
            self.bump();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        let literal = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| self.error("invalid number literal".to_string()))?;
        if is_float {
            let value: f64 = literal
                .parse()
                .map_err(|_| self.error(format!("invalid number literal {literal}")))?;
            self.push(TokenKind::Float(value));
        } else {
            let value: i64 = literal
                .parse()
                .map_err(|_| self.error(format!("number literal {literal} is too large")))?;
            self.push(TokenKind::Int(value));
        }
        Ok(())
    }

    fn name(&mut self) {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
        ) {
            self.bump();
        }
        let word = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        let kind = match word.as_str() {
            "index" => TokenKind::Index,
            "yes" => TokenKind::Yes,
            "no" => TokenKind::No,
            "nothing" => TokenKind::Nothing,
            "always" => TokenKind::Always,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "xor" => TokenKind::Xor,
            _ => TokenKind::Name(word),
        };
        self.push(kind);
    }

    fn text(&mut self, delim: u8) -> Result<(), Diagnostic> {
        let open_line = self.line;
        self.bump();
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(Diagnostic::new(
                        ErrorKind::Lex,
                        open_line,
                        "unterminated text literal".to_string(),
                    ));
                }
                Some(c) if c == delim => {
                    self.bump();
                    break;
                }
                Some(b'\\') => {
                    self.bump();
                    let escaped = self
                        .peek()
                        .ok_or_else(|| self.error("unterminated text literal".to_string()))?;
                    let decoded = match escaped {
                        b'r' => '\r',
                        b'n' => '\n',
                        b't' => '\t',
                        b'\\' => '\\',
                        b'\'' => '\'',
                        b'"' => '"',
                        other => {
                            return Err(
                                self.error(format!("unknown escape character {}", other as char))
                            );
                        }
                    };
                    value.push(decoded);
                    self.bump();
                }
                Some(b'\n') => {
                    value.push('\n');
                    self.bump();
                    self.line = self.line.next();
                }
                Some(c) => {
                    // Collect the full UTF-8 sequence, not just the lead byte.
                    if c < 0x80 {
                        value.push(c as char);
                        self.bump();
                    } else {
                        let rest = &self.src[self.pos..];
                        let decoded = String::from_utf8_lossy(rest);
                        let ch = decoded.chars().next().unwrap_or('\u{FFFD}');
                        value.push(ch);
                        self.pos += ch.len_utf8();
                    }
                }
            }
        }
        self.tokens.push(Token::new(TokenKind::Text(value), open_line));
        Ok(())
    }

    /// Operators and delimiters, longest match first.
    fn operator(&mut self, c: u8) -> Result<(), Diagnostic> {
        let kind = match c {
            b'+' => self.take(1, TokenKind::Plus),
            b'*' => self.take(1, TokenKind::Star),
            b'/' => self.take(1, TokenKind::Slash),
            b'%' => self.take(1, TokenKind::Percent),
            b'^' => self.take(1, TokenKind::Caret),
            b'?' => self.take(1, TokenKind::Question),
            b'#' => self.take(1, TokenKind::Hash),
            b'@' => self.take(1, TokenKind::At),
            b'(' => self.take(1, TokenKind::LParen),
            b')' => self.take(1, TokenKind::RParen),
            b'[' => self.take(1, TokenKind::LBracket),
            b']' => self.take(1, TokenKind::RBracket),
            b'{' => self.take(1, TokenKind::LBrace),
            b'}' => self.take(1, TokenKind::RBrace),
            b',' => self.take(1, TokenKind::Comma),
            b':' => self.take(1, TokenKind::Colon),
            b';' => self.take(1, TokenKind::Semi),
            b'|' => self.take(1, TokenKind::Pipe),
            b'-' => match self.peek_at(1) {
                Some(b'>') => self.take(2, TokenKind::Arrow),
                _ => self.take(1, TokenKind::Minus),
            },
            b'!' => match self.peek_at(1) {
                Some(b'=') => self.take(2, TokenKind::NotEq),
                _ => self.take(1, TokenKind::Bang),
            },
            b'=' => match self.peek_at(1) {
                Some(b'=') => self.take(2, TokenKind::EqEq),
                Some(b'>') => self.take(2, TokenKind::Transform),
                _ => self.take(1, TokenKind::Assign),
            },
            b'>' => match self.peek_at(1) {
                Some(b'>') => self.take(2, TokenKind::Reduce),
                Some(b'=') => self.take(2, TokenKind::GtEq),
                _ => self.take(1, TokenKind::Gt),
            },
            b'<' => match (self.peek_at(1), self.peek_at(2)) {
                (Some(b'?'), Some(b'=')) => self.take(3, TokenKind::Detect),
                (Some(b'='), Some(b'>')) => self.take(3, TokenKind::Swap),
                (Some(b'='), _) => self.take(2, TokenKind::LtEq),
                (Some(b'<'), _) => self.take(2, TokenKind::Reload),
                (Some(b'-'), _) => self.take(2, TokenKind::ReturnArrow),
                _ => self.take(1, TokenKind::Lt),
            },
            b'.' => match self.peek_at(1) {
                Some(b'.') => self.take(2, TokenKind::Unfold),
                _ => return Err(self.error("unexpected character '.'".to_string())),
            },
            other => {
                return Err(self.error(format!("unexpected character '{}'", other as char)));
            }
        };
        self.push(kind);
        Ok(())
    }

    fn take(&mut self, len: usize, kind: TokenKind) -> TokenKind {
        self.pos += len;
        kind
    }
}
