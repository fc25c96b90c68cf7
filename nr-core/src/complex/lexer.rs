//! Tokenizer for complex literals.
//!
//! A `+` or `-` directly followed by a digit is a sign, and is folded into the number that
//! follows. Otherwise it is a binary operator token.

use crate::ParseError;

const IMAGINARY_UNIT: char = 'i';

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Imaginary,
    Operator(char),
    Eof,
}

pub struct Lexer<'a> {
    data: &'a str,
    position: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(data: &'a str) -> Self {
        Lexer {
            data,
            position: 0,
            finished: false,
        }
    }

    /// Produces the next token.
    ///
    /// Returns [`Token::Eof`] once, then [`ParseError::PastEnd`] on further calls.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        if self.finished {
            return Err(ParseError::PastEnd);
        }
        self.skip_whitespace();

        let mut chars = self.rest().chars();
        let token = match (chars.next(), chars.next()) {
            (None, _) => {
                self.finished = true;
                Token::Eof
            }
            (Some(IMAGINARY_UNIT), _) => {
                self.position += 1;
                Token::Imaginary
            }
            (Some(op @ ('+' | '-')), next) if !next.is_some_and(|c| c.is_ascii_digit()) => {
                self.position += 1;
                Token::Operator(op)
            }
            _ => self.number()?,
        };
        Ok(token)
    }

    /// Drains the lexer, including the trailing [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            tokens.push(token);
            if token == Token::Eof {
                return Ok(tokens);
            }
        }
    }

    fn number(&mut self) -> Result<Token, ParseError> {
        let rest = self.rest();
        let (negative, digits) = match rest.as_bytes().first() {
            Some(b'-') => (true, &rest[1..]),
            Some(b'+') => (false, &rest[1..]),
            _ => (false, rest),
        };
        let len = digits
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(digits.len());
        let literal = &digits[..len];
        let value: f64 = literal.parse().map_err(|_| {
            // Report the offending character when there were no digits at all.
            let shown = if literal.is_empty() {
                digits.chars().next().map(String::from).unwrap_or_default()
            } else {
                literal.to_owned()
            };
            ParseError::InvalidNumber(shown)
        })?;
        self.position += (rest.len() - digits.len()) + len;
        Ok(Token::Number(if negative { -value } else { value }))
    }

    fn rest(&self) -> &'a str {
        &self.data[self.position..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches([' ', '\t', '\n', '\r']);
        self.position += rest.len() - trimmed.len();
    }
}
