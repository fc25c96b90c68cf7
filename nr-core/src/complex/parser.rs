//! Single-pass parser for complex literals.
//!
//! Accepted forms include `"3.51"`, `"-3.17"`, `"-i2.71"`, `"i"`, `"1"` and `"-2.71 - i3.15"`.
//! Every term is summed into the result, so `"1 + i2 + 3"` is `4 + 2i`.

use super::{Lexer, Token};
use crate::{Complex, ParseError};

pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    /// Tokenizes `input`. Fails on blank input or a malformed numeric literal.
    pub fn new(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Parser { tokens })
    }

    pub fn parse(&self) -> Result<Complex, ParseError> {
        let mut result = Complex::ZERO;
        let mut factor = 1.0;
        let mut imaginary = false;

        for (index, token) in self.tokens.iter().enumerate() {
            let next = self.tokens.get(index + 1);
            match *token {
                Token::Operator(op) => {
                    if index > 0 && matches!(self.tokens[index - 1], Token::Operator(_)) {
                        return Err(ParseError::AdjacentOperators(index));
                    }
                    if next == Some(&Token::Eof) {
                        return Err(ParseError::DanglingOperator);
                    }
                    if op == '-' {
                        factor = -factor;
                    }
                }
                Token::Imaginary => {
                    if let Some(Token::Number(_)) = next {
                        imaginary = true;
                    } else {
                        // A lone "i" stands for 1i.
                        result = result + Complex::new(0.0, factor);
                        factor = 1.0;
                    }
                }
                Token::Number(value) => {
                    if next == Some(&Token::Imaginary) {
                        return Err(ParseError::ImaginaryAfterNumber);
                    }
                    let value = value * factor;
                    result = if imaginary {
                        result + Complex::new(0.0, value)
                    } else {
                        result + Complex::new(value, 0.0)
                    };
                    factor = 1.0;
                    imaginary = false;
                }
                Token::Eof => break,
            }
        }
        Ok(result)
    }
}
