//! Module `scanner` splits a program buffer into whitespace‑delimited tokens.
//!
//! It is the token source the evaluator consumes: every maximal run of
//! non‑whitespace bytes becomes one [`Token`] borrowing the original buffer,
//! tagged with its 1‑based line and its 0‑based position in the sequence.
//! Classification (literal, operator, identifier) is *not* done here; the
//! evaluator classifies each token by its leading character when it
//! dispatches it.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a [u8]) -> Scanner<'a>`
//!   Create a scanner over the input buffer.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token<'a>, ComputeError>`; `Err` reports a token that is
//!   not valid UTF‑8.
//!
//! - `tokenize(src)` collects the whole sequence, stopping at the first error.
//!
//! # Example
//!
//! ```rust
//! use postfix_computer::scanner::Scanner;
//!
//! let tokens: Vec<_> = Scanner::new(b"x 5 =\nx print")
//!     .filter_map(Result::ok)
//!     .map(|t| t.lexeme)
//!     .collect();
//! assert_eq!(tokens, ["x", "5", "=", "x", "print"]);
//! ```

use crate::error::{ComputeError, Result};
use crate::token::Token;
use log::{debug, info};
use std::iter::FusedIterator;

/// A single pass **scanner** that converts raw bytes into a sequence of
/// [`Token`]s.  The lifetime `'a` ties every emitted token's `lexeme` slice
/// back to the original source buffer.
pub struct Scanner<'a> {
    src: &'a [u8],   // entire program text
    curr: usize,     // index of the next byte to examine
    line: usize,     // 1‑based line counter (\n increments)
    position: usize, // number of tokens emitted so far
}

impl<'a> Scanner<'a> {
    /// Create a new scanner over `src`.
    #[inline]
    pub fn new(src: &'a [u8]) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            curr: 0,
            line: 1,
            position: 0,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    /// Skip whitespace, counting newlines for diagnostics.
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek().is_ascii_whitespace() {
            if self.peek() == b'\n' {
                self.line += 1;
            }

            self.curr += 1;
        }
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        if self.is_at_end() {
            return None;
        }

        let start: usize = self.curr;

        while !self.is_at_end() && !self.peek().is_ascii_whitespace() {
            self.curr += 1;
        }

        let slice: &'a [u8] = &self.src[start..self.curr];

        let lexeme: &'a str = match std::str::from_utf8(slice) {
            Ok(s) => s,
            Err(e) => {
                debug!("Invalid UTF-8 on line {}: {}", self.line, e);
                return Some(Err(ComputeError::Encoding { line: self.line }));
            }
        };

        let token: Token<'a> = Token::new(lexeme, self.line, self.position);
        self.position += 1;

        Some(Ok(token))
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// Scan the whole buffer into a token sequence.
pub fn tokenize(src: &[u8]) -> Result<Vec<Token<'_>>> {
    let tokens: Vec<Token<'_>> = Scanner::new(src).collect::<Result<_>>()?;

    info!("Tokenized {} tokens", tokens.len());

    Ok(tokens)
}
