use log::{debug, info};
use phf::phf_map;
use serde::Serialize;
use std::fmt;
use std::mem;

use crate::error::{ComputeError, Result};

/// The different kinds of tokens a postfix program is made of.
///
/// Classification looks at the **leading character** first: digits start
/// literals, `+ - * /` start operators, `=` starts an assignment and a
/// letter or underscore starts an identifier.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Serialize)]
pub enum TokenType {
    /// An integer literal
    INTEGER(i64),

    /// '+'
    PLUS,

    /// '-'
    MINUS,

    /// '*'
    STAR,

    /// '/'
    SLASH,

    /// '='
    EQUAL,

    /// '+='
    PLUS_EQUAL,

    /// '-='
    MINUS_EQUAL,

    /// '*='
    STAR_EQUAL,

    /// '/='
    SLASH_EQUAL,

    /// 'print'
    PRINT,

    /// A variable name
    IDENTIFIER,
}

// ─────────────────────────────────────────────────────────────────────────────
// Static symbol map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static SYMBOLS: phf::Map<&'static str, TokenType> = phf_map! {
    "+"  => TokenType::PLUS,
    "-"  => TokenType::MINUS,
    "*"  => TokenType::STAR,
    "/"  => TokenType::SLASH,
    "="  => TokenType::EQUAL,
    "+=" => TokenType::PLUS_EQUAL,
    "-=" => TokenType::MINUS_EQUAL,
    "*=" => TokenType::STAR_EQUAL,
    "/=" => TokenType::SLASH_EQUAL,
};

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "print" => TokenType::PRINT,
};

/// Arithmetic applied by an operator or a compound assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// `a op b` with truncating division.  `None` means the result does not
    /// exist in `i64` (zero divisor or overflow); callers tell them apart.
    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Div => a.checked_div(b),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl TokenType {
    /// The arithmetic behind `+ - * /`.
    pub fn operator(&self) -> Option<BinaryOp> {
        match self {
            TokenType::PLUS => Some(BinaryOp::Add),
            TokenType::MINUS => Some(BinaryOp::Sub),
            TokenType::STAR => Some(BinaryOp::Mul),
            TokenType::SLASH => Some(BinaryOp::Div),
            _ => None,
        }
    }

    /// The arithmetic behind `+= -= *= /=`.
    pub fn compound(&self) -> Option<BinaryOp> {
        match self {
            TokenType::PLUS_EQUAL => Some(BinaryOp::Add),
            TokenType::MINUS_EQUAL => Some(BinaryOp::Sub),
            TokenType::STAR_EQUAL => Some(BinaryOp::Mul),
            TokenType::SLASH_EQUAL => Some(BinaryOp::Div),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TokenType::INTEGER(_) => "INTEGER",
            TokenType::PLUS => "PLUS",
            TokenType::MINUS => "MINUS",
            TokenType::STAR => "STAR",
            TokenType::SLASH => "SLASH",
            TokenType::EQUAL => "EQUAL",
            TokenType::PLUS_EQUAL => "PLUS_EQUAL",
            TokenType::MINUS_EQUAL => "MINUS_EQUAL",
            TokenType::STAR_EQUAL => "STAR_EQUAL",
            TokenType::SLASH_EQUAL => "SLASH_EQUAL",
            TokenType::PRINT => "PRINT",
            TokenType::IDENTIFIER => "IDENTIFIER",
        }
    }
}

impl PartialEq for TokenType {
    /// Two TokenTypes are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A whitespace‑delimited word of the program, with the line it was found
/// on and its 0‑based position in the token sequence.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Token<'a> {
    /// The exact substring from the source.
    pub lexeme: &'a str,

    /// 1‑based line number in the source.
    pub line: usize,

    /// 0‑based index in the token sequence.
    pub position: usize,
}

impl<'a> Token<'a> {
    pub fn new(lexeme: &'a str, line: usize, position: usize) -> Self {
        debug!(
            "Creating new token: lexeme={}, line={}, position={}",
            lexeme, line, position
        );

        Self {
            lexeme,
            line,
            position,
        }
    }

    /// Classify the token by its leading character.
    pub fn kind(&self) -> Result<TokenType> {
        let first: u8 = match self.lexeme.as_bytes().first() {
            Some(b) => *b,
            None => return Err(self.malformed("empty token")),
        };

        let kind: TokenType = match first {
            // ── integer literal (digit‑leading) ──────────────────────────
            b'0'..=b'9' => {
                if !self.lexeme.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(self.malformed("invalid integer literal"));
                }

                let n: i64 = self
                    .lexeme
                    .parse()
                    .map_err(|_| self.malformed("integer literal out of range"))?;

                TokenType::INTEGER(n)
            }

            // ── operators and assignments ────────────────────────────────
            b'+' | b'-' | b'*' | b'/' | b'=' => match SYMBOLS.get(self.lexeme) {
                Some(tt) => *tt,
                None => return Err(self.malformed("unknown operator")),
            },

            // ── identifiers / keywords ───────────────────────────────────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                if !self
                    .lexeme
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_')
                {
                    return Err(self.malformed("invalid identifier"));
                }

                KEYWORDS
                    .get(self.lexeme)
                    .copied()
                    .unwrap_or(TokenType::IDENTIFIER)
            }

            _ => return Err(self.malformed("unexpected character")),
        };

        debug!("Classified '{}' as {}", self.lexeme, kind.name());

        Ok(kind)
    }

    fn malformed(&self, reason: &'static str) -> ComputeError {
        ComputeError::malformed(self.lexeme, reason, self.line, self.position)
    }
}

impl<'a> fmt::Display for Token<'a> {
    /// `KIND lexeme literal`, the format of the `tokenize` command.
    /// Unclassifiable tokens render as `MALFORMED`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Ok(TokenType::INTEGER(n)) => {
                let mut buf: itoa::Buffer = itoa::Buffer::new();
                write!(f, "INTEGER {} {}", self.lexeme, buf.format(n))
            }

            Ok(kind) => {
                info!("Formatted token: {} {}", kind.name(), self.lexeme);
                write!(f, "{} {} null", kind.name(), self.lexeme)
            }

            Err(_) => write!(f, "MALFORMED {} null", self.lexeme),
        }
    }
}
