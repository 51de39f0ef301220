//! Centralised error hierarchy for the **postfix computer**.
//!
//! The data structures themselves report absence with `Option` (an empty
//! stack, a missing key).  The evaluator turns that absence into one of the
//! variants below, attaching the offending token's line and sequence
//! position, so nothing ever flows into arithmetic as a fabricated value.
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the computer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComputeError {
    /// Token that is neither a literal, an operator, an assignment nor an identifier.
    #[error("[line {line}] Error at '{lexeme}': {reason}")]
    Malformed {
        lexeme: String,

        /// Why classification rejected the token.
        reason: &'static str,

        /// 1‑based line where the token was scanned.
        line: usize,

        /// 0‑based position in the token sequence.
        position: usize,
    },

    /// An operator, assignment or `print` found too few entries on the stack.
    #[error("[line {line}] Error at '{lexeme}': stack underflow")]
    StackUnderflow {
        lexeme: String,
        line: usize,
        position: usize,
    },

    /// A variable was read before anything was assigned to it.
    #[error("[line {line}] Error: undefined variable '{name}'")]
    LookupMiss {
        name: String,
        line: usize,
        position: usize,
    },

    #[error("[line {line}] Error: division by zero")]
    DivisionByZero { line: usize, position: usize },

    /// Result of an operator does not fit in an `i64`.
    #[error("[line {line}] Error at '{lexeme}': arithmetic overflow")]
    ArithmeticOverflow {
        lexeme: String,
        line: usize,
        position: usize,
    },

    /// `rehash` was asked for fewer slots than there are live entries.
    #[error("cannot rehash {size} entries into {requested} slots")]
    RehashCapacityTooSmall { requested: usize, size: usize },

    /// Source bytes that are not valid UTF‑8.
    #[error("[line {line}] Error: token is not valid UTF-8")]
    Encoding { line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on sink writes.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ComputeError {
    /// Helper constructor for token classification.
    pub fn malformed<S: Into<String>>(
        lexeme: S,
        reason: &'static str,
        line: usize,
        position: usize,
    ) -> Self {
        let lexeme: String = lexeme.into();

        info!(
            "Creating Malformed error: line={}, lexeme={}, reason={}",
            line, lexeme, reason
        );

        ComputeError::Malformed {
            lexeme,
            reason,
            line,
            position,
        }
    }

    /// Helper constructor for operand resolution.
    pub fn lookup_miss<S: Into<String>>(name: S, line: usize, position: usize) -> Self {
        let name: String = name.into();

        info!("Creating LookupMiss error: line={}, name={}", line, name);

        ComputeError::LookupMiss {
            name,
            line,
            position,
        }
    }

    /// Sequence position of the token that failed, when a token is involved.
    /// A driver that reports and skips resumes right after it.
    pub fn position(&self) -> Option<usize> {
        match self {
            ComputeError::Malformed { position, .. }
            | ComputeError::StackUnderflow { position, .. }
            | ComputeError::LookupMiss { position, .. }
            | ComputeError::DivisionByZero { position, .. }
            | ComputeError::ArithmeticOverflow { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// True for errors caused by the input text rather than by evaluating it.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ComputeError::Malformed { .. } | ComputeError::Encoding { .. }
        )
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, ComputeError>;
