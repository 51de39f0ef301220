//! Token‑dispatch evaluator.
//!
//! Each token is classified by its leading character and applied to an
//! explicit [`Context`] that owns the operand stack and the symbol table:
//!
//! * literals push a resolved integer;
//! * identifiers push themselves unresolved, `print` pops and emits;
//! * `+ - * /` pop *b* then *a* and push `a op b`;
//! * `=` pops a value and then a destination name and stores the pair;
//! * `+= -= *= /=` do the same but combine with the name's current value.
//!
//! Arity is checked before anything is popped, so a token that fails for
//! lack of operands leaves the stack as it was.

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{ComputeError, Result};
use crate::operand::Operand;
use crate::sink::Sink;
use crate::stack::OperandStack;
use crate::symbol_table::{SymbolTable, DEFAULT_CAPACITY};
use crate::token::{BinaryOp, Token, TokenType};

/// Mutable state of one run.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub stack: OperandStack,
    pub symbols: SymbolTable<i64>,
}

/// Serialisable picture of a [`Context`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Bottom to top.
    pub stack: Vec<Operand>,

    /// Physical slot order.
    pub symbols: Vec<Binding>,

    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub name: String,
    pub value: i64,
}

impl Context {
    pub fn with_capacity(capacity: usize) -> Self {
        Context {
            stack: OperandStack::new(),
            symbols: SymbolTable::with_capacity(capacity),
        }
    }

    /// Integer behind an operand; unresolved names are looked up now.
    pub fn resolve(&self, operand: &Operand, token: &Token<'_>) -> Result<i64> {
        match operand {
            Operand::Resolved(n) => Ok(*n),

            Operand::Unresolved(name) => {
                let value: Option<i64> = self.symbols.get(name).copied();
                debug!("Resolving '{}' => {:?}", name, value);

                value.ok_or_else(|| ComputeError::lookup_miss(name, token.line, token.position))
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stack: self.stack.as_slice().to_vec(),
            symbols: self
                .symbols
                .iter()
                .map(|(name, value)| Binding {
                    name: name.to_owned(),
                    value: *value,
                })
                .collect(),
            capacity: self.symbols.capacity(),
        }
    }

    fn require(&self, count: usize, token: &Token<'_>) -> Result<()> {
        if self.stack.len() < count {
            debug!(
                "'{}' needs {} operands, stack holds {}",
                token.lexeme,
                count,
                self.stack.len()
            );

            return Err(underflow(token));
        }

        Ok(())
    }

    fn pop(&mut self, token: &Token<'_>) -> Result<Operand> {
        self.stack.pop().ok_or_else(|| underflow(token))
    }

    fn pop_resolved(&mut self, token: &Token<'_>) -> Result<i64> {
        let operand: Operand = self.pop(token)?;
        self.resolve(&operand, token)
    }

    /// Pop a destination and take its literal text as the variable name.
    ///
    /// A resolved integer is accepted too: `5 3 =` binds the name "5".
    fn pop_destination(&mut self, token: &Token<'_>) -> Result<String> {
        let destination: Operand = self.pop(token)?;

        if let Operand::Resolved(n) = destination {
            warn!(
                "[line {}] assignment destination is the integer {}, binding it as a name",
                token.line, n
            );
        }

        Ok(destination.text())
    }
}

fn underflow(token: &Token<'_>) -> ComputeError {
    ComputeError::StackUnderflow {
        lexeme: token.lexeme.to_owned(),
        line: token.line,
        position: token.position,
    }
}

fn arithmetic(op: BinaryOp, a: i64, b: i64, token: &Token<'_>) -> Result<i64> {
    match op.apply(a, b) {
        Some(value) => {
            debug!("{} {} {} = {}", a, op.symbol(), b, value);
            Ok(value)
        }

        None if op == BinaryOp::Div && b == 0 => Err(ComputeError::DivisionByZero {
            line: token.line,
            position: token.position,
        }),

        None => Err(ComputeError::ArithmeticOverflow {
            lexeme: token.lexeme.to_owned(),
            line: token.line,
            position: token.position,
        }),
    }
}

/// Apply a single token to `ctx`, sending `print` output to `sink`.
pub fn dispatch<S: Sink>(ctx: &mut Context, sink: &mut S, token: &Token<'_>) -> Result<()> {
    let kind: TokenType = token.kind()?;

    match kind {
        TokenType::INTEGER(n) => ctx.stack.push(Operand::Resolved(n)),

        TokenType::IDENTIFIER => ctx.stack.push(Operand::name(token.lexeme)),

        TokenType::PRINT => {
            ctx.require(1, token)?;
            let value: i64 = ctx.pop_resolved(token)?;
            sink.emit(value)?;
        }

        TokenType::EQUAL => {
            ctx.require(2, token)?;
            let value: i64 = ctx.pop_resolved(token)?;
            let name: String = ctx.pop_destination(token)?;

            info!("Assigned value {} to '{}'", value, name);
            ctx.symbols.put(name, value);
        }

        _ => {
            if let Some(op) = kind.operator() {
                ctx.require(2, token)?;
                let b: i64 = ctx.pop_resolved(token)?;
                let a: i64 = ctx.pop_resolved(token)?;

                let result: i64 = arithmetic(op, a, b, token)?;
                ctx.stack.push(Operand::Resolved(result));
            } else if let Some(op) = kind.compound() {
                ctx.require(2, token)?;
                let value: i64 = ctx.pop_resolved(token)?;
                let name: String = ctx.pop_destination(token)?;

                let current: i64 = ctx
                    .symbols
                    .get(&name)
                    .copied()
                    .ok_or_else(|| ComputeError::lookup_miss(&name, token.line, token.position))?;

                let result: i64 = arithmetic(op, current, value, token)?;

                info!("Assigned value {} to '{}'", result, name);
                ctx.symbols.put(name, result);
            }
        }
    }

    Ok(())
}

/// Drives a [`Context`] over a token sequence.
pub struct Evaluator<S: Sink> {
    context: Context,
    sink: S,
}

impl<S: Sink> Evaluator<S> {
    pub fn new(sink: S) -> Self {
        Self::with_capacity(sink, DEFAULT_CAPACITY)
    }

    /// Start with a symbol table of `capacity` slots.
    pub fn with_capacity(sink: S, capacity: usize) -> Self {
        info!("Initializing Evaluator (table capacity {})", capacity);

        Evaluator {
            context: Context::with_capacity(capacity),
            sink,
        }
    }

    pub fn step(&mut self, token: &Token<'_>) -> Result<()> {
        debug!("Dispatching '{}' (line {})", token.lexeme, token.line);

        dispatch(&mut self.context, &mut self.sink, token)
    }

    /// Dispatch at most `max_count` tokens from the front of `input`.
    ///
    /// Returns the unprocessed tail, or `None` once the sequence is exhausted.
    /// On failure nothing after the failing token has been touched; its
    /// position is available from [`ComputeError::position`].
    pub fn process<'t, 'a>(
        &mut self,
        input: &'t [Token<'a>],
        max_count: usize,
    ) -> Result<Option<&'t [Token<'a>]>> {
        let mut rest: &'t [Token<'a>] = input;

        for _ in 0..max_count {
            let Some((token, tail)) = rest.split_first() else {
                break;
            };

            self.step(token)?;
            rest = tail;
        }

        debug!("Batch done, {} tokens remaining", rest.len());

        if rest.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rest))
        }
    }

    /// Dispatch every token.
    pub fn run(&mut self, input: &[Token<'_>]) -> Result<()> {
        for token in input {
            self.step(token)?;
        }

        info!("Evaluation completed successfully");

        Ok(())
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn stack(&self) -> &OperandStack {
        &self.context.stack
    }

    pub fn symbols(&self) -> &SymbolTable<i64> {
        &self.context.symbols
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
