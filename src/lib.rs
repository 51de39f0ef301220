pub mod error;
pub mod evaluator;
pub mod operand;
pub mod scanner;
pub mod sink;
pub mod stack;
pub mod symbol_table;
pub mod token;
