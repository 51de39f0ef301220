use serde::Serialize;

/// A stack entry: either a computed integer or a variable name whose
/// lookup is deferred until an operator, assignment or `print` needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    Resolved(i64),
    Unresolved(String),
}

impl Operand {
    pub fn name<S: Into<String>>(name: S) -> Self {
        Operand::Unresolved(name.into())
    }

    /// Literal text of the operand, as used for assignment destinations.
    pub fn text(&self) -> String {
        match self {
            Operand::Resolved(n) => itoa::Buffer::new().format(*n).to_owned(),
            Operand::Unresolved(name) => name.clone(),
        }
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Resolved(n)
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Resolved(n) => write!(f, "{}", n),

            Operand::Unresolved(name) => write!(f, "{}", name),
        }
    }
}
