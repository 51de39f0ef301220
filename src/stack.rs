//! LIFO operand stack.
//!
//! Values live in one contiguous `Vec`; the end of the vector is the top of
//! the stack, so `push`, `pop` and `peek` are O(1).  Iteration runs from the
//! top down, while the `Display` rendering runs bottom‑up with the top on the
//! right, matching how a postfix program reads.

use log::debug;
use std::fmt;
use std::iter::Rev;
use std::slice;

use crate::operand::Operand;

/// The stack the evaluator works on.
pub type OperandStack = Stack<Operand>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Stack::new()
    }
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    /// Place `value` above the current top.
    pub fn push(&mut self, value: T) {
        self.items.push(value);
        debug!("Pushed; stack size is now {}", self.items.len());
    }

    /// Remove and return the top value, `None` when the stack is empty.
    pub fn pop(&mut self) -> Option<T> {
        let popped: Option<T> = self.items.pop();

        if popped.is_none() {
            debug!("Pop on empty stack");
        }

        popped
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Top‑to‑bottom traversal.  Every call starts a fresh iterator.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.items.iter().rev(),
        }
    }

    /// Values bottom‑to‑top, the order they were pushed in.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone> Stack<T> {
    /// Values top‑first.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

/// Iterator over a [`Stack`] from the top to the bottom.
pub struct Iter<'s, T> {
    inner: Rev<slice::Iter<'s, T>>,
}

impl<'s, T> Iterator for Iter<'s, T> {
    type Item = &'s T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'s, T> ExactSizeIterator for Iter<'s, T> {}

impl<'s, T> IntoIterator for &'s Stack<T> {
    type Item = &'s T;
    type IntoIter = Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    /// Pushes in iteration order, so the last item ends up on top.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Stack {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Stack<T> {
    /// Bottom to top, space separated, top rightmost.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }

            write!(f, "{}", item)?;
        }

        Ok(())
    }
}
