#[cfg(test)]
mod stack_tests {
    use postfix_computer as rpn;

    use rpn::operand::Operand;
    use rpn::stack::*;

    #[test]
    fn test_pops_reverse_pushes() {
        let mut stack: Stack<i64> = Stack::new();

        for v in 1..=50 {
            stack.push(v);
        }

        let popped: Vec<i64> = std::iter::from_fn(|| stack.pop()).collect();
        let expected: Vec<i64> = (1..=50).rev().collect();

        assert_eq!(popped, expected);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_push_peek_pop_sizes() {
        let mut s1: Stack<&str> = Stack::new();
        s1.push("a");
        s1.push("b");

        let mut s2: Stack<i64> = Stack::new();
        s2.push(1);
        s2.push(2);
        s2.push(3);

        assert_eq!(s1.to_string(), "a b");
        assert_eq!(s1.to_vec(), vec!["b", "a"]);

        assert_eq!(s1.peek(), Some(&"b"));
        assert_eq!(s2.peek(), Some(&3));
        assert_eq!((s1.len(), s2.len()), (2, 3));

        assert_eq!(s1.pop(), Some("b"));
        assert_eq!(s2.pop(), Some(3));
        assert_eq!((s1.len(), s2.len()), (1, 2));

        assert_eq!(s1.to_string(), "a");
        assert_eq!(s1.pop(), Some("a"));
        assert_eq!(s2.pop(), Some(2));

        assert_eq!(s1.to_string(), "");
        assert_eq!(s1.peek(), None);
        assert_eq!(s1.pop(), None, "Empty pop must signal absence");
        assert_eq!(s1.len(), 0, "Empty pop must not change the size");
        assert_eq!(s2.pop(), Some(1));
        assert!(s2.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut stack: Stack<i64> = [10, 20, 30].into_iter().collect();

        assert!(!stack.is_empty());
        stack.clear();

        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
        assert!(stack.to_vec().is_empty());
        assert_eq!(stack.peek(), None);
    }

    #[test]
    fn test_iteration_is_top_down_and_restartable() {
        let mut stack: Stack<i64> = Stack::new();
        stack.push(3);
        stack.push(2);
        stack.push(1);

        let first: Vec<i64> = stack.iter().copied().collect();
        let second: Vec<i64> = (&stack).into_iter().copied().collect();

        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(second, first);
        assert_eq!(stack.iter().len(), 3);
        assert_eq!(stack.len(), 3, "Iteration must not consume the stack");
    }

    #[test]
    fn test_operand_rendering() {
        let mut stack: OperandStack = Stack::new();
        stack.push(Operand::name("x"));
        stack.push(Operand::Resolved(5));
        stack.push(Operand::from(-2));

        assert_eq!(stack.to_string(), "x 5 -2");
        assert_eq!(stack.as_slice()[0], Operand::name("x"));
    }
}
