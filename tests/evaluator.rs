#[cfg(test)]
mod evaluator_tests {
    use postfix_computer as rpn;

    use rpn::error::ComputeError;
    use rpn::evaluator::*;
    use rpn::operand::Operand;
    use rpn::scanner::tokenize;
    use rpn::sink::WriterSink;

    /// Run a whole program, returning the evaluator and the outcome.
    fn run(source: &str) -> (Evaluator<Vec<i64>>, Result<(), ComputeError>) {
        let tokens = tokenize(source.as_bytes()).expect("source should scan");
        let mut evaluator = Evaluator::new(Vec::new());
        let outcome = evaluator.run(&tokens);
        (evaluator, outcome)
    }

    fn output(source: &str) -> Vec<i64> {
        let (evaluator, outcome) = run(source);
        outcome.unwrap_or_else(|e| panic!("'{}' failed: {}", source, e));
        evaluator.into_sink()
    }

    #[test]
    fn test_addition_leaves_result_on_stack() {
        let (evaluator, outcome) = run("3 4 +");

        assert!(outcome.is_ok());
        assert_eq!(evaluator.stack().to_vec(), vec![Operand::Resolved(7)]);
        assert!(evaluator.symbols().is_empty());
    }

    #[test]
    fn test_assignment_binds_variable() {
        let (evaluator, outcome) = run("x 5 =");

        assert!(outcome.is_ok());
        assert_eq!(evaluator.symbols().get("x"), Some(&5));
        assert!(evaluator.stack().is_empty());
    }

    #[test]
    fn test_print_resolves_variable() {
        assert_eq!(output("x 5 = x print"), vec![5]);
    }

    #[test]
    fn test_division_by_zero_halts() {
        let (evaluator, outcome) = run("7 0 /");

        match outcome {
            Err(ComputeError::DivisionByZero { line, position }) => {
                assert_eq!((line, position), (1, 2));
            }
            other => panic!("Expected DivisionByZero, got {:?}", other),
        }

        assert!(evaluator.stack().is_empty(), "No result may be pushed");
    }

    #[test]
    fn test_unassigned_variable_is_lookup_miss() {
        let (evaluator, outcome) = run("y print");

        match outcome {
            Err(ComputeError::LookupMiss { name, position, .. }) => {
                assert_eq!(name, "y");
                assert_eq!(position, 1);
            }
            other => panic!("Expected LookupMiss, got {:?}", other),
        }

        assert!(evaluator.sink().is_empty(), "Nothing may be printed");
    }

    #[test]
    fn test_operand_order_and_truncation() {
        assert_eq!(output("10 3 - print"), vec![7]);
        assert_eq!(output("7 2 / print"), vec![3]);
        assert_eq!(output("0 7 - 2 / print"), vec![-3]);
        assert_eq!(output("6 7 * print"), vec![42]);
        assert_eq!(output("2 3 4 * + print"), vec![14]);
    }

    #[test]
    fn test_variables_in_expressions() {
        let program = "a 6 = b 7 = r a b * = r print a b - print";

        assert_eq!(output(program), vec![42, -1]);
    }

    #[test]
    fn test_reassignment_overwrites() {
        let (evaluator, outcome) = run("x 1 = x 2 = x x 3 + =");

        assert!(outcome.is_ok());
        assert_eq!(evaluator.symbols().get("x"), Some(&5));
        assert_eq!(evaluator.symbols().len(), 1);
    }

    #[test]
    fn test_integer_destination_binds_its_text() {
        let (evaluator, outcome) = run("5 3 =");

        assert!(outcome.is_ok());
        assert_eq!(evaluator.symbols().get("5"), Some(&3));
    }

    #[test]
    fn test_compound_assignment() {
        assert_eq!(
            output("n 10 = n 5 += n 2 *= n 4 -= n 3 /= n print"),
            vec![8]
        );

        let (_, outcome) = run("m 1 +=");
        assert!(matches!(outcome, Err(ComputeError::LookupMiss { ref name, .. }) if name == "m"));

        let (_, outcome) = run("n 1 = n 0 /=");
        assert!(matches!(outcome, Err(ComputeError::DivisionByZero { .. })));
    }

    #[test]
    fn test_underflow_leaves_stack_untouched() {
        let (evaluator, outcome) = run("4 +");

        match outcome {
            Err(ComputeError::StackUnderflow { lexeme, position, .. }) => {
                assert_eq!(lexeme, "+");
                assert_eq!(position, 1);
            }
            other => panic!("Expected StackUnderflow, got {:?}", other),
        }
        assert_eq!(evaluator.stack().to_vec(), vec![Operand::Resolved(4)]);

        let (_, outcome) = run("print");
        assert!(matches!(outcome, Err(ComputeError::StackUnderflow { .. })));

        let (_, outcome) = run("x =");
        assert!(matches!(outcome, Err(ComputeError::StackUnderflow { .. })));
    }

    #[test]
    fn test_overflow_is_reported() {
        let (_, outcome) = run("9223372036854775807 1 +");
        assert!(matches!(outcome, Err(ComputeError::ArithmeticOverflow { .. })));

        let (_, outcome) = run("0 9223372036854775807 - 1 - 0 1 - /");
        assert!(matches!(outcome, Err(ComputeError::ArithmeticOverflow { .. })));
    }

    #[test]
    fn test_malformed_token_stops_evaluation() {
        let (evaluator, outcome) = run("1 2 # +");

        match outcome {
            Err(e @ ComputeError::Malformed { .. }) => {
                assert_eq!(e.position(), Some(2));
                assert!(e.is_input_error());
            }
            other => panic!("Expected Malformed, got {:?}", other),
        }
        assert_eq!(evaluator.stack().len(), 2);
    }

    #[test]
    fn test_process_in_batches() {
        let tokens = tokenize(b"x 5 = x print 1 2 + print").unwrap();
        let mut evaluator = Evaluator::new(Vec::new());

        let rest = evaluator.process(&tokens, 3).unwrap().expect("tokens remain");
        assert_eq!(rest.len(), 6);
        assert_eq!(rest[0].lexeme, "x");
        assert_eq!(evaluator.symbols().get("x"), Some(&5));
        assert!(evaluator.sink().is_empty());

        let rest = evaluator.process(rest, 2).unwrap().expect("tokens remain");
        assert_eq!(evaluator.sink(), &vec![5]);

        let done = evaluator.process(rest, 100).unwrap();
        assert!(done.is_none(), "Sequence should be exhausted");
        assert_eq!(evaluator.sink(), &vec![5, 3]);
    }

    #[test]
    fn test_process_edge_counts() {
        let tokens = tokenize(b"1 2").unwrap();
        let mut evaluator = Evaluator::new(Vec::new());

        let rest = evaluator.process(&tokens, 0).unwrap();
        assert_eq!(rest.map(|r| r.len()), Some(2));

        assert!(evaluator.process(&tokens, 2).unwrap().is_none());
        assert!(evaluator.process(&[], 5).unwrap().is_none());
    }

    #[test]
    fn test_resume_after_failure() {
        let tokens = tokenize(b"y print 2 3 * print").unwrap();
        let mut evaluator = Evaluator::new(Vec::new());

        let err = evaluator.process(&tokens, 10).unwrap_err();
        let position = err.position().expect("token error has a position");

        let rest = &tokens[position + 1..];
        assert!(evaluator.process(rest, 10).unwrap().is_none());
        assert_eq!(evaluator.sink(), &vec![6]);
    }

    #[test]
    fn test_writer_sink_output() {
        let tokens = tokenize(b"12 print 0 5 - print").unwrap();
        let mut evaluator = Evaluator::new(WriterSink::new(Vec::<u8>::new()));

        evaluator.run(&tokens).unwrap();

        let written = String::from_utf8(evaluator.into_sink().into_inner()).unwrap();
        assert_eq!(written, "12\n-5\n");
    }

    #[test]
    fn test_dispatch_on_explicit_context() {
        let tokens = tokenize(b"a 2 = a 3").unwrap();
        let mut ctx = Context::with_capacity(2);
        let mut printed: Vec<i64> = Vec::new();

        for token in &tokens {
            dispatch(&mut ctx, &mut printed, token).unwrap();
        }

        assert_eq!(ctx.stack.to_string(), "a 3");
        assert!(ctx.symbols.capacity() >= 2);
        assert_eq!(ctx.symbols.get("a"), Some(&2));
    }

    #[test]
    fn test_snapshot_serializes() {
        let (evaluator, outcome) = run("x 5 = y 1 2 +");
        assert!(outcome.is_ok());

        let snapshot = evaluator.context().snapshot();
        assert_eq!(
            snapshot,
            Snapshot {
                stack: vec![Operand::name("y"), Operand::Resolved(3)],
                symbols: vec![Binding {
                    name: "x".to_owned(),
                    value: 5,
                }],
                capacity: 5,
            }
        );

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["stack"], serde_json::json!(["y", 3]));
        assert_eq!(json["symbols"][0]["name"], "x");
        assert_eq!(json["symbols"][0]["value"], 5);
    }
}
