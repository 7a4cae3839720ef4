use crate::*;
use pretty_assertions::assert_eq;

fn trace(source: &str) -> TraceSession {
    let mut session = TraceSession::new();
    session.run(source).unwrap();
    session
}

#[test]
fn test_set_then_print_variable() {
    let session = trace("SET x TO 10\nPRINT x");
    let frames = session.frames();

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].line, Some(1));
    assert_eq!(
        frames[0].action,
        Action::Set {
            var_name: "x".into(),
            value_type: "number".into(),
            value: FrameValue::Value(Value::Number(10.0)),
        }
    );
    assert_eq!(frames[0].description, "Set x to 10");

    assert_eq!(frames[1].line, Some(2));
    assert_eq!(
        frames[1].action,
        Action::Print {
            is_literal: false,
            var_name: Some("x".into()),
            literal: Value::Number(10.0),
        }
    );
    assert_eq!(frames[1].description, "Print x: 10");
}

#[test]
fn test_straight_line_program_has_one_frame_per_statement() {
    let session = trace("set a to 1\nset b to \"two\"\nset c to true\nprint a\nprint \"done\"");
    assert_eq!(session.operations(), vec!["set", "set", "set", "print", "print"]);

    let lines: Vec<Option<usize>> = session.frames().iter().map(|f| f.line).collect();
    assert_eq!(lines, vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);
}

#[test]
fn test_print_literal_and_arithmetic() {
    let session = trace("print \"hi\"\nprint 2 + 3");
    assert_eq!(
        session.frames()[0].action,
        Action::Print {
            is_literal: true,
            var_name: None,
            literal: Value::from("hi"),
        }
    );
    assert_eq!(session.frames()[1].description, "Print 5");
}

#[test]
fn test_declaration_without_value() {
    let session = trace("set total as number\nset total to 5");
    assert_eq!(
        session.frames()[0].action,
        Action::Set {
            var_name: "total".into(),
            value_type: "number".into(),
            value: FrameValue::Value(Value::Undefined),
        }
    );
    assert_eq!(session.frames()[0].description, "Declare total as number");
    assert_eq!(session.descriptions()[1], "Set total to 5");
}

#[test]
fn test_declared_type_is_enforced_on_later_sets() {
    let session = TraceSession::new();
    let error = session
        .assert_error_contains(
            "set total as number\nset total to \"five\"",
            &["'total'", "number", "\"five\"", "line 2"],
        )
        .unwrap();
    assert!(matches!(
        error,
        CompileError::Interpret(InterpretError::DeclaredTypeMismatch { .. })
    ));
}

#[test]
fn test_print_rejects_inline_reads() {
    let session = TraceSession::new();
    let error = session
        .assert_error_contains(
            "set s to \"abc\"\nprint length of s",
            &["length of s", "line 2"],
        )
        .unwrap();
    assert!(matches!(
        error,
        CompileError::Interpret(InterpretError::UnsupportedPrintOperand { line: 2, .. })
    ));
}

#[test]
fn test_print_rejects_undefined() {
    TraceSession::new()
        .assert_error_contains(
            "set x as number\nprint x",
            &["Cannot print an undefined value on line 2"],
        )
        .unwrap();
}

#[test]
fn test_undeclared_variable_is_named() {
    let error = TraceSession::new()
        .assert_error_contains("set x to y + 1", &["Variable 'y' is not declared"])
        .unwrap();
    assert!(matches!(
        error,
        CompileError::Interpret(InterpretError::Eval(EvalError::UndeclaredVariable { .. }))
    ));
}

#[test]
fn test_runtime_errors_carry_the_statement_line() {
    let session = TraceSession::new();
    let error = session
        .assert_error_contains(
            "set x to 1\n\n\nset z to y + 1",
            &["Variable 'y' is not declared (line 4)"],
        )
        .unwrap();
    assert_eq!(
        error,
        CompileError::Interpret(InterpretError::Eval(EvalError::UndeclaredVariable {
            name: "y".into(),
            line: 4,
        }))
    );

    session
        .assert_error_contains(
            "set s to \"abc\"\nif x > 1\n  print s\nend if",
            &["Variable 'x' is not declared (line 2)"],
        )
        .unwrap();
    session
        .assert_error_contains(
            "set x to true\nset y to 0\nset y to x - 1",
            &["Operator '-' cannot be applied to true and 1 (line 3)"],
        )
        .unwrap();
}

#[test]
fn test_errors_inside_a_function_point_at_the_body() {
    TraceSession::new()
        .assert_error_contains(
            "function f with a\n  set b to a / 0\nend function\ncall f with 4",
            &["Division by zero: 4 / 0 (line 2)"],
        )
        .unwrap();
}

#[test]
fn test_arithmetic_follows_source_order() {
    let mut session = TraceSession::new();
    session
        .assert_printed(
            "set r to 2 + 3 * 4\nset g to 2 + (3 * 4)\nprint r\nprint g",
            &["20", "14"],
        )
        .unwrap();
}

#[test]
fn test_numeric_strings_coerce_on_read() {
    let mut session = TraceSession::new();
    session
        .assert_printed(
            "set s to string \"42\"\nset n to s + 1\nset t to \"a\" + 1\nprint n\nprint t",
            &["43", "a1"],
        )
        .unwrap();
    assert_eq!(session.descriptions()[0], "Set s to \"42\"");
}

#[test]
fn test_division_by_zero_is_reported() {
    TraceSession::new()
        .assert_error_contains("set x to 10\nset y to x / 0", &["Division by zero", "10 / 0"])
        .unwrap();
}

#[test]
fn test_traces_are_deterministic_without_timestamps() {
    let source = "set x to 0\nwhile x < 3\nset x to x + 1\nend while\nprint x";
    let first = trace(source).to_json().unwrap();
    let second = trace(source).to_json().unwrap();

    assert_eq!(first, second);
    assert!(trace(source).frames().iter().all(|f| f.timestamp == 0));
}

#[test]
fn test_frame_limit_stops_runaway_loops() {
    let mut session = TraceSession::with_options(TraceOptions::deterministic().with_max_frames(5));
    let error = session
        .run("set x to 0\nwhile x < 1\nset y to 1\nend while")
        .unwrap_err();

    assert!(matches!(
        error,
        TestHarnessError::Compile {
            source: CompileError::Interpret(InterpretError::FrameLimitExceeded { limit: 5 })
        }
    ));
}
