use crate::*;
use pretty_assertions::assert_eq;

fn numbers(values: &[f64]) -> Value {
    Value::Array(values.iter().copied().map(Value::Number).collect())
}

/// Run `source` and return the final value of `name` along with the frames
fn final_value(source: &str, name: &str) -> (Value, Vec<ActionFrame>) {
    let program = compile_to_ir(source).unwrap();
    let mut interpreter = TraceInterpreter::new(TraceOptions::deterministic());
    interpreter.execute(&program).unwrap();

    let value = interpreter.environment().get(name).cloned().unwrap();
    (value, interpreter.frames().to_vec())
}

#[test]
fn test_create_array_frame() {
    let (value, frames) = final_value("create number array as nums with [1, 2]", "nums");

    assert_eq!(value, numbers(&[1.0, 2.0]));
    assert_eq!(
        frames[0].action,
        Action::Create {
            var_name: "nums".into(),
            element_type: Some("number".into()),
            value: numbers(&[1.0, 2.0]),
        }
    );
    assert_eq!(frames[0].description, "Create number array nums with [1, 2]");
}

#[test]
fn test_create_empty_array() {
    let (value, frames) = final_value("create array as items", "items");
    assert_eq!(value, Value::Array(vec![]));
    assert_eq!(frames[0].description, "Create empty array items");
}

#[test]
fn test_insert_at_position() {
    let (value, frames) = final_value(
        "CREATE array as a WITH [1, 2, 3]\nINSERT 9 TO a AT position 1",
        "a",
    );

    assert_eq!(value, numbers(&[1.0, 9.0, 2.0, 3.0]));
    assert_eq!(
        frames[1].action,
        Action::Add {
            var_name: "a".into(),
            value: Value::Number(9.0),
            position: 1,
        }
    );
    assert_eq!(frames[1].description, "Insert 9 into a at position 1");
}

#[test]
fn test_insert_without_position_appends() {
    let (value, frames) = final_value(
        "create array as a with [1]\nadd 2 to a\ninsert 3 to a at position 2",
        "a",
    );
    assert_eq!(value, numbers(&[1.0, 2.0, 3.0]));
    assert_eq!(frames.len(), 3);
}

#[test]
fn test_insert_then_remove_restores_contents() {
    let (value, frames) = final_value(
        "\
create array as a with [1, 2, 3]
insert 9 to a at position 1
remove from a at position 1",
        "a",
    );

    assert_eq!(value, numbers(&[1.0, 2.0, 3.0]));
    let operations: Vec<&str> = frames.iter().map(ActionFrame::operation).collect();
    assert_eq!(operations, vec!["create", "add", "remove"]);
    assert_eq!(
        frames[2].action,
        Action::Remove {
            var_name: "a".into(),
            position: 1,
            value: Value::Number(9.0),
        }
    );
}

#[test]
fn test_swap_positions() {
    let (value, frames) = final_value(
        "create array as a with [1, 2, 3]\nswap a at position 0 with position 2",
        "a",
    );
    assert_eq!(value, numbers(&[3.0, 2.0, 1.0]));
    assert_eq!(frames[1].description, "Swap positions 0 and 2 in a");
}

#[test]
fn test_set_element() {
    let (value, frames) = final_value("create array as a with [1, 2]\nset a[1] to 7", "a");
    assert_eq!(value, numbers(&[1.0, 7.0]));
    assert_eq!(
        frames[1].action,
        Action::SetArray {
            var_name: "a".into(),
            index: 1,
            value: Value::Number(7.0),
        }
    );
    assert_eq!(frames[1].description, "Set a[1] to 7");
}

#[test]
fn test_positions_are_bounds_checked() {
    let session = TraceSession::new();
    session
        .assert_error_contains(
            "create array as a with [1]\nremove from a at position 1",
            &["Cannot remove at position 1 of array 'a' with length 1 (line 2)"],
        )
        .unwrap();
    session
        .assert_error_contains(
            "create array as a with [1, 2]\nset a[2] to 5",
            &["position 2", "length 2"],
        )
        .unwrap();
    session
        .assert_error_contains(
            "create array as a with [1, 2]\ninsert 5 to a at position 3",
            &["Cannot insert at position 3"],
        )
        .unwrap();
    session
        .assert_error_contains(
            "create array as a with [1, 2]\nswap a at position 0 with position 1.5",
            &["1.5", "not a whole number"],
        )
        .unwrap();
}

#[test]
fn test_array_must_exist() {
    let session = TraceSession::new();
    session
        .assert_error_contains(
            "insert 1 to missing",
            &["Array 'missing' is not initialized (line 1)"],
        )
        .unwrap();
    session
        .assert_error_contains(
            "set a to 5\nremove from a at position 0",
            &["'a' holds a number, not an array"],
        )
        .unwrap();
}

#[test]
fn test_element_type_is_enforced() {
    let error = TraceSession::new()
        .assert_error_contains(
            "create number array as nums with [1, 2]\ninsert \"x\" to nums",
            &["Array 'nums' holds number values", "\"x\""],
        )
        .unwrap();
    assert!(matches!(
        error,
        CompileError::Interpret(InterpretError::ElementTypeMismatch { line: 2, .. })
    ));
}

#[test]
fn test_reading_one_past_the_end_is_undefined() {
    let session = {
        let mut session = TraceSession::new();
        session.run("create array as a with [1]\nset x to a[1]").unwrap();
        session
    };

    assert_eq!(
        session.frames()[1].action,
        Action::Set {
            var_name: "x".into(),
            value_type: "undefined".into(),
            value: FrameValue::Descriptor(Descriptor::Get {
                target: "a".into(),
                index: Value::Number(1.0),
                result: Value::Undefined,
            }),
        }
    );

    TraceSession::new()
        .assert_error_contains(
            "create array as a with [1]\nset x to a[2]",
            &["Index 2 is out of bounds for array 'a' of length 1 (line 2)"],
        )
        .unwrap();
}

#[test]
fn test_read_errors_name_the_array_and_line() {
    let session = TraceSession::new();
    session
        .assert_error_contains(
            "create array as a with [1]\n\nset v to a[4]",
            &["Index 4 is out of bounds for array 'a' of length 1 (line 3)"],
        )
        .unwrap();
    session
        .assert_error_contains(
            "create array as a with [1, 2]\nset v to a[0.5]",
            &["Index 0.5 into array 'a' is not a whole number (line 2)"],
        )
        .unwrap();
    session
        .assert_error_contains(
            "set n to 3\nset v to n[0]",
            &["Cannot index into 'n', a number", "(line 2)"],
        )
        .unwrap();
}

#[test]
fn test_bubble_sort() {
    let source = r#"
CREATE number ARRAY AS nums WITH [5, 3, 8, 1]
SET n TO length of nums
LOOP i FROM 0 TO n - 2
    LOOP j FROM 0 TO n - i - 2
        IF nums[j] > nums[j + 1] THEN
            SWAP nums AT position j WITH position j + 1
        END IF
    END LOOP
END LOOP
FOR EACH value IN nums
    DISPLAY value
END FOR
"#;
    let mut session = TraceSession::new();
    session.assert_printed(source, &["1", "3", "5", "8"]).unwrap();

    let swaps = session
        .operations()
        .into_iter()
        .filter(|op| *op == "swap")
        .count();
    assert_eq!(swaps, 4);
}
