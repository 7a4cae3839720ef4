use crate::*;
use pretty_assertions::assert_eq;
use spl_ir::ComparisonOp;

fn trace(source: &str) -> TraceSession {
    let mut session = TraceSession::new();
    session.run(source).unwrap();
    session
}

#[test]
fn test_if_otherwise_takes_one_branch() {
    let session = trace(
        "SET x TO number 5\nIF x > 10 THEN\n  PRINT \"big\"\nOTHERWISE\n  PRINT \"small\"\nEND IF",
    );

    assert_eq!(session.operations(), vec!["set", "if", "print", "endif"]);
    assert_eq!(
        session.frames()[1].action,
        Action::If {
            condition: "x > 10".into(),
            result: false,
        }
    );
    assert_eq!(session.printed(), vec![&Value::from("small")]);

    let endif = &session.frames()[3];
    assert_eq!(endif.line, None);
    assert_eq!(endif.description, "End of if statement");
}

#[test]
fn test_otherwise_if_chain_closes_once() {
    let session = trace(
        "\
set n to 0
if n > 0
  print \"positive\"
otherwise if n < 0
  print \"negative\"
otherwise
  print \"zero\"
end if",
    );

    assert_eq!(session.operations(), vec!["set", "if", "if", "print", "endif"]);
    assert_eq!(
        session.descriptions()[1..3].to_vec(),
        vec!["Check if n > 0: false", "Check if n < 0: false"]
    );
    assert_eq!(session.printed(), vec![&Value::from("zero")]);
}

#[test]
fn test_if_without_otherwise_skips_body() {
    let session = trace("set ready to false\nif ready\n  print 1\nend if");
    assert_eq!(session.operations(), vec!["set", "if", "endif"]);
    assert_eq!(session.descriptions()[1], "Check if ready: false");
}

#[test]
fn test_nested_if_in_loop_closes_each_time() {
    let session = trace(
        "\
set i to 0
while i < 2
  if i == 1
    print i
  end if
  set i to i + 1
end while",
    );

    assert_eq!(
        session.operations(),
        vec![
            "set", "while", "if", "if", "endif", "set", "if", "if", "print", "endif", "set", "if",
            "loop_end"
        ]
    );
}

#[test]
fn test_while_checks_before_every_iteration() {
    let session = trace("set count to 0\nwhile count < 2 do\n  set count to count + 1\nend while");

    assert_eq!(
        session.operations(),
        vec!["set", "while", "if", "set", "if", "set", "if", "loop_end"]
    );
    assert_eq!(session.descriptions()[1], "Start while loop: count < 2");
    assert_eq!(
        session.frames()[6].action,
        Action::If {
            condition: "count < 2".into(),
            result: false,
        }
    );
    assert_eq!(session.frames()[7].line, None);
}

#[test]
fn test_loop_until_runs_as_negated_while() {
    let until = trace("set x to 0\nloop until x >= 2\n  set x to x + 1\nend loop");
    let negated = trace("set x to 0\nwhile x < 2\n  set x to x + 1\nend while");

    assert_eq!(until.frames(), negated.frames());
    assert_eq!(until.descriptions()[1], "Start while loop: x < 2");
}

#[test]
fn test_loop_until_negates_compound_conditions() {
    let session = trace(
        "set a to 0\nset b to 0\nloop until a > 1 or b > 1\n  set a to a + 1\nend loop",
    );
    assert_eq!(
        session.descriptions()[2],
        "Start while loop: a <= 1 and b <= 1"
    );
}

#[test]
fn test_comparison_negation_is_an_involution() {
    for op in ComparisonOp::ALL {
        assert_eq!(op.negate().negate(), op);
        assert_ne!(op.negate(), op);
    }
}

#[test]
fn test_counted_loop_frames() {
    let session = trace("LOOP i FROM 0 TO 2\n  PRINT i\nEND LOOP");

    assert_eq!(
        session.operations(),
        vec![
            "set",
            "loop_from_to",
            "if",
            "print",
            "set",
            "if",
            "print",
            "set",
            "if",
            "print",
            "set",
            "if",
            "loop_end",
        ]
    );
    assert_eq!(
        session.frames()[1].action,
        Action::LoopFromTo {
            var_name: "i".into(),
            start: Value::Number(0.0),
            end: Value::Number(2.0),
        }
    );
    assert_eq!(session.descriptions()[1], "Loop i from 0 to 2");
    assert_eq!(session.descriptions()[10], "Set i to 3");
    assert_eq!(session.descriptions()[11], "Check if i <= 2: false");

    let printed: Vec<String> = session.printed().iter().map(|v| v.to_string()).collect();
    assert_eq!(printed, vec!["0", "1", "2"]);
}

#[test]
fn test_counted_loop_with_empty_body() {
    let session = trace("loop i from 0 to 2\nend loop");
    assert_eq!(
        session.operations(),
        vec![
            "set",
            "loop_from_to",
            "if",
            "set",
            "if",
            "set",
            "if",
            "set",
            "if",
            "loop_end",
        ]
    );
}

#[test]
fn test_counted_loop_with_empty_range() {
    let session = trace("loop i from 3 up to 1\n  print i\nend loop");
    assert_eq!(
        session.operations(),
        vec!["set", "loop_from_to", "if", "loop_end"]
    );
}

#[test]
fn test_counted_loop_bounds_must_be_numbers() {
    TraceSession::new()
        .assert_error_contains(
            "loop i from \"a\" to 3\n  print i\nend loop",
            &["start", "\"a\"", "'i'"],
        )
        .unwrap();
}

#[test]
fn test_for_each_reads_elements_by_index() {
    let session = trace("create array as nums with [4, 5]\nfor each n in nums\n  print n\nend for");

    assert_eq!(
        session.operations(),
        vec![
            "create", "for", "if", "set", "print", "if", "set", "print", "if", "loop_end"
        ]
    );
    assert_eq!(
        session.frames()[1].action,
        Action::For {
            var_name: "n".into(),
            array_name: "nums".into(),
        }
    );
    assert_eq!(session.descriptions()[2], "Check if 0 < 2: true");
    assert_eq!(
        session.frames()[3].action,
        Action::Set {
            var_name: "n".into(),
            value_type: "number".into(),
            value: FrameValue::Descriptor(Descriptor::Get {
                target: "nums".into(),
                index: Value::Number(0.0),
                result: Value::Number(4.0),
            }),
        }
    );
    assert_eq!(session.descriptions()[8], "Check if 2 < 2: false");
}

#[test]
fn test_for_each_needs_an_array() {
    TraceSession::new()
        .assert_error_contains(
            "for each n in nums\n  print n\nend for",
            &["Array 'nums' is not initialized"],
        )
        .unwrap();
}
