use crate::*;
use pretty_assertions::assert_eq;

fn first_statement(source: &str) -> StatementKind {
    let program = parse_program(source).unwrap();
    program
        .statements
        .into_iter()
        .next()
        .map(|statement| statement.kind)
        .expect("program has a statement")
}

#[test]
fn test_if_otherwise() {
    let source = "\
IF x > 10 THEN
    PRINT \"big\"
OTHERWISE
    PRINT \"small\"
END IF";
    match first_statement(source) {
        StatementKind::If(if_statement) => {
            assert_eq!(if_statement.consequent.len(), 1);
            match if_statement.alternate {
                Some(Alternate::Otherwise(body)) => {
                    assert_eq!(body.len(), 1);
                    assert_eq!(body[0].line, 4);
                }
                other => panic!("Expected otherwise branch, got {other:?}"),
            }
        }
        other => panic!("Expected if statement, got {other:?}"),
    }
}

#[test]
fn test_otherwise_if_chain_shares_one_end_if() {
    let source = "\
if x > 2
  print 3
otherwise if x > 1
  print 2
else if x > 0
  print 1
else
  print 0
end if
print \"done\"";
    let program = parse_program(source).unwrap();
    assert_eq!(program.statements.len(), 2);

    let StatementKind::If(if_statement) = &program.statements[0].kind else {
        panic!("Expected if statement");
    };
    let Some(Alternate::OtherwiseIf(first)) = &if_statement.alternate else {
        panic!("Expected otherwise-if");
    };
    assert_eq!(first.line, 3);
    let Some(Alternate::OtherwiseIf(second)) = &first.alternate else {
        panic!("Expected second otherwise-if");
    };
    assert_eq!(second.line, 5);
    assert!(matches!(second.alternate, Some(Alternate::Otherwise(_))));
}

#[test]
fn test_if_without_then_or_alternate() {
    match first_statement("if ready\nprint 1\nend if") {
        StatementKind::If(if_statement) => assert!(if_statement.alternate.is_none()),
        other => panic!("Expected if statement, got {other:?}"),
    }
}

#[test]
fn test_while_loop() {
    match first_statement("WHILE count < 3 DO\n SET count TO count + 1\nEND WHILE") {
        StatementKind::WhileLoop(while_loop) => assert_eq!(while_loop.body.len(), 1),
        other => panic!("Expected while loop, got {other:?}"),
    }
}

#[test]
fn test_loop_while_and_until() {
    assert!(matches!(
        first_statement("loop while x < 3\nset x to x + 1\nend loop"),
        StatementKind::WhileLoop(_)
    ));
    assert!(matches!(
        first_statement("LOOP UNTIL x >= 3\nset x to x + 1\nEND LOOP"),
        StatementKind::LoopUntil(_)
    ));
}

#[test]
fn test_loop_from_to() {
    match first_statement("LOOP i FROM 0 UP TO 2\n PRINT i\nEND LOOP") {
        StatementKind::LoopFromTo(counted) => {
            assert_eq!(counted.variable, "i");
            assert_eq!(counted.start, Expression::number(0.0, 1));
            assert_eq!(counted.end, Expression::number(2.0, 1));
            assert_eq!(counted.body.len(), 1);
        }
        other => panic!("Expected counted loop, got {other:?}"),
    }
}

#[test]
fn test_for_loop_in() {
    match first_statement("FOR LOOP item IN items\n PRINT item\nEND LOOP") {
        StatementKind::ForLoop(for_loop) => {
            assert_eq!(for_loop.iterator, "item");
            assert_eq!(for_loop.array, "items");
        }
        other => panic!("Expected for loop, got {other:?}"),
    }
}

#[test]
fn test_for_each() {
    match first_statement("for each n in nums\nprint n\nend for") {
        StatementKind::ForLoop(for_loop) => {
            assert_eq!(for_loop.iterator, "n");
            assert_eq!(for_loop.body.len(), 1);
        }
        other => panic!("Expected for loop, got {other:?}"),
    }
}

#[test]
fn test_nested_blocks() {
    let source = "\
loop i from 1 to 3
  if i > 1
    while false
    end while
  end if
end loop";
    match first_statement(source) {
        StatementKind::LoopFromTo(counted) => match &counted.body[0].kind {
            StatementKind::If(if_statement) => {
                assert!(matches!(
                    if_statement.consequent[0].kind,
                    StatementKind::WhileLoop(_)
                ));
            }
            other => panic!("Expected nested if, got {other:?}"),
        },
        other => panic!("Expected counted loop, got {other:?}"),
    }
}

#[test]
fn test_missing_end_reports_closer() {
    let error = parse_program("if x > 1\nprint x").unwrap_err();
    assert_eq!(
        error.to_string(),
        "Expected 'END IF', found end of input on line 2"
    );
}

#[test]
fn test_mismatched_end() {
    let error = parse_program("while x\nprint x\nend if").unwrap_err();
    assert!(matches!(
        error,
        SyntaxError::Parse(ParseError::UnexpectedToken { line: 3, .. })
    ));
}
