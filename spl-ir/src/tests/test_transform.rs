use crate::transform::{condition, expression};
use crate::*;
use pretty_assertions::assert_eq;
use spl_parser::ast::{BinaryExpression, BinaryOperator, Expression, ExpressionKind};

fn lower(source: &str) -> Program {
    let ast = spl_parser::parse_program(source).unwrap();
    transform(&ast).unwrap()
}

#[test]
fn test_literals_collapse_to_raw_values() {
    let program = lower("set x to 10\nset s to \"hi\"\nset b to true");
    assert_eq!(
        program.statements,
        vec![
            Statement::Set {
                line: 1,
                name: "x".into(),
                declared_type: None,
                value: Some(Expr::number(10.0)),
            },
            Statement::Set {
                line: 2,
                name: "s".into(),
                declared_type: None,
                value: Some(Expr::string("hi")),
            },
            Statement::Set {
                line: 3,
                name: "b".into(),
                declared_type: None,
                value: Some(Expr::Literal(Literal::Boolean(true))),
            },
        ]
    );
}

#[test]
fn test_declared_type_carries_through() {
    let program = lower("set n as number");
    assert_eq!(
        program.statements[0],
        Statement::Set {
            line: 1,
            name: "n".into(),
            declared_type: Some(TypeName::Number),
            value: None,
        }
    );
}

#[test]
fn test_conditions_become_comparisons() {
    let program = lower("if x is greater than 10 then\nprint x\nend if");
    match &program.statements[0] {
        Statement::If {
            condition, chained, ..
        } => {
            assert_eq!(
                *condition,
                Condition::compare(Expr::variable("x"), ComparisonOp::Greater, Expr::number(10.0))
            );
            assert!(!chained);
        }
        other => panic!("Expected if, got {other:?}"),
    }
}

#[test]
fn test_otherwise_if_chain_nests_in_alternate() {
    let program = lower("if a\nprint 1\notherwise if b\nprint 2\notherwise\nprint 3\nend if");
    let Statement::If { alternate, .. } = &program.statements[0] else {
        panic!("Expected if");
    };
    assert_eq!(alternate.len(), 1);
    match &alternate[0] {
        Statement::If {
            line,
            chained,
            alternate,
            ..
        } => {
            assert_eq!(*line, 3);
            assert!(chained);
            assert!(matches!(alternate.as_slice(), [Statement::Print { line: 6, .. }]));
        }
        other => panic!("Expected chained if, got {other:?}"),
    }
}

#[test]
fn test_loop_until_keeps_condition_as_written() {
    let program = lower("loop until x >= 3\nset x to x + 1\nend loop");
    match &program.statements[0] {
        Statement::LoopUntil { condition, .. } => {
            assert_eq!(
                *condition,
                Condition::compare(
                    Expr::variable("x"),
                    ComparisonOp::GreaterEqual,
                    Expr::number(3.0)
                )
            );
        }
        other => panic!("Expected loop until, got {other:?}"),
    }
}

#[test]
fn test_loop_from_to_carries_range() {
    let program = lower("loop i from 1 to n\nprint i\nend loop");
    match &program.statements[0] {
        Statement::LoopFromTo {
            variable,
            start,
            end,
            body,
            ..
        } => {
            assert_eq!(variable, "i");
            assert_eq!(*start, Expr::number(1.0));
            assert_eq!(*end, Expr::variable("n"));
            assert_eq!(body.len(), 1);
        }
        other => panic!("Expected counted loop, got {other:?}"),
    }
}

#[test]
fn test_logical_and_not_structure() {
    let program = lower("while not done and (x < 3 or y < 3)\nend while");
    let Statement::While { condition, .. } = &program.statements[0] else {
        panic!("Expected while");
    };
    match condition {
        Condition::Logical {
            left, op, right, ..
        } => {
            assert_eq!(*op, LogicalOp::And);
            assert!(matches!(**left, Condition::Not(_)));
            assert!(matches!(
                **right,
                Condition::Logical {
                    op: LogicalOp::Or,
                    grouped: true,
                    ..
                }
            ));
        }
        other => panic!("Expected logical condition, got {other:?}"),
    }
}

#[test]
fn test_bare_value_condition_is_truthy() {
    let program = lower("if ready\nend if");
    let Statement::If { condition, .. } = &program.statements[0] else {
        panic!("Expected if");
    };
    assert_eq!(*condition, Condition::Truthy(Expr::variable("ready")));
}

#[test]
fn test_expression_shapes() {
    let program = lower("set v to substring of s from 0 to length of s - 1");
    let Statement::Set {
        value: Some(value), ..
    } = &program.statements[0]
    else {
        panic!("Expected set");
    };
    match value {
        Expr::Substring { target, end, .. } => {
            assert_eq!(**target, Expr::variable("s"));
            assert!(matches!(
                **end,
                Expr::Binary {
                    op: ArithmeticOp::Subtract,
                    ..
                }
            ));
        }
        other => panic!("Expected substring, got {other:?}"),
    }
}

#[test]
fn test_comparison_in_value_position_is_rejected() {
    let comparison = Expression::new(
        ExpressionKind::Binary(BinaryExpression {
            left: Box::new(Expression::number(1.0, 4)),
            operator: BinaryOperator::Less,
            right: Box::new(Expression::number(2.0, 4)),
            grouped: false,
            line: 4,
        }),
        4,
    );
    assert_eq!(
        expression(&comparison),
        Err(TransformError::ConditionInValuePosition {
            line: 4,
            operator: "<".into()
        })
    );
    assert!(condition(&comparison).is_ok());
}

#[test]
fn test_negation_flips_operators_and_applies_de_morgan() {
    for op in ComparisonOp::ALL {
        assert_eq!(op.negate().negate(), op);
    }

    let condition = Condition::Logical {
        left: Box::new(Condition::compare(
            Expr::variable("a"),
            ComparisonOp::Greater,
            Expr::number(1.0),
        )),
        op: LogicalOp::And,
        right: Box::new(Condition::Truthy(Expr::variable("b"))),
        grouped: false,
    };
    assert_eq!(condition.negate().to_string(), "a <= 1 or not b");
}

#[test]
fn test_condition_display() {
    let program = lower("if name == \"Ada\" and (n + 1) * 2 > 4 then\nend if");
    let Statement::If { condition, .. } = &program.statements[0] else {
        panic!("Expected if");
    };
    assert_eq!(condition.to_string(), "name == \"Ada\" and (n + 1) * 2 > 4");
}
