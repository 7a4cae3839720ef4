use crate::*;
use pretty_assertions::assert_eq;

fn condition_of(condition: &str) -> Expression {
    let source = format!("while {condition}\nend while");
    let program = parse_program(&source).unwrap();
    match program.statements.into_iter().next().map(|statement| statement.kind) {
        Some(StatementKind::WhileLoop(while_loop)) => while_loop.condition,
        other => panic!("Expected while loop, got {other:?}"),
    }
}

fn binary_parts(expression: &Expression) -> (&Expression, BinaryOperator, &Expression) {
    match &expression.kind {
        ExpressionKind::Binary(binary) => (&binary.left, binary.operator, &binary.right),
        other => panic!("Expected binary expression, got {other:?}"),
    }
}

#[test]
fn test_symbolic_comparison() {
    let condition = condition_of("x >= 10");
    let (left, operator, right) = binary_parts(&condition);
    assert_eq!(*left, Expression::identifier("x", 1));
    assert_eq!(operator, BinaryOperator::GreaterEqual);
    assert_eq!(*right, Expression::number(10.0, 1));
}

#[test]
fn test_single_equals_compares() {
    let condition = condition_of("x = 3");
    assert_eq!(binary_parts(&condition).1, BinaryOperator::Equal);
}

#[test]
fn test_worded_comparisons() {
    let cases = [
        ("x is greater than 1", BinaryOperator::Greater),
        ("x is greater than or equal to 1", BinaryOperator::GreaterEqual),
        ("x is less than 1", BinaryOperator::Less),
        ("x is less than or equal to 1", BinaryOperator::LessEqual),
        ("x is equal to 1", BinaryOperator::Equal),
        ("x is 1", BinaryOperator::Equal),
    ];
    for (source, expected) in cases {
        let condition = condition_of(source);
        assert_eq!(binary_parts(&condition).1, expected, "for {source}");
    }
}

#[test]
fn test_negated_worded_comparisons() {
    let cases = [
        ("x is not greater than 1", BinaryOperator::LessEqual),
        ("x is not less than 1", BinaryOperator::GreaterEqual),
        ("x is not equal to 1", BinaryOperator::NotEqual),
        ("x is not 1", BinaryOperator::NotEqual),
    ];
    for (source, expected) in cases {
        let condition = condition_of(source);
        assert_eq!(binary_parts(&condition).1, expected, "for {source}");
    }
}

#[test]
fn test_or_after_worded_comparison_is_logical() {
    let condition = condition_of("x is greater than 1 or y is 2");
    let (left, operator, _) = binary_parts(&condition);
    assert_eq!(operator, BinaryOperator::Or);
    assert_eq!(binary_parts(left).1, BinaryOperator::Greater);
}

#[test]
fn test_logical_chain_folds_left() {
    let condition = condition_of("a > 1 and b > 2 || c > 3");
    let (left, operator, _) = binary_parts(&condition);
    assert_eq!(operator, BinaryOperator::Or);
    assert_eq!(binary_parts(left).1, BinaryOperator::And);
}

#[test]
fn test_grouped_condition() {
    let condition = condition_of("a > 1 and (b > 2 or c > 3)");
    let (_, operator, right) = binary_parts(&condition);
    assert_eq!(operator, BinaryOperator::And);
    match &right.kind {
        ExpressionKind::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOperator::Or);
            assert!(binary.grouped);
        }
        other => panic!("Expected grouped condition, got {other:?}"),
    }
}

#[test]
fn test_parenthesised_arithmetic_operand_backtracks() {
    let condition = condition_of("(a + b) > c");
    let (left, operator, _) = binary_parts(&condition);
    assert_eq!(operator, BinaryOperator::Greater);
    assert_eq!(binary_parts(left).1, BinaryOperator::Add);
}

#[test]
fn test_not_prefix() {
    for source in ["not done", "!done"] {
        match condition_of(source).kind {
            ExpressionKind::Unary(unary) => {
                assert_eq!(unary.operator, UnaryOperator::Not);
                assert_eq!(*unary.operand, Expression::identifier("done", 1));
            }
            other => panic!("Expected not for {source}, got {other:?}"),
        }
    }
}

#[test]
fn test_bare_expression_condition() {
    assert_eq!(condition_of("running"), Expression::identifier("running", 1));
}
