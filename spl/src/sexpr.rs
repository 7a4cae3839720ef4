// S-expression formatter for the SPL AST
// One statement per line, nested bodies indented two spaces, closing parens on the last line

use spl_parser::ast::*;

pub fn format_program_as_sexpr(program: &Program) -> String {
    if program.statements.is_empty() {
        return "(program)".to_string();
    }

    let mut lines = vec!["(program".to_string()];
    for statement in &program.statements {
        format_statement(statement, 1, &mut lines);
    }
    close(&mut lines);
    lines.join("\n")
}

fn pad(depth: usize) -> String {
    "  ".repeat(depth)
}

fn close(lines: &mut [String]) {
    if let Some(last) = lines.last_mut() {
        last.push(')');
    }
}

fn format_block(head: String, body: &[Statement], depth: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{head}", pad(depth)));
    for statement in body {
        format_statement(statement, depth + 1, lines);
    }
    close(lines);
}

fn format_statement(statement: &Statement, depth: usize, lines: &mut Vec<String>) {
    let indent = pad(depth);
    match &statement.kind {
        StatementKind::VariableDeclaration(declaration) => {
            let declared_type = declaration
                .declared_type
                .map(|t| format!(" (type {t})"))
                .unwrap_or_default();
            let value = declaration
                .value
                .as_ref()
                .map(|value| format!(" {}", format_expression(value)))
                .unwrap_or_default();
            lines.push(format!("{indent}(set {}{declared_type}{value})", declaration.name));
        }
        StatementKind::Print(print) => {
            lines.push(format!("{indent}(print {})", format_expression(&print.value)));
        }
        StatementKind::If(if_statement) => format_if(
            "if",
            &if_statement.condition,
            &if_statement.consequent,
            if_statement.alternate.as_ref(),
            depth,
            lines,
        ),
        StatementKind::ForLoop(for_loop) => format_block(
            format!("(for-each {} {}", for_loop.iterator, for_loop.array),
            &for_loop.body,
            depth,
            lines,
        ),
        StatementKind::WhileLoop(while_loop) => format_block(
            format!("(while {}", format_expression(&while_loop.condition)),
            &while_loop.body,
            depth,
            lines,
        ),
        StatementKind::LoopUntil(loop_until) => format_block(
            format!("(loop-until {}", format_expression(&loop_until.condition)),
            &loop_until.body,
            depth,
            lines,
        ),
        StatementKind::LoopFromTo(counted) => format_block(
            format!(
                "(loop-from-to {} {} {}",
                counted.variable,
                format_expression(&counted.start),
                format_expression(&counted.end)
            ),
            &counted.body,
            depth,
            lines,
        ),
        StatementKind::FunctionDeclaration(function) => format_block(
            format!("(function {} ({})", function.name, function.params.join(" ")),
            &function.body,
            depth,
            lines,
        ),
        StatementKind::FunctionCall(call) => {
            lines.push(format!("{indent}{}", format_call(call)));
        }
        StatementKind::Return(ret) => match &ret.value {
            Some(value) => lines.push(format!("{indent}(return {})", format_expression(value))),
            None => lines.push(format!("{indent}(return)")),
        },
        StatementKind::ArrayCreation(creation) => {
            let element_type = creation
                .element_type
                .map(|t| format!(" (type {t})"))
                .unwrap_or_default();
            lines.push(format!(
                "{indent}(create-array {}{element_type} ({}))",
                creation.name,
                format_list(&creation.elements)
            ));
        }
        StatementKind::ArrayInsertion(insertion) => {
            let position = insertion
                .position
                .as_ref()
                .map(|p| format!(" {}", format_expression(p)))
                .unwrap_or_default();
            lines.push(format!(
                "{indent}(insert {} {}{position})",
                insertion.array,
                format_expression(&insertion.value)
            ));
        }
        StatementKind::ArraySetValue(set) => lines.push(format!(
            "{indent}(set-element {} {} {})",
            set.array,
            format_expression(&set.index),
            format_expression(&set.value)
        )),
        StatementKind::Remove(remove) => lines.push(format!(
            "{indent}(remove {} {})",
            remove.array,
            format_expression(&remove.position)
        )),
        StatementKind::Swap(swap) => lines.push(format!(
            "{indent}(swap {} {} {})",
            swap.array,
            format_expression(&swap.first),
            format_expression(&swap.second)
        )),
    }
}

fn format_if(
    head: &str,
    condition: &Expression,
    consequent: &[Statement],
    alternate: Option<&Alternate>,
    depth: usize,
    lines: &mut Vec<String>,
) {
    lines.push(format!("{}({head} {}", pad(depth), format_expression(condition)));
    for statement in consequent {
        format_statement(statement, depth + 1, lines);
    }
    match alternate {
        Some(Alternate::OtherwiseIf(link)) => format_if(
            "otherwise-if",
            &link.condition,
            &link.consequent,
            link.alternate.as_ref(),
            depth + 1,
            lines,
        ),
        Some(Alternate::Otherwise(body)) => {
            format_block("(otherwise".to_string(), body, depth + 1, lines)
        }
        None => {}
    }
    close(lines);
}

fn format_expression(expr: &Expression) -> String {
    match &expr.kind {
        ExpressionKind::Binary(binary) => format!(
            "({} {} {})",
            binary.operator.symbol(),
            format_expression(&binary.left),
            format_expression(&binary.right)
        ),
        ExpressionKind::Unary(unary) => {
            let operator = match unary.operator {
                UnaryOperator::Minus => "-",
                UnaryOperator::Not => "not",
            };
            format!("({operator} {})", format_expression(&unary.operand))
        }
        ExpressionKind::Substring(substring) => format!(
            "(substring {} {} {})",
            format_expression(&substring.target),
            format_expression(&substring.start),
            format_expression(&substring.end)
        ),
        ExpressionKind::Length(length) => {
            format!("(length {})", format_expression(&length.target))
        }
        ExpressionKind::Index(index) => format!(
            "({} {} {})",
            index.kind.as_str(),
            format_expression(&index.target),
            format_expression(&index.index)
        ),
        ExpressionKind::FunctionCall(call) => format_call(call),
        ExpressionKind::Identifier(identifier) => identifier.name.clone(),
        ExpressionKind::Number(number) => number.value.to_string(),
        ExpressionKind::String(string) => format!("{:?}", string.value),
        ExpressionKind::Boolean(boolean) => boolean.value.to_string(),
    }
}

fn format_call(call: &FunctionCall) -> String {
    if call.arguments.is_empty() {
        format!("(call {})", call.name)
    } else {
        format!("(call {} {})", call.name, format_list(&call.arguments))
    }
}

fn format_list(expressions: &[Expression]) -> String {
    expressions
        .iter()
        .map(format_expression)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spl_parser::parse_program;

    fn sexpr(source: &str) -> String {
        format_program_as_sexpr(&parse_program(source).unwrap())
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(sexpr(""), "(program)");
    }

    #[test]
    fn test_nested_branches_close_on_the_last_line() {
        assert_eq!(
            sexpr("set x to 1 + 2\nif x > 2\n  print x\notherwise\n  print 0\nend if"),
            "\
(program
  (set x (+ 1 2))
  (if (> x 2)
    (print x)
    (otherwise
      (print 0))))"
        );
    }

    #[test]
    fn test_arrays_and_calls() {
        assert_eq!(
            sexpr("create number array as a with [1, 2]\ninsert 3 to a at position 0\nset n to f(a, \"x\")"),
            "\
(program
  (create-array a (type number) (1 2))
  (insert a 3 0)
  (set n (call f a \"x\")))"
        );
    }
}
