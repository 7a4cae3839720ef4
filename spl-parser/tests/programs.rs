// Whole-program parsing tests
// Realistic SPL listings parsed end to end through the public API

use pretty_assertions::assert_eq;
use spl_parser::{ast::*, parse_program, tokenize};

fn statement_names(program: &Program) -> Vec<&'static str> {
    program
        .statements
        .iter()
        .map(|statement| statement.kind.name())
        .collect()
}

#[test]
fn test_bubble_sort_listing() {
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
    let program = parse_program(source).unwrap();
    assert_eq!(
        statement_names(&program),
        vec!["ArrayCreation", "VariableDeclaration", "LoopFromTo", "ForLoop"]
    );
    assert_eq!(program.statements[2].line, 4);
}

#[test]
fn test_function_listing() {
    let source = r#"
FUNCTION describe WITH word
    IF length of word is greater than 3 THEN
        RETURN "long"
    OTHERWISE
        RETURN "short"
    END IF
END FUNCTION

SET label TO describe("spl")
PRINT label
CALL describe WITH "pseudocode"
"#;
    let program = parse_program(source).unwrap();
    assert_eq!(
        statement_names(&program),
        vec![
            "FunctionDeclaration",
            "VariableDeclaration",
            "PrintStatement",
            "FunctionCall"
        ]
    );
}

#[test]
fn test_string_listing() {
    let source = r#"
SET greeting TO "hello world"
SET first TO character at index 0 of greeting
SET word TO substring of greeting from 0 to 5
PRINT first + word
"#;
    let program = parse_program(source).unwrap();
    assert_eq!(program.statements.len(), 4);
}

#[test]
fn test_lines_survive_blank_lines() {
    let source = "\n\nset x to 1\n\n\nprint x\n";
    let program = parse_program(source).unwrap();
    let lines: Vec<usize> = program.statements.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![3, 6]);
}

#[test]
fn test_token_stream_is_printable() {
    let tokens = tokenize("print 1").unwrap();
    let rendered: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
    let columns: Vec<&str> = rendered[0].split_whitespace().collect();
    assert_eq!(columns, vec!["1", "keyword", "print"]);
}
