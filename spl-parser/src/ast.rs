// SPL AST Definitions
// Closed node model produced by the parser; every node records its 1-based source line

use std::fmt;

/// Root of a parsed SPL program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    VariableDeclaration(VariableDeclaration),
    Print(PrintStatement),
    If(IfStatement),
    ForLoop(ForLoop),
    WhileLoop(WhileLoop),
    LoopUntil(LoopUntil),
    LoopFromTo(LoopFromTo),
    FunctionDeclaration(FunctionDeclaration),
    FunctionCall(FunctionCall),
    Return(ReturnStatement),
    ArrayCreation(ArrayCreation),
    ArrayInsertion(ArrayInsertion),
    ArraySetValue(ArraySetValue),
    Remove(RemoveOperation),
    Swap(SwapOperation),
}

impl StatementKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatementKind::VariableDeclaration(_) => "VariableDeclaration",
            StatementKind::Print(_) => "PrintStatement",
            StatementKind::If(_) => "IfStatement",
            StatementKind::ForLoop(_) => "ForLoop",
            StatementKind::WhileLoop(_) => "WhileLoop",
            StatementKind::LoopUntil(_) => "LoopUntil",
            StatementKind::LoopFromTo(_) => "LoopFromTo",
            StatementKind::FunctionDeclaration(_) => "FunctionDeclaration",
            StatementKind::FunctionCall(_) => "FunctionCall",
            StatementKind::Return(_) => "ReturnStatement",
            StatementKind::ArrayCreation(_) => "ArrayCreation",
            StatementKind::ArrayInsertion(_) => "ArrayInsertion",
            StatementKind::ArraySetValue(_) => "ArraySetValue",
            StatementKind::Remove(_) => "RemoveOperation",
            StatementKind::Swap(_) => "SwapOperation",
        }
    }
}

/// Type keywords usable in declarations and array creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    Number,
    String,
    Boolean,
}

impl TypeName {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "number" => Some(TypeName::Number),
            "string" => Some(TypeName::String),
            "boolean" => Some(TypeName::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Number => "number",
            TypeName::String => "string",
            TypeName::Boolean => "boolean",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `SET name TO [type] value` or `SET name AS type`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: String,
    pub declared_type: Option<TypeName>,
    pub value: Option<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStatement {
    pub value: Expression,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub consequent: Vec<Statement>,
    pub alternate: Option<Alternate>,
    pub line: usize,
}

/// What follows the consequent of an `if` or `otherwise if`
#[derive(Debug, Clone, PartialEq)]
pub enum Alternate {
    OtherwiseIf(Box<OtherwiseIfStatement>),
    Otherwise(Vec<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OtherwiseIfStatement {
    pub condition: Expression,
    pub consequent: Vec<Statement>,
    pub alternate: Option<Alternate>,
    pub line: usize,
}

/// For-each over an array: `FOR EACH item IN items`
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub iterator: String,
    pub array: String,
    pub body: Vec<Statement>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopUntil {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub line: usize,
}

/// Inclusive counted loop: `LOOP i FROM start TO end`
#[derive(Debug, Clone, PartialEq)]
pub struct LoopFromTo {
    pub variable: String,
    pub start: Expression,
    pub end: Expression,
    pub body: Vec<Statement>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Statement>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayCreation {
    pub name: String,
    pub element_type: Option<TypeName>,
    pub elements: Vec<Expression>,
    pub line: usize,
}

/// `INSERT value TO array [AT position]`; no position appends
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayInsertion {
    pub array: String,
    pub value: Expression,
    pub position: Option<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySetValue {
    pub array: String,
    pub index: Expression,
    pub value: Expression,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveOperation {
    pub array: String,
    pub position: Expression,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapOperation {
    pub array: String,
    pub first: Expression,
    pub second: Expression,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Substring(SubstringExpression),
    Length(LengthExpression),
    Index(IndexExpression),
    FunctionCall(FunctionCall),
    Identifier(Identifier),
    Number(NumberLiteral),
    String(StringLiteral),
    Boolean(BooleanLiteral),
}

impl Expression {
    pub fn new(kind: ExpressionKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn identifier(name: impl Into<String>, line: usize) -> Self {
        Self::new(
            ExpressionKind::Identifier(Identifier {
                name: name.into(),
                line,
            }),
            line,
        )
    }

    pub fn number(value: f64, line: usize) -> Self {
        Self::new(ExpressionKind::Number(NumberLiteral { value, line }), line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_arithmetic(text: &str) -> Option<Self> {
        match text {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Subtract),
            "*" => Some(BinaryOperator::Multiply),
            "/" => Some(BinaryOperator::Divide),
            "%" => Some(BinaryOperator::Modulo),
            _ => None,
        }
    }

    pub fn from_comparison(text: &str) -> Option<Self> {
        match text {
            "==" => Some(BinaryOperator::Equal),
            "!=" => Some(BinaryOperator::NotEqual),
            "<" => Some(BinaryOperator::Less),
            "<=" => Some(BinaryOperator::LessEqual),
            ">" => Some(BinaryOperator::Greater),
            ">=" => Some(BinaryOperator::GreaterEqual),
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::Less
                | BinaryOperator::LessEqual
                | BinaryOperator::Greater
                | BinaryOperator::GreaterEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    /// Comparison meaning "not self", used by `IS NOT ...`
    pub fn negated_comparison(&self) -> Option<Self> {
        match self {
            BinaryOperator::Equal => Some(BinaryOperator::NotEqual),
            BinaryOperator::NotEqual => Some(BinaryOperator::Equal),
            BinaryOperator::Less => Some(BinaryOperator::GreaterEqual),
            BinaryOperator::GreaterEqual => Some(BinaryOperator::Less),
            BinaryOperator::Greater => Some(BinaryOperator::LessEqual),
            BinaryOperator::LessEqual => Some(BinaryOperator::Greater),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

/// Binary operation; `grouped` records that the source wrapped it in parentheses
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
    pub grouped: bool,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubstringExpression {
    pub target: Box<Expression>,
    pub start: Box<Expression>,
    pub end: Box<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LengthExpression {
    pub target: Box<Expression>,
    pub line: usize,
}

/// Whether an index expression was written against an array or a string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Element,
    Character,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Element => "element",
            IndexKind::Character => "character",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub kind: IndexKind,
    pub target: Box<Expression>,
    pub index: Box<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub line: usize,
}
