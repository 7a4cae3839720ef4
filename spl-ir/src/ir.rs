// SPL IR Definitions
// Evaluation-ready tree: literal wrappers collapsed, conditions split from values

use std::fmt;

pub use spl_parser::{IndexKind, TypeName};

/// Root of a transformed program
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `SET name TO value`; `value` is `None` for `SET name AS type`
    Set {
        line: usize,
        name: String,
        declared_type: Option<TypeName>,
        value: Option<Expr>,
    },
    SetElement {
        line: usize,
        array: String,
        index: Expr,
        value: Expr,
    },
    Print {
        line: usize,
        value: Expr,
    },
    /// An otherwise-if link is an `If` with `chained` set, stored as the sole
    /// statement of its parent's `alternate`
    If {
        line: usize,
        condition: Condition,
        consequent: Vec<Statement>,
        alternate: Vec<Statement>,
        chained: bool,
    },
    While {
        line: usize,
        condition: Condition,
        body: Vec<Statement>,
    },
    /// Runs while `condition` is false; the condition is stored as written
    LoopUntil {
        line: usize,
        condition: Condition,
        body: Vec<Statement>,
    },
    ForEach {
        line: usize,
        iterator: String,
        array: String,
        body: Vec<Statement>,
    },
    LoopFromTo {
        line: usize,
        variable: String,
        start: Expr,
        end: Expr,
        body: Vec<Statement>,
    },
    FunctionDeclaration {
        line: usize,
        name: String,
        params: Vec<String>,
        body: Vec<Statement>,
    },
    Call(Call),
    Return {
        line: usize,
        value: Option<Expr>,
    },
    CreateArray {
        line: usize,
        name: String,
        element_type: Option<TypeName>,
        elements: Vec<Expr>,
    },
    Insert {
        line: usize,
        array: String,
        value: Expr,
        position: Option<Expr>,
    },
    Remove {
        line: usize,
        array: String,
        position: Expr,
    },
    Swap {
        line: usize,
        array: String,
        first: Expr,
        second: Expr,
    },
}

impl Statement {
    pub fn line(&self) -> usize {
        match self {
            Statement::Set { line, .. }
            | Statement::SetElement { line, .. }
            | Statement::Print { line, .. }
            | Statement::If { line, .. }
            | Statement::While { line, .. }
            | Statement::LoopUntil { line, .. }
            | Statement::ForEach { line, .. }
            | Statement::LoopFromTo { line, .. }
            | Statement::FunctionDeclaration { line, .. }
            | Statement::Return { line, .. }
            | Statement::CreateArray { line, .. }
            | Statement::Insert { line, .. }
            | Statement::Remove { line, .. }
            | Statement::Swap { line, .. } => *line,
            Statement::Call(call) => call.line,
        }
    }

    /// Lowercase tag used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Set { .. } => "set",
            Statement::SetElement { .. } => "set_element",
            Statement::Print { .. } => "print",
            Statement::If { .. } => "if",
            Statement::While { .. } => "while",
            Statement::LoopUntil { .. } => "loop_until",
            Statement::ForEach { .. } => "for_each",
            Statement::LoopFromTo { .. } => "loop_from_to",
            Statement::FunctionDeclaration { .. } => "function",
            Statement::Call(_) => "call",
            Statement::Return { .. } => "return",
            Statement::CreateArray { .. } => "create_array",
            Statement::Insert { .. } => "insert",
            Statement::Remove { .. } => "remove",
            Statement::Swap { .. } => "swap",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Variable(String),
    /// `grouped` records source parentheses around this operation
    Binary {
        left: Box<Expr>,
        op: ArithmeticOp,
        right: Box<Expr>,
        grouped: bool,
    },
    Negate(Box<Expr>),
    Substring {
        target: Box<Expr>,
        start: Box<Expr>,
        end: Box<Expr>,
    },
    Length(Box<Expr>),
    Index {
        kind: IndexKind,
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Call(Call),
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Literal(Literal::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    /// Name of the variable this expression reads directly, if any
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Expr::Variable(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Modulo => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl ComparisonOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Equal => "==",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::Less => "<",
            ComparisonOp::LessEqual => "<=",
            ComparisonOp::Greater => ">",
            ComparisonOp::GreaterEqual => ">=",
        }
    }

    /// The operator that holds exactly when `self` does not
    pub fn negate(self) -> Self {
        match self {
            ComparisonOp::Equal => ComparisonOp::NotEqual,
            ComparisonOp::NotEqual => ComparisonOp::Equal,
            ComparisonOp::Less => ComparisonOp::GreaterEqual,
            ComparisonOp::GreaterEqual => ComparisonOp::Less,
            ComparisonOp::Greater => ComparisonOp::LessEqual,
            ComparisonOp::LessEqual => ComparisonOp::Greater,
        }
    }

    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Equal,
        ComparisonOp::NotEqual,
        ComparisonOp::Less,
        ComparisonOp::LessEqual,
        ComparisonOp::Greater,
        ComparisonOp::GreaterEqual,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn word(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

/// Boolean structure over `{left, operator, right}` comparisons
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        left: Expr,
        op: ComparisonOp,
        right: Expr,
    },
    Logical {
        left: Box<Condition>,
        op: LogicalOp,
        right: Box<Condition>,
        grouped: bool,
    },
    Not(Box<Condition>),
    /// A bare value used as a condition
    Truthy(Expr),
}

impl Condition {
    pub fn compare(left: Expr, op: ComparisonOp, right: Expr) -> Self {
        Condition::Compare { left, op, right }
    }

    /// Logical complement. Comparisons flip their operator and the boolean
    /// connectives follow De Morgan, so a plain comparison stays a comparison.
    pub fn negate(&self) -> Condition {
        match self {
            Condition::Compare { left, op, right } => Condition::Compare {
                left: left.clone(),
                op: op.negate(),
                right: right.clone(),
            },
            Condition::Logical {
                left,
                op,
                right,
                grouped,
            } => Condition::Logical {
                left: Box::new(left.negate()),
                op: match op {
                    LogicalOp::And => LogicalOp::Or,
                    LogicalOp::Or => LogicalOp::And,
                },
                right: Box::new(right.negate()),
                grouped: *grouped,
            },
            Condition::Not(inner) => (**inner).clone(),
            Condition::Truthy(expr) => Condition::Not(Box::new(Condition::Truthy(expr.clone()))),
        }
    }
}

pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(value) => f.write_str(&format_number(*value)),
            Literal::String(value) => write!(f, "\"{value}\""),
            Literal::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => write!(f, "{literal}"),
            Expr::Variable(name) => f.write_str(name),
            Expr::Binary {
                left,
                op,
                right,
                grouped,
            } => {
                if *grouped {
                    write!(f, "({left} {} {right})", op.symbol())
                } else {
                    write!(f, "{left} {} {right}", op.symbol())
                }
            }
            Expr::Negate(operand) => write!(f, "-{operand}"),
            Expr::Substring { target, start, end } => {
                write!(f, "substring of {target} from {start} to {end}")
            }
            Expr::Length(target) => write!(f, "length of {target}"),
            Expr::Index { target, index, .. } => write!(f, "{target}[{index}]"),
            Expr::Call(call) => write!(f, "{call}"),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare { left, op, right } => {
                write!(f, "{left} {} {right}", op.symbol())
            }
            Condition::Logical {
                left,
                op,
                right,
                grouped,
            } => {
                if *grouped {
                    write!(f, "({left} {} {right})", op.word())
                } else {
                    write!(f, "{left} {} {right}", op.word())
                }
            }
            Condition::Not(inner) => write!(f, "not {inner}"),
            Condition::Truthy(expr) => write!(f, "{expr}"),
        }
    }
}
