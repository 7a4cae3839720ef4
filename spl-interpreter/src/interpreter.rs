//! Tree-walking trace interpreter
//!
//! [`TraceInterpreter`] executes an IR program statement by statement and
//! records an [`ActionFrame`] for every observable step, in the order the
//! steps happen. Loop bodies really re-run against the live environment and
//! untaken branches are never visited, so the trace is an execution record
//! rather than a rendering of the program text.
//!
//! Function calls are inlined: the callee's frames appear between the
//! `function_call` frame and whatever frame consumes the returned value.
//! Arguments are bound into the one shared [`Environment`].

use crate::environment::{Environment, FunctionDef};
use crate::error::{EvalResult, InterpretError, InterpretResult};
use crate::evaluator::{evaluate, evaluate_condition, EvalContext};
use crate::frame::{Action, ActionFrame, Descriptor, FrameValue};
use crate::operations;
use crate::options::TraceOptions;
use crate::value::Value;
use spl_ir::{ArithmeticOp, Call, ComparisonOp, Condition, Expr, Program, Statement, TypeName};
use tracing::{debug, trace};

/// Remaining stack below which a function call gets a fresh segment
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_PER_CALL: usize = 2 * 1024 * 1024;

/// How a block finished
#[derive(Debug)]
enum Flow {
    Normal,
    /// A `RETURN` ran; the rest of the enclosing function is skipped
    Return(Option<Value>),
}

pub struct TraceInterpreter<'ir> {
    env: Environment<'ir>,
    frames: Vec<ActionFrame>,
    options: TraceOptions,
    depth: usize,
}

impl<'ir> TraceInterpreter<'ir> {
    pub fn new(options: TraceOptions) -> Self {
        Self {
            env: Environment::new(),
            frames: Vec::new(),
            options,
            depth: 0,
        }
    }

    /// Execute `program` and return its frames
    pub fn run(mut self, program: &'ir Program) -> InterpretResult<Vec<ActionFrame>> {
        self.execute(program)?;
        Ok(self.frames)
    }

    /// Execute `program`, keeping the environment around for inspection
    pub fn execute(&mut self, program: &'ir Program) -> InterpretResult<()> {
        debug!(statements = program.statements.len(), "interpreting SPL program");
        self.block(&program.statements)?;
        debug!(frames = self.frames.len(), "recorded action frames");
        Ok(())
    }

    pub fn frames(&self) -> &[ActionFrame] {
        &self.frames
    }

    pub fn environment(&self) -> &Environment<'ir> {
        &self.env
    }

    fn record(
        &mut self,
        line: Option<usize>,
        action: Action,
        description: String,
    ) -> InterpretResult<()> {
        if let Some(limit) = self.options.max_frames {
            if self.frames.len() >= limit {
                return Err(InterpretError::FrameLimitExceeded { limit });
            }
        }
        self.frames.push(ActionFrame {
            line,
            action,
            description,
            timestamp: self.options.timestamp(),
        });
        Ok(())
    }

    fn eval(&mut self, expr: &Expr, line: usize) -> InterpretResult<Value> {
        Ok(evaluate(expr, line, self)?)
    }

    fn check(&mut self, condition: &Condition, line: usize) -> InterpretResult<bool> {
        Ok(evaluate_condition(condition, line, self)?)
    }

    fn block(&mut self, statements: &'ir [Statement]) -> InterpretResult<Flow> {
        for statement in statements {
            if let Flow::Return(value) = self.statement(statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn statement(&mut self, statement: &'ir Statement) -> InterpretResult<Flow> {
        trace!(
            line = statement.line(),
            kind = statement.kind(),
            "executing statement"
        );

        match statement {
            Statement::Set {
                line,
                name,
                declared_type,
                value,
            } => self.set(*line, name, *declared_type, value.as_ref())?,
            Statement::SetElement {
                line,
                array,
                index,
                value,
            } => self.set_element(*line, array, index, value)?,
            Statement::Print { line, value } => self.print(*line, value)?,
            Statement::If {
                line,
                condition,
                consequent,
                alternate,
                chained,
            } => return self.if_statement(*line, condition, consequent, alternate, *chained),
            Statement::While {
                line,
                condition,
                body,
            } => return self.while_loop(*line, condition, body),
            Statement::LoopUntil {
                line,
                condition,
                body,
            } => return self.while_loop(*line, &condition.negate(), body),
            Statement::ForEach {
                line,
                iterator,
                array,
                body,
            } => return self.for_each(*line, iterator, array, body),
            Statement::LoopFromTo {
                line,
                variable,
                start,
                end,
                body,
            } => return self.loop_from_to(*line, variable, start, end, body),
            Statement::FunctionDeclaration {
                line,
                name,
                params,
                body,
            } => self.define_function(*line, name, params, body)?,
            Statement::Call(call) => {
                self.call_function(call)?;
            }
            Statement::Return { line, value } => return self.return_statement(*line, value.as_ref()),
            Statement::CreateArray {
                line,
                name,
                element_type,
                elements,
            } => self.create_array(*line, name, *element_type, elements)?,
            Statement::Insert {
                line,
                array,
                value,
                position,
            } => self.insert(*line, array, value, position.as_ref())?,
            Statement::Remove {
                line,
                array,
                position,
            } => self.remove(*line, array, position)?,
            Statement::Swap {
                line,
                array,
                first,
                second,
            } => self.swap(*line, array, first, second)?,
        }

        Ok(Flow::Normal)
    }

    fn set(
        &mut self,
        line: usize,
        name: &str,
        declared_type: Option<TypeName>,
        value: Option<&Expr>,
    ) -> InterpretResult<()> {
        let Some(expr) = value else {
            self.env.assign(name, Value::Undefined);
            self.env.set_element_type(name, None);
            let (value_type, description) = match declared_type {
                Some(declared) => {
                    self.env.declare_type(name, declared);
                    (declared.to_string(), format!("Declare {name} as {declared}"))
                }
                None => ("undefined".to_string(), format!("Declare {name}")),
            };
            return self.record(
                Some(line),
                Action::Set {
                    var_name: name.to_string(),
                    value_type,
                    value: FrameValue::Value(Value::Undefined),
                },
                description,
            );
        };

        let (frame_value, read) = self.read_value(expr, line)?;
        let value = frame_value.result().clone();

        let expected = declared_type.or_else(|| self.env.declared_type(name));
        if let Some(expected) = expected {
            if value != Value::Undefined && !value.matches_type(expected) {
                return Err(InterpretError::DeclaredTypeMismatch {
                    name: name.to_string(),
                    expected,
                    found: value.type_name(),
                    value: value.describe(),
                    line,
                });
            }
        }
        if let Some(declared) = declared_type {
            self.env.declare_type(name, declared);
        }

        self.env.assign(name, value.clone());
        self.env.set_element_type(name, None);

        let description = match read {
            Some(read) => format!("Set {name} to {read}"),
            None => format!("Set {name} to {}", value.describe()),
        };
        self.record(
            Some(line),
            Action::Set {
                var_name: name.to_string(),
                value_type: expected.map_or_else(|| value.type_name().to_string(), |t| t.to_string()),
                value: frame_value,
            },
            description,
        )
    }

    /// Evaluate the right-hand side of a `SET`. Substring, index and length
    /// reads at the top level keep a descriptor of the read, along with a
    /// sentence describing it.
    fn read_value(
        &mut self,
        expr: &Expr,
        line: usize,
    ) -> InterpretResult<(FrameValue, Option<String>)> {
        match expr {
            Expr::Substring { target, start, end } => {
                let target_name = operations::target_label(target);
                let text = self.eval(target, line)?;
                let start = self.eval(start, line)?;
                let end = self.eval(end, line)?;
                let result = operations::substring(&target_name, &text, &start, &end, line)?;

                let read = if start.as_number().map(f64::trunc) == end.as_number().map(f64::trunc) {
                    format!(
                        "{} (empty substring of {target_name}, start and end are both {start})",
                        result.describe()
                    )
                } else {
                    format!(
                        "substring of {target_name} from {start} to {end}: {}",
                        result.describe()
                    )
                };
                let descriptor = Descriptor::Substring {
                    target: target_name,
                    start,
                    end,
                    result,
                };
                Ok((FrameValue::Descriptor(descriptor), Some(read)))
            }
            Expr::Index { target, index, .. } => {
                let target_name = operations::target_label(target);
                let collection = self.eval(target, line)?;
                let index = self.eval(index, line)?;
                let result = operations::index(&target_name, &collection, &index, line)?;

                let read = format!("{target_name}[{index}]: {}", result.describe());
                let descriptor = Descriptor::Get {
                    target: target_name,
                    index,
                    result,
                };
                Ok((FrameValue::Descriptor(descriptor), Some(read)))
            }
            Expr::Length(target) => {
                let target_name = operations::target_label(target);
                let result = operations::length(&target_name, &self.eval(target, line)?, line)?;

                let read = format!("length of {target_name}: {}", result.describe());
                let descriptor = Descriptor::Length {
                    target: target_name,
                    result,
                };
                Ok((FrameValue::Descriptor(descriptor), Some(read)))
            }
            _ => Ok((FrameValue::Value(self.eval(expr, line)?), None)),
        }
    }

    fn print(&mut self, line: usize, expr: &Expr) -> InterpretResult<()> {
        if let Some(name) = expr.as_variable() {
            let value = self.env.lookup(name, line)?;
            if value == Value::Undefined {
                return Err(InterpretError::UnprintableValue { line });
            }
            return self.record(
                Some(line),
                Action::Print {
                    is_literal: false,
                    var_name: Some(name.to_string()),
                    literal: value.clone(),
                },
                format!("Print {name}: {value}"),
            );
        }

        if !is_printable(expr) {
            return Err(InterpretError::UnsupportedPrintOperand {
                operand: expr.to_string(),
                line,
            });
        }
        let value = self.eval(expr, line)?;
        if value == Value::Undefined {
            return Err(InterpretError::UnprintableValue { line });
        }
        self.record(
            Some(line),
            Action::Print {
                is_literal: true,
                var_name: None,
                literal: value.clone(),
            },
            format!("Print {value}"),
        )
    }

    /// An `if` or one link of an otherwise-if chain. Only the head of a chain
    /// closes it with an `endif` frame, and only when no branch returned.
    fn if_statement(
        &mut self,
        line: usize,
        condition: &Condition,
        consequent: &'ir [Statement],
        alternate: &'ir [Statement],
        chained: bool,
    ) -> InterpretResult<Flow> {
        let result = self.check(condition, line)?;
        self.record(
            Some(line),
            Action::If {
                condition: condition.to_string(),
                result,
            },
            format!("Check if {condition}: {result}"),
        )?;

        let flow = self.block(if result { consequent } else { alternate })?;
        if !chained && matches!(flow, Flow::Normal) {
            self.record(None, Action::EndIf, "End of if statement".to_string())?;
        }
        Ok(flow)
    }

    fn while_loop(
        &mut self,
        line: usize,
        condition: &Condition,
        body: &'ir [Statement],
    ) -> InterpretResult<Flow> {
        let text = condition.to_string();
        self.record(
            Some(line),
            Action::While {
                condition: text.clone(),
            },
            format!("Start while loop: {text}"),
        )?;

        loop {
            let result = self.check(condition, line)?;
            self.record(
                Some(line),
                Action::If {
                    condition: text.clone(),
                    result,
                },
                format!("Check if {text}: {result}"),
            )?;
            if !result {
                break;
            }
            if let Flow::Return(value) = self.block(body)? {
                return Ok(Flow::Return(value));
            }
        }

        self.end_loop()
    }

    fn for_each(
        &mut self,
        line: usize,
        iterator: &str,
        array: &str,
        body: &'ir [Statement],
    ) -> InterpretResult<Flow> {
        self.array_length(array, line)?;
        self.record(
            Some(line),
            Action::For {
                var_name: iterator.to_string(),
                array_name: array.to_string(),
            },
            format!("Loop over each {iterator} in {array}"),
        )?;

        let mut index = 0;
        loop {
            // The body may resize the array
            let length = self.array_length(array, line)?;
            let result = index < length;
            let condition = format!("{index} < {length}");
            self.record(
                Some(line),
                Action::If {
                    condition: condition.clone(),
                    result,
                },
                format!("Check if {condition}: {result}"),
            )?;
            if !result {
                break;
            }

            let item = self.array_mut(array, line)?[index].clone();
            self.env.assign(iterator, item.clone());
            self.record(
                Some(line),
                Action::Set {
                    var_name: iterator.to_string(),
                    value_type: item.type_name().to_string(),
                    value: FrameValue::Descriptor(Descriptor::Get {
                        target: array.to_string(),
                        index: Value::Number(index as f64),
                        result: item.clone(),
                    }),
                },
                format!("Set {iterator} to {array}[{index}]: {}", item.describe()),
            )?;

            if let Flow::Return(value) = self.block(body)? {
                return Ok(Flow::Return(value));
            }
            index += 1;
        }

        self.end_loop()
    }

    /// Inclusive counted loop. The bounds are evaluated once; the loop
    /// variable is re-read before every check, so the body may move it.
    fn loop_from_to(
        &mut self,
        line: usize,
        variable: &str,
        start: &Expr,
        end: &Expr,
        body: &'ir [Statement],
    ) -> InterpretResult<Flow> {
        let start = self.range_bound(variable, "start", start, line)?;
        let end = self.range_bound(variable, "end", end, line)?;

        self.env.assign(variable, start.clone());
        self.record(
            Some(line),
            Action::Set {
                var_name: variable.to_string(),
                value_type: start.type_name().to_string(),
                value: FrameValue::Value(start.clone()),
            },
            format!("Set {variable} to {start}"),
        )?;
        self.record(
            Some(line),
            Action::LoopFromTo {
                var_name: variable.to_string(),
                start: start.clone(),
                end: end.clone(),
            },
            format!("Loop {variable} from {start} to {end}"),
        )?;

        let condition = format!("{variable} <= {end}");
        loop {
            let current = self.env.lookup(variable, line)?;
            let result = operations::compare(ComparisonOp::LessEqual, &current, &end, line)?;
            self.record(
                Some(line),
                Action::If {
                    condition: condition.clone(),
                    result,
                },
                format!("Check if {condition}: {result}"),
            )?;
            if !result {
                break;
            }

            if let Flow::Return(value) = self.block(body)? {
                return Ok(Flow::Return(value));
            }

            let current = self.env.lookup(variable, line)?;
            let next =
                operations::arithmetic(ArithmeticOp::Add, &current, &Value::Number(1.0), line)?;
            self.env.assign(variable, next.clone());
            self.record(
                Some(line),
                Action::Set {
                    var_name: variable.to_string(),
                    value_type: next.type_name().to_string(),
                    value: FrameValue::Value(next.clone()),
                },
                format!("Set {variable} to {next}"),
            )?;
        }

        self.end_loop()
    }

    fn range_bound(
        &mut self,
        variable: &str,
        bound: &'static str,
        expr: &Expr,
        line: usize,
    ) -> InterpretResult<Value> {
        let value = self.eval(expr, line)?;
        value
            .as_number()
            .map(Value::Number)
            .ok_or_else(|| InterpretError::RangeBoundNotNumeric {
                variable: variable.to_string(),
                bound,
                value: value.describe(),
                line,
            })
    }

    fn end_loop(&mut self) -> InterpretResult<Flow> {
        self.record(None, Action::LoopEnd, "End of loop".to_string())?;
        Ok(Flow::Normal)
    }

    fn define_function(
        &mut self,
        line: usize,
        name: &str,
        params: &'ir [String],
        body: &'ir [Statement],
    ) -> InterpretResult<()> {
        self.env
            .define_function(name, FunctionDef { params, body, line });

        let description = if params.is_empty() {
            format!("Define function {name}")
        } else {
            format!("Define function {name} with parameters {}", params.join(", "))
        };
        self.record(
            Some(line),
            Action::Define {
                name: name.to_string(),
                params: params.to_vec(),
            },
            description,
        )
    }

    /// Run a function body inline. Returns the value of the `RETURN` that
    /// ended it, or `None` if the body ran to completion or returned nothing.
    #[tracing::instrument(level = "debug", skip(self, call), fields(function = %call.name, line = call.line))]
    fn call_function(&mut self, call: &Call) -> InterpretResult<Option<Value>> {
        let function =
            self.env
                .function(&call.name)
                .ok_or_else(|| InterpretError::UnknownFunction {
                    name: call.name.clone(),
                    line: call.line,
                })?;
        if function.params.len() != call.args.len() {
            return Err(InterpretError::ArgumentCount {
                function: call.name.clone(),
                expected: function.params.len(),
                found: call.args.len(),
                line: call.line,
                declared_line: function.line,
            });
        }

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval(arg, call.line)?);
        }

        if self.depth >= self.options.max_call_depth {
            return Err(InterpretError::CallDepthExceeded {
                function: call.name.clone(),
                limit: self.options.max_call_depth,
                line: call.line,
            });
        }

        let description = if args.is_empty() {
            format!("Call {}", call.name)
        } else {
            format!("Call {} with arguments {}", call.name, describe_values(&args))
        };
        self.record(
            Some(call.line),
            Action::FunctionCall {
                name: call.name.clone(),
                args: args.clone(),
            },
            description,
        )?;

        self.env.bind_parameters(function.params, args);
        self.depth += 1;
        let flow = stacker::maybe_grow(STACK_RED_ZONE, STACK_PER_CALL, || {
            self.block(function.body)
        });
        self.depth -= 1;

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(None),
        }
    }

    fn return_statement(&mut self, line: usize, value: Option<&Expr>) -> InterpretResult<Flow> {
        if self.depth == 0 {
            return Err(InterpretError::ReturnOutsideFunction { line });
        }

        let value = match value {
            Some(expr) => Some(self.eval(expr, line)?),
            None => None,
        };
        let description = match &value {
            Some(value) => format!("Return {}", value.describe()),
            None => "Return".to_string(),
        };
        self.record(
            Some(line),
            Action::Return {
                value: value.clone().unwrap_or(Value::Undefined),
            },
            description,
        )?;
        Ok(Flow::Return(value))
    }

    fn create_array(
        &mut self,
        line: usize,
        name: &str,
        element_type: Option<TypeName>,
        elements: &[Expr],
    ) -> InterpretResult<()> {
        let mut items = Vec::with_capacity(elements.len());
        for element in elements {
            let value = self.eval(element, line)?;
            check_element(name, element_type, &value, line)?;
            items.push(value);
        }
        let array = Value::Array(items);

        self.env.assign(name, array.clone());
        self.env.set_element_type(name, element_type);

        let kind = match element_type {
            Some(element_type) => format!("{element_type} array"),
            None => "array".to_string(),
        };
        let description = if elements.is_empty() {
            format!("Create empty {kind} {name}")
        } else {
            format!("Create {kind} {name} with {}", array.describe())
        };
        self.record(
            Some(line),
            Action::Create {
                var_name: name.to_string(),
                element_type: element_type.map(|t| t.to_string()),
                value: array,
            },
            description,
        )
    }

    fn set_element(
        &mut self,
        line: usize,
        array: &str,
        index: &Expr,
        value: &Expr,
    ) -> InterpretResult<()> {
        let index = self.eval(index, line)?;
        let value = self.eval(value, line)?;
        let element_type = self.env.element_type(array);

        let items = self.array_mut(array, line)?;
        let index = position("set an element", array, &index, items.len(), false, line)?;
        check_element(array, element_type, &value, line)?;
        items[index] = value.clone();

        self.record(
            Some(line),
            Action::SetArray {
                var_name: array.to_string(),
                index,
                value: value.clone(),
            },
            format!("Set {array}[{index}] to {}", value.describe()),
        )
    }

    fn insert(
        &mut self,
        line: usize,
        array: &str,
        value: &Expr,
        position_expr: Option<&Expr>,
    ) -> InterpretResult<()> {
        let value = self.eval(value, line)?;
        let requested = match position_expr {
            Some(expr) => Some(self.eval(expr, line)?),
            None => None,
        };
        let element_type = self.env.element_type(array);

        let items = self.array_mut(array, line)?;
        let at = match &requested {
            Some(requested) => position("insert", array, requested, items.len(), true, line)?,
            None => items.len(),
        };
        check_element(array, element_type, &value, line)?;
        items.insert(at, value.clone());

        self.record(
            Some(line),
            Action::Add {
                var_name: array.to_string(),
                value: value.clone(),
                position: at,
            },
            format!("Insert {} into {array} at position {at}", value.describe()),
        )
    }

    fn remove(&mut self, line: usize, array: &str, position_expr: &Expr) -> InterpretResult<()> {
        let requested = self.eval(position_expr, line)?;

        let items = self.array_mut(array, line)?;
        let at = position("remove", array, &requested, items.len(), false, line)?;
        let removed = items.remove(at);

        self.record(
            Some(line),
            Action::Remove {
                var_name: array.to_string(),
                position: at,
                value: removed.clone(),
            },
            format!("Remove {} from {array} at position {at}", removed.describe()),
        )
    }

    fn swap(&mut self, line: usize, array: &str, first: &Expr, second: &Expr) -> InterpretResult<()> {
        let first = self.eval(first, line)?;
        let second = self.eval(second, line)?;

        let items = self.array_mut(array, line)?;
        let first = position("swap", array, &first, items.len(), false, line)?;
        let second = position("swap", array, &second, items.len(), false, line)?;
        items.swap(first, second);

        self.record(
            Some(line),
            Action::Swap {
                var_name: array.to_string(),
                first,
                second,
            },
            format!("Swap positions {first} and {second} in {array}"),
        )
    }

    fn array_length(&mut self, name: &str, line: usize) -> InterpretResult<usize> {
        Ok(self.array_mut(name, line)?.len())
    }

    fn array_mut(&mut self, name: &str, line: usize) -> InterpretResult<&mut Vec<Value>> {
        match self.env.get_mut(name) {
            Some(Value::Array(items)) => Ok(items),
            None | Some(Value::Undefined) => Err(InterpretError::ArrayNotInitialized {
                array: name.to_string(),
                line,
            }),
            Some(other) => Err(InterpretError::NotAnArray {
                name: name.to_string(),
                found: other.type_name(),
                line,
            }),
        }
    }
}

impl EvalContext for TraceInterpreter<'_> {
    fn lookup(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.env.lookup(name, line)
    }

    fn call(&mut self, call: &Call) -> Result<Value, InterpretError> {
        self.call_function(call)?
            .ok_or_else(|| InterpretError::NoReturnValue {
                function: call.name.clone(),
                line: call.line,
            })
    }
}

/// Validate an array position against the current length. `allow_end`
/// admits `position == length`, which only insertion uses.
fn position(
    operation: &'static str,
    array: &str,
    value: &Value,
    length: usize,
    allow_end: bool,
    line: usize,
) -> InterpretResult<usize> {
    let position =
        operations::whole_number(value).ok_or_else(|| InterpretError::InvalidPosition {
            operation,
            array: array.to_string(),
            value: value.describe(),
            line,
        })?;

    let in_range = position >= 0
        && (position as usize) < length + usize::from(allow_end);
    if !in_range {
        return Err(InterpretError::PositionOutOfBounds {
            operation,
            array: array.to_string(),
            position,
            length,
            line,
        });
    }
    Ok(position as usize)
}

fn check_element(
    array: &str,
    element_type: Option<TypeName>,
    value: &Value,
    line: usize,
) -> InterpretResult<()> {
    match element_type {
        Some(expected) if !value.matches_type(expected) => {
            Err(InterpretError::ElementTypeMismatch {
                array: array.to_string(),
                expected,
                found: value.type_name(),
                value: value.describe(),
                line,
            })
        }
        _ => Ok(()),
    }
}

/// PRINT takes values, variables and arithmetic over them, nothing that reads
/// into a string or array or calls a function
fn is_printable(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(_) | Expr::Variable(_) => true,
        Expr::Binary { left, right, .. } => is_printable(left) && is_printable(right),
        Expr::Negate(operand) => is_printable(operand),
        Expr::Substring { .. } | Expr::Length(_) | Expr::Index { .. } | Expr::Call(_) => false,
    }
}

fn describe_values(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::describe)
        .collect::<Vec<_>>()
        .join(", ")
}
