//! Variable and function state for one interpreter run.
//!
//! There is a single flat scope. Function parameters are written into it by
//! [`Environment::bind_parameters`], so a parameter that shares a name with a
//! caller variable overwrites that variable and the change outlives the call.

use crate::error::{EvalError, EvalResult, InterpretError};
use crate::evaluator::EvalContext;
use crate::value::Value;
use indexmap::IndexMap;
use spl_ir::{Call, Statement, TypeName};

/// A declared function, borrowed from the IR it was declared in
#[derive(Debug, Clone, Copy)]
pub struct FunctionDef<'ir> {
    pub params: &'ir [String],
    pub body: &'ir [Statement],
    pub line: usize,
}

#[derive(Debug, Default)]
pub struct Environment<'ir> {
    /// Presence of a key means declared; `Undefined` means declared without a value
    variables: IndexMap<String, Value>,
    declared_types: IndexMap<String, TypeName>,
    array_element_types: IndexMap<String, TypeName>,
    functions: IndexMap<String, FunctionDef<'ir>>,
}

impl<'ir> Environment<'ir> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.variables.get_mut(name)
    }

    /// Read a variable for the statement on `line`
    pub fn lookup(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndeclaredVariable {
                name: name.to_string(),
                line,
            })
    }

    pub fn assign(&mut self, name: &str, value: Value) {
        match self.variables.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.variables.insert(name.to_string(), value);
            }
        }
    }

    pub fn declare_type(&mut self, name: &str, declared: TypeName) {
        self.declared_types.insert(name.to_string(), declared);
    }

    pub fn declared_type(&self, name: &str) -> Option<TypeName> {
        self.declared_types.get(name).copied()
    }

    pub fn set_element_type(&mut self, array: &str, element_type: Option<TypeName>) {
        match element_type {
            Some(element_type) => {
                self.array_element_types
                    .insert(array.to_string(), element_type);
            }
            None => {
                self.array_element_types.shift_remove(array);
            }
        }
    }

    pub fn element_type(&self, array: &str) -> Option<TypeName> {
        self.array_element_types.get(array).copied()
    }

    pub fn define_function(&mut self, name: &str, function: FunctionDef<'ir>) {
        self.functions.insert(name.to_string(), function);
    }

    pub fn function(&self, name: &str) -> Option<FunctionDef<'ir>> {
        self.functions.get(name).copied()
    }

    /// Write call arguments into the shared scope under their parameter names.
    ///
    /// Callers check arity first; extra values are ignored.
    pub fn bind_parameters(&mut self, params: &[String], args: Vec<Value>) {
        for (param, arg) in params.iter().zip(args) {
            self.assign(param, arg);
        }
    }

    /// Declared variables in declaration order
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// Standalone evaluation against an environment, without function support
impl EvalContext for Environment<'_> {
    fn lookup(&self, name: &str, line: usize) -> EvalResult<Value> {
        Environment::lookup(self, name, line)
    }

    fn call(&mut self, call: &Call) -> Result<Value, InterpretError> {
        Err(InterpretError::UnknownFunction {
            name: call.name.clone(),
            line: call.line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_declared_without_value_is_distinct_from_undeclared() {
        let mut env = Environment::new();
        env.assign("x", Value::Undefined);

        assert!(env.is_declared("x"));
        assert_eq!(env.lookup("x", 1), Ok(Value::Undefined));
        assert_eq!(
            env.lookup("y", 3),
            Err(EvalError::UndeclaredVariable {
                name: "y".into(),
                line: 3,
            })
        );
    }

    #[test]
    fn test_parameters_overwrite_caller_variables() {
        let mut env = Environment::new();
        env.assign("n", Value::Number(1.0));

        let params = vec!["n".to_string(), "m".to_string()];
        env.bind_parameters(&params, vec![Value::Number(5.0), Value::Number(6.0)]);

        assert_eq!(env.get("n"), Some(&Value::Number(5.0)));
        assert_eq!(env.get("m"), Some(&Value::Number(6.0)));
    }

    #[test]
    fn test_variables_keep_declaration_order() {
        let mut env = Environment::new();
        env.assign("b", Value::Number(1.0));
        env.assign("a", Value::Number(2.0));
        env.assign("b", Value::Number(3.0));

        let names: Vec<&str> = env.variables().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
