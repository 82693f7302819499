//! Expression evaluator for command templates.
//!
//! Expressions are CEL, evaluated by `cel-interpreter`:
//!
//! ```text
//! lang == "" ? "txt" : lang
//! "prefix_" + lang
//! content.contains("main") ? "has main" : "no main"
//! content.size()
//! i + 1
//! ```
//!
//! [`Env::compile`] parses the text and rejects any variable the scope
//! does not declare, so a typo fails before anything runs. [`Program::eval`]
//! then evaluates the compiled program against a [`Scope`]. Operand type
//! mismatches surface as evaluation errors.
//!
//! Declarations come from the scope's values (see [`Kind`]), which is what
//! [`evaluate`] does on every call.

mod error;
mod limits;
mod scope;
mod value;


pub use error::{ExpressionError, ExpressionErrorKind};
pub use scope::Scope;
pub use value::{Kind, Type, Value};

use cel_interpreter::extractors::This;
use cel_interpreter::Context;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Loop variables bound by the comprehension macros, e.g. `t` in
/// `tags.exists(t, t == "unit")`.
static MACRO_BINDING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\s*(?:all|exists|exists_one|map|filter)\s*\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*,")
        .expect("Invalid macro binding regex")
});

/// Declared variables that expressions are checked against.
#[derive(Debug, Clone, Default)]
pub struct Env {
    declarations: BTreeMap<String, Type>,
}

/// A compiled expression whose variables are all declared.
pub struct Program {
    source: String,
    program: cel_interpreter::Program,
}

impl Env {
    /// Build an environment declaring every variable in `scope`, with types
    /// inferred from the values.
    pub fn from_scope(scope: &Scope) -> Self {
        let declarations = scope
            .iter()
            .map(|(name, value)| (name.to_string(), value.kind().declared_type()))
            .collect();
        Self { declarations }
    }

    pub fn declared_type(&self, name: &str) -> Option<&Type> {
        self.declarations.get(name)
    }

    /// Parse `source` and check that every variable it references is declared.
    pub fn compile(&self, source: &str) -> Result<Program, ExpressionError> {
        if source.trim().is_empty() {
            return Err(ExpressionError::syntax(source, "empty expression"));
        }
        limits::check(source).map_err(|message| ExpressionError::syntax(source, message))?;

        let program = cel_interpreter::Program::compile(source)
            .map_err(|e| ExpressionError::syntax(source, e.to_string()))?;

        let bound: BTreeSet<&str> = MACRO_BINDING_REGEX
            .captures_iter(source)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();
        let references = program.references();
        if let Some(name) = references
            .variables()
            .into_iter()
            .find(|name| !bound.contains(name) && !self.declarations.contains_key(*name))
        {
            return Err(ExpressionError::check(
                source,
                format!("undeclared reference to '{}'", name),
            ));
        }

        Ok(Program {
            source: source.to_string(),
            program,
        })
    }
}

impl Program {
    /// Evaluate against `scope`, which must bind every declared variable.
    pub fn eval(&self, scope: &Scope) -> Result<Value, ExpressionError> {
        let mut context = Context::default();
        for (name, value) in scope.iter() {
            context.add_variable_from_value(name, value.to_cel());
        }
        context.add_function("lowerAscii", lower_ascii);
        context.add_function("upperAscii", upper_ascii);
        context.add_function("trim", trim);

        let result = self
            .program
            .execute(&context)
            .map_err(|e| ExpressionError::eval(&self.source, e.to_string()))?;
        Value::from_cel(&result).map_err(|message| ExpressionError::eval(&self.source, message))
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program").field("source", &self.source).finish()
    }
}

fn lower_ascii(This(s): This<Arc<String>>) -> String {
    s.to_ascii_lowercase()
}

fn upper_ascii(This(s): This<Arc<String>>) -> String {
    s.to_ascii_uppercase()
}

fn trim(This(s): This<Arc<String>>) -> String {
    s.trim().to_string()
}

/// Compile `expression` against the variables of `scope` and evaluate it.
///
/// Pure: the same expression and scope always produce the same result.
pub fn evaluate(expression: &str, scope: &Scope) -> Result<Value, ExpressionError> {
    Env::from_scope(scope).compile(expression)?.eval(scope)
}
