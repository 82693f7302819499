//! Expression error type.

use thiserror::Error;

/// Why an expression failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionErrorKind {
    /// The expression text could not be parsed, or is too complex to accept.
    Syntax(String),
    /// The expression parsed but references a variable the scope does not
    /// declare.
    Check(String),
    /// The expression failed while being evaluated.
    Eval(String),
}

/// A compile-time or evaluation-time failure of a single expression.
///
/// Carries the expression text so callers can point at the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe(expression, kind))]
pub struct ExpressionError {
    pub expression: String,
    pub kind: ExpressionErrorKind,
}

impl ExpressionError {
    pub(crate) fn syntax(expression: &str, message: impl Into<String>) -> Self {
        Self {
            expression: expression.to_string(),
            kind: ExpressionErrorKind::Syntax(message.into()),
        }
    }

    pub(crate) fn check(expression: &str, message: impl Into<String>) -> Self {
        Self {
            expression: expression.to_string(),
            kind: ExpressionErrorKind::Check(message.into()),
        }
    }

    pub(crate) fn eval(expression: &str, message: impl Into<String>) -> Self {
        Self {
            expression: expression.to_string(),
            kind: ExpressionErrorKind::Eval(message.into()),
        }
    }

    /// Whether this error was raised before evaluation started.
    pub fn is_compile_error(&self) -> bool {
        !matches!(self.kind, ExpressionErrorKind::Eval(_))
    }
}

fn describe(expression: &str, kind: &ExpressionErrorKind) -> String {
    match kind {
        ExpressionErrorKind::Syntax(message) => {
            format!("syntax error in '{}': {}", expression, message)
        }
        ExpressionErrorKind::Check(message) => {
            format!("compilation error in '{}': {}", expression, message)
        }
        ExpressionErrorKind::Eval(message) => {
            format!("evaluation error in '{}': {}", expression, message)
        }
    }
}
