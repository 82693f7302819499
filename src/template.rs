//! Template expander for command strings.
//!
//! Replaces every `{{ expression }}` span in a command template with the
//! canonical string form of the evaluated expression.
//!
//! # Syntax
//!
//! - A span runs from `{{` to the next `}}`; spans never nest.
//! - The text between the delimiters is trimmed before evaluation.
//! - A `{{` with no closing `}}` is left as-is.
//!
//! # Error Handling
//!
//! Expansion is all-or-nothing: the first span that fails to compile or
//! evaluate aborts the whole expansion, so a half-expanded command is never
//! returned.

use crate::expr::{Env, ExpressionError, Scope};
use thiserror::Error;
use tracing::trace;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Expansion failure for one `{{ ... }}` span.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("template expression '{span}' at position {position}: {source}")]
pub struct TemplateError {
    /// The full span text, delimiters included.
    pub span: String,
    /// Byte offset of the span in the template.
    pub position: usize,
    #[source]
    pub source: ExpressionError,
}

/// One `{{ ... }}` occurrence in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span<'a> {
    /// Byte offset of the opening `{{`.
    start: usize,
    /// Byte offset just past the closing `}}`.
    end: usize,
    /// Trimmed expression text.
    expression: &'a str,
}

/// Expand every span in `template` against `scope`.
///
/// Each span is compiled into its own program; no state is carried between
/// spans. Templates without spans are returned unchanged.
///
/// # Examples
///
/// ```
/// use runblock::expr::Scope;
/// use runblock::template::expand;
///
/// let scope = Scope::new().with("lang", "go");
/// let result = expand(r#"fmt_{{ lang == "" ? "txt" : lang }}"#, &scope).unwrap();
/// assert_eq!(result, "fmt_go");
/// ```
pub fn expand(template: &str, scope: &Scope) -> Result<String, TemplateError> {
    let spans = find_spans(template);
    if spans.is_empty() {
        return Ok(template.to_string());
    }

    let env = Env::from_scope(scope);
    let mut result = String::with_capacity(template.len());
    let mut cursor = 0;

    for span in spans {
        let value = env
            .compile(span.expression)
            .and_then(|program| program.eval(scope))
            .map_err(|source| TemplateError {
                span: template[span.start..span.end].to_string(),
                position: span.start,
                source,
            })?;
        trace!(expression = span.expression, value = %value, "expanded template span");

        result.push_str(&template[cursor..span.start]);
        result.push_str(&value.to_string());
        cursor = span.end;
    }

    result.push_str(&template[cursor..]);
    Ok(result)
}

/// Scan left to right for non-overlapping spans.
fn find_spans(template: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut offset = 0;

    while let Some(open) = template[offset..].find(OPEN) {
        let start = offset + open;
        let inner_start = start + OPEN.len();
        let Some(close) = template[inner_start..].find(CLOSE) else {
            break;
        };
        let inner_end = inner_start + close;
        let end = inner_end + CLOSE.len();

        spans.push(Span {
            start,
            end,
            expression: template[inner_start..inner_end].trim(),
        });
        offset = end;
    }

    spans
}
