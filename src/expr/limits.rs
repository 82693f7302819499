//! Size limits applied to expression text before it reaches the interpreter.
//!
//! Parsing and evaluating a deeply nested or very long operator chain
//! recurses once per level, so oversized input is rejected up front with a
//! syntax error instead of exhausting the stack.

/// Most operator tokens one expression may contain.
pub const MAX_OPERATORS: usize = 100;

/// Deepest bracket nesting one expression may contain.
pub const MAX_NESTING: usize = 32;

const OPERATOR_CHARS: &str = "+-*/%<>=!&|?:.";

/// Check `source` against [`MAX_OPERATORS`] and [`MAX_NESTING`]. Text inside
/// string literals is ignored.
pub fn check(source: &str) -> Result<(), String> {
    let mut operators = 0usize;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut previous_was_operator = false;

    for c in source.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        let is_operator = OPERATOR_CHARS.contains(c);
        if is_operator && !previous_was_operator {
            operators += 1;
            if operators > MAX_OPERATORS {
                return Err(format!(
                    "expression too complex: more than {} operators",
                    MAX_OPERATORS
                ));
            }
        }
        previous_was_operator = is_operator;

        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(format!(
                        "expression too complex: nesting deeper than {}",
                        MAX_NESTING
                    ));
                }
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinary_expressions_pass() {
        assert!(check(r#"lang == "" ? "txt" : lang"#).is_ok());
        assert!(check(r#"content.contains("main") ? "has main" : "no main""#).is_ok());
        assert!(check("tags.exists(t, t == 'unit') && i >= 2").is_ok());
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        let chain = vec!["i"; 500].join(" + ");
        let err = check(&chain).unwrap_err();
        assert!(err.contains("more than 100 operators"), "{}", err);

        let at_limit = vec!["i"; MAX_OPERATORS + 1].join("+");
        assert!(check(&at_limit).is_ok());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let nested = format!("{}i{}", "(".repeat(200), ")".repeat(200));
        let err = check(&nested).unwrap_err();
        assert!(err.contains("nesting deeper than 32"), "{}", err);

        let list = format!("{}1{}", "[".repeat(MAX_NESTING), "]".repeat(MAX_NESTING));
        assert!(check(&list).is_ok());
    }

    #[test]
    fn test_string_literals_are_not_counted() {
        let text = format!("\"{}\" + '{}'", "+".repeat(500), "(\\'".repeat(100));
        assert!(check(&text).is_ok());
    }

    #[test]
    fn test_multi_character_operators_count_once() {
        let chain = vec!["i"; MAX_OPERATORS + 1].join(" == ");
        assert!(check(&chain).is_ok());
    }
}
