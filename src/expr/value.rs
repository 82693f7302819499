//! Scope values, their kinds, and the types those kinds declare.
//!
//! Every value carries a [`Kind`] tag, and every kind maps to exactly one
//! declared [`Type`]. Values cross into the CEL interpreter through
//! [`Value::to_cel`] and come back through [`Value::from_cel`].

use cel_interpreter::objects::Key;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// A dynamically typed expression value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Double(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

/// Semantic kind of a scope value, used to declare its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Int,
    Double,
    Bool,
    /// String-keyed map whose values are all strings.
    StringMap,
    /// String-keyed map with mixed (or unknown) value types.
    AnyMap,
    /// List whose elements are all strings.
    StringList,
    /// List with mixed (or unknown) element types.
    AnyList,
    /// Anything else; all checks are deferred to evaluation.
    Any,
}

/// Declared type of an expression variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    Int,
    Double,
    String,
    List(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Dyn,
}

impl Kind {
    /// The type a variable of this kind is declared with.
    pub fn declared_type(self) -> Type {
        match self {
            Kind::String => Type::String,
            Kind::Int => Type::Int,
            Kind::Double => Type::Double,
            Kind::Bool => Type::Bool,
            Kind::StringMap => Type::Map(Box::new(Type::String), Box::new(Type::String)),
            Kind::AnyMap => Type::Map(Box::new(Type::String), Box::new(Type::Dyn)),
            Kind::StringList => Type::List(Box::new(Type::String)),
            Kind::AnyList => Type::List(Box::new(Type::Dyn)),
            Kind::Any => Type::Dyn,
        }
    }
}

impl Value {
    /// Infer the semantic kind of this value.
    ///
    /// Empty collections carry no element information and are treated as
    /// heterogeneous.
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Int(_) | Value::Uint(_) => Kind::Int,
            Value::Double(_) => Kind::Double,
            Value::Bool(_) => Kind::Bool,
            Value::Map(entries) => {
                if !entries.is_empty() && entries.values().all(|v| matches!(v, Value::String(_))) {
                    Kind::StringMap
                } else {
                    Kind::AnyMap
                }
            }
            Value::List(items) => {
                if !items.is_empty() && items.iter().all(|v| matches!(v, Value::String(_))) {
                    Kind::StringList
                } else {
                    Kind::AnyList
                }
            }
            Value::Null => Kind::Any,
        }
    }

    pub(crate) fn to_cel(&self) -> cel_interpreter::Value {
        use cel_interpreter::Value as Cel;

        match self {
            Value::Null => Cel::Null,
            Value::Bool(b) => Cel::Bool(*b),
            Value::Int(n) => Cel::Int(*n),
            Value::Uint(n) => Cel::UInt(*n),
            Value::Double(d) => Cel::Float(*d),
            Value::String(s) => Cel::String(Arc::new(s.clone())),
            Value::List(items) => Cel::List(Arc::new(items.iter().map(Value::to_cel).collect())),
            Value::Map(entries) => {
                let map: HashMap<String, Cel> = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_cel()))
                    .collect();
                Cel::from(map)
            }
        }
    }

    /// Convert an interpreter result. Values with no canonical string form
    /// (timestamps, durations, functions) are rejected.
    pub(crate) fn from_cel(value: &cel_interpreter::Value) -> Result<Self, String> {
        use cel_interpreter::Value as Cel;

        Ok(match value {
            Cel::Null => Value::Null,
            Cel::Bool(b) => Value::Bool(*b),
            Cel::Int(n) => Value::Int(*n),
            Cel::UInt(n) => Value::Uint(*n),
            Cel::Float(d) => Value::Double(*d),
            Cel::String(s) => Value::String(s.to_string()),
            Cel::Bytes(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
            Cel::List(items) => Value::List(
                items
                    .iter()
                    .map(Value::from_cel)
                    .collect::<Result<_, _>>()?,
            ),
            Cel::Map(map) => Value::Map(
                map.map
                    .iter()
                    .map(|(k, v)| Ok((key_string(k), Value::from_cel(v)?)))
                    .collect::<Result<_, String>>()?,
            ),
            other => return Err(format!("unsupported result value {:?}", other)),
        })
    }
}

fn key_string(key: &Key) -> String {
    match key {
        Key::Int(n) => n.to_string(),
        Key::Uint(n) => n.to_string(),
        Key::Bool(b) => b.to_string(),
        Key::String(s) => s.to_string(),
    }
}

/// Shortest round-trip digits, switching to exponent form (`1e+21`,
/// `1.5e-07`) when the decimal exponent is below -4 or at least 6.
fn format_double(d: f64) -> String {
    if d.is_nan() {
        return "NaN".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let sci = format!("{:e}", d);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return d.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if d == 0.0 || (-4..6).contains(&exponent) {
        return d.to_string();
    }

    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Double => write!(f, "double"),
            Type::String => write!(f, "string"),
            Type::List(elem) => write!(f, "list({})", elem),
            Type::Map(key, value) => write!(f, "map({}, {})", key, value),
            Type::Dyn => write!(f, "dyn"),
        }
    }
}

/// Canonical string form, used when a value is substituted into a command.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Double(d) => f.write_str(&format_double(*d)),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items.into_iter().map(Value::String).collect())
    }
}

impl From<BTreeMap<String, String>> for Value {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        )
    }
}
