use crate::types::Value;
use itertools::Itertools;
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => Ok(()),
            Value::Integer(x) => write!(f, "{}", x),
            // Debug keeps the fractional part, so 2.0 doesn't read back as an integer.
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::List(elements) => write!(f, "({})", elements.iter().join(" ")),
            Value::Closure(c) => write!(f, "{}", c),
        }
    }
}

pub fn pr_str(value: &Value) -> String {
    value.to_string()
}
