#![allow(dead_code)]

use rust_minilisp::interpreter;
use rust_minilisp::{Interpreter, Value};

/// Runs `source` as a program and returns the value of `query` evaluated
/// afterwards in the same session.
pub fn eval_after(source: &str, query: &str) -> interpreter::Result<Option<Value>> {
    let mut session = Interpreter::new(Vec::new());
    session.run_str(source)?;
    session.rep(query)
}

pub fn eval(query: &str) -> interpreter::Result<Value> {
    let mut session = Interpreter::new(Vec::new());
    session.rep(query).map(|v| v.unwrap_or(Value::Void))
}

/// Runs `source` and returns everything it displayed.
pub fn displayed(source: &str) -> (interpreter::Result<()>, String) {
    let mut session = Interpreter::new(Vec::new());
    let result = session.run_str(source);
    let out = String::from_utf8(session.into_output()).unwrap();
    (result, out)
}

pub fn int(x: i64) -> Value {
    Value::Integer(x)
}

pub fn list(elements: Vec<Value>) -> Value {
    Value::wrap_list(elements)
}
