use crate::environment::{Environment, UnknownSymbol};
use crate::primitives::{PrimitiveFn, PRIMITIVES};
use crate::special_forms;
use crate::types::{Atom, BadArgCount, Closure, Expr, TypeMismatch, Value};
use itertools::Itertools;
use std::fmt;
use std::io::Write;

pub type Result<T = Value> = std::result::Result<T, Error>;

/// Evaluating this symbol produces the empty list.
pub const EMPTY_LIST_KEYWORD: &str = "null";

#[derive(Debug)]
pub enum Error {
    UnknownSymbol(UnknownSymbol),
    EmptyApplication,
    Define(special_forms::DefineError),
    Let(special_forms::LetError),
    Lambda(special_forms::LambdaError),
    TypeMismatch(TypeMismatch),
    BadArgCount(BadArgCount),
    EmptyList(&'static str),
    DivideByZero,
    IntegerOverflow(&'static str),
    RecursionLimit(usize),
    IOError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownSymbol(UnknownSymbol(s)) => write!(f, "unknown variable '{}'", s),
            Error::EmptyApplication => write!(f, "cannot evaluate an empty list"),
            Error::Define(e) => write!(f, "define: {:?}", e),
            Error::Let(e) => write!(f, "let: {:?}", e),
            Error::Lambda(e) => write!(f, "lambda: {:?}", e),
            Error::TypeMismatch(e) => write!(f, "type mismatch: {}", e),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::EmptyList(name) => write!(f, "{}: list is empty", name),
            Error::DivideByZero => write!(f, "cannot divide by zero!"),
            Error::IntegerOverflow(name) => write!(f, "{}: integer overflow", name),
            Error::RecursionLimit(depth) => {
                write!(f, "maximum evaluation depth of {} exceeded", depth)
            }
            Error::IOError(e) => write!(f, "io error: {}", e),
        }
    }
}

impl From<TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::TypeMismatch(t)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// How many nested `eval` calls are allowed before giving up. Language
    /// level recursion runs on the host stack, so this must stay well below
    /// what the stack can hold.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}

/// Per-evaluation state threaded alongside the environment.
pub struct Context<'a> {
    pub out: &'a mut dyn Write,
    pub config: &'a Config,
    depth: usize,
}

impl<'a> Context<'a> {
    pub fn new(out: &'a mut dyn Write, config: &'a Config) -> Self {
        Self {
            out,
            config,
            depth: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Evaluates `expr` in `env`.
///
/// `env` is only ever modified by `define`; every other form extends a copy.
#[allow(non_snake_case)]
pub fn EVAL(expr: &Expr, env: &mut Environment, ctx: &mut Context) -> Result {
    if ctx.depth >= ctx.config.max_depth {
        return Err(Error::RecursionLimit(ctx.config.max_depth));
    }
    ctx.depth += 1;
    let result = eval_form(expr, env, ctx);
    ctx.depth -= 1;
    result
}

fn eval_form(expr: &Expr, env: &mut Environment, ctx: &mut Context) -> Result {
    log::trace!("eval {:?}", expr);
    let list = match expr {
        Expr::Atom(atom) => return evaluate_atom(atom, env),
        Expr::List(list) => list,
    };
    let (head, args) = list.split_first().ok_or(Error::EmptyApplication)?;
    if let Expr::Atom(Atom::Symbol(name)) = head {
        match name.as_str() {
            "if" => return special_forms::apply_if(args, env, ctx),
            "let" => return special_forms::apply_let(args, env, ctx),
            "define" => return special_forms::apply_define(args, env, ctx),
            "lambda" => return special_forms::apply_lambda(args, env),
            "display" => return special_forms::apply_display(args, env, ctx),
            "and" => return special_forms::apply_and(args, env, ctx),
            "or" => return special_forms::apply_or(args, env, ctx),
            // Any other initial symbol is either a primitive operator or
            // names a closure, handled below
            _ => (),
        };
        if let Some(func) = PRIMITIVES.get(name.as_str()) {
            return call_primitive(func, args, env, ctx);
        }
    }
    apply(head, args, env, ctx)
}

fn evaluate_atom(atom: &Atom, env: &Environment) -> Result {
    match atom {
        Atom::Symbol(s) if s.as_str() == EMPTY_LIST_KEYWORD => Ok(Value::new_list()),
        Atom::Symbol(s) => env.fetch(s).map_err(Error::UnknownSymbol),
        Atom::Integer(x) => Ok(Value::Integer(*x)),
        Atom::Float(x) => Ok(Value::Float(*x)),
        Atom::Bool(b) => Ok(Value::Bool(*b)),
    }
}

pub fn evaluate_sequence_elementwise(
    seq: &[Expr],
    env: &mut Environment,
    ctx: &mut Context,
) -> Result<Vec<Value>> {
    seq.iter().map(|expr| EVAL(expr, env, ctx)).collect()
}

pub(crate) fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

fn call_primitive(
    func: &PrimitiveFn,
    args: &[Expr],
    env: &mut Environment,
    ctx: &mut Context,
) -> Result {
    func.arity
        .validate_for(args.len(), func.name)
        .map_err(Error::BadArgCount)?;
    let args = evaluate_sequence_elementwise(args, env, ctx)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(&args));
    let result = (func.fn_ptr)(&args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

/// Calls the closure `head` evaluates to. When `head` is a bare name, that
/// name is bound to the closure inside its own body, which is what lets a
/// defined function refer to itself.
fn apply(head: &Expr, args: &[Expr], env: &mut Environment, ctx: &mut Context) -> Result {
    let callable = EVAL(head, env, ctx)?;
    let args = evaluate_sequence_elementwise(args, env, ctx)?;
    let closure = callable.as_closure()?.clone();
    let mut call_env = make_closure_env(&closure, &args)?;
    if let Expr::Atom(Atom::Symbol(name)) = head {
        call_env.prepend(name.clone(), callable.clone());
    }
    EVAL(&closure.body, &mut call_env, ctx)
}

fn make_closure_env(func: &Closure, args: &[Value]) -> Result<Environment> {
    log::trace!("Call {} with {}", func, pretty_print_args(args));
    func.arity()
        .validate_for(args.len(), "closure")
        .map_err(Error::BadArgCount)?;
    let mut env = func.parent.clone();
    // Prepend back to front so the first parameter ends up first.
    for (key, value) in func.parameters.iter().zip(args).rev() {
        env.prepend(key.clone(), value.clone());
    }
    Ok(env)
}
