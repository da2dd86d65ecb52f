use crate::environment::Environment;
use crate::evaluator::{Context, Error, Result, EVAL};
use crate::printer::pr_str;
use crate::types::{truthy, Arity, Closure, Expr, Symbol, Value};
use std::io::Write;
use std::rc::Rc;

pub fn apply_if(args: &[Expr], env: &mut Environment, ctx: &mut Context) -> Result {
    Arity::exactly(3)
        .validate_for(args.len(), "if")
        .map_err(Error::BadArgCount)?;
    let condition = EVAL(&args[0], env, ctx)?;
    if truthy(&condition) {
        EVAL(&args[1], env, ctx)
    } else {
        EVAL(&args[2], env, ctx)
    }
}

#[derive(Debug)]
pub enum LetError {
    BindingsNotList,
    BindingNotPair,
    BindToNonSymbol,
}

/// Every value is evaluated in the outer environment, so bindings in one
/// `let` cannot see each other. Later bindings shadow earlier ones of the
/// same name.
pub fn apply_let(args: &[Expr], env: &mut Environment, ctx: &mut Context) -> Result {
    Arity::exactly(2)
        .validate_for(args.len(), "let")
        .map_err(Error::BadArgCount)?;
    let bindings = args[0]
        .as_list()
        .or(Err(Error::Let(LetError::BindingsNotList)))?;

    let mut child = env.clone();
    for binding in bindings {
        let (key, value) = match binding.as_list() {
            Ok([key, value]) => Ok((key, value)),
            _ => Err(Error::Let(LetError::BindingNotPair)),
        }?;
        let key = key
            .as_symbol()
            .or(Err(Error::Let(LetError::BindToNonSymbol)))?;
        let value = EVAL(value, env, ctx)?;
        child.prepend(key.clone(), value);
    }
    EVAL(&args[1], &mut child, ctx)
}

#[derive(Debug)]
pub enum DefineError {
    KeyNotASymbol,
}

/// The one form that modifies the environment it is given rather than a copy.
pub fn apply_define(args: &[Expr], env: &mut Environment, ctx: &mut Context) -> Result {
    Arity::exactly(2)
        .validate_for(args.len(), "define")
        .map_err(Error::BadArgCount)?;
    let key = args[0]
        .as_symbol()
        .or(Err(Error::Define(DefineError::KeyNotASymbol)))?;
    let value = EVAL(&args[1], env, ctx)?;
    log::debug!("define {} as {}", key, value);
    env.prepend(key.clone(), value);
    Ok(Value::Void)
}

#[derive(Debug)]
pub enum LambdaError {
    ParametersNotGivenAsList,
    ParameterNotASymbol,
}

pub fn apply_lambda(args: &[Expr], env: &Environment) -> Result {
    // We expect exactly two arguments. The first, a parameters list, should be
    // a list of symbols. The second, the function body, is any expression and
    // is not evaluated until the closure is called.
    Arity::exactly(2)
        .validate_for(args.len(), "lambda")
        .map_err(Error::BadArgCount)?;
    let parameters = args[0]
        .as_list()
        .or(Err(Error::Lambda(LambdaError::ParametersNotGivenAsList)))?;
    let parameters = parameters
        .iter()
        .map(|p| p.as_symbol().map(Symbol::clone))
        .collect::<std::result::Result<Vec<_>, _>>()
        .or(Err(Error::Lambda(LambdaError::ParameterNotASymbol)))?;

    let closure = Closure {
        parameters,
        body: args[1].clone(),
        parent: env.clone(),
    };
    Ok(Value::Closure(Rc::new(closure)))
}

pub fn apply_display(args: &[Expr], env: &mut Environment, ctx: &mut Context) -> Result {
    Arity::exactly(1)
        .validate_for(args.len(), "display")
        .map_err(Error::BadArgCount)?;
    let value = EVAL(&args[0], env, ctx)?;
    writeln!(ctx.out, "{}", pr_str(&value))?;
    Ok(Value::Void)
}

pub fn apply_and(args: &[Expr], env: &mut Environment, ctx: &mut Context) -> Result {
    for arg in args {
        if !truthy(&EVAL(arg, env, ctx)?) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

pub fn apply_or(args: &[Expr], env: &mut Environment, ctx: &mut Context) -> Result {
    for arg in args {
        if truthy(&EVAL(arg, env, ctx)?) {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}
