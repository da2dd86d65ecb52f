use crate::evaluator::{self, Error};
use crate::types::{Arity, Float, Int, Number, Value};
use std::collections::HashMap;

/// An operator whose operands are all evaluated before it runs.
pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[Value]) -> evaluator::Result,
}

impl std::fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

fn arithmetic(
    name: &'static str,
    x: Number,
    y: Number,
    int_op: fn(Int, Int) -> Option<Int>,
    float_op: fn(Float, Float) -> Float,
) -> evaluator::Result<Number> {
    match (x, y) {
        (Number::Integer(x), Number::Integer(y)) => int_op(x, y)
            .map(Number::Integer)
            .ok_or(Error::IntegerOverflow(name)),
        (x, y) => Ok(Number::Float(float_op(x.as_float(), y.as_float()))),
    }
}

fn fold_numbers(
    name: &'static str,
    args: &[Value],
    identity: Int,
    int_op: fn(Int, Int) -> Option<Int>,
    float_op: fn(Float, Float) -> Float,
) -> evaluator::Result {
    let total = args.iter().try_fold(Number::Integer(identity), |acc, x| {
        arithmetic(name, acc, x.as_number()?, int_op, float_op)
    })?;
    Ok(total.into())
}

static SUM: PrimitiveFn = PrimitiveFn {
    name: "+",
    fn_ptr: sum_,
    arity: Arity::at_least(0),
};

fn sum_(args: &[Value]) -> evaluator::Result {
    fold_numbers("+", args, 0, Int::checked_add, |x, y| x + y)
}

static MUL: PrimitiveFn = PrimitiveFn {
    name: "*",
    fn_ptr: mul_,
    arity: Arity::at_least(0),
};

fn mul_(args: &[Value]) -> evaluator::Result {
    fold_numbers("*", args, 1, Int::checked_mul, |x, y| x * y)
}

static SUB: PrimitiveFn = PrimitiveFn {
    name: "-",
    fn_ptr: sub_,
    arity: Arity::exactly(2),
};

fn sub_(args: &[Value]) -> evaluator::Result {
    let (x, y) = (args[0].as_number()?, args[1].as_number()?);
    arithmetic("-", x, y, Int::checked_sub, |x, y| x - y).map(Value::from)
}

static DIV: PrimitiveFn = PrimitiveFn {
    name: "/",
    fn_ptr: div_,
    arity: Arity::exactly(2),
};

/// Integer division rounds towards negative infinity.
fn floor_div(x: Int, y: Int) -> Option<Int> {
    let quotient = x.checked_div(y)?;
    if x % y != 0 && (x < 0) != (y < 0) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

fn div_(args: &[Value]) -> evaluator::Result {
    let (x, y) = (args[0].as_number()?, args[1].as_number()?);
    if y.as_float() == 0.0 {
        return Err(Error::DivideByZero);
    }
    arithmetic("/", x, y, floor_div, |x, y| x / y).map(Value::from)
}

static EQUAL: PrimitiveFn = PrimitiveFn {
    name: "=",
    fn_ptr: equal_,
    arity: Arity::exactly(2),
};

fn equal_(args: &[Value]) -> evaluator::Result {
    Ok(Value::Bool(args[0] == args[1]))
}

fn comparison_(
    args: &[Value],
    int_cmp: fn(&Int, &Int) -> bool,
    float_cmp: fn(&Float, &Float) -> bool,
) -> evaluator::Result {
    let result = match (args[0].as_number()?, args[1].as_number()?) {
        (Number::Integer(x), Number::Integer(y)) => int_cmp(&x, &y),
        (x, y) => float_cmp(&x.as_float(), &y.as_float()),
    };
    Ok(Value::Bool(result))
}

macro_rules! comparison_primitive {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            static $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                fn_ptr: |args: &[Value]| {
                    comparison_(args, Int:: [<$NAME:lower>], Float:: [<$NAME:lower>])
                },
                arity: Arity::exactly(2),
            };
        }
    };
}

comparison_primitive!(<, LT);
comparison_primitive!(>, GT);

static CONS: PrimitiveFn = PrimitiveFn {
    name: "cons",
    fn_ptr: cons_,
    arity: Arity::exactly(2),
};

fn cons_(args: &[Value]) -> evaluator::Result {
    let tail = args[1].as_list()?;
    let mut result = Vec::with_capacity(tail.len() + 1);
    result.push(args[0].clone());
    result.extend_from_slice(tail);
    Ok(Value::wrap_list(result))
}

static CAR: PrimitiveFn = PrimitiveFn {
    name: "car",
    fn_ptr: car_,
    arity: Arity::exactly(1),
};

fn car_(args: &[Value]) -> evaluator::Result {
    args[0]
        .as_list()?
        .first()
        .cloned()
        .ok_or(Error::EmptyList("car"))
}

static CDR: PrimitiveFn = PrimitiveFn {
    name: "cdr",
    fn_ptr: cdr_,
    arity: Arity::exactly(1),
};

fn cdr_(args: &[Value]) -> evaluator::Result {
    match args[0].as_list()? {
        [] => Err(Error::EmptyList("cdr")),
        [_, rest @ ..] => Ok(Value::wrap_list(rest.to_vec())),
    }
}

static LIST: PrimitiveFn = PrimitiveFn {
    name: "list",
    fn_ptr: list_,
    arity: Arity::at_least(0),
};

fn list_(args: &[Value]) -> evaluator::Result {
    Ok(Value::wrap_list(args.to_vec()))
}

static NULL_TEST: PrimitiveFn = PrimitiveFn {
    name: "null?",
    fn_ptr: null_test_,
    arity: Arity::exactly(1),
};

fn null_test_(args: &[Value]) -> evaluator::Result {
    Ok(Value::Bool(args[0] == Value::new_list()))
}

type Namespace = HashMap<&'static str, &'static PrimitiveFn>;
lazy_static! {
    pub static ref PRIMITIVES: Namespace = {
        let mut map = Namespace::new();
        for &func in [
            // Arithmetic
            &SUM,
            &SUB,
            &MUL,
            &DIV,
            // Comparisons
            &EQUAL,
            &LT,
            &GT,
            // Working with lists
            &CONS,
            &CAR,
            &CDR,
            &LIST,
            &NULL_TEST,
        ].iter() {
            map.insert(func.name, func);
        }
        map
    };
}
