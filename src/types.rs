use crate::environment::Environment;
use derive_more::Deref;
use itertools::Itertools;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Int = i64;
pub type Float = f64;

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(String::from(name))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A classified non-bracket token.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Integer(Int),
    Float(Float),
    Bool(bool),
    Symbol(Symbol),
}

impl Atom {
    /// Classification order matters: `1` is an integer, `1.5` a float,
    /// `#t`/`#f` booleans and anything else a symbol.
    pub fn classify(token: &str) -> Self {
        if let Ok(x) = token.parse::<Int>() {
            return Atom::Integer(x);
        }
        if let Ok(x) = token.parse::<Float>() {
            return Atom::Float(x);
        }
        match token {
            "#t" => Atom::Bool(true),
            "#f" => Atom::Bool(false),
            _ => Atom::Symbol(Symbol::from(token)),
        }
    }
}

#[derive(Deref, Debug, PartialEq)]
pub struct ExprList(pub Vec<Expr>);

// The reader accepts nesting limited only by memory, so freeing a tree must
// not recurse once per level.
impl Drop for ExprList {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.0);
        while let Some(expr) = pending.pop() {
            if let Expr::List(list) = expr {
                if let Ok(mut list) = Rc::try_unwrap(list) {
                    pending.append(&mut list.0);
                }
            }
        }
    }
}

/// A parsed source form. Lists are reference counted so that closures can
/// hold on to their bodies without copying the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Atom(Atom),
    List(Rc<ExprList>),
}

impl Expr {
    pub fn wrap_list(elements: Vec<Expr>) -> Self {
        Expr::List(Rc::new(ExprList(elements)))
    }

    pub fn new_symbol(name: &str) -> Self {
        Expr::Atom(Atom::Symbol(Symbol::from(name)))
    }

    pub(crate) fn as_symbol(&self) -> Result<&Symbol, TypeMismatch> {
        match self {
            Expr::Atom(Atom::Symbol(s)) => Ok(s),
            _ => Err(TypeMismatch::NotASymbol),
        }
    }

    pub(crate) fn as_list(&self) -> Result<&[Expr], TypeMismatch> {
        match self {
            Expr::List(list) => Ok(list),
            _ => Err(TypeMismatch::NotAList),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: String,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "When evaluating {} expected {} arguments, but received {} arguments",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name: String::from(name),
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

#[derive(Clone)]
pub struct Closure {
    pub parameters: Vec<Symbol>,
    pub body: Expr,
    pub parent: Environment,
}

impl Closure {
    pub fn arity(&self) -> Arity {
        Arity::exactly(self.parameters.len())
    }
}

impl fmt::Debug for Closure {
    // Not derived because we want to skip the parent: it is usually large and
    // may well contain other closures.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure{{parameters: {:?}, body: {:?}}}",
            self.parameters, self.body
        )
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#<closure ({})>", self.parameters.iter().join(" "))
    }
}

#[derive(Deref, Debug, PartialEq)]
pub struct List(pub Vec<Value>);

#[derive(Debug, Clone)]
pub enum Value {
    Void,
    Integer(Int),
    Float(Float),
    Bool(bool),
    List(Rc<List>),
    Closure(Rc<Closure>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(Int),
    Float(Float),
}

impl Number {
    pub(crate) fn as_float(self) -> Float {
        match self {
            Number::Integer(x) => x as Float,
            Number::Float(x) => x,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Integer(x) => Value::Integer(x),
            Number::Float(x) => Value::Float(x),
        }
    }
}

pub(crate) fn truthy(value: &Value) -> bool {
    use Value::*;
    match value {
        Void => false,
        Bool(b) => *b,
        Integer(x) => *x != 0,
        Float(x) => *x != 0.0,
        List(list) => !list.is_empty(),
        Closure(_) => true,
    }
}

#[derive(Debug)]
pub enum TypeMismatch {
    NotANumber,
    NotAList,
    NotASymbol,
    NotCallable,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let expected = match self {
            TypeMismatch::NotANumber => "a number",
            TypeMismatch::NotAList => "a list",
            TypeMismatch::NotASymbol => "a symbol",
            TypeMismatch::NotCallable => "a closure",
        };
        write!(f, "expected {}", expected)
    }
}

impl Value {
    pub(crate) fn as_number(&self) -> Result<Number, TypeMismatch> {
        match self {
            Value::Integer(x) => Ok(Number::Integer(*x)),
            Value::Float(x) => Ok(Number::Float(*x)),
            _ => Err(TypeMismatch::NotANumber),
        }
    }

    pub(crate) fn as_list(&self) -> Result<&[Value], TypeMismatch> {
        match self {
            Value::List(x) => Ok(x),
            _ => Err(TypeMismatch::NotAList),
        }
    }

    pub(crate) fn as_closure(&self) -> Result<&Rc<Closure>, TypeMismatch> {
        match self {
            Value::Closure(c) => Ok(c),
            _ => Err(TypeMismatch::NotCallable),
        }
    }

    pub fn new_list() -> Self {
        Self::List(Rc::new(List(Vec::new())))
    }

    pub fn wrap_list(elements: Vec<Value>) -> Self {
        Self::List(Rc::new(List(elements)))
    }

    pub fn is_void(&self) -> bool {
        match self {
            Value::Void => true,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        if let (Ok(x), Ok(y)) = (self.as_number(), other.as_number()) {
            return match (x, y) {
                (Number::Integer(x), Number::Integer(y)) => x == y,
                (x, y) => x.as_float() == y.as_float(),
            };
        }
        match [self, other] {
            [Bool(x), Bool(y)] => x == y,
            [List(x), List(y)] => x.len() == y.len() && x.iter().zip(y.iter()).all(|(x, y)| x == y),
            [Closure(x), Closure(y)] => Rc::ptr_eq(x, y),
            [Void, Void] => true,
            [_, _] => false,
        }
    }
}
