use crate::tokens::{tokenize, tokenize_str, Token};
use crate::types::{Atom, Expr};
use std::fmt;

pub type Result<T = Expr> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
pub enum Error {
    UnexpectedCloseParen,
    UnclosedList(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedCloseParen => write!(f, "unexpected ')'"),
            Error::UnclosedList(depth) => {
                write!(f, "unexpected end of input with {} list(s) still open", depth)
            }
        }
    }
}

/// Reads one form from the front of `tokens`, or `None` if they are exhausted.
///
/// Each token is pulled exactly once. Nesting is tracked on an explicit stack
/// of partially built lists rather than by recursion, so deeply nested input
/// cannot exhaust the call stack.
pub fn read_form<I>(tokens: &mut I) -> Result<Option<Expr>>
where
    I: Iterator<Item = Token>,
{
    let mut open: Vec<Vec<Expr>> = Vec::new();
    loop {
        let form = match tokens.next() {
            None => match open.len() {
                0 => return Ok(None),
                depth => return Err(Error::UnclosedList(depth)),
            },
            Some(Token::OpenRoundBracket) => {
                open.push(Vec::new());
                continue;
            }
            Some(Token::CloseRoundBracket) => match open.pop() {
                Some(elements) => Expr::wrap_list(elements),
                None => return Err(Error::UnexpectedCloseParen),
            },
            Some(Token::PlainChars(chars)) => Expr::Atom(Atom::classify(&chars)),
        };
        match open.last_mut() {
            Some(parent) => parent.push(form),
            None => return Ok(Some(form)),
        }
    }
}

/// Reads every top-level form until the tokens run out.
pub fn read_program<I>(tokens: &mut I) -> Result<Vec<Expr>>
where
    I: Iterator<Item = Token>,
{
    let mut program = Vec::new();
    while let Some(form) = read_form(tokens)? {
        program.push(form);
    }
    log::debug!("read {} top-level form(s)", program.len());
    Ok(program)
}

pub fn read_str(input: &str) -> Result<Vec<Expr>> {
    read_program(&mut tokenize_str(input))
}

pub fn read_lines<I, S>(lines: I) -> Result<Vec<Expr>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    read_program(&mut tokenize(lines))
}
