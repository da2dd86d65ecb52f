use crate::environment::Environment;
use crate::evaluator::{self, Config, Context, EVAL};
use crate::reader;
use crate::types::{Expr, Value};
use derive_more::From;
use std::fmt;
use std::io::Write;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "read error: {}", e),
            Error::Eval(e) => write!(f, "eval error: {}", e),
        }
    }
}

/// A running session: the top-level environment plus where `display` writes.
pub struct Interpreter<W: Write> {
    env: Environment,
    config: Config,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self::with_config(out, Config::default())
    }

    pub fn with_config(out: W, config: Config) -> Self {
        Self {
            env: Environment::new(),
            config,
            out,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Evaluates one top-level form against a working copy of the session
    /// environment. The copy replaces the session environment only if
    /// evaluation succeeds, so a failing form leaves no partial definitions.
    pub fn eval(&mut self, form: &Expr) -> Result {
        let mut env = self.env.clone();
        let mut ctx = Context::new(&mut self.out, &self.config);
        let value = EVAL(form, &mut env, &mut ctx)?;
        self.env = env;
        log::debug!("committed environment {}", self.env);
        Ok(value)
    }

    /// Reads a line and evaluates its first form. Blank lines give `None`.
    pub fn rep(&mut self, line: &str) -> Result<Option<Value>> {
        let forms = reader::read_str(line)?;
        let form = match forms.split_first() {
            None => return Ok(None),
            Some((form, rest)) => {
                if !rest.is_empty() {
                    log::warn!("ignoring {} form(s) after the first", rest.len());
                }
                form
            }
        };
        self.eval(form).map(Some)
    }

    /// Evaluates forms in order, stopping at the first failure.
    pub fn run_program(&mut self, program: &[Expr]) -> Result<()> {
        for form in program {
            self.eval(form)?;
        }
        Ok(())
    }

    /// Reads a whole program before evaluating any of it, so a syntax error
    /// anywhere means nothing runs.
    pub fn run_lines<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let program = reader::read_lines(lines)?;
        self.run_program(&program)
    }

    pub fn run_str(&mut self, source: &str) -> Result<()> {
        self.run_lines(source.lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;

    fn session() -> Interpreter<Vec<u8>> {
        Interpreter::new(Vec::new())
    }

    #[test]
    fn definitions_persist_between_lines() {
        let mut interpreter = session();
        assert!(interpreter.rep("(define x 10)").unwrap().unwrap().is_void());
        assert_eq!(interpreter.rep("x").unwrap(), Some(Value::Integer(10)));
    }

    #[test]
    fn failed_lines_leave_the_environment_untouched() {
        let mut interpreter = session();
        let result = interpreter.rep("(if (define x 1) 1 (car null))");
        assert!(matches!(result, Err(Error::Eval(_))));
        assert!(interpreter.env().get(&Symbol::from("x")).is_none());
    }

    #[test]
    fn blank_lines_evaluate_nothing() {
        let mut interpreter = session();
        assert_eq!(interpreter.rep("   ").unwrap(), None);
    }

    #[test]
    fn only_the_first_form_on_a_line_is_evaluated() {
        let mut interpreter = session();
        assert_eq!(
            interpreter.rep("1 (display 2)").unwrap(),
            Some(Value::Integer(1))
        );
        assert!(interpreter.output().is_empty());
    }

    #[test]
    fn syntax_errors_are_read_errors() {
        let mut interpreter = session();
        assert!(matches!(
            interpreter.rep("(+ 1"),
            Err(Error::Read(reader::Error::UnclosedList(1)))
        ));
    }

    #[test]
    fn very_deep_lines_fail_without_ending_the_session() {
        let mut interpreter = session();
        let depth = 1_000_000;
        let line = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
        assert!(matches!(
            interpreter.rep(&line),
            Err(Error::Eval(evaluator::Error::RecursionLimit(_)))
        ));
        assert_eq!(interpreter.rep("(+ 1 2)").unwrap(), Some(Value::Integer(3)));
    }

    #[test]
    fn programs_stop_at_the_first_failure() {
        let mut interpreter = session();
        let result = interpreter.run_str("(display 1) (car null) (display 2)");
        assert!(result.is_err());
        assert_eq!(interpreter.into_output(), b"1\n");
    }

    #[test]
    fn programs_with_syntax_errors_do_not_run() {
        let mut interpreter = session();
        let result = interpreter.run_str("(display 1)\n(display 2))");
        assert!(matches!(
            result,
            Err(Error::Read(reader::Error::UnexpectedCloseParen))
        ));
        assert!(interpreter.output().is_empty());
    }
}
