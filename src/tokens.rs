use regex::Regex;
use std::collections::VecDeque;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Token {
    OpenRoundBracket,
    CloseRoundBracket,
    PlainChars(String),
}

fn create_token(captured: &str) -> Token {
    match captured {
        "(" => Token::OpenRoundBracket,
        ")" => Token::CloseRoundBracket,
        _ => Token::PlainChars(String::from(captured)),
    }
}

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(
        r#"(?x)                  # ignore whitespace in this pattern & allow comments
            [()]                 # round brackets delimit themselves
            |[^\s()]+            # a run of anything else up to whitespace or a bracket
        "#
    )
    .unwrap();
}

/// Lazily splits a sequence of source lines into tokens. Each line is only
/// pulled from the underlying iterator once the tokens of the previous line
/// have been consumed.
pub struct Tokens<I> {
    lines: I,
    pending: VecDeque<Token>,
}

impl<I, S> Tokens<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            pending: VecDeque::new(),
        }
    }
}

impl<I, S> Iterator for Tokens<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.pending.is_empty() {
            let line = self.lines.next()?;
            self.pending
                .extend(TOKEN_RE.find_iter(line.as_ref()).map(|m| create_token(m.as_str())));
        }
        self.pending.pop_front()
    }
}

pub fn tokenize<I, S>(lines: I) -> Tokens<I::IntoIter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Tokens::new(lines.into_iter())
}

pub fn tokenize_str(input: &str) -> Tokens<std::str::Lines> {
    Tokens::new(input.lines())
}
