use crate::evaluator::Config;
use crate::interpreter::{self, Interpreter};
use crate::printer::pr_str;
use ansi_term::Color;
use derive_more::From;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fs::read_to_string;
use std::io::{self, Write};
use std::path::PathBuf;

static PROMPT: &str = "minilisp> ";
static INVALID_INPUT: &str = "*** Invalid input ***";
static INVALID_SOURCE_FILE: &str = "Invalid source file";
static FAREWELL: &str = "Leaving minilisp.";
static BANNER: &str = "\
****************************************
minilisp - a small Lisp written in Rust
Ctrl-D to leave
****************************************";

pub static MAX_DEPTH_VAR: &str = "MINILISP_MAX_DEPTH";

#[derive(Debug, From)]
pub enum Error {
    IOError(io::Error),
}

pub fn setup() -> io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("minilisp")?;
    interface.set_prompt(&prompt())?;
    if let Some(path) = history_path() {
        if let Err(e) = interface.load_history(&path) {
            log::info!("not loading history from {}: {}", path.display(), e);
        }
    };
    Ok(interface)
}

fn prompt() -> String {
    if !atty::is(atty::Stream::Stdout) {
        return String::from(PROMPT);
    }
    let style = Color::Purple.bold();
    // linefeed needs the escape sequences bracketed so it can ignore their width
    format!(
        "\x01{prefix}\x02{text}\x01{suffix}\x02",
        prefix = style.prefix(),
        text = PROMPT,
        suffix = style.suffix()
    )
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".minilisp_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

pub fn repl<T: Terminal>(interface: &Interface<T>, mut processor: impl FnMut(&str) -> Option<String>) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => {
                writeln!(interface, "\n{}", FAREWELL).ok();
                break;
            }
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(line.clone());
                if let Some(output) = processor(&line) {
                    writeln!(interface, "{}", output).ok();
                }
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}

/// What the interactive loop shows for one line. Every failure collapses to
/// the same message; the detail only goes to the log.
pub fn respond<W: Write>(interpreter: &mut Interpreter<W>, line: &str) -> Option<String> {
    match interpreter.rep(line) {
        Ok(None) => None,
        Ok(Some(value)) if value.is_void() => None,
        Ok(Some(value)) => Some(pr_str(&value)),
        Err(e) => {
            log::warn!("{:?}: {}", line, e);
            Some(String::from(INVALID_INPUT))
        }
    }
}

pub fn run_repl(config: Config) -> Result<(), Error> {
    println!("{}", BANNER);
    let interface = setup()?;
    let mut interpreter = Interpreter::with_config(io::stdout(), config);
    repl(&interface, |line| respond(&mut interpreter, line));
    save_history(&interface)?;
    Ok(())
}

#[derive(Debug, From)]
enum SourceError {
    Unreadable(io::Error),
    Failed(interpreter::Error),
}

fn run_source<W: Write>(interpreter: &mut Interpreter<W>, path: &str) -> Result<(), SourceError> {
    let source = read_to_string(path)?;
    interpreter.run_lines(source.lines())?;
    Ok(())
}

/// Runs a file to completion. Any failure, including an unreadable file, is
/// reported as the same single message on `out`.
pub fn run_file<W: Write>(path: &str, config: Config, mut out: W) -> Result<W, Error> {
    let outcome = {
        let mut interpreter = Interpreter::with_config(&mut out, config);
        run_source(&mut interpreter, path)
    };
    if let Err(e) = outcome {
        log::warn!("{}: {:?}", path, e);
        writeln!(out, "{}", INVALID_SOURCE_FILE)?;
    }
    Ok(out)
}

pub(crate) fn config_from(max_depth: Option<&str>) -> Config {
    let mut config = Config::default();
    if let Some(raw) = max_depth {
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => config.max_depth = n,
            _ => log::warn!("ignoring {}={:?}, expected a positive integer", MAX_DEPTH_VAR, raw),
        }
    }
    config
}

pub fn config_from_env() -> Config {
    config_from(std::env::var(MAX_DEPTH_VAR).ok().as_deref())
}

pub fn launch(args: Vec<String>) -> Result<(), Error> {
    let config = config_from_env();
    log::debug!("launching with {:?}", config);
    match args.as_slice() {
        [_] | [] => run_repl(config),
        [_, path] => run_file(path, config, io::stdout()).map(|_| ()),
        [program, ..] => {
            eprintln!("usage: {} [SOURCE]", program);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_source(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("minilisp-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn run_path(path: &Path) -> String {
        let out = run_file(path.to_str().unwrap(), Config::default(), Vec::new()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn file_mode_runs_every_form() {
        let path = write_source(
            "ok.scm",
            "(define square (lambda (x) (* x x)))\n(display (square 12))\n",
        );
        assert_eq!(run_path(&path), "144\n");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn file_mode_collapses_failures() {
        let path = write_source("bad.scm", "(display 1)\n(display y)\n");
        assert_eq!(run_path(&path), "1\nInvalid source file\n");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_files_are_invalid_source_files() {
        let path = std::env::temp_dir().join("minilisp-definitely-missing.scm");
        assert_eq!(run_path(&path), "Invalid source file\n");
    }

    #[test]
    fn responses_collapse_errors() {
        let mut interpreter = Interpreter::new(Vec::new());
        assert_eq!(respond(&mut interpreter, "(+ 1 2)"), Some(String::from("3")));
        assert_eq!(respond(&mut interpreter, "(define x 1)"), None);
        assert_eq!(
            respond(&mut interpreter, "(- 1 2 3)"),
            Some(String::from(INVALID_INPUT))
        );
        assert_eq!(
            respond(&mut interpreter, ")"),
            Some(String::from(INVALID_INPUT))
        );
        assert_eq!(respond(&mut interpreter, "x"), Some(String::from("1")));
    }

    #[test]
    fn max_depth_override() {
        assert_eq!(config_from(Some("64")).max_depth, 64);
        assert_eq!(config_from(Some("0")).max_depth, Config::default().max_depth);
        assert_eq!(config_from(Some("lots")).max_depth, Config::default().max_depth);
        assert_eq!(config_from(None).max_depth, Config::default().max_depth);
    }
}
