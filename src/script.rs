// SPDX-License-Identifier: MIT
//
// Script parsing — one directive per line.
//
//   open PATH        open a listed document and make it active
//   open             open an unnamed listed document
//   scratch          open an unlisted document and make it active
//   close N          remove document N
//   modify N         mark document N modified
//   save N           clear document N's modified flag
//   focus N          make document N active without cycling
//   next | prev | toggle | dismiss
//   run NAME         run a command by name (BufCycleNext, prev, ...)
//   key KEY          press a bound key
//   wait MS          advance the clock, firing due timers
//   resize COLSxROWS change the viewport
//   show             print the screen
//
// Blank lines and lines starting with `#` are ignored.

use bufcycle_core::Command;
use bufcycle_core::host::Size;
use thiserror::Error;

/// One parsed script directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Open(Option<String>),
    Scratch,
    Close(u32),
    Modify(u32),
    Save(u32),
    Focus(u32),
    Run(Command),
    Key(String),
    Wait(u64),
    Resize(Size),
    Show,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown directive `{0}`")]
    UnknownDirective(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("`{0}` takes no argument")]
    UnexpectedArgument(&'static str),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("invalid size `{0}` (expected COLSxROWS)")]
    InvalidSize(String),
}

/// Parse one script line. Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem on the line.
pub fn parse_line(line: &str) -> Result<Option<Step>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((w, rest)) => (w, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (line, None),
    };

    let step = match word {
        "open" => Step::Open(arg.map(str::to_string)),
        "scratch" => no_arg("scratch", arg, Step::Scratch)?,
        "close" => Step::Close(number(required("close", arg)?)?),
        "modify" => Step::Modify(number(required("modify", arg)?)?),
        "save" => Step::Save(number(required("save", arg)?)?),
        "focus" => Step::Focus(number(required("focus", arg)?)?),
        "next" => no_arg("next", arg, Step::Run(Command::Next))?,
        "prev" => no_arg("prev", arg, Step::Run(Command::Prev))?,
        "toggle" => no_arg("toggle", arg, Step::Run(Command::Toggle))?,
        "dismiss" => no_arg("dismiss", arg, Step::Run(Command::Close))?,
        "run" => {
            let name = required("run", arg)?;
            Step::Run(
                Command::from_name(name)
                    .ok_or_else(|| ParseError::UnknownCommand(name.to_string()))?,
            )
        }
        "key" => Step::Key(required("key", arg)?.to_string()),
        "wait" => Step::Wait(number(required("wait", arg)?)?),
        "resize" => Step::Resize(parse_size(required("resize", arg)?)?),
        "show" => no_arg("show", arg, Step::Show)?,
        other => return Err(ParseError::UnknownDirective(other.to_string())),
    };
    Ok(Some(step))
}

/// Parse `COLSxROWS`, e.g. `80x24`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidSize`] unless both parts are positive integers.
pub fn parse_size(text: &str) -> Result<Size, ParseError> {
    let invalid = || ParseError::InvalidSize(text.to_string());
    let (cols, rows) = text.split_once(['x', 'X']).ok_or_else(invalid)?;
    let cols: u16 = cols.trim().parse().map_err(|_| invalid())?;
    let rows: u16 = rows.trim().parse().map_err(|_| invalid())?;
    if cols == 0 || rows == 0 {
        return Err(invalid());
    }
    Ok(Size::new(cols, rows))
}

fn required<'a>(name: &'static str, arg: Option<&'a str>) -> Result<&'a str, ParseError> {
    arg.ok_or(ParseError::MissingArgument(name))
}

fn no_arg(name: &'static str, arg: Option<&str>, step: Step) -> Result<Step, ParseError> {
    match arg {
        None => Ok(step),
        Some(_) => Err(ParseError::UnexpectedArgument(name)),
    }
}

fn number<T: std::str::FromStr>(text: &str) -> Result<T, ParseError> {
    text.parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
