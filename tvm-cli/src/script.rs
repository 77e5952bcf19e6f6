//! Keystroke scripts.
//!
//! A script is whitespace-separated tokens, one or more per line. Tokens
//! are case-insensitive and `#` starts a comment that runs to the end of
//! the line.
//!
//! | Tokens                      | Command                         |
//! |-----------------------------|---------------------------------|
//! | `0`..`9`, `1000`, `2.5`     | one `Digit`/`Dot` per character |
//! | `-1000`                     | the digits, then `+/-`          |
//! | `.`                         | `Dot`                           |
//! | `+` `-` `*`/`x` `/` `^`/`y^x` | binary operators              |
//! | `=`                         | `Equals`                        |
//! | `+/-`                       | `SignToggle`                    |
//! | `%` `sqrt` `x2` `1/x` `ln`  | unary functions                 |
//! | `CE`, `C`, `CE/C`           | `Clear`                         |
//! | `2ND`                       | `Shift`                         |
//! | `STO` `RCL` `CPT`           | pending modes                   |
//! | `N` `I`/`I/Y` `PV` `PMT` `FV` | `VariableSelect`              |
//! | `ON` `OFF` `PWR`            | `PowerToggle`                   |
//! | `CLRTVM`                    | `ClearTvm`                      |
//!
//! # Examples
//!
//! ```
//! use tvm_cli::parse_script;
//! use tvm_core::{Command, TvmVar};
//!
//! let commands = parse_script("5 PV  # present value").unwrap();
//! assert_eq!(
//!     commands,
//!     vec![Command::Digit(5), Command::VariableSelect(TvmVar::Pv)],
//! );
//! ```

use thiserror::Error;
use tvm_core::{Command, Operator, TvmVar, UnaryOp};

/// Errors that can occur while reading a keystroke script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// The token does not name any key.
    #[error("unknown key '{0}'")]
    UnknownToken(String),

    /// An unknown token, with the script line it came from.
    #[error("line {line}: unknown key '{token}'")]
    UnknownTokenAt { line: usize, token: String },
}

/// Parses one token into the commands it stands for.
///
/// Most tokens are a single key; numeric literals expand to one key per
/// character.
pub fn parse_token(token: &str) -> Result<Vec<Command>, ScriptError> {
    if let Some(commands) = parse_number(token) {
        return Ok(commands);
    }

    let upper = token.to_ascii_uppercase();
    let command = match upper.as_str() {
        "+" => Command::Operator(Operator::Add),
        "-" => Command::Operator(Operator::Subtract),
        "*" | "X" => Command::Operator(Operator::Multiply),
        "/" => Command::Operator(Operator::Divide),
        "^" | "Y^X" | "YX" => Command::Operator(Operator::Power),
        "=" => Command::Equals,
        "+/-" => Command::SignToggle,
        "%" => Command::Unary(UnaryOp::Percent),
        "SQRT" => Command::Unary(UnaryOp::Sqrt),
        "X2" | "X^2" => Command::Unary(UnaryOp::Square),
        "1/X" => Command::Unary(UnaryOp::Reciprocal),
        "LN" => Command::Unary(UnaryOp::Ln),
        "CE" | "C" | "CE/C" => Command::Clear,
        "2ND" => Command::Shift,
        "STO" => Command::StorePending,
        "RCL" => Command::RecallPending,
        "CPT" => Command::ComputePending,
        "ON" | "OFF" | "PWR" | "ON/OFF" => Command::PowerToggle,
        "CLRTVM" => Command::ClearTvm,
        other => match TvmVar::parse(other) {
            Some(var) => Command::VariableSelect(var),
            None => return Err(ScriptError::UnknownToken(token.to_string())),
        },
    };
    Ok(vec![command])
}

/// Parses a whole script. Errors report the 1-based line of the bad token.
pub fn parse_script(text: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let code = line.split('#').next().unwrap_or_default();
        for token in code.split_whitespace() {
            let parsed = parse_token(token).map_err(|_| ScriptError::UnknownTokenAt {
                line: index + 1,
                token: token.to_string(),
            })?;
            commands.extend(parsed);
        }
    }
    Ok(commands)
}

/// Numeric literals: digits with at most one leading `-`. The `.` token on
/// its own also lands here.
fn parse_number(token: &str) -> Option<Vec<Command>> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if negative && !body.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut commands: Vec<Command> = body
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => Command::Digit(d as u8),
            None => Command::Dot,
        })
        .collect();
    if negative {
        commands.push(Command::SignToggle);
    }
    Some(commands)
}
