//! Line parsing for the interactive prompt.
//!
//! Each line is either `quit` or `Name,Iterations`.

use thiserror::Error;

/// A parsed prompt line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Leave the prompt.
    Quit,
    /// Benchmark one variant.
    Run {
        /// Variant name as typed
        name: String,
        /// Iterations per timed run
        iterations: usize,
    },
}

/// Why a prompt line was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing but whitespace.
    #[error("empty input")]
    Empty,
    /// No comma, or more than one.
    #[error("expected 'Name,Iterations' or 'quit', got {0:?}")]
    Malformed(String),
    /// The variant name was blank.
    #[error("variant name is empty")]
    MissingName,
    /// The count was not a positive integer.
    #[error("iterations must be a positive integer, got {0:?}")]
    BadIterations(String),
}

/// Parses one prompt line.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        return Ok(Command::Quit);
    }

    let mut parts = line.split(',');
    let (name, count) = match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(count), None) => (name.trim(), count.trim()),
        _ => return Err(ParseError::Malformed(line.to_string())),
    };

    if name.is_empty() {
        return Err(ParseError::MissingName);
    }

    match count.parse::<usize>() {
        Ok(iterations) if iterations > 0 => Ok(Command::Run {
            name: name.to_string(),
            iterations,
        }),
        _ => Err(ParseError::BadIterations(count.to_string())),
    }
}
