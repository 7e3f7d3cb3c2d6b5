//! Interactive "how many books" prompt.

use std::io::{BufRead, Write};

use thiserror::Error;

pub(crate) const COUNT_PROMPT: &str =
    "How many books do you want to download? (e.g. 100, 500, 1000): ";

/// Rejected answer to the count prompt.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum CountError {
    #[error("Invalid number: no input given")]
    Empty,

    #[error("Invalid number: {input:?}")]
    Invalid { input: String },
}

/// Parses a book count. Surrounding whitespace is ignored.
pub(crate) fn parse_count(input: &str) -> Result<usize, CountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CountError::Empty);
    }
    trimmed.parse().map_err(|_| CountError::Invalid {
        input: trimmed.to_string(),
    })
}

/// Writes the prompt to `output` and reads one line from `input`.
///
/// End of input counts as an empty answer.
pub(crate) fn prompt_count<R, W>(input: &mut R, output: &mut W) -> anyhow::Result<usize>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{COUNT_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_count(&line)?)
}
