use std::io::{BufRead, Write};

use crate::error::LedgerError;

/// Use `value` when the flag or its environment variable supplied one,
/// otherwise ask on `output` and read one line from `input`.
pub fn resolve_option<R: BufRead, W: Write>(
    value: Option<String>,
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String, LedgerError> {
    if let Some(value) = value {
        return Ok(value);
    }

    write!(output, "\n{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(LedgerError::Config(format!("no answer to \"{}\"", prompt.trim())));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Leading-zero count; any non-negative integer.
pub fn parse_difficulty(raw: &str) -> Result<u32, LedgerError> {
    raw.trim()
        .parse()
        .map_err(|_| LedgerError::Config("Please, enter a valid difficulty number.".into()))
}

/// Target chain length, genesis included; at least 1.
pub fn parse_block_count(raw: &str) -> Result<usize, LedgerError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(LedgerError::Config(
            "Please, enter a valid number of blocks.".into(),
        )),
    }
}
