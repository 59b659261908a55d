use crate::{CandidateFrame, SYNC_BYTE};

/// Error returned when a `0x` prefixed token of a capture line is not a valid byte.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
#[error("line {line}: invalid hex byte {token}: {reason}")]
pub struct ParseError {
    /// The offending token.
    pub token: String,
    /// The (1-based) line number.
    pub line: usize,
    pub reason: String,
}

/// Parses a single line of a capture file into a candidate frame.
///
/// The line consists of whitespace separated tokens, e.g. `0x55 0xaa 0xa5 0x8c 0x0c 0x00`.
/// Tokens starting with `0x` or `0X` are parsed as bytes, all other tokens are ignored. A line
/// holds exactly one frame, no sync based splitting is performed.
///
/// Returns `Ok(None)` if the line does not contain any byte tokens.
pub fn parse_hex_line(
    line: &str,
    line_number: usize,
) -> Result<Option<CandidateFrame>, ParseError> {
    let mut bytes = vec![];
    for token in line.split_whitespace() {
        let digits = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            Some(digits) => digits,
            None => continue,
        };

        bytes.push(parse_hex_byte(digits).map_err(|reason| ParseError {
            token: token.to_string(),
            line: line_number,
            reason,
        })?);
    }

    if bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(CandidateFrame::new(bytes)))
}

fn parse_hex_byte(digits: &str) -> Result<u8, String> {
    // `from_str_radix` would accept a leading `+`
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err("invalid digit found in string".to_string());
    }

    u8::from_str_radix(digits, 16).map_err(|e| e.to_string())
}

/// Splits a flat byte buffer into candidate frames.
///
/// Every occurrence of the sync byte starts a new frame. Bytes preceding the first sync byte
/// form a frame of their own.
pub fn split_frames(bytes: &[u8]) -> Vec<CandidateFrame> {
    let mut frames = vec![];
    let mut start = 0;
    for (i, b) in bytes.iter().enumerate() {
        if *b == SYNC_BYTE && i > start {
            frames.push(CandidateFrame::from(&bytes[start..i]));
            start = i;
        }
    }

    if start < bytes.len() {
        frames.push(CandidateFrame::from(&bytes[start..]));
    }

    frames
}
