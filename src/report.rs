//! Rendering of decoded frames.
//!
//! Two output formats are supported: a markdown report and JSON lines (one object per frame).

use std::io::{self, Write};

use serde::Serialize;

use crate::{CandidateFrame, DecodedFrame, ParseError};

/// Returns the one-line description of a decoded frame, prefixed with its direction if known.
pub fn describe(decoded: &DecodedFrame) -> String {
    match decoded.direction() {
        Some(direction) => format!("**{}:** {}", direction, decoded),
        None => decoded.to_string(),
    }
}

/// Writes the markdown report header.
pub fn write_markdown_header<W: Write>(w: &mut W, file_name: &str) -> io::Result<()> {
    writeln!(w, "# Serial Frame Analysis")?;
    writeln!(w)?;
    writeln!(w, "**File:** `{}`", file_name)?;
    writeln!(w)?;
    writeln!(w, "## Frames")?;
    writeln!(w)
}

/// Writes a single frame section of the markdown report.
pub fn write_markdown_frame<W: Write>(
    w: &mut W,
    line: usize,
    frame: &CandidateFrame,
    decoded: &DecodedFrame,
) -> io::Result<()> {
    writeln!(w, "### Frame {}", line)?;
    writeln!(w)?;
    writeln!(w, "**Raw:** `{}`", frame)?;
    writeln!(w)?;
    writeln!(w, "**Decoded:** {}", describe(decoded))?;
    writeln!(w)?;
    writeln!(w)
}

/// Writes a parse error entry of the markdown report.
pub fn write_markdown_parse_error<W: Write>(w: &mut W, err: &ParseError) -> io::Result<()> {
    writeln!(
        w,
        "**Line {}:** Parse error: invalid hex byte {}: {}",
        err.line, err.token, err.reason
    )?;
    writeln!(w)
}

#[derive(Serialize)]
struct JsonFrame<'a> {
    line: usize,
    raw: String,
    decoded: &'a DecodedFrame,
    description: String,
}

#[derive(Serialize)]
struct JsonParseError<'a> {
    line: usize,
    token: &'a str,
    error: &'a str,
}

/// Writes a frame as a single JSON line.
pub fn write_json_frame<W: Write>(
    w: &mut W,
    line: usize,
    frame: &CandidateFrame,
    decoded: &DecodedFrame,
) -> io::Result<()> {
    let obj = JsonFrame {
        line,
        raw: frame.to_string(),
        decoded,
        description: decoded.to_string(),
    };
    serde_json::to_writer(&mut *w, &obj)?;
    writeln!(w)
}

/// Writes a parse error as a single JSON line.
pub fn write_json_parse_error<W: Write>(w: &mut W, err: &ParseError) -> io::Result<()> {
    let obj = JsonParseError {
        line: err.line,
        token: &err.token,
        error: &err.reason,
    };
    serde_json::to_writer(&mut *w, &obj)?;
    writeln!(w)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::parse_hex_line;

    use pretty_assertions::assert_eq;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = vec![];
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn markdown_header() {
        let out = render(|w| write_markdown_header(w, "capture.txt"));
        assert_eq!(
            out,
            "# Serial Frame Analysis\n\n**File:** `capture.txt`\n\n## Frames\n\n"
        );
    }

    #[test]
    fn markdown_status_frame() {
        let frame = CandidateFrame::new(vec![0x55, 0xAA, 0xA5, 0x8C, 0x0C, 0x00]);
        let decoded = frame.decode();
        let out = render(|w| write_markdown_frame(w, 4, &frame, &decoded));
        assert_eq!(
            out,
            "### Frame 4\n\n\
             **Raw:** `0x55 0xaa 0xa5 0x8c 0x0c 0x00`\n\n\
             **Decoded:** **Lift→Remote:** Status frame - position frame (A5), \
             Position: 73.0 cm (raw: 0x0C8C = 3212), Status: stopped\n\n\n"
        );
    }

    #[test]
    fn describe_without_direction() {
        let decoded = crate::decode(&[0x55, 0xAA]);
        assert_eq!(describe(&decoded), "Incomplete frame (sync bytes only)");

        let decoded = crate::decode(&[0x55, 0xFC]);
        assert_eq!(
            describe(&decoded),
            "**Remote→Lift:** Display sleep command (display turns off)"
        );
    }

    #[test]
    fn markdown_parse_error() {
        let err = parse_hex_line("0x55 0xZZ", 9).unwrap_err();
        let out = render(|w| write_markdown_parse_error(w, &err));
        assert_eq!(
            out,
            "**Line 9:** Parse error: invalid hex byte 0xZZ: invalid digit found in string\n\n"
        );
    }

    #[test]
    fn json_button_frame() {
        let frame = CandidateFrame::new(vec![0x55, 0xAA, 0xD7, 0xD7, 0xD7]);
        let decoded = frame.decode();
        let out = render(|w| write_json_frame(w, 1, &frame, &decoded));

        let v: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(v["line"], 1);
        assert_eq!(v["raw"], "0x55 0xaa 0xd7 0xd7 0xd7");
        assert_eq!(v["decoded"]["kind"], "button_command");
        assert_eq!(v["decoded"]["opcode"], 0xD7);
        assert_eq!(v["decoded"]["valid"], true);
        assert_eq!(v["description"], "Button 4 press");
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn json_parse_error() {
        let err = parse_hex_line("0x1FF", 2).unwrap_err();
        let out = render(|w| write_json_parse_error(w, &err));
        let v: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(v["line"], 2);
        assert_eq!(v["token"], "0x1FF");
    }
}
