use std::fmt;

use serde::Serialize;

pub use button::{ButtonAction, ButtonCommand};
pub use status::{MessageType, MotionStatus, StatusFrame, POSITION_UNITS_PER_CM};

use crate::{SECOND_SYNC_BYTE, SYNC_BYTE};

mod button;
mod status;

/// Second byte of the 2-byte display sleep frame.
const DISPLAY_SLEEP: u8 = 0xFC;

/// Direction a frame travels on the link.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Direction {
    RemoteToLift,
    LiftToRemote,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::RemoteToLift => write!(f, "Remote→Lift"),
            Self::LiftToRemote => write!(f, "Lift→Remote"),
        }
    }
}

/// Result of decoding a candidate frame.
///
/// Protocol anomalies (bad sync bytes, unexpected lengths, unknown codes) are regular variants,
/// not errors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedFrame {
    Empty,
    InvalidSync { got: u8 },
    InvalidSecondSync { got: u8 },
    DisplaySleep,
    IncompleteSyncOnly,
    UnknownShort { second: u8 },
    Incomplete { length: usize },
    ButtonCommand(ButtonCommand),
    Status(StatusFrame),
    UnknownLength { length: usize },
}

impl DecodedFrame {
    /// Returns the direction of a recognized frame.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::DisplaySleep | Self::ButtonCommand(_) => Some(Direction::RemoteToLift),
            Self::Status(_) => Some(Direction::LiftToRemote),
            _ => None,
        }
    }

    /// Returns whether the frame was recognized as a well-formed protocol message.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::DisplaySleep => true,
            Self::ButtonCommand(cmd) => cmd.valid,
            Self::Status(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DecodedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Empty => write!(f, "Empty frame"),
            Self::InvalidSync { got } => {
                write!(f, "Invalid: missing sync byte (got 0x{:02x})", got)
            }
            Self::InvalidSecondSync { got } => {
                write!(f, "Invalid: missing 0xAA sync byte (got 0x{:02x})", got)
            }
            Self::DisplaySleep => write!(f, "Display sleep command (display turns off)"),
            Self::IncompleteSyncOnly => write!(f, "Incomplete frame (sync bytes only)"),
            Self::UnknownShort { second } => {
                write!(f, "Unknown 2-byte frame (second byte: 0x{:02x})", second)
            }
            Self::Incomplete { length } => write!(f, "Incomplete frame ({} bytes)", length),
            Self::ButtonCommand(ref cmd) => write!(f, "{}", cmd),
            Self::Status(ref status) => write!(f, "{}", status),
            Self::UnknownLength { length } => {
                write!(f, "Unknown frame format ({} bytes)", length)
            }
        }
    }
}

/// Decodes a single candidate frame.
///
/// The classification is evaluated in a fixed order since length and byte conditions overlap:
/// a 2-byte frame is classified before the second sync byte is checked. Decoding is total, every
/// byte sequence maps to exactly one [`DecodedFrame`].
pub fn decode(bytes: &[u8]) -> DecodedFrame {
    match *bytes {
        [] => DecodedFrame::Empty,
        [first, ..] if first != SYNC_BYTE => DecodedFrame::InvalidSync { got: first },
        [_] => DecodedFrame::Incomplete { length: 1 },
        [_, DISPLAY_SLEEP] => DecodedFrame::DisplaySleep,
        [_, SECOND_SYNC_BYTE] => DecodedFrame::IncompleteSyncOnly,
        [_, second] => DecodedFrame::UnknownShort { second },
        [_, second, ..] if second != SECOND_SYNC_BYTE => {
            DecodedFrame::InvalidSecondSync { got: second }
        }
        [_, _, a, b, c] => DecodedFrame::ButtonCommand(ButtonCommand::new([a, b, c])),
        [_, _, msg_type, lo, hi, status] => {
            DecodedFrame::Status(StatusFrame::new(msg_type, [lo, hi], status))
        }
        [_, _, _] | [_, _, _, _] => DecodedFrame::Incomplete {
            length: bytes.len(),
        },
        _ => DecodedFrame::UnknownLength {
            length: bytes.len(),
        },
    }
}
