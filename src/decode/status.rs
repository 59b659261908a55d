use std::fmt;

use serde::Serialize;

/// Raw position units per centimetre.
///
/// Determined empirically from captures of a lift moving between its end positions.
pub const POSITION_UNITS_PER_CM: f64 = 44.0;

/// Status frame message types.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    PositionA5,
    PositionA6,
    Unknown(u8),
}

impl MessageType {
    pub const fn from_u8(code: u8) -> Self {
        match code {
            0xA5 => Self::PositionA5,
            0xA6 => Self::PositionA6,
            other => Self::Unknown(other),
        }
    }

    pub const fn code(&self) -> u8 {
        match *self {
            Self::PositionA5 => 0xA5,
            Self::PositionA6 => 0xA6,
            Self::Unknown(code) => code,
        }
    }

    /// Returns whether the message type is a known position frame type.
    pub const fn is_position(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PositionA5 => write!(f, "position frame (A5)"),
            Self::PositionA6 => write!(f, "position frame (A6)"),
            Self::Unknown(code) => write!(f, "unknown type (0x{:02x})", code),
        }
    }
}

/// Motion state reported by the lift.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionStatus {
    Stopped,
    Moving,
    Unknown(u8),
}

impl MotionStatus {
    pub const fn from_u8(code: u8) -> Self {
        match code {
            0x00 => Self::Stopped,
            0x04 => Self::Moving,
            other => Self::Unknown(other),
        }
    }

    pub const fn code(&self) -> u8 {
        match *self {
            Self::Stopped => 0x00,
            Self::Moving => 0x04,
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for MotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Stopped => write!(f, "stopped"),
            Self::Moving => write!(f, "moving"),
            Self::Unknown(code) => write!(f, "unknown status (0x{:02x})", code),
        }
    }
}

/// A 6-byte lift to remote status frame reporting position and motion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StatusFrame {
    pub msg_type: MessageType,
    pub position_raw: u16,
    pub position_cm: f64,
    pub status: MotionStatus,
}

impl StatusFrame {
    /// Creates a status frame from the message type byte, the little-endian position bytes and
    /// the status byte.
    pub fn new(msg_type: u8, position: [u8; 2], status: u8) -> Self {
        let position_raw = u16::from_le_bytes(position);
        Self {
            msg_type: MessageType::from_u8(msg_type),
            position_raw,
            position_cm: f64::from(position_raw) / POSITION_UNITS_PER_CM,
            status: MotionStatus::from_u8(status),
        }
    }
}

impl fmt::Display for StatusFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Status frame - {}, Position: {:.1} cm (raw: 0x{:04X} = {}), Status: {}",
            self.msg_type, self.position_cm, self.position_raw, self.position_raw, self.status
        )
    }
}
