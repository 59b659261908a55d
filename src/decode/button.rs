use std::fmt;

use serde::Serialize;

/// Remote control actions identified by a button command opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    /// Sent when the remote resumes from idle.
    Wake,
    Button1,
    Button2,
    Button3,
    Button4,
    UpRelease,
    DownPress,
    /// The lift uses a single opcode for both events.
    UpPressOrDownRelease,
    Unknown(u8),
}

impl ButtonAction {
    pub const WAKE: u8 = 0xF0;
    pub const BUTTON_1: u8 = 0xD1;
    pub const BUTTON_2: u8 = 0xD2;
    pub const BUTTON_3: u8 = 0xD3;
    pub const BUTTON_4: u8 = 0xD7;
    pub const UP_RELEASE: u8 = 0xE1;
    pub const DOWN_PRESS: u8 = 0xE2;
    pub const UP_PRESS_OR_DOWN_RELEASE: u8 = 0xE3;

    pub const fn from_opcode(opcode: u8) -> Self {
        match opcode {
            Self::WAKE => Self::Wake,
            Self::BUTTON_1 => Self::Button1,
            Self::BUTTON_2 => Self::Button2,
            Self::BUTTON_3 => Self::Button3,
            Self::BUTTON_4 => Self::Button4,
            Self::UP_RELEASE => Self::UpRelease,
            Self::DOWN_PRESS => Self::DownPress,
            Self::UP_PRESS_OR_DOWN_RELEASE => Self::UpPressOrDownRelease,
            other => Self::Unknown(other),
        }
    }

    /// Returns the opcode on the wire.
    pub const fn opcode(&self) -> u8 {
        match *self {
            Self::Wake => Self::WAKE,
            Self::Button1 => Self::BUTTON_1,
            Self::Button2 => Self::BUTTON_2,
            Self::Button3 => Self::BUTTON_3,
            Self::Button4 => Self::BUTTON_4,
            Self::UpRelease => Self::UP_RELEASE,
            Self::DownPress => Self::DOWN_PRESS,
            Self::UpPressOrDownRelease => Self::UP_PRESS_OR_DOWN_RELEASE,
            Self::Unknown(opcode) => opcode,
        }
    }
}

impl fmt::Display for ButtonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Wake => write!(f, "Wake/priming command (sent when remote has been idle)"),
            Self::Button1 => write!(f, "Button 1 press"),
            Self::Button2 => write!(f, "Button 2 press"),
            Self::Button3 => write!(f, "Button 3 press"),
            Self::Button4 => write!(f, "Button 4 press"),
            Self::UpRelease => write!(f, "Up button release"),
            Self::DownPress => write!(f, "Down button press"),
            Self::UpPressOrDownRelease => write!(f, "Up button press / Down button release"),
            Self::Unknown(opcode) => {
                write!(f, "Unknown button command (opcode: 0x{:02x})", opcode)
            }
        }
    }
}

/// A 5-byte remote to lift button command.
///
/// The opcode is repeated three times. The command is valid only if all three copies match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct ButtonCommand {
    pub opcode: u8,
    pub valid: bool,
    /// The three opcode bytes as received.
    pub raw: [u8; 3],
}

impl ButtonCommand {
    pub fn new(raw: [u8; 3]) -> Self {
        Self {
            opcode: raw[0],
            valid: raw[0] == raw[1] && raw[1] == raw[2],
            raw,
        }
    }

    /// Returns the action of a valid command, `None` if the opcode bytes mismatch.
    pub fn action(&self) -> Option<ButtonAction> {
        self.valid.then(|| ButtonAction::from_opcode(self.opcode))
    }
}

impl fmt::Display for ButtonCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action() {
            Some(action) => write!(f, "{}", action),
            None => write!(
                f,
                "Invalid button command (opcode bytes don't match: 0x{:02x} 0x{:02x} 0x{:02x})",
                self.raw[0], self.raw[1], self.raw[2]
            ),
        }
    }
}
