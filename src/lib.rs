use std::io;

pub use crate::codec::{FrameCodec, MAX_FRAME_LENGTH};
pub use crate::decode::{
    decode, ButtonAction, ButtonCommand, DecodedFrame, Direction, MessageType, MotionStatus,
    StatusFrame, POSITION_UNITS_PER_CM,
};
pub use crate::device::{open, DeviceConfig, IDLE_GAP};
pub use crate::frame::CandidateFrame;
pub use crate::segment::{parse_hex_line, split_frames, ParseError};
pub use crate::trace::TraceCodec;

pub mod report;

mod codec;
mod decode;
mod device;
mod frame;
mod segment;
mod trace;

/// Byte marking the start of every frame on the wire.
pub const SYNC_BYTE: u8 = 0x55;

/// Byte expected right after [`SYNC_BYTE`] in all frames longer than two bytes.
pub const SECOND_SYNC_BYTE: u8 = 0xAA;

/// Baud rate of the link between remote and lift.
pub const BAUD_RATE: u32 = 9600;

/// Generic library error type.
#[derive(thiserror::Error, Debug)]
pub enum LiftLinkError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("timed out waiting for data from the device")]
    ReadTimeout,
    #[error(transparent)]
    Serial(#[from] tokio_serial::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A specialized library [`Result`] type.
///
/// [`Result`]: enum@std::result::Result
pub type LiftLinkResult<T> = std::result::Result<T, LiftLinkError>;
