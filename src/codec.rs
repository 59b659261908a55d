use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{trace, warn};

use crate::{CandidateFrame, LiftLinkError, SYNC_BYTE};

/// Maximum number of bytes buffered without finding a frame boundary.
pub const MAX_FRAME_LENGTH: usize = 64;

/// A [`Decoder`] implementation that splits a continuous device stream into candidate frames.
///
/// Every sync byte starts a new frame, i.e. a frame is complete once the sync byte of the
/// subsequent frame arrives. Bytes received before the first sync byte are emitted as a frame of
/// their own. Since the protocol has neither length prefixes nor checksums, a sync byte value
/// occurring within a frame's payload splits that frame.
///
/// Frames never exceed [`MAX_FRAME_LENGTH`] bytes: if no boundary occurs within the first
/// [`MAX_FRAME_LENGTH`] bytes, the frame is split at that length. The remaining bytes are flushed
/// by `decode_eof`, either once the stream ends or once the line goes idle (see
/// [`DeviceConfig::next_frame`](crate::DeviceConfig::next_frame)).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FrameCodec {
    /// Offset into the buffer up to which no boundary was found.
    next_index: usize,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    fn split_frame(&mut self, buf: &mut BytesMut, at: usize) -> CandidateFrame {
        self.next_index = 0;
        let frame = CandidateFrame::new(buf.split_to(at).to_vec());
        trace!("<- {}", frame);
        frame
    }
}

impl Decoder for FrameCodec {
    type Item = CandidateFrame;
    type Error = LiftLinkError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<CandidateFrame>, LiftLinkError> {
        // The first byte always belongs to the current frame, either it is the sync byte or
        // garbage preceding the first sync byte.
        let start = self.next_index.max(1);
        if buf.len() <= start {
            return Ok(None);
        }

        let boundary = buf[start..]
            .iter()
            .position(|b| *b == SYNC_BYTE)
            .map(|offset| start + offset);

        match boundary {
            Some(at) if at <= MAX_FRAME_LENGTH => Ok(Some(self.split_frame(buf, at))),
            _ if buf.len() >= MAX_FRAME_LENGTH => {
                warn!(
                    "no frame boundary within {} bytes, splitting frame",
                    MAX_FRAME_LENGTH
                );
                Ok(Some(self.split_frame(buf, MAX_FRAME_LENGTH)))
            }
            _ => {
                self.next_index = buf.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<CandidateFrame>, LiftLinkError> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }

        if buf.is_empty() {
            return Ok(None);
        }

        let len = buf.len();
        Ok(Some(self.split_frame(buf, len)))
    }
}
