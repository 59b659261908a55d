use std::fmt::Write;
use std::io;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::SYNC_BYTE;

/// A [`Decoder`] implementation rendering raw traffic as a hex trace.
///
/// Every byte is rendered as ` 0xhh`. A line break is inserted right before each sync byte, so
/// that each frame ends up on a line of its own. The codec does not buffer frames, all bytes
/// available are rendered immediately.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TraceCodec;

impl TraceCodec {
    /// Appends the trace of `bytes` to `out`.
    pub fn render(bytes: &[u8], out: &mut String) {
        for b in bytes {
            if *b == SYNC_BYTE {
                out.push('\n');
            }
            // writing to a `String` does not fail
            let _ = write!(out, " 0x{:02x}", b);
        }
    }
}

impl Decoder for TraceCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        if buf.is_empty() {
            return Ok(None);
        }

        let chunk = buf.split();
        trace!("<- {} bytes", chunk.len());

        let mut out = String::with_capacity(chunk.len() * 6);
        Self::render(&chunk, &mut out);
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {

    use bytes::BufMut;

    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn render_breaks_before_sync() {
        let mut out = String::new();
        TraceCodec::render(&[0x00, 0x55, 0xfc, 0x55, 0xaa], &mut out);
        assert_eq!(out, " 0x00\n 0x55 0xfc\n 0x55 0xaa");
    }

    #[test]
    fn decode_drains_buffer() {
        let mut codec = TraceCodec;
        let mut buf = BytesMut::from(&[0x55, 0xAA, 0xE2][..]);
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("\n 0x55 0xaa 0xe2".to_string())
        );
        assert!(buf.is_empty());
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.put_slice(&[0xE2, 0xE2]);
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(" 0xe2 0xe2".to_string())
        );
    }
}
