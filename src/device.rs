use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::io::AsyncRead;
use tokio::time::{self as tokio_time, Instant};
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tokio_util::codec::{Decoder, FramedRead};
use tracing::{debug, info, trace};

use crate::{CandidateFrame, FrameCodec, LiftLinkError, LiftLinkResult, BAUD_RATE};

/// Silence on the line after which buffered bytes are flushed as a frame.
///
/// Roughly 50 byte times at [`BAUD_RATE`]. Must exceed the latency timer of USB serial adapters
/// (16 ms by default), which deliver a frame's bytes in bursts.
pub const IDLE_GAP: Duration = Duration::from_millis(50);

/// Serial device configuration.
///
/// The line parameters (9600 baud, 8 data bits, no parity, one stop bit) are fixed by the
/// protocol.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeviceConfig {
    /// Device path, e.g. `/dev/ttyUSB0`.
    pub path: String,
    /// Maximum time to wait for data. `None` waits indefinitely.
    pub read_timeout: Option<Duration>,
}

impl DeviceConfig {
    pub fn new(path: impl ToString, read_timeout: Option<Duration>) -> Self {
        Self {
            path: path.to_string(),
            read_timeout,
        }
    }

    /// Waits for the next item of a stream read from the device.
    ///
    /// Returns `LiftLinkError::ReadTimeout` if no item arrives within the configured read
    /// timeout, and `Ok(None)` once the stream ended.
    pub async fn next_item<S, T, E>(&self, stream: &mut S) -> LiftLinkResult<Option<T>>
    where
        S: Stream<Item = Result<T, E>> + Unpin,
        LiftLinkError: From<E>,
    {
        let next = match self.read_timeout {
            Some(timeout) => tokio_time::timeout(timeout, stream.next())
                .await
                .map_err(|_| LiftLinkError::ReadTimeout)?,
            None => stream.next().await,
        };

        next.transpose().map_err(Into::into)
    }

    /// Waits for the next frame read from the device.
    ///
    /// A frame is usually complete once the sync byte of the subsequent frame arrives. If the
    /// line stays silent for [`IDLE_GAP`], the bytes buffered so far are flushed as a frame, so
    /// the last frame of a burst is not held back. Returns `LiftLinkError::ReadTimeout` if no
    /// frame is available within the configured read timeout, and `Ok(None)` once the stream
    /// ended.
    pub async fn next_frame<R>(
        &self,
        frames: &mut FramedRead<R, FrameCodec>,
    ) -> LiftLinkResult<Option<CandidateFrame>>
    where
        R: AsyncRead + Unpin,
    {
        let deadline = self.read_timeout.map(|timeout| Instant::now() + timeout);

        loop {
            let wait = match deadline {
                Some(deadline) => {
                    IDLE_GAP.min(deadline.saturating_duration_since(Instant::now()))
                }
                None => IDLE_GAP,
            };

            if let Ok(next) = tokio_time::timeout(wait, frames.next()).await {
                return next.transpose();
            }

            if let Some(frame) = flush_pending(frames)? {
                return Ok(Some(frame));
            }

            if deadline.map_or(false, |deadline| Instant::now() >= deadline) {
                return Err(LiftLinkError::ReadTimeout);
            }
        }
    }
}

/// Flushes the bytes buffered by `frames` as a single frame.
fn flush_pending<R>(
    frames: &mut FramedRead<R, FrameCodec>,
) -> LiftLinkResult<Option<CandidateFrame>> {
    if frames.read_buffer().is_empty() {
        return Ok(None);
    }

    let mut pending = frames.read_buffer_mut().split();
    let frame = frames.decoder_mut().decode_eof(&mut pending)?;
    frames.read_buffer_mut().unsplit(pending);

    if frame.is_some() {
        trace!("line idle, flushed pending bytes");
    }

    Ok(frame)
}

/// Opens the serial device for reading.
///
/// Must be called from within a tokio runtime.
pub fn open(config: &DeviceConfig) -> LiftLinkResult<SerialStream> {
    debug!("opening {} ({} baud, 8N1)", config.path, BAUD_RATE);
    let port = tokio_serial::new(config.path.as_str(), BAUD_RATE)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .open_native_async()?;

    info!("listening on {}", config.path);
    Ok(port)
}

#[cfg(test)]
mod tests {

    use std::io;

    use futures::stream;
    use tokio::io::AsyncWriteExt;

    use super::*;

    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn next_item_without_timeout() {
        let config = DeviceConfig::new("/dev/null", None);
        let mut items = stream::iter(vec![Ok::<_, io::Error>(1), Ok(2)]);
        assert_eq!(config.next_item(&mut items).await.unwrap(), Some(1));
        assert_eq!(config.next_item(&mut items).await.unwrap(), Some(2));
        assert_eq!(config.next_item(&mut items).await.unwrap(), None);
    }

    #[tokio::test]
    async fn next_item_times_out() {
        let config = DeviceConfig::new("/dev/null", Some(Duration::from_millis(10)));
        let mut items = stream::pending::<Result<u8, io::Error>>();
        let err = config.next_item(&mut items).await.unwrap_err();
        assert!(matches!(err, LiftLinkError::ReadTimeout));
    }

    #[tokio::test]
    async fn next_item_propagates_read_errors() {
        let config = DeviceConfig::new("/dev/null", Some(Duration::from_secs(1)));
        let mut items = stream::iter(vec![Err::<u8, _>(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "device unplugged",
        ))]);
        let err = config.next_item(&mut items).await.unwrap_err();
        assert!(matches!(err, LiftLinkError::Io(_)));
    }

    #[tokio::test]
    async fn open_missing_device() {
        let config = DeviceConfig::new("/dev/does-not-exist-liftlink", None);
        assert!(open(&config).is_err());
    }

    #[tokio::test]
    async fn next_frame_flushes_last_frame_of_burst() {
        let config = DeviceConfig::new("/dev/null", Some(Duration::from_millis(200)));
        let (mut tx, rx) = tokio::io::duplex(64);
        tx.write_all(&[0x55, 0xAA, 0xA5, 0x8C, 0x0C, 0x00])
            .await
            .unwrap();

        let mut frames = FramedRead::new(rx, FrameCodec::new());
        assert_eq!(
            config.next_frame(&mut frames).await.unwrap(),
            Some(CandidateFrame::new(vec![0x55, 0xAA, 0xA5, 0x8C, 0x0C, 0x00]))
        );

        // writer still open, nothing pending
        let err = config.next_frame(&mut frames).await.unwrap_err();
        assert!(matches!(err, LiftLinkError::ReadTimeout));
        drop(tx);
    }

    #[tokio::test]
    async fn next_frame_splits_burst() {
        let config = DeviceConfig::new("/dev/null", None);
        let (mut tx, rx) = tokio::io::duplex(64);
        tx.write_all(&[0x55, 0xAA, 0xE3, 0xE3, 0xE3, 0x55, 0xFC])
            .await
            .unwrap();

        let mut frames = FramedRead::new(rx, FrameCodec::new());
        assert_eq!(
            config.next_frame(&mut frames).await.unwrap(),
            Some(CandidateFrame::new(vec![0x55, 0xAA, 0xE3, 0xE3, 0xE3]))
        );
        assert_eq!(
            config.next_frame(&mut frames).await.unwrap(),
            Some(CandidateFrame::new(vec![0x55, 0xFC]))
        );

        drop(tx);
        assert_eq!(config.next_frame(&mut frames).await.unwrap(), None);
    }

    #[tokio::test]
    async fn next_frame_times_out_on_silent_line() {
        let config = DeviceConfig::new("/dev/null", Some(Duration::from_millis(100)));
        let (_tx, rx) = tokio::io::duplex(64);

        let mut frames = FramedRead::new(rx, FrameCodec::new());
        let err = config.next_frame(&mut frames).await.unwrap_err();
        assert!(matches!(err, LiftLinkError::ReadTimeout));
    }
}
