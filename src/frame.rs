use std::fmt;
use std::ops::Deref;

use crate::{decode, DecodedFrame};

/// A candidate frame, i.e. a sequence of bytes which presumably starts with the sync byte.
///
/// Candidate frames are produced by the segmenters and consumed by [`decode`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct CandidateFrame(Vec<u8>);

impl CandidateFrame {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decodes the frame.
    pub fn decode(&self) -> DecodedFrame {
        decode(&self.0)
    }
}

impl From<Vec<u8>> for CandidateFrame {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for CandidateFrame {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Deref for CandidateFrame {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for CandidateFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes: Vec<String> = self.0.iter().map(|b| format!("0x{:02x}", b)).collect();
        write!(f, "{}", bytes.join(" "))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn display_lowercase_hex() {
        let frame = CandidateFrame::new(vec![0x55, 0xAA, 0x0C, 0x00]);
        assert_eq!(frame.to_string(), "0x55 0xaa 0x0c 0x00");
    }

    #[test]
    fn display_empty() {
        assert_eq!(CandidateFrame::default().to_string(), "");
    }

    #[test]
    fn decode_through_frame() {
        let frame = CandidateFrame::from(&[0x55, 0xFC][..]);
        assert_eq!(frame.decode(), DecodedFrame::DisplaySleep);
        assert_eq!(frame.len(), 2);
    }
}
