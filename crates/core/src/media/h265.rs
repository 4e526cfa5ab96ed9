//! H.265 (HEVC) NAL classification for received RTP packets (RFC 7798).
//!
//! Only keyframe detection is needed to decide where a viewer may start
//! decoding, so a single byte is inspected per packet:
//!
//! - With **fragmentation units** (FU, RFC 7798 §4.4.3) the payload begins
//!   with a 2-byte payload header followed by the FU header:
//!
//!   ```text
//!   FU header:  [S|E|FuType]   (1 byte, FuType is 6 bits)
//!   ```
//!
//!   `S` marks the first fragment of a NAL unit.
//!
//! - With **single NAL unit packets** every packet starts its NAL, so the
//!   start flag is always set.
//!
//! Where that byte sits depends on the camera (header extensions, payload
//! header layout), so the offset is supplied by the caller via [`NalProbe`].

use crate::error::ParseError;

use super::rtp::{RTP_HEADER_LEN, RtpHeader};

/// IDR_W_RADL: IDR picture that may have leading pictures (H.265 Table 7-1).
pub const NAL_IDR_W_RADL: u8 = 19;
/// IDR_N_LP: IDR picture without leading pictures.
pub const NAL_IDR_N_LP: u8 = 20;
/// Fragmentation unit (RFC 7798 §4.4.3).
pub const NAL_FU: u8 = 49;

/// Offset of the FU header: RTP fixed header plus the 2-byte payload header.
pub const FU_HEADER_OFFSET: usize = RTP_HEADER_LEN + 2;

/// Type and start flag read from one NAL/FU header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NalClassification {
    /// Lower 6 bits of the inspected byte.
    pub nal_unit_type: u8,
    pub is_fragment_start: bool,
}

impl NalClassification {
    /// True for the first packet of an IDR_W_RADL access unit, the point
    /// from which decoding and display can safely start.
    pub fn is_idr_start(&self) -> bool {
        self.is_fragment_start && self.nal_unit_type == NAL_IDR_W_RADL
    }
}

/// Where to look for the NAL header in a datagram, and how to read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NalProbe {
    /// Byte offset from the start of the datagram.
    pub payload_offset: usize,
    /// Read the start flag from the MSB (FU convention).
    pub fragmentation_aware: bool,
}

impl Default for NalProbe {
    fn default() -> Self {
        Self {
            payload_offset: FU_HEADER_OFFSET,
            fragmentation_aware: true,
        }
    }
}

/// Classify the NAL/FU header byte at `payload_offset`.
///
/// ```
/// use camgrid::classify_nal;
///
/// let mut packet = [0u8; 13];
/// packet[12] = 0x13;
/// let nal = classify_nal(&packet, 12, false).unwrap();
/// assert_eq!(nal.nal_unit_type, 19);
/// assert!(nal.is_idr_start());
/// ```
pub fn classify_nal(
    datagram: &[u8],
    payload_offset: usize,
    fragmentation_aware: bool,
) -> Result<NalClassification, ParseError> {
    let Some(&byte) = datagram.get(payload_offset) else {
        return Err(ParseError::TooShort {
            needed: payload_offset.saturating_add(1),
            actual: datagram.len(),
        });
    };

    Ok(NalClassification {
        nal_unit_type: byte & 0x3f,
        is_fragment_start: !fragmentation_aware || byte & 0x80 != 0,
    })
}

/// Header fields and NAL classification of one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketSummary {
    pub header: RtpHeader,
    pub nal: NalClassification,
}

impl PacketSummary {
    pub fn is_idr_start(&self) -> bool {
        self.nal.is_idr_start()
    }
}

/// Parse the RTP header and classify the NAL byte in one go.
pub fn classify_datagram(datagram: &[u8], probe: &NalProbe) -> Result<PacketSummary, ParseError> {
    let header = RtpHeader::parse(datagram)?;
    let nal = classify_nal(datagram, probe.payload_offset, probe.fragmentation_aware)?;
    Ok(PacketSummary { header, nal })
}
