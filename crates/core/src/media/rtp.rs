use crate::error::ParseError;

/// Size of the RTP fixed header (RFC 3550 §5.1).
pub const RTP_HEADER_LEN: usize = 12;

/// RTP fixed header fields read from a received datagram (RFC 3550 §5.1).
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P|X|  CC   |M|     PT      |       Sequence Number         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                             SSRC                              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The payload is assumed to start right after these 12 bytes. CSRC lists
/// and header extensions (X bit) are not skipped, so packets carrying them
/// are misread; callers that see such streams adjust the NAL offset they
/// pass to [`classify_nal`](super::h265::classify_nal).
///
/// Nothing is kept between packets. Loss detection is up to the caller,
/// which can compare consecutive [`sequence_number`](Self::sequence_number)s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpHeader {
    /// First header byte: version, padding, extension, CSRC count.
    pub version_flags: u8,
    /// RTP payload type (7-bit, RFC 3551).
    pub payload_type: u8,
    pub sequence_number: u16,
    pub timestamp: u32,
    marker: bool,
}

impl RtpHeader {
    /// Parse the fixed header from the start of a datagram.
    pub fn parse(datagram: &[u8]) -> Result<Self, ParseError> {
        if datagram.len() < RTP_HEADER_LEN {
            return Err(ParseError::TooShort {
                needed: RTP_HEADER_LEN,
                actual: datagram.len(),
            });
        }

        Ok(Self {
            version_flags: datagram[0],
            payload_type: datagram[1] & 0x7f,
            sequence_number: u16::from_be_bytes([datagram[2], datagram[3]]),
            timestamp: u32::from_be_bytes([datagram[4], datagram[5], datagram[6], datagram[7]]),
            marker: datagram[1] & 0x80 != 0,
        })
    }

    /// RTP version, 2 for every conforming sender.
    pub fn version(&self) -> u8 {
        self.version_flags >> 6
    }

    /// Marker bit; for video it flags the last packet of an access unit.
    pub fn marker(&self) -> bool {
        self.marker
    }

    /// X bit: a header extension follows the fixed header.
    pub fn has_extension(&self) -> bool {
        self.version_flags & 0x10 != 0
    }
}

/// Parse the RTP fixed header of `datagram`.
pub fn parse_header(datagram: &[u8]) -> Result<RtpHeader, ParseError> {
    RtpHeader::parse(datagram)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKET: [u8; 12] = [
        0x80, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x64, 0xAA, 0xBB, 0xCC, 0xDD,
    ];

    #[test]
    fn parses_fixed_header() {
        let h = parse_header(&PACKET).unwrap();
        assert_eq!(h.sequence_number, 1);
        assert_eq!(h.timestamp, 100);
        assert_eq!(h.payload_type, 96);
        assert_eq!(h.version(), 2);
        assert!(!h.marker());
        assert!(!h.has_extension());
    }

    #[test]
    fn marker_bit_separated_from_payload_type() {
        let mut packet = PACKET;
        packet[1] = 0x80 | 96;
        let h = parse_header(&packet).unwrap();
        assert!(h.marker());
        assert_eq!(h.payload_type, 96);
    }

    #[test]
    fn big_endian_fields() {
        let mut packet = PACKET;
        packet[2..4].copy_from_slice(&0xFFFEu16.to_be_bytes());
        packet[4..8].copy_from_slice(&0x0102_0304u32.to_be_bytes());
        let h = parse_header(&packet).unwrap();
        assert_eq!(h.sequence_number, 0xFFFE);
        assert_eq!(h.timestamp, 0x0102_0304);
    }

    #[test]
    fn too_short() {
        assert_eq!(
            parse_header(&PACKET[..11]),
            Err(ParseError::TooShort {
                needed: 12,
                actual: 11
            })
        );
        assert!(parse_header(&[]).is_err());
    }
}
