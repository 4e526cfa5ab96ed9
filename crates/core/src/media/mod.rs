//! Per-packet RTP inspection.
//!
//! A camera streams encoded video as RTP over UDP. Each datagram carries a
//! 12-byte fixed header ([`rtp::RtpHeader`]) containing:
//!
//! - **Sequence number** (16-bit, wrapping) — for reordering and loss detection.
//! - **Timestamp** (32-bit) — media clock, typically 90 kHz for video.
//! - **Marker bit** — set on the last packet of an access unit (frame).
//!
//! followed by the codec payload, from which [`h265`] reads the NAL type to
//! spot keyframes. Both parsers are stateless: one datagram in, one value out.
//!
//! ## Supported codecs
//!
//! | Codec | Module | RFC |
//! |-------|--------|-----|
//! | H.265 | [`h265`] | [RFC 7798](https://tools.ietf.org/html/rfc7798) |

pub mod h265;
pub mod rtp;

pub use h265::{NalClassification, NalProbe, PacketSummary, classify_datagram, classify_nal};
pub use rtp::{RtpHeader, parse_header};
