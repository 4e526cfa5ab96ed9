//! Network transport layer for RTSP signaling and RTP media reception.
//!
//! RTSP uses a split transport model:
//!
//! - **TCP** ([`tcp`]): carries RTSP request/response signaling. One
//!   [`Connection`](tcp::Connection) per session.
//!
//! - **UDP** ([`udp`]): carries RTP media packets to the client port pair
//!   announced in SETUP.
//!
//! Interleaved TCP transport (RFC 2326 §10.12) is not supported.

pub mod tcp;
pub mod udp;

pub use tcp::Connection;
pub use udp::RtpReceiver;
