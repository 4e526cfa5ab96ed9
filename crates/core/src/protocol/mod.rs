//! RTSP protocol implementation, client side (RFC 2326).
//!
//! This module handles the text-based RTSP signaling protocol: building
//! requests, parsing responses, and splitting camera URLs into the part that
//! goes on the wire and the credentials that must not.
//!
//! ## RTSP message format (RFC 2326 §4)
//!
//! RTSP messages follow HTTP/1.1 syntax with a different method set:
//!
//! ```text
//! DESCRIBE rtsp://camera/stream RTSP/1.0\r\n
//! CSeq: 2\r\n
//! Accept: application/sdp\r\n
//! \r\n
//! ```
//!
//! ## Supported methods
//!
//! | Method | RFC section | Purpose |
//! |--------|-------------|---------|
//! | DESCRIBE | §10.2 | Retrieve SDP session description |
//! | SETUP | §10.4 | Negotiate transport (UDP ports) |

pub mod request;
pub mod response;
pub mod url;

pub use request::{Method, RtspRequest};
pub use response::RtspResponse;
pub use url::RtspUrl;
