//! Error types for the camera client library.

use std::fmt;

/// Errors raised while negotiating an RTSP session.
///
/// Variants map to specific failure modes across the stack:
///
/// - **Transport**: [`Transport`](Self::Transport) — socket/connection failures.
///   Fatal to the session; the caller decides whether to reconnect.
/// - **Protocol**: [`Protocol`](Self::Protocol) — malformed status line,
///   headers or body. Fatal to the current exchange.
/// - **Auth**: [`AuthenticationFailed`](Self::AuthenticationFailed) — missing
///   credentials, unusable challenge, or a repeated 401.
/// - **Status**: [`Status`](Self::Status) — the server answered with a
///   non-success status other than 401.
/// - **Url**: [`InvalidUrl`](Self::InvalidUrl) — the target URL could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum RtspError {
    /// Underlying I/O or socket error.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Failed to parse an RTSP response message (RFC 2326 §7).
    #[error("RTSP protocol error: {kind}")]
    Protocol { kind: ProtocolErrorKind },

    /// The server demanded authentication and it could not be satisfied.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(AuthFailure),

    /// The server answered with a non-success status.
    #[error("server returned {code} {reason}")]
    Status { code: u16, reason: String },

    /// The target URL is not a usable `rtsp://` URL.
    #[error("invalid RTSP URL: {0}")]
    InvalidUrl(String),
}

impl RtspError {
    pub(crate) fn protocol(kind: ProtocolErrorKind) -> Self {
        Self::Protocol { kind }
    }
}

/// Specific kind of RTSP response parse failure.
#[derive(Debug)]
pub enum ProtocolErrorKind {
    /// Status line did not have the `RTSP/1.0 <code> <reason>` format.
    InvalidStatusLine,
    /// A header line did not contain a colon separator.
    InvalidHeader,
    /// `Content-Length` was present but not a number.
    InvalidContentLength,
    /// Body bytes were not valid UTF-8.
    InvalidBody,
    /// A successful SETUP response carried no `Session` header.
    MissingSession,
}

impl fmt::Display for ProtocolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStatusLine => write!(f, "invalid status line"),
            Self::InvalidHeader => write!(f, "invalid header"),
            Self::InvalidContentLength => write!(f, "invalid Content-Length"),
            Self::InvalidBody => write!(f, "body is not valid UTF-8"),
            Self::MissingSession => write!(f, "missing Session header"),
        }
    }
}

/// Why Digest authentication could not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// The server challenged but no credentials were supplied.
    MissingCredentials,
    /// `WWW-Authenticate` was absent or lacked a Digest realm/nonce.
    InvalidChallenge,
    /// The server rejected the credentials we sent.
    Rejected,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "server requires credentials"),
            Self::InvalidChallenge => write!(f, "no usable Digest challenge"),
            Self::Rejected => write!(f, "credentials rejected"),
        }
    }
}

/// Failure to interpret a single RTP datagram.
///
/// Recoverable per packet: drop the datagram and keep receiving.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("datagram too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}

/// Failure to turn a raw sample into a [`DecodedFrame`](crate::frame::DecodedFrame).
///
/// Recoverable per frame: the caller picks the fallback (skip, placeholder).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Buffer length does not match the declared layout.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Declared geometry cannot describe a valid frame.
    #[error("invalid frame dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: &'static str,
    },

    /// Capability string named a pixel format we cannot reconstruct.
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// Capability string is missing a required field or has a malformed one.
    #[error("invalid caps: {0}")]
    InvalidCaps(String),
}

/// Convenience alias for `Result<T, RtspError>`.
pub type Result<T> = std::result::Result<T, RtspError>;
