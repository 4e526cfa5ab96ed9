use std::fmt;

/// RTSP methods issued by the client.
///
/// Only the negotiation half of the protocol is spoken here; PLAY and
/// TEARDOWN belong to whoever owns the media transport afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Retrieve the SDP session description (RFC 2326 §10.2).
    Describe,
    /// Negotiate transport for one track (RFC 2326 §10.4).
    Setup,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Describe => "DESCRIBE",
            Self::Setup => "SETUP",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound RTSP request (RFC 2326 §6).
///
/// Serializes to the standard text format:
///
/// ```text
/// DESCRIBE rtsp://192.168.1.10/stream1 RTSP/1.0\r\n
/// CSeq: 2\r\n
/// User-Agent: camgrid/0.1\r\n
/// Accept: application/sdp\r\n
/// \r\n
/// ```
///
/// Headers are written in insertion order, so callers add `CSeq` first.
#[must_use]
#[derive(Debug, Clone)]
pub struct RtspRequest {
    pub method: Method,
    /// Request-URI, never containing credentials.
    pub uri: String,
    pub headers: Vec<(String, String)>,
}

impl RtspRequest {
    pub fn new(method: Method, uri: &str) -> Self {
        RtspRequest {
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn add_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Serialize to the RTSP text wire format, including the terminating blank line.
    pub fn serialize(&self) -> String {
        let mut request = format!("{} {} RTSP/1.0\r\n", self.method, self.uri);

        for (name, value) in &self.headers {
            request.push_str(&format!("{}: {}\r\n", name, value));
        }

        request.push_str("\r\n");
        request
    }
}
