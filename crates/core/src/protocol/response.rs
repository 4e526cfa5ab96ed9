use crate::error::{ProtocolErrorKind, Result, RtspError};

/// A parsed RTSP response (RFC 2326 §7).
///
/// ```text
/// RTSP/1.0 200 OK\r\n
/// CSeq: 2\r\n
/// Content-Type: application/sdp\r\n
/// Content-Length: 142\r\n
/// \r\n
/// v=0\r\n...
/// ```
///
/// [`parse_head`](Self::parse_head) handles the status line and headers; the
/// body is attached afterwards by the connection, which knows how many bytes
/// `Content-Length` announced.
#[derive(Debug, Clone)]
pub struct RtspResponse {
    pub version: String,
    pub status_code: u16,
    pub reason: String,
    /// Headers as ordered (name, value) pairs, names as received.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RtspResponse {
    /// Parse the status line and headers, stopping at the first blank line.
    pub fn parse_head(raw: &str) -> Result<Self> {
        let mut lines = raw.lines();

        let status_line = lines
            .next()
            .ok_or(RtspError::protocol(ProtocolErrorKind::InvalidStatusLine))?;

        let mut parts = status_line.splitn(3, ' ');
        let version = parts.next().unwrap_or_default();
        let code = parts.next().unwrap_or_default();
        let reason = parts.next().unwrap_or_default().trim();

        if !version.starts_with("RTSP/") {
            return Err(RtspError::protocol(ProtocolErrorKind::InvalidStatusLine));
        }
        let status_code: u16 = code
            .parse()
            .map_err(|_| RtspError::protocol(ProtocolErrorKind::InvalidStatusLine))?;
        if version != "RTSP/1.0" {
            tracing::warn!(version, "server sent non-RTSP/1.0 version");
        }

        let mut headers = Vec::new();

        for line in lines {
            if line.is_empty() {
                break;
            }

            let (name, value) = line
                .split_once(':')
                .ok_or(RtspError::protocol(ProtocolErrorKind::InvalidHeader))?;

            headers.push((name.trim().to_string(), value.trim().to_string()));
        }

        Ok(RtspResponse {
            version: version.to_string(),
            status_code,
            reason: reason.to_string(),
            headers,
            body: String::new(),
        })
    }

    /// Look up the first header value by name (case-insensitive, per RFC 2326 §4.2).
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.header_values(name).next()
    }

    /// All values of a repeatable header, e.g. several `WWW-Authenticate` lines.
    pub fn header_values<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The echoed CSeq (RFC 2326 §12.17), if present and numeric.
    pub fn cseq(&self) -> Option<u32> {
        self.get_header("CSeq")?.parse().ok()
    }

    /// Number of body bytes following the headers (RFC 2326 §12.14).
    pub fn content_length(&self) -> Result<usize> {
        match self.get_header("Content-Length") {
            Some(value) => value
                .parse()
                .map_err(|_| RtspError::protocol(ProtocolErrorKind::InvalidContentLength)),
            None => Ok(0),
        }
    }

    /// 2xx (RFC 2326 §7.1.1).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// 401 Unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }

    /// Convert a non-2xx response into [`RtspError::Status`].
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(RtspError::Status {
                code: self.status_code,
                reason: self.reason,
            })
        }
    }
}
