/// Parsed RTSP `Transport` header (RFC 2326 §12.39).
///
/// ## Wire format example
///
/// ```text
/// Client → Server:
///   Transport: RTP/AVP;unicast;client_port=8000-8001
///
/// Server → Client:
///   Transport: RTP/AVP;unicast;client_port=8000-8001;server_port=5000-5001;ssrc=1A2B3C4D
/// ```
///
/// Only the fields the media receiver needs are extracted; the raw value is
/// kept for logging and for anything else a caller wants to inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportHeader {
    pub raw: String,
    /// `(rtp, rtcp)` ports on the client.
    pub client_port: Option<(u16, u16)>,
    /// `(rtp, rtcp)` ports on the server.
    pub server_port: Option<(u16, u16)>,
    /// Synchronization source the server will use, if announced.
    pub ssrc: Option<u32>,
}

impl TransportHeader {
    /// Parse the `Transport` header value.
    ///
    /// Looks for `client_port=`, `server_port=` and `ssrc=` among
    /// semicolon-separated parameters. A single port (`client_port=8000`)
    /// implies RTCP on the next port.
    ///
    /// ## Examples
    ///
    /// ```
    /// use camgrid::session::transport::TransportHeader;
    ///
    /// let th = TransportHeader::parse("RTP/AVP;unicast;client_port=8000-8001;server_port=5000-5001");
    /// assert_eq!(th.client_port, Some((8000, 8001)));
    /// assert_eq!(th.server_port, Some((5000, 5001)));
    /// assert_eq!(th.ssrc, None);
    /// ```
    pub fn parse(header: &str) -> Self {
        let mut parsed = TransportHeader {
            raw: header.trim().to_string(),
            client_port: None,
            server_port: None,
            ssrc: None,
        };

        for part in header.split(';') {
            let part = part.trim();
            if let Some(ports) = part.strip_prefix("client_port=") {
                parsed.client_port = parse_port_pair(ports);
            } else if let Some(ports) = part.strip_prefix("server_port=") {
                parsed.server_port = parse_port_pair(ports);
            } else if let Some(ssrc) = part.strip_prefix("ssrc=") {
                parsed.ssrc = u32::from_str_radix(ssrc.trim(), 16).ok();
            }
        }
        parsed
    }
}

fn parse_port_pair(ports: &str) -> Option<(u16, u16)> {
    match ports.split_once('-') {
        Some((rtp, rtcp)) => Some((rtp.trim().parse().ok()?, rtcp.trim().parse().ok()?)),
        None => {
            let rtp: u16 = ports.trim().parse().ok()?;
            Some((rtp, rtp.checked_add(1)?))
        }
    }
}

/// Result of a successful SETUP: everything needed to open the media transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportParams {
    /// Session identifier, `;timeout=` suffix already stripped.
    pub session_id: String,
    /// Session timeout in seconds advertised by the server (RFC 2326 §12.37).
    pub session_timeout: Option<u64>,
    /// The track URI that was set up.
    pub uri: String,
    pub transport: TransportHeader,
}

/// Split a `Session` header value (RFC 2326 §12.37) into id and timeout.
///
/// ```
/// use camgrid::session::transport::parse_session_header;
///
/// assert_eq!(parse_session_header("12345678;timeout=60"), ("12345678".to_string(), Some(60)));
/// assert_eq!(parse_session_header("ABCDEF"), ("ABCDEF".to_string(), None));
/// ```
pub fn parse_session_header(value: &str) -> (String, Option<u64>) {
    let mut parts = value.split(';');
    let id = parts.next().unwrap_or_default().trim().to_string();
    let timeout = parts
        .filter_map(|p| p.trim().strip_prefix("timeout="))
        .find_map(|t| t.trim().parse().ok());
    (id, timeout)
}
