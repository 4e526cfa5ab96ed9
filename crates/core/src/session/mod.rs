//! RTSP client session (RFC 2326 §3, §12.37).
//!
//! An [`RtspSession`] owns one control connection to a camera and runs the
//! negotiation half of the protocol:
//!
//! ```text
//! DESCRIBE            -> 401 + WWW-Authenticate: Digest realm, nonce
//! DESCRIBE + Auth     -> 200 + SDP
//! SETUP + Auth        -> 200 + Session + Transport
//! ```
//!
//! It tracks:
//!
//! - The CSeq counter, incremented once per request sent.
//! - The session ID returned by the server, carried on every later request.
//! - The Digest challenge, captured on the first 401 and reused (same nonce)
//!   for every later request on the connection.
//!
//! No request is retried except the single authenticated DESCRIBE, and the
//! session never reconnects. Methods take `&mut self`; share a session
//! between threads only behind a lock.

pub mod auth;
pub mod transport;

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{AuthFailure, ProtocolErrorKind, Result, RtspError};
use crate::protocol::{Method, RtspRequest, RtspResponse, RtspUrl};
use crate::transport::Connection;
use auth::{Credentials, DigestChallenge};
pub use transport::{TransportHeader, TransportParams, parse_session_header};

/// Client identification sent in every request (RFC 2326 §12.41).
pub const USER_AGENT: &str = "camgrid/0.1";

/// Client-side settings for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Local RTP port announced in SETUP (`client_port=<rtp>-<rtcp>`).
    pub client_rtp_port: u16,
    /// Local RTCP port announced in SETUP.
    pub client_rtcp_port: u16,
    /// Read timeout applied by [`RtspSession::connect`]. `None` blocks forever.
    pub read_timeout: Option<Duration>,
    /// Write timeout applied by [`RtspSession::connect`].
    pub write_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            client_rtp_port: 8000,
            client_rtcp_port: 8001,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl SessionConfig {
    /// `Transport` header value requested in SETUP.
    pub fn transport_header(&self) -> String {
        format!(
            "RTP/AVP;unicast;client_port={}-{}",
            self.client_rtp_port, self.client_rtcp_port
        )
    }
}

/// The DESCRIBE result. SDP is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdpInfo {
    pub content_type: Option<String>,
    /// Base for relative track controls (RFC 2326 §12.11).
    pub content_base: Option<String>,
    pub body: String,
}

/// RTSP client session over one control connection.
pub struct RtspSession<S: Read + Write = TcpStream> {
    connection: Connection<S>,
    url: RtspUrl,
    credentials: Option<Credentials>,
    config: SessionConfig,
    cseq: u32,
    session_id: Option<String>,
    session_timeout: Option<u64>,
    auth: Option<DigestChallenge>,
    content_base: Option<RtspUrl>,
}

impl RtspSession<TcpStream> {
    /// Open a TCP connection to the camera named by `url`.
    ///
    /// `user:pass@` in the URL becomes the session's credentials.
    pub fn connect(url: &str, config: SessionConfig) -> Result<Self> {
        let parsed = RtspUrl::parse(url)?;
        let connection =
            Connection::open(&parsed.socket_addr(), config.read_timeout, config.write_timeout)?;
        Ok(Self::from_parts(connection, parsed, config))
    }
}

impl<S: Read + Write> RtspSession<S> {
    /// Run a session over an already connected stream.
    pub fn with_stream(stream: S, url: &str, config: SessionConfig) -> Result<Self> {
        let parsed = RtspUrl::parse(url)?;
        Ok(Self::from_parts(Connection::new(stream), parsed, config))
    }

    fn from_parts(connection: Connection<S>, url: RtspUrl, config: SessionConfig) -> Self {
        let credentials = url.credentials().cloned();
        Self {
            connection,
            url,
            credentials,
            config,
            cseq: 0,
            session_id: None,
            session_timeout: None,
            auth: None,
            content_base: None,
        }
    }

    /// Use these credentials instead of any embedded in the URL.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// CSeq of the last request sent (0 before the first request).
    pub fn cseq(&self) -> u32 {
        self.cseq
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Session timeout in seconds, if the server advertised one.
    pub fn session_timeout(&self) -> Option<u64> {
        self.session_timeout
    }

    /// Digest challenge captured from the server, if any.
    pub fn challenge(&self) -> Option<&DigestChallenge> {
        self.auth.as_ref()
    }

    /// Credential-free request URI.
    pub fn request_uri(&self) -> &str {
        self.url.request_uri()
    }

    /// Send DESCRIBE and return the SDP.
    ///
    /// On a 401 the Digest challenge is captured and DESCRIBE is resent once
    /// with an `Authorization` header. A second 401 is
    /// [`AuthFailure::Rejected`].
    pub fn describe(&mut self) -> Result<SdpInfo> {
        let uri = self.url.request_uri().to_string();
        let mut response = self.send(Method::Describe, &uri, &[("Accept", "application/sdp")])?;

        if response.is_unauthorized() {
            if self.authorization_active() {
                return Err(RtspError::AuthenticationFailed(AuthFailure::Rejected));
            }
            self.accept_challenge(&response)?;
            tracing::debug!(%uri, "retrying DESCRIBE with Digest credentials");
            response = self.send(Method::Describe, &uri, &[("Accept", "application/sdp")])?;
            if response.is_unauthorized() {
                tracing::warn!(%uri, "camera rejected Digest credentials");
                return Err(RtspError::AuthenticationFailed(AuthFailure::Rejected));
            }
        }

        let mut response = response.ensure_success()?;
        self.update_session(&response);
        self.content_base = response.get_header("Content-Base").and_then(base_url);

        Ok(SdpInfo {
            content_type: response.get_header("Content-Type").map(str::to_string),
            content_base: response.get_header("Content-Base").map(str::to_string),
            body: std::mem::take(&mut response.body),
        })
    }

    /// Send SETUP for one track and return the negotiated transport.
    ///
    /// `track` is the SDP `a=control:` value, relative (`trackID=1`) or
    /// absolute. Relative controls resolve against the `Content-Base` from
    /// DESCRIBE (RFC 2326 §C.1.1), or the request URI when there was none.
    /// Authentication reuses the nonce captured during DESCRIBE; there is no
    /// second challenge round-trip.
    pub fn setup(&mut self, track: &str) -> Result<TransportParams> {
        let base = self.content_base.as_ref().unwrap_or(&self.url);
        let uri = base.track_uri(track)?;
        let requested = self.config.transport_header();

        let response = self.send(Method::Setup, &uri, &[("Transport", requested.as_str())])?;
        if response.is_unauthorized() {
            tracing::warn!(%uri, "SETUP rejected by camera");
            return Err(RtspError::AuthenticationFailed(AuthFailure::Rejected));
        }

        let response = response.ensure_success()?;
        self.update_session(&response);

        let session_id = self
            .session_id
            .clone()
            .ok_or(RtspError::protocol(ProtocolErrorKind::MissingSession))?;

        let transport = match response.get_header("Transport") {
            Some(value) => TransportHeader::parse(value),
            None => {
                tracing::warn!(%uri, "SETUP response without Transport header, assuming requested");
                TransportHeader::parse(&requested)
            }
        };

        tracing::info!(
            %session_id,
            %uri,
            transport = %transport.raw,
            "RTSP session set up"
        );

        Ok(TransportParams {
            session_id,
            session_timeout: self.session_timeout,
            uri,
            transport,
        })
    }

    /// Whether requests currently carry an `Authorization` header.
    fn authorization_active(&self) -> bool {
        self.auth.is_some() && self.credentials.is_some()
    }

    /// Capture the Digest challenge from a 401, or fail without retrying.
    fn accept_challenge(&mut self, response: &RtspResponse) -> Result<()> {
        let challenge = response
            .header_values("WWW-Authenticate")
            .find_map(DigestChallenge::parse);

        let Some(challenge) = challenge else {
            tracing::warn!("401 without a usable Digest challenge");
            return Err(RtspError::AuthenticationFailed(AuthFailure::InvalidChallenge));
        };

        tracing::debug!(realm = %challenge.realm, "Digest challenge received");
        self.auth = Some(challenge);

        if self.credentials.is_none() {
            tracing::warn!("camera requires authentication but no credentials were given");
            return Err(RtspError::AuthenticationFailed(AuthFailure::MissingCredentials));
        }
        Ok(())
    }

    /// Build, send and read back one request with the common headers.
    fn send(
        &mut self,
        method: Method,
        uri: &str,
        extra: &[(&str, &str)],
    ) -> Result<RtspResponse> {
        self.cseq += 1;
        let cseq = self.cseq;

        let mut request = RtspRequest::new(method, uri)
            .add_header("CSeq", &cseq.to_string())
            .add_header("User-Agent", &self.config.user_agent);
        for (name, value) in extra {
            request = request.add_header(name, value);
        }
        if let Some(session_id) = &self.session_id {
            request = request.add_header("Session", session_id);
        }
        if let (Some(challenge), Some(credentials)) = (&self.auth, &self.credentials) {
            let authorization = challenge.authorization(credentials, method.as_str(), uri);
            request = request.add_header("Authorization", &authorization);
        }

        tracing::debug!(%method, uri, cseq, "request");
        let response = self.connection.exchange(&request)?;
        tracing::debug!(
            %method,
            cseq,
            status = response.status_code,
            "response"
        );

        if let Some(echoed) = response.cseq()
            && echoed != cseq
        {
            tracing::warn!(sent = cseq, echoed, "response CSeq does not match request");
        }

        Ok(response)
    }

    /// Record `Session: <id>[;timeout=N]` from a successful response.
    fn update_session(&mut self, response: &RtspResponse) {
        let Some(value) = response.get_header("Session") else {
            return;
        };
        let (id, timeout) = parse_session_header(value);
        if id.is_empty() {
            return;
        }
        if self.session_id.as_deref() != Some(id.as_str()) {
            tracing::debug!(session_id = %id, ?timeout, "session id assigned");
        }
        self.session_id = Some(id);
        if timeout.is_some() {
            self.session_timeout = timeout;
        }
    }
}

/// A `Content-Base` usable for joining relative controls.
///
/// Query-style bases (`...?channel=1/`) are skipped: joining onto them does
/// not produce a URL cameras accept, so the request URI is used instead.
fn base_url(value: &str) -> Option<RtspUrl> {
    if value.contains('?') {
        tracing::debug!(content_base = value, "ignoring query-style Content-Base");
        return None;
    }
    RtspUrl::parse(value)
        .inspect_err(|e| tracing::debug!(content_base = value, error = %e, "ignoring Content-Base"))
        .ok()
}
