//! RTSP Digest authentication (RFC 2617 §3.2, as used by RFC 2326 §D).
//!
//! Only the basic `MD5` scheme without `qop` is produced:
//!
//! ```text
//! HA1      = MD5(username:realm:password)
//! HA2      = MD5(method:uri)
//! response = MD5(HA1:nonce:HA2)
//! ```
//!
//! Cameras issue a single challenge per connection; the same nonce is reused
//! for every later request on that connection.

use std::fmt;

use md5::{Digest, Md5};

/// Username and password for Digest authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Realm and nonce from a `WWW-Authenticate: Digest ...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
}

impl DigestChallenge {
    /// Parse one `WWW-Authenticate` header value.
    ///
    /// Returns `None` for non-Digest schemes or when realm/nonce is missing.
    ///
    /// ```
    /// use camgrid::session::auth::DigestChallenge;
    ///
    /// let c = DigestChallenge::parse(r#"Digest realm="IPCam", nonce="abc123", stale="FALSE""#).unwrap();
    /// assert_eq!(c.realm, "IPCam");
    /// assert_eq!(c.nonce, "abc123");
    /// ```
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let scheme_end = header.find(char::is_whitespace).unwrap_or(header.len());
        let (scheme, params) = header.split_at(scheme_end);
        if !scheme.eq_ignore_ascii_case("Digest") {
            return None;
        }

        let mut realm = None;
        let mut nonce = None;
        for param in split_params(params) {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            match key.trim().to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value.to_string()),
                "nonce" => nonce = Some(value.to_string()),
                _ => {}
            }
        }

        Some(DigestChallenge {
            realm: realm?,
            nonce: nonce?,
        })
    }

    /// Compute the Digest `response` value for a request.
    pub fn response(&self, credentials: &Credentials, method: &str, uri: &str) -> String {
        let ha1 = md5_hex(&format!(
            "{}:{}:{}",
            credentials.username, self.realm, credentials.password
        ));
        let ha2 = md5_hex(&format!("{}:{}", method, uri));
        md5_hex(&format!("{}:{}:{}", ha1, self.nonce, ha2))
    }

    /// Build the full `Authorization` header value for a request.
    pub fn authorization(&self, credentials: &Credentials, method: &str, uri: &str) -> String {
        format!(
            "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", response=\"{}\"",
            credentials.username,
            self.realm,
            self.nonce,
            uri,
            self.response(credentials, method, uri)
        )
    }
}

/// Lowercase hex MD5 of a string.
pub fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// Split `a="x", b="y,z", c=w` on commas that are not inside quotes.
fn split_params(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, ch) in params.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(params[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(params[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "rtsp://192.168.1.10:554/stream1";

    fn challenge() -> DigestChallenge {
        DigestChallenge {
            realm: "IPCam".to_string(),
            nonce: "abc123".to_string(),
        }
    }

    #[test]
    fn known_digest_vectors() {
        assert_eq!(md5_hex("admin:IPCam:1234"), "4d98c1d7b3786a140a602775e0fa0350");
        assert_eq!(
            md5_hex(&format!("DESCRIBE:{URI}")),
            "8348cf1599b1f97305b3d966f290b380"
        );

        let creds = Credentials::new("admin", "1234");
        assert_eq!(
            challenge().response(&creds, "DESCRIBE", URI),
            "9ac8a1bb20c09ee0da633bf1e7820cfd"
        );
        assert_eq!(
            challenge().response(&creds, "SETUP", &format!("{URI}/trackID=1")),
            "9e64e7d80f3b8980d7b121309bdf54b4"
        );
    }

    #[test]
    fn authorization_header_fields() {
        let creds = Credentials::new("admin", "1234");
        let header = challenge().authorization(&creds, "DESCRIBE", URI);
        assert_eq!(
            header,
            "Digest username=\"admin\", realm=\"IPCam\", nonce=\"abc123\", \
             uri=\"rtsp://192.168.1.10:554/stream1\", response=\"9ac8a1bb20c09ee0da633bf1e7820cfd\""
        );
        assert!(!header.contains("1234\""));
    }

    #[test]
    fn parse_challenge_with_quoted_commas() {
        let c = DigestChallenge::parse(
            "Digest qop=\"auth,auth-int\", realm=\"Login to cam\", nonce=\"n0,nce\"",
        )
        .unwrap();
        assert_eq!(c.realm, "Login to cam");
        assert_eq!(c.nonce, "n0,nce");
    }

    #[test]
    fn parse_rejects_basic_and_incomplete() {
        assert!(DigestChallenge::parse("Basic realm=\"cam\"").is_none());
        assert!(DigestChallenge::parse("Digest realm=\"cam\"").is_none());
        assert!(DigestChallenge::parse("Digest nonce=\"abc\"").is_none());
        assert!(DigestChallenge::parse("").is_none());
    }

    #[test]
    fn debug_redacts_password() {
        let dbg = format!("{:?}", Credentials::new("admin", "s3cret"));
        assert!(dbg.contains("admin"));
        assert!(!dbg.contains("s3cret"));
    }
}
