use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{ProtocolErrorKind, Result, RtspError};
use crate::protocol::{RtspRequest, RtspResponse};

/// Upper bound on a response's status line plus headers.
pub const MAX_HEAD: usize = 64 * 1024;

/// Upper bound on an announced body; SDP is a few KiB at most.
pub const MAX_BODY: usize = 4 * 1024 * 1024;

/// One RTSP control connection.
///
/// Generic over the byte stream so a session can run over a [`TcpStream`]
/// or any other `Read + Write` pipe. Requests are written whole; responses
/// are read line by line up to the blank line, then `Content-Length` body
/// bytes are read exactly.
pub struct Connection<S: Read + Write> {
    reader: BufReader<S>,
}

impl Connection<TcpStream> {
    /// Connect to `addr` (`host:port`) and apply optional socket timeouts.
    ///
    /// Timeouts are the only way to bound a blocking exchange; without them
    /// a silent server blocks the caller indefinitely.
    pub fn open(
        addr: &str,
        read_timeout: Option<Duration>,
        write_timeout: Option<Duration>,
    ) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(read_timeout)?;
        stream.set_write_timeout(write_timeout)?;
        stream.set_nodelay(true)?;
        tracing::debug!(%addr, "RTSP connection opened");
        Ok(Self::new(stream))
    }
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::new(stream),
        }
    }

    /// Write a complete request.
    pub fn send(&mut self, request: &RtspRequest) -> Result<()> {
        let stream = self.reader.get_mut();
        stream.write_all(request.serialize().as_bytes())?;
        stream.flush()?;
        Ok(())
    }

    /// Read one complete response: status line, headers, and body.
    ///
    /// A head longer than [`MAX_HEAD`], a head that is not UTF-8, and a
    /// `Content-Length` above [`MAX_BODY`] are protocol errors.
    pub fn read_response(&mut self) -> Result<RtspResponse> {
        let mut head = String::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            let remaining = MAX_HEAD.saturating_sub(head.len());
            let read = self
                .reader
                .by_ref()
                .take(remaining as u64 + 1)
                .read_until(b'\n', &mut line)?;
            if read == 0 {
                return Err(RtspError::Transport(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed before response was complete",
                )));
            }
            if read > remaining {
                tracing::warn!(limit = MAX_HEAD, "response head too large");
                return Err(RtspError::protocol(ProtocolErrorKind::InvalidHeader));
            }
            let text = std::str::from_utf8(&line)
                .map_err(|_| RtspError::protocol(ProtocolErrorKind::InvalidHeader))?;
            // Tolerate stray CRLFs between messages.
            if head.is_empty() && text.trim().is_empty() {
                continue;
            }
            head.push_str(text);
            if text == "\r\n" || text == "\n" {
                break;
            }
            if !text.ends_with('\n') {
                return Err(RtspError::Transport(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed before response was complete",
                )));
            }
        }

        let mut response = RtspResponse::parse_head(&head)?;

        let len = response.content_length()?;
        if len > MAX_BODY {
            tracing::warn!(len, limit = MAX_BODY, "Content-Length over limit");
            return Err(RtspError::protocol(ProtocolErrorKind::InvalidContentLength));
        }
        if len > 0 {
            let mut body = vec![0u8; len];
            self.reader.read_exact(&mut body)?;
            response.body = String::from_utf8(body)
                .map_err(|_| RtspError::protocol(ProtocolErrorKind::InvalidBody))?;
        }

        Ok(response)
    }

    /// Send a request and wait for its response.
    pub fn exchange(&mut self, request: &RtspRequest) -> Result<RtspResponse> {
        self.send(request)?;
        self.read_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Method;
    use std::io::Cursor;

    /// Reads from a canned script, discards writes.
    struct Scripted(Cursor<Vec<u8>>);

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Write for Scripted {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn connection(script: &str) -> Connection<Scripted> {
        Connection::new(Scripted(Cursor::new(script.as_bytes().to_vec())))
    }

    #[test]
    fn reads_back_to_back_responses_with_body() {
        let mut conn = connection(
            "RTSP/1.0 200 OK\r\nCSeq: 1\r\nContent-Length: 5\r\n\r\nv=0\r\n\
             RTSP/1.0 200 OK\r\nCSeq: 2\r\n\r\n",
        );
        let req = RtspRequest::new(Method::Describe, "rtsp://cam/");
        let first = conn.exchange(&req).unwrap();
        assert_eq!(first.body, "v=0\r\n");
        let second = conn.exchange(&req).unwrap();
        assert_eq!(second.cseq(), Some(2));
        assert!(second.body.is_empty());
    }

    #[test]
    fn eof_is_transport_error() {
        let mut conn = connection("RTSP/1.0 200 OK\r\nCSeq: 1\r\n");
        assert!(matches!(conn.read_response(), Err(RtspError::Transport(_))));
    }

    #[test]
    fn short_body_is_transport_error() {
        let mut conn = connection("RTSP/1.0 200 OK\r\nContent-Length: 50\r\n\r\nv=0\r\n");
        assert!(matches!(conn.read_response(), Err(RtspError::Transport(_))));
    }

    #[test]
    fn huge_content_length_is_protocol_error() {
        let mut conn = connection(
            "RTSP/1.0 200 OK\r\nContent-Length: 18446744073709551615\r\n\r\nv=0",
        );
        assert!(matches!(
            conn.read_response(),
            Err(RtspError::Protocol {
                kind: ProtocolErrorKind::InvalidContentLength
            })
        ));

        let over = format!("RTSP/1.0 200 OK\r\nContent-Length: {}\r\n\r\n", MAX_BODY + 1);
        let mut conn = connection(&over);
        assert!(matches!(
            conn.read_response(),
            Err(RtspError::Protocol {
                kind: ProtocolErrorKind::InvalidContentLength
            })
        ));
    }

    #[test]
    fn non_utf8_header_is_protocol_error() {
        let script = b"RTSP/1.0 200 OK\r\nX-Name: \xff\xfe\r\n\r\n".to_vec();
        let mut conn = Connection::new(Scripted(Cursor::new(script)));
        assert!(matches!(
            conn.read_response(),
            Err(RtspError::Protocol {
                kind: ProtocolErrorKind::InvalidHeader
            })
        ));
    }

    #[test]
    fn endless_header_line_is_protocol_error() {
        let mut script = b"RTSP/1.0 200 OK\r\nX-Junk: ".to_vec();
        script.resize(MAX_HEAD * 2, b'a');
        let mut conn = Connection::new(Scripted(Cursor::new(script)));
        assert!(matches!(
            conn.read_response(),
            Err(RtspError::Protocol {
                kind: ProtocolErrorKind::InvalidHeader
            })
        ));
    }

    #[test]
    fn garbage_status_line_is_protocol_error() {
        let mut conn = connection("HELLO\r\n\r\n");
        assert!(matches!(
            conn.read_response(),
            Err(RtspError::Protocol {
                kind: ProtocolErrorKind::InvalidStatusLine
            })
        ));
    }
}
