use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::error::Result;

/// Largest datagram we expect from a camera; RTP over UDP stays under the path MTU.
pub const MAX_DATAGRAM: usize = 2048;

/// Receive timeout used so a receive loop can notice shutdown requests.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// UDP socket bound to the client RTP port negotiated in SETUP.
///
/// Address-only: it knows nothing about sessions or codecs. Each received
/// datagram is handed back as a borrowed slice for the classifier in
/// [`crate::media`].
pub struct RtpReceiver {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl RtpReceiver {
    /// Bind `0.0.0.0:<port>` with the default receive timeout.
    pub fn bind(port: u16) -> Result<Self> {
        Self::bind_addr(SocketAddr::from(([0, 0, 0, 0], port)), Some(DEFAULT_RECV_TIMEOUT))
    }

    /// Bind an explicit address. `None` means block until a datagram arrives.
    pub fn bind_addr(addr: SocketAddr, timeout: Option<Duration>) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(timeout)?;
        tracing::info!(addr = %socket.local_addr()?, "listening for RTP packets");
        Ok(Self {
            socket,
            buf: vec![0u8; MAX_DATAGRAM],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive one datagram.
    ///
    /// Returns `Ok(None)` when the receive timeout elapses with nothing to
    /// read, so the caller can check its own stop condition and call again.
    pub fn recv(&mut self) -> Result<Option<(&[u8], SocketAddr)>> {
        match self.socket.recv_from(&mut self.buf) {
            Ok((len, from)) => Ok(Some((&self.buf[..len], from))),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
