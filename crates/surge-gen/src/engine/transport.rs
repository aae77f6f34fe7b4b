//! Outbound connections for both supported protocols behind one send surface.

use bytes::Bytes;
use once_cell::sync::Lazy;
use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::io::AsyncWriteExt;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tokio::time::{timeout, Duration};

/// Size of the filler buffer written per send call; identical for UDP and TCP.
pub const BUFFER_SIZE: usize = 16384;

const FILL_BYTE: u8 = b'x';
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

static FILLER: Lazy<Bytes> = Lazy::new(|| Bytes::from(vec![FILL_BYTE; BUFFER_SIZE]));

/// Shared filler payload; cloning is a refcount bump, every worker writes the
/// same backing buffer.
pub fn filler() -> Bytes {
    FILLER.clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Udp,
    Tcp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Udp => write!(f, "UDP"),
            Protocol::Tcp => write!(f, "TCP"),
        }
    }
}

/// One outbound connection owned exclusively by a single worker. Dropping the
/// value releases the socket on every exit path.
pub enum SendConn {
    Udp(UdpSocket),
    Tcp(TcpStream),
}

impl SendConn {
    /// Establishes the outbound connection for `protocol`. TCP connects are
    /// bounded by a 5 s timeout; UDP resolves the target, binds an
    /// unspecified local address of the matching family and connects the
    /// socket so later sends need no per-call address.
    pub async fn open(protocol: Protocol, host: &str, port: u16) -> io::Result<Self> {
        match protocol {
            Protocol::Tcp => {
                let stream = match timeout(CONNECT_TIMEOUT, TcpStream::connect((host, port))).await
                {
                    Ok(connected) => connected?,
                    Err(_) => {
                        return Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "connect timed out",
                        ))
                    }
                };
                Ok(SendConn::Tcp(stream))
            }
            Protocol::Udp => {
                let mut resolved = lookup_host((host, port)).await?;
                let target = resolved.next().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, "target host did not resolve")
                })?;
                let local: SocketAddr = if target.is_ipv6() {
                    SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
                } else {
                    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
                };
                let socket = UdpSocket::bind(local).await?;
                socket.connect(target).await?;
                Ok(SendConn::Udp(socket))
            }
        }
    }

    /// Writes the whole buffer: `write_all` on TCP, one datagram on UDP.
    /// Returns the number of bytes put on the wire.
    pub async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SendConn::Udp(socket) => socket.send(buf).await,
            SendConn::Tcp(stream) => {
                stream.write_all(buf).await?;
                Ok(buf.len())
            }
        }
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            SendConn::Udp(_) => Protocol::Udp,
            SendConn::Tcp(_) => Protocol::Tcp,
        }
    }

    /// Graceful close for the normal exit path; error paths rely on drop.
    pub async fn close(self) {
        if let SendConn::Tcp(mut stream) = self {
            let _ = stream.shutdown().await;
        }
    }
}
