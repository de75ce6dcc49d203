//! Frame delivery to the strip controller.
//!
//! Frames are raw `L × 3` RGB bytes in strip order, one datagram each,
//! no header. Delivery is best effort.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::error::{Error, Result, TransportError};

/// Accepts one finished frame per cycle
pub trait TransportSink: Send {
    /// Attempt delivery without blocking
    fn send(&mut self, frame: &[u8]) -> std::result::Result<(), TransportError>;
}

/// Non-blocking UDP sender bound to one controller address
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSink {
    /// Resolve `target` (`host:port`) and open a non-blocking socket.
    ///
    /// Resolution happens here, once, so the send path never touches DNS.
    pub fn connect(target: &str) -> Result<Self> {
        let target = resolve(target)?;
        let bind_addr = if target.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };

        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_nonblocking(true)?;
        // connect() fixes the peer so each send is a single syscall
        socket.connect(target)?;

        tracing::info!("UDP sink ready -> {}", target);

        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl TransportSink for UdpSink {
    fn send(&mut self, frame: &[u8]) -> std::result::Result<(), TransportError> {
        let sent = self.socket.send(frame)?;
        if sent != frame.len() {
            return Err(TransportError::Truncated {
                sent,
                expected: frame.len(),
            });
        }
        tracing::trace!("Sent {} byte frame to {}", sent, self.target);
        Ok(())
    }
}

fn resolve(target: &str) -> Result<SocketAddr> {
    target
        .to_socket_addrs()
        .map_err(|e| Error::Config(format!("Invalid sink address '{}': {}", target, e)))?
        .next()
        .ok_or_else(|| Error::Config(format!("Sink address '{}' did not resolve", target)))
}
