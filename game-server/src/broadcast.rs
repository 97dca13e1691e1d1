use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::info;

/// Reserved payload that tells subscribers to stop listening. It is sent to
/// the whole group, not to one subscriber; every listener that sees it
/// terminates.
pub const STOP_SENTINEL: &str = "STOP";

/// One-way, fire-and-forget publisher to a fixed multicast group and port.
/// No delivery confirmation, no retry; losses are acceptable and unreported.
pub struct Notifier {
    socket: UdpSocket,
    target: SocketAddr,
}

impl Notifier {
    pub async fn bind(target: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .context("cannot bind notifier socket")?;
        Ok(Self { socket, target })
    }

    pub async fn publish(&self, payload: &str) -> Result<()> {
        self.socket
            .send_to(payload.as_bytes(), self.target)
            .await
            .with_context(|| format!("cannot publish to {}", self.target))?;
        Ok(())
    }
}

/// Long-lived listener on the broadcast group, used by clients to buffer
/// shared results for later display. Receives until the stop sentinel
/// arrives, then leaves the group and returns.
pub struct Subscriber {
    socket: UdpSocket,
    group: Option<Ipv4Addr>,
}

impl Subscriber {
    /// Bind the group port and join the group when the address is multicast.
    /// A unicast address skips the join, which keeps loopback tests off the
    /// multicast path.
    pub async fn join(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, addr.port()))
            .await
            .with_context(|| format!("cannot bind subscriber on port {}", addr.port()))?;

        let group = match addr.ip() {
            IpAddr::V4(ip) if ip.is_multicast() => {
                socket
                    .join_multicast_v4(ip, Ipv4Addr::UNSPECIFIED)
                    .with_context(|| format!("cannot join multicast group {}", ip))?;
                Some(ip)
            }
            _ => None,
        };

        Ok(Self { socket, group })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Append every received payload to `sink` until the stop sentinel is
    /// observed or the receiving side of the sink is dropped.
    pub async fn run(self, sink: mpsc::UnboundedSender<String>) -> Result<()> {
        let mut buf = [0u8; 2048];
        loop {
            let (len, _) = self.socket.recv_from(&mut buf).await?;
            let payload = String::from_utf8_lossy(&buf[..len]).into_owned();

            if payload == STOP_SENTINEL {
                if let Some(group) = self.group {
                    self.socket.leave_multicast_v4(group, Ipv4Addr::UNSPECIFIED)?;
                }
                info!("Stop sentinel received, subscriber terminating");
                return Ok(());
            }

            if sink.send(payload).is_err() {
                return Ok(());
            }
        }
    }
}
