//! The transport step: send a query to an ordered list of servers,
//! one at a time, and return the first reply.
//!
//! Exposed as a trait so the resolution engine can be tested against
//! a scripted sequence of replies and timeouts, per `spec.md`
//! section 9's note that the transport is "a clean seam".

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::Duration;

/// Per-server receive timeout.
const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Maximum reply size read from the socket.
const RECV_BUFFER_LEN: usize = 4096;

/// The DNS port queries are sent to.
const DNS_PORT: u16 = 53;

/// Send-a-query-get-a-reply capability, decoupled from any particular
/// socket implementation.
pub trait Transport {
    /// Send `query` to each address in `servers`, in order, returning
    /// the first reply received. Returns `None` only if every server
    /// timed out (or `servers` is empty).
    fn send_and_receive(&self, query: &[u8], servers: &[Ipv4Addr]) -> Option<Vec<u8>>;
}

/// The real, blocking UDP transport.
#[derive(Debug, Default)]
pub struct UdpTransport;

impl Transport for UdpTransport {
    fn send_and_receive(&self, query: &[u8], servers: &[Ipv4Addr]) -> Option<Vec<u8>> {
        if servers.is_empty() {
            return None;
        }

        let socket = match UdpSocket::bind("0.0.0.0:0") {
            Ok(socket) => socket,
            Err(error) => {
                tracing::warn!(?error, "could not create UDP socket");
                return None;
            }
        };
        if let Err(error) = socket.set_read_timeout(Some(RECV_TIMEOUT)) {
            tracing::warn!(?error, "could not set socket read timeout");
            return None;
        }

        let mut buf = [0u8; RECV_BUFFER_LEN];
        for &server in servers {
            let addr = SocketAddr::from((server, DNS_PORT));
            if let Err(error) = socket.send_to(query, addr) {
                tracing::debug!(?addr, ?error, "send error, trying next server");
                continue;
            }

            match socket.recv(&mut buf) {
                Ok(len) => return Some(buf[..len].to_vec()),
                Err(error) => {
                    tracing::debug!(?addr, ?error, "timed out, trying next server");
                }
            }
        }

        None
    }
}

#[cfg(any(test, feature = "test-util"))]
pub mod test_util {
    use super::{Ipv4Addr, Transport};
    use std::cell::RefCell;

    /// A server's scripted behaviour for one send.
    #[derive(Debug, Clone)]
    pub enum Scripted {
        Timeout,
        Reply(Vec<u8>),
    }

    /// A transport whose replies are scripted in advance, one per
    /// call to `send_and_receive` (matching `spec.md` section 8's
    /// `recv` side-effect sequences).
    #[derive(Debug)]
    pub struct ScriptedTransport {
        replies: RefCell<std::collections::VecDeque<Scripted>>,
        pub sent: RefCell<Vec<(Vec<u8>, Vec<Ipv4Addr>)>>,
    }

    impl ScriptedTransport {
        #[must_use]
        pub fn new(replies: Vec<Scripted>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn send_and_receive(&self, query: &[u8], servers: &[Ipv4Addr]) -> Option<Vec<u8>> {
            if servers.is_empty() {
                return None;
            }

            self.sent
                .borrow_mut()
                .push((query.to_vec(), servers.to_vec()));

            let mut replies = self.replies.borrow_mut();
            for _ in servers {
                match replies.pop_front() {
                    Some(Scripted::Reply(bytes)) => return Some(bytes),
                    Some(Scripted::Timeout) | None => continue,
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::{Scripted, ScriptedTransport};
    use super::*;

    #[test]
    fn first_server_replying_short_circuits_the_rest() {
        let transport = ScriptedTransport::new(vec![Scripted::Reply(b"result".to_vec())]);
        let servers = [Ipv4Addr::new(1, 2, 3, 4)];

        let result = transport.send_and_receive(b"query", &servers);
        assert_eq!(result, Some(b"result".to_vec()));
        assert_eq!(transport.sent.borrow().len(), 1);
    }

    #[test]
    fn second_server_replies_after_first_times_out() {
        let transport =
            ScriptedTransport::new(vec![Scripted::Timeout, Scripted::Reply(b"result".to_vec())]);
        let servers = [Ipv4Addr::new(1, 2, 3, 4), Ipv4Addr::new(5, 6, 7, 8)];

        let result = transport.send_and_receive(b"query", &servers);
        assert_eq!(result, Some(b"result".to_vec()));
    }

    #[test]
    fn every_server_timing_out_returns_none() {
        let transport = ScriptedTransport::new(vec![Scripted::Timeout, Scripted::Timeout]);
        let servers = [Ipv4Addr::new(1, 2, 3, 4), Ipv4Addr::new(5, 6, 7, 8)];

        assert_eq!(transport.send_and_receive(b"query", &servers), None);
    }

    #[test]
    fn zero_servers_returns_none_without_sending() {
        let transport = ScriptedTransport::new(vec![Scripted::Reply(b"result".to_vec())]);
        assert_eq!(transport.send_and_receive(b"query", &[]), None);
        assert_eq!(transport.sent.borrow().len(), 0);
    }

    #[test]
    fn real_udp_transport_returns_none_without_sending_for_zero_servers() {
        let transport = UdpTransport;
        assert_eq!(transport.send_and_receive(b"query", &[]), None);
    }
}
