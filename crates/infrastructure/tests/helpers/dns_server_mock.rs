#![allow(dead_code)]
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tinydns_infrastructure::dns::transport::{read_with_length_prefix, send_with_length_prefix};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub const MOCK_ANSWER: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// One A record over UDP and TCP.
    Answer { authoritative: bool },
    /// Empty reply with TC set over UDP; full answer over TCP.
    TruncateUdp,
    /// Empty reply with TC set over UDP; TCP connections are held without a reply.
    TruncateUdpStallTcp,
    /// Never replies.
    Silent,
}

/// Upstream stand-in listening on 127.0.0.1 with UDP and TCP on one port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_queries);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            let response = match behavior {
                                MockBehavior::Answer { authoritative } => {
                                    Self::build_mock_response(&buf[..len], authoritative)
                                }
                                MockBehavior::TruncateUdp | MockBehavior::TruncateUdpStallTcp => {
                                    Self::build_truncated_response(&buf[..len])
                                }
                                MockBehavior::Silent => continue,
                            };
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            tcp_count.fetch_add(1, Ordering::SeqCst);
                            if behavior == MockBehavior::Silent {
                                continue;
                            }
                            tokio::spawn(async move {
                                if behavior == MockBehavior::TruncateUdpStallTcp {
                                    let _ = read_with_length_prefix(&mut stream).await;
                                    tokio::time::sleep(Duration::from_secs(30)).await;
                                    return;
                                }
                                if let Ok(query) = read_with_length_prefix(&mut stream).await {
                                    let response = Self::build_mock_response(&query, false);
                                    let _ = send_with_length_prefix(&mut stream, &response).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    fn header(query: &[u8], flags: u8, answers: u8) -> Vec<u8> {
        let mut response = Vec::with_capacity(512);

        response.extend_from_slice(&query[0..2]);
        response.push(flags);
        response.push(0x80);
        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&[0x00, answers]);
        response.extend_from_slice(&[0x00, 0x00]);
        response.extend_from_slice(&[0x00, 0x00]);

        if query.len() > 12 {
            response.extend_from_slice(&query[12..]);
        }
        response
    }

    pub fn build_mock_response(query: &[u8], authoritative: bool) -> Vec<u8> {
        if query.len() < 12 {
            return vec![];
        }

        let flags = if authoritative { 0x85 } else { 0x81 };
        let mut response = Self::header(query, flags, 1);

        let octets = MOCK_ANSWER.octets();
        response.extend_from_slice(&[
            0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x3c, 0x00, 0x04, octets[0],
            octets[1], octets[2], octets[3],
        ]);

        response
    }

    pub fn build_truncated_response(query: &[u8]) -> Vec<u8> {
        if query.len() < 12 {
            return vec![];
        }
        Self::header(query, 0x83, 0)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
