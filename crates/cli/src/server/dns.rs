use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tinydns_domain::ListenNet;
use tinydns_infrastructure::dns::transport::{read_with_length_prefix, send_with_length_prefix};
use tinydns_infrastructure::dns::DnsServerHandler;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const MAX_UDP_MESSAGE_SIZE: usize = 4096;
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the configured listeners until one of them fails.
pub async fn start_dns_server(
    socket_addr: SocketAddr,
    net: ListenNet,
    handler: DnsServerHandler,
) -> anyhow::Result<()> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let handler = Arc::new(handler);
    let mut join_set: JoinSet<anyhow::Result<()>> = JoinSet::new();

    if net.serves_udp() {
        let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        let handler_udp = handler.clone();
        join_set.spawn(async move { run_udp_listener(udp_socket, handler_udp).await });
    }

    if net.serves_tcp() {
        let tcp_listener = create_tcp_listener(domain, socket_addr)?;
        let handler_tcp = handler.clone();
        join_set.spawn(async move { run_tcp_listener(tcp_listener, handler_tcp).await });
    }

    info!(bind_address = %socket_addr, net = %net, "DNS server ready");

    while let Some(joined) = join_set.join_next().await {
        joined??;
    }
    Ok(())
}

async fn run_udp_listener(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
) -> anyhow::Result<()> {
    let mut recv_buf = [0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) => {
                // ICMP port-unreachable from a previous reply surfaces here on some platforms.
                debug!(error = %e, "UDP recv error");
                continue;
            }
        };

        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = handler.clone();
        let socket = socket.clone();

        tokio::spawn(async move {
            if let Some(response) = handler.handle_raw(&query, from.ip()).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    warn!(client = %from, error = %e, "Failed to send UDP response");
                }
            }
        });
    }
}

async fn run_tcp_listener(
    listener: TcpListener,
    handler: Arc<DnsServerHandler>,
) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "TCP accept error");
                continue;
            }
        };

        let handler = handler.clone();
        tokio::spawn(async move {
            serve_tcp_connection(stream, peer.ip(), handler, TCP_IDLE_TIMEOUT).await;
        });
    }
}

/// Answers length-prefixed messages until the client closes the connection
/// or stays silent for `idle_timeout`.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    client_ip: IpAddr,
    handler: Arc<DnsServerHandler>,
    idle_timeout: Duration,
) {
    loop {
        let query =
            match tokio::time::timeout(idle_timeout, read_with_length_prefix(&mut stream)).await {
                Ok(Ok(query)) => query,
                Ok(Err(e)) => {
                    debug!(client = %client_ip, error = %e, "TCP connection closed");
                    return;
                }
                Err(_) => {
                    debug!(client = %client_ip, "Closing idle TCP connection");
                    return;
                }
            };

        let Some(response) = handler.handle_raw(&query, client_ip).await else {
            continue;
        };

        if let Err(e) = send_with_length_prefix(&mut stream, &response).await {
            warn!(client = %client_ip, error = %e, "Failed to send TCP response");
            return;
        }
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
