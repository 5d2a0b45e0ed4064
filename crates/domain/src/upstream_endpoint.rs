use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// An upstream server address that may or may not be resolved to an IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            UpstreamAddr::Resolved(addr) => addr.port(),
            UpstreamAddr::Unresolved { port, .. } => *port,
        }
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpstreamNet {
    #[default]
    Udp,
    Tcp,
}

impl UpstreamNet {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamNet::Udp => "UDP",
            UpstreamNet::Tcp => "TCP",
        }
    }
}

/// An upstream resolver endpoint.
///
/// Accepted forms: `udp://HOST:PORT`, `tcp://HOST:PORT`, `IP:PORT`, a bare IP
/// (port 53), or `HOSTNAME:PORT`. Forms without a scheme use the default
/// network chosen by the caller of [`UpstreamEndpoint::parse_with_default`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamEndpoint {
    pub net: UpstreamNet,
    pub addr: UpstreamAddr,
}

impl UpstreamEndpoint {
    pub fn udp(addr: SocketAddr) -> Self {
        Self {
            net: UpstreamNet::Udp,
            addr: UpstreamAddr::Resolved(addr),
        }
    }

    pub fn tcp(addr: SocketAddr) -> Self {
        Self {
            net: UpstreamNet::Tcp,
            addr: UpstreamAddr::Resolved(addr),
        }
    }

    pub fn parse_with_default(s: &str, default_net: UpstreamNet) -> Result<Self, String> {
        let s = s.trim();
        if let Some(addr_str) = s.strip_prefix("udp://") {
            let addr = parse_upstream_addr(addr_str)
                .map_err(|_| format!("Invalid UDP address '{}'", addr_str))?;
            return Ok(Self {
                net: UpstreamNet::Udp,
                addr,
            });
        }
        if let Some(addr_str) = s.strip_prefix("tcp://") {
            let addr = parse_upstream_addr(addr_str)
                .map_err(|_| format!("Invalid TCP address '{}'", addr_str))?;
            return Ok(Self {
                net: UpstreamNet::Tcp,
                addr,
            });
        }
        let addr = parse_upstream_addr(s).map_err(|_| {
            format!(
                "Invalid upstream server '{}'. Expected: udp://HOST:PORT, tcp://HOST:PORT, IP:PORT, IP or HOSTNAME:PORT",
                s
            )
        })?;
        Ok(Self {
            net: default_net,
            addr,
        })
    }
}

impl FromStr for UpstreamEndpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_default(s, UpstreamNet::Udp)
    }
}

impl fmt::Display for UpstreamEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.net {
            UpstreamNet::Udp => write!(f, "udp://{}", self.addr),
            UpstreamNet::Tcp => write!(f, "tcp://{}", self.addr),
        }
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

fn parse_upstream_addr(addr_str: &str) -> Result<UpstreamAddr, String> {
    if let Ok(addr) = addr_str.parse::<SocketAddr>() {
        return Ok(UpstreamAddr::Resolved(addr));
    }
    if let Ok(ip) = addr_str.parse::<IpAddr>() {
        return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
    }
    if let Some((host, port)) = parse_host_port(addr_str) {
        if !host.is_empty() && !host.contains(':') {
            return Ok(UpstreamAddr::Unresolved {
                hostname: host.into(),
                port,
            });
        }
    }
    Err(format!("Invalid address '{}'", addr_str))
}
