use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::UpstreamNet;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub net: ListenNet,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            net: ListenNet::default(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:53".to_string()
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListenNet {
    #[default]
    Udp,
    Tcp,
    Both,
}

impl ListenNet {
    pub fn serves_udp(&self) -> bool {
        matches!(self, ListenNet::Udp | ListenNet::Both)
    }

    pub fn serves_tcp(&self) -> bool {
        matches!(self, ListenNet::Tcp | ListenNet::Both)
    }

    /// Network used for upstream servers given without a scheme.
    pub fn upstream_net(&self) -> UpstreamNet {
        match self {
            ListenNet::Tcp => UpstreamNet::Tcp,
            ListenNet::Udp | ListenNet::Both => UpstreamNet::Udp,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListenNet::Udp => "udp",
            ListenNet::Tcp => "tcp",
            ListenNet::Both => "both",
        }
    }
}

impl fmt::Display for ListenNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListenNet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "udp" => Ok(ListenNet::Udp),
            "tcp" => Ok(ListenNet::Tcp),
            "both" => Ok(ListenNet::Both),
            other => Err(format!("Invalid network '{}', expected udp, tcp or both", other)),
        }
    }
}
