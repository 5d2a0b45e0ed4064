use std::fmt;
use std::str::FromStr;

/// Record kinds the local tiers know how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    A,
    AAAA,
    MX,
    TXT,
    CNAME,
    NS,
    PTR,
    SRV,
}

impl RecordKind {
    pub const ALL: [RecordKind; 8] = [
        RecordKind::A,
        RecordKind::AAAA,
        RecordKind::MX,
        RecordKind::TXT,
        RecordKind::CNAME,
        RecordKind::NS,
        RecordKind::PTR,
        RecordKind::SRV,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::A => "A",
            RecordKind::AAAA => "AAAA",
            RecordKind::MX => "MX",
            RecordKind::TXT => "TXT",
            RecordKind::CNAME => "CNAME",
            RecordKind::NS => "NS",
            RecordKind::PTR => "PTR",
            RecordKind::SRV => "SRV",
        }
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            RecordKind::A => 1,
            RecordKind::NS => 2,
            RecordKind::CNAME => 5,
            RecordKind::PTR => 12,
            RecordKind::MX => 15,
            RecordKind::TXT => 16,
            RecordKind::AAAA => 28,
            RecordKind::SRV => 33,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1 => Some(RecordKind::A),
            2 => Some(RecordKind::NS),
            5 => Some(RecordKind::CNAME),
            12 => Some(RecordKind::PTR),
            15 => Some(RecordKind::MX),
            16 => Some(RecordKind::TXT),
            28 => Some(RecordKind::AAAA),
            33 => Some(RecordKind::SRV),
            _ => None,
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(self, RecordKind::A | RecordKind::AAAA)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(RecordKind::A),
            "AAAA" => Ok(RecordKind::AAAA),
            "MX" => Ok(RecordKind::MX),
            "TXT" => Ok(RecordKind::TXT),
            "CNAME" => Ok(RecordKind::CNAME),
            "NS" => Ok(RecordKind::NS),
            "PTR" => Ok(RecordKind::PTR),
            "SRV" => Ok(RecordKind::SRV),
            _ => Err(format!("Unsupported record type: {}", s)),
        }
    }
}

/// Question type of an inbound query.
///
/// Anything outside [`RecordKind`] is carried as its raw code and is only ever
/// answered by the upstream tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Supported(RecordKind),
    Other(u16),
}

impl QueryType {
    pub fn from_u16(code: u16) -> Self {
        match RecordKind::from_u16(code) {
            Some(kind) => QueryType::Supported(kind),
            None => QueryType::Other(code),
        }
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            QueryType::Supported(kind) => kind.to_u16(),
            QueryType::Other(code) => *code,
        }
    }

    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            QueryType::Supported(kind) => Some(*kind),
            QueryType::Other(_) => None,
        }
    }

    pub fn name(&self) -> String {
        match self {
            QueryType::Supported(kind) => kind.as_str().to_string(),
            QueryType::Other(code) => format!("TYPE{}", code),
        }
    }
}

impl From<RecordKind> for QueryType {
    fn from(kind: RecordKind) -> Self {
        QueryType::Supported(kind)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::Supported(kind) => write!(f, "{}", kind),
            QueryType::Other(code) => write!(f, "TYPE{}", code),
        }
    }
}
