use super::RecordKind;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxEntry {
    pub priority: u16,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvEntry {
    #[serde(default)]
    pub priority: u16,
    #[serde(default)]
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// One decoded answer record.
///
/// Kinds outside [`RecordKind`] are kept as `Other` so callers can still count
/// them, but they never contribute to an [`AnswerSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerRecord {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    MX(MxEntry),
    TXT(String),
    CNAME(String),
    NS(String),
    PTR(String),
    SRV(SrvEntry),
    Other(u16),
}

impl AnswerRecord {
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            AnswerRecord::A(_) => Some(RecordKind::A),
            AnswerRecord::AAAA(_) => Some(RecordKind::AAAA),
            AnswerRecord::MX(_) => Some(RecordKind::MX),
            AnswerRecord::TXT(_) => Some(RecordKind::TXT),
            AnswerRecord::CNAME(_) => Some(RecordKind::CNAME),
            AnswerRecord::NS(_) => Some(RecordKind::NS),
            AnswerRecord::PTR(_) => Some(RecordKind::PTR),
            AnswerRecord::SRV(_) => Some(RecordKind::SRV),
            AnswerRecord::Other(_) => None,
        }
    }
}

/// All record data known for one domain, independent of wire format.
///
/// Missing data for a kind is an empty sequence, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSet {
    pub a: Vec<Ipv4Addr>,
    pub aaaa: Vec<Ipv6Addr>,
    pub mx: Vec<MxEntry>,
    pub txt: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    pub ns: Vec<String>,
    pub ptr: Vec<String>,
    pub srv: Vec<SrvEntry>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_a(mut self, addr: Ipv4Addr) -> Self {
        self.a.push(addr);
        self
    }

    pub fn with_aaaa(mut self, addr: Ipv6Addr) -> Self {
        self.aaaa.push(addr);
        self
    }

    pub fn with_mx(mut self, priority: u16, target: impl Into<String>) -> Self {
        self.mx.push(MxEntry {
            priority,
            target: target.into(),
        });
        self
    }

    pub fn with_txt(mut self, text: impl Into<String>) -> Self {
        self.txt.push(text.into());
        self
    }

    pub fn with_cname(mut self, target: impl Into<String>) -> Self {
        self.cname = Some(target.into());
        self
    }

    pub fn with_ns(mut self, target: impl Into<String>) -> Self {
        self.ns.push(target.into());
        self
    }

    pub fn with_ptr(mut self, target: impl Into<String>) -> Self {
        self.ptr.push(target.into());
        self
    }

    pub fn with_srv(mut self, entry: SrvEntry) -> Self {
        self.srv.push(entry);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
            && self.aaaa.is_empty()
            && self.mx.is_empty()
            && self.txt.is_empty()
            && self.cname.is_none()
            && self.ns.is_empty()
            && self.ptr.is_empty()
            && self.srv.is_empty()
    }

    /// Answer records for one kind, in stored order.
    pub fn records_for(&self, kind: RecordKind) -> Vec<AnswerRecord> {
        match kind {
            RecordKind::A => self.a.iter().copied().map(AnswerRecord::A).collect(),
            RecordKind::AAAA => self.aaaa.iter().copied().map(AnswerRecord::AAAA).collect(),
            RecordKind::MX => self.mx.iter().cloned().map(AnswerRecord::MX).collect(),
            RecordKind::TXT => self.txt.iter().cloned().map(AnswerRecord::TXT).collect(),
            RecordKind::CNAME => self.cname.iter().cloned().map(AnswerRecord::CNAME).collect(),
            RecordKind::NS => self.ns.iter().cloned().map(AnswerRecord::NS).collect(),
            RecordKind::PTR => self.ptr.iter().cloned().map(AnswerRecord::PTR).collect(),
            RecordKind::SRV => self.srv.iter().cloned().map(AnswerRecord::SRV).collect(),
        }
    }

    /// Folds decoded answer records into a set. `Other` records are skipped and
    /// a later CNAME replaces an earlier one.
    pub fn from_records(records: &[AnswerRecord]) -> Self {
        let mut set = AnswerSet::default();
        for record in records {
            match record {
                AnswerRecord::A(addr) => set.a.push(*addr),
                AnswerRecord::AAAA(addr) => set.aaaa.push(*addr),
                AnswerRecord::MX(mx) => set.mx.push(mx.clone()),
                AnswerRecord::TXT(text) => set.txt.push(text.clone()),
                AnswerRecord::CNAME(target) => set.cname = Some(target.clone()),
                AnswerRecord::NS(target) => set.ns.push(target.clone()),
                AnswerRecord::PTR(target) => set.ptr.push(target.clone()),
                AnswerRecord::SRV(srv) => set.srv.push(srv.clone()),
                AnswerRecord::Other(_) => {}
            }
        }
        set
    }
}
