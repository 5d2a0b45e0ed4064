//! Mapping between `tinydns_domain::RecordKind` and `hickory_proto::rr::RecordType`.

use hickory_proto::rr::RecordType as HickoryRecordType;
use tinydns_domain::{QueryType, RecordKind};

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(kind: RecordKind) -> HickoryRecordType {
        match kind {
            RecordKind::A => HickoryRecordType::A,
            RecordKind::AAAA => HickoryRecordType::AAAA,
            RecordKind::MX => HickoryRecordType::MX,
            RecordKind::TXT => HickoryRecordType::TXT,
            RecordKind::CNAME => HickoryRecordType::CNAME,
            RecordKind::NS => HickoryRecordType::NS,
            RecordKind::PTR => HickoryRecordType::PTR,
            RecordKind::SRV => HickoryRecordType::SRV,
        }
    }

    /// Returns `None` for kinds the resolver does not serve locally.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> Option<RecordKind> {
        match hickory_type {
            HickoryRecordType::A => Some(RecordKind::A),
            HickoryRecordType::AAAA => Some(RecordKind::AAAA),
            HickoryRecordType::MX => Some(RecordKind::MX),
            HickoryRecordType::TXT => Some(RecordKind::TXT),
            HickoryRecordType::CNAME => Some(RecordKind::CNAME),
            HickoryRecordType::NS => Some(RecordKind::NS),
            HickoryRecordType::PTR => Some(RecordKind::PTR),
            HickoryRecordType::SRV => Some(RecordKind::SRV),
            _ => None,
        }
    }

    /// Question type as seen by the pipeline; unknown codes are preserved.
    pub fn query_type(hickory_type: HickoryRecordType) -> QueryType {
        match Self::from_hickory(hickory_type) {
            Some(kind) => QueryType::Supported(kind),
            None => QueryType::Other(u16::from(hickory_type)),
        }
    }
}
