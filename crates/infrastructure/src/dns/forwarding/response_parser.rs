use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use tinydns_domain::{AnswerRecord, DomainError, MxEntry, SrvEntry};
use tracing::debug;

/// Decoded view of an upstream reply.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub answers: Vec<AnswerRecord>,

    pub authoritative: bool,

    pub rcode: ResponseCode,

    pub truncated: bool,
}

impl DnsResponse {
    pub fn response_code(&self) -> u16 {
        u16::from(self.rcode)
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let answers: Vec<AnswerRecord> = message
            .answers()
            .iter()
            .map(|record| Self::answer_record(record.data()))
            .collect();

        let response = DnsResponse {
            answers,
            authoritative: message.authoritative(),
            rcode: message.response_code(),
            truncated: message.truncated(),
        };

        debug!(
            rcode = ?response.rcode,
            answers = response.answers.len(),
            authoritative = response.authoritative,
            truncated = response.truncated,
            "DNS response parsed"
        );

        Ok(response)
    }

    /// Converts one wire record to its domain form. Chunked TXT data is
    /// joined into a single string.
    pub fn answer_record(data: &RData) -> AnswerRecord {
        match data {
            RData::A(a) => AnswerRecord::A(a.0),
            RData::AAAA(aaaa) => AnswerRecord::AAAA(aaaa.0),
            RData::MX(mx) => AnswerRecord::MX(MxEntry {
                priority: mx.preference(),
                target: mx.exchange().to_utf8(),
            }),
            RData::TXT(txt) => AnswerRecord::TXT(
                txt.txt_data()
                    .iter()
                    .map(|chunk| String::from_utf8_lossy(chunk))
                    .collect(),
            ),
            RData::CNAME(cname) => AnswerRecord::CNAME(cname.0.to_utf8()),
            RData::NS(ns) => AnswerRecord::NS(ns.0.to_utf8()),
            RData::PTR(ptr) => AnswerRecord::PTR(ptr.0.to_utf8()),
            RData::SRV(srv) => AnswerRecord::SRV(SrvEntry {
                priority: srv.priority(),
                weight: srv.weight(),
                port: srv.port(),
                target: srv.target().to_utf8(),
            }),
            other => AnswerRecord::Other(u16::from(other.record_type())),
        }
    }
}
