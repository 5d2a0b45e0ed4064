//! DNS reply builder
//!
//! Encodes locally produced answers as a reply to the client's request using
//! `hickory-proto`. Upstream replies never pass through here; they are relayed
//! as received.

use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NS, PTR, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;
use tinydns_domain::{AnswerRecord, DomainError};

const MAX_CHARACTER_STRING: usize = 255;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Builds an authoritative reply to `request` carrying `answers`.
    ///
    /// The reply keeps the request's ID, opcode, RD flag and question; QR, AA
    /// and RA are set. Every answer is owned by the first question's name.
    pub fn build_reply(
        request: &Message,
        answers: &[AnswerRecord],
        ttl: u32,
    ) -> Result<Vec<u8>, DomainError> {
        let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_recursion_available(true);
        reply.set_authoritative(true);

        for query in request.queries() {
            reply.add_query(query.clone());
        }

        if let Some(question) = request.queries().first() {
            let owner = question.name().clone();
            for answer in answers {
                if let Some(rdata) = Self::rdata(answer)? {
                    reply.add_answer(Record::from_rdata(owner.clone(), ttl, rdata));
                }
            }
        }

        Self::serialize_message(&reply)
    }

    /// Builds an answerless reply to `request` carrying `code`.
    pub fn build_error(request: &Message, code: ResponseCode) -> Result<Vec<u8>, DomainError> {
        let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_recursion_available(true);
        reply.set_response_code(code);

        for query in request.queries() {
            reply.add_query(query.clone());
        }

        Self::serialize_message(&reply)
    }

    /// `Other` records carry no data and are skipped.
    fn rdata(answer: &AnswerRecord) -> Result<Option<RData>, DomainError> {
        let rdata = match answer {
            AnswerRecord::A(ip) => RData::A(A(*ip)),
            AnswerRecord::AAAA(ip) => RData::AAAA(AAAA(*ip)),
            AnswerRecord::MX(mx) => RData::MX(MX::new(mx.priority, fqdn(&mx.target)?)),
            AnswerRecord::TXT(text) => RData::TXT(TXT::new(character_strings(text))),
            AnswerRecord::CNAME(target) => RData::CNAME(CNAME(fqdn(target)?)),
            AnswerRecord::NS(target) => RData::NS(NS(fqdn(target)?)),
            AnswerRecord::PTR(target) => RData::PTR(PTR(fqdn(target)?)),
            AnswerRecord::SRV(srv) => RData::SRV(SRV::new(
                srv.priority,
                srv.weight,
                srv.port,
                fqdn(&srv.target)?,
            )),
            AnswerRecord::Other(_) => return Ok(None),
        };
        Ok(Some(rdata))
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}

/// Splits `text` into DNS character-strings of at most 255 bytes, never
/// inside a UTF-8 sequence.
fn character_strings(text: &str) -> Vec<String> {
    if text.len() <= MAX_CHARACTER_STRING {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::with_capacity(text.len() / MAX_CHARACTER_STRING + 1);
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = rest.len().min(MAX_CHARACTER_STRING);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk.to_string());
        rest = tail;
    }
    chunks
}

fn fqdn(name: &str) -> Result<Name, DomainError> {
    let absolute = if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    };
    Name::from_str(&absolute)
        .map_err(|e| DomainError::InvalidDomainName(format!("Invalid name '{}': {}", name, e)))
}
