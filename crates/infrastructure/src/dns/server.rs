use crate::dns::forwarding::{MessageBuilder, RecordTypeMapper};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::net::IpAddr;
use std::sync::Arc;
use tinydns_application::use_cases::dns::ResolutionOutcome;
use tinydns_application::use_cases::ResolveQueryUseCase;
use tinydns_domain::{DnsRequest, DomainError};
use tracing::{debug, warn};

/// Transport-agnostic request handler shared by the UDP and TCP listeners.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<ResolveQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<ResolveQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Resolves one wire-format request and returns the wire-format reply.
    ///
    /// Returns `None` when the message does not decode, is itself a response
    /// or carries no question; such messages get no reply at all. Opcodes
    /// other than QUERY are answered with NOTIMP.
    pub async fn handle_raw(&self, bytes: &[u8], client_ip: IpAddr) -> Option<Vec<u8>> {
        let message = match Message::from_vec(bytes) {
            Ok(message) => message,
            Err(e) => {
                debug!(client = %client_ip, error = %e, "Dropping undecodable query");
                return None;
            }
        };

        if message.message_type() == MessageType::Response {
            debug!(client = %client_ip, id = message.id(), "Dropping message with QR set");
            return None;
        }

        let Some(question) = message.queries().first() else {
            debug!(client = %client_ip, id = message.id(), "Dropping query without question");
            return None;
        };

        if message.op_code() != OpCode::Query {
            debug!(
                client = %client_ip,
                op_code = ?message.op_code(),
                "Unsupported opcode"
            );
            return Self::encode_or_log(MessageBuilder::build_error(
                &message,
                ResponseCode::NotImp,
            ));
        }

        let request = DnsRequest::new(
            question.name().to_utf8(),
            RecordTypeMapper::query_type(question.query_type()),
            client_ip,
        );

        let resolution = self.use_case.execute(&request, bytes).await;

        match resolution.outcome {
            ResolutionOutcome::Upstream(response) => Some(response.wire.to_vec()),
            ResolutionOutcome::Local(answer) => {
                match MessageBuilder::build_reply(&message, &answer.records, answer.ttl) {
                    Ok(reply) => Some(reply),
                    Err(e) => {
                        warn!(
                            domain = %request.domain,
                            error = %e,
                            "Failed to encode local answer, replying empty"
                        );
                        Self::encode_or_log(MessageBuilder::build_reply(&message, &[], 0))
                    }
                }
            }
        }
    }

    fn encode_or_log(reply: Result<Vec<u8>, DomainError>) -> Option<Vec<u8>> {
        match reply {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!(error = %e, "Failed to encode reply");
                None
            }
        }
    }
}
