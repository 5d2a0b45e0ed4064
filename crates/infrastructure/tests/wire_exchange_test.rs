use hickory_proto::rr::RecordType;
use std::time::Duration;
use tinydns_application::ports::UpstreamExchange;
use tinydns_domain::{AnswerRecord, DomainError, UpstreamEndpoint};
use tinydns_infrastructure::dns::WireExchange;

mod helpers;
use helpers::{build_query, MockBehavior, MockDnsServer, MOCK_ANSWER};

const TIMEOUT: Duration = Duration::from_secs(2);

// ── UDP ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_udp_exchange_decodes_answers() {
    let server = MockDnsServer::start(MockBehavior::Answer {
        authoritative: false,
    })
    .await
    .unwrap();
    let query = build_query(0x1234, "example.com.", RecordType::A);

    let response = WireExchange::new()
        .exchange(&query, &UpstreamEndpoint::udp(server.addr()), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(response.answers, vec![AnswerRecord::A(MOCK_ANSWER)]);
    assert!(!response.authoritative);
    assert_eq!(response.response_code, 0);
    assert_eq!(server.udp_queries(), 1);
    assert_eq!(server.tcp_queries(), 0);
}

#[tokio::test]
async fn test_reply_wire_keeps_client_message_id() {
    let server = MockDnsServer::start(MockBehavior::Answer {
        authoritative: false,
    })
    .await
    .unwrap();
    let query = build_query(0xBEEF, "example.com.", RecordType::A);

    let response = WireExchange::new()
        .exchange(&query, &UpstreamEndpoint::udp(server.addr()), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(&response.wire[0..2], &[0xBE, 0xEF]);
}

#[tokio::test]
async fn test_authority_bit_is_reported() {
    let server = MockDnsServer::start(MockBehavior::Answer {
        authoritative: true,
    })
    .await
    .unwrap();
    let query = build_query(7, "example.com.", RecordType::A);

    let response = WireExchange::new()
        .exchange(&query, &UpstreamEndpoint::udp(server.addr()), TIMEOUT)
        .await
        .unwrap();

    assert!(response.authoritative);
}

#[tokio::test]
async fn test_silent_upstream_times_out() {
    let server = MockDnsServer::start(MockBehavior::Silent).await.unwrap();
    let query = build_query(9, "example.com.", RecordType::A);

    let result = WireExchange::new()
        .exchange(
            &query,
            &UpstreamEndpoint::udp(server.addr()),
            Duration::from_millis(100),
        )
        .await;

    assert!(matches!(result, Err(DomainError::TransportTimeout { .. })));
}

// ── TCP ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tcp_exchange() {
    let server = MockDnsServer::start(MockBehavior::Answer {
        authoritative: false,
    })
    .await
    .unwrap();
    let query = build_query(0x0101, "example.com.", RecordType::A);

    let response = WireExchange::new()
        .exchange(&query, &UpstreamEndpoint::tcp(server.addr()), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(response.answers, vec![AnswerRecord::A(MOCK_ANSWER)]);
    assert_eq!(server.udp_queries(), 0);
    assert_eq!(server.tcp_queries(), 1);
}

#[tokio::test]
async fn test_truncated_udp_reply_is_retried_over_tcp() {
    let server = MockDnsServer::start(MockBehavior::TruncateUdp).await.unwrap();
    let query = build_query(0x0202, "example.com.", RecordType::A);

    let response = WireExchange::new()
        .exchange(&query, &UpstreamEndpoint::udp(server.addr()), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(response.answers, vec![AnswerRecord::A(MOCK_ANSWER)]);
    assert_eq!(server.udp_queries(), 1);
    assert_eq!(server.tcp_queries(), 1);
}

#[tokio::test]
async fn test_tcp_retry_stays_within_the_timeout() {
    let server = MockDnsServer::start(MockBehavior::TruncateUdpStallTcp)
        .await
        .unwrap();
    let query = build_query(0x0303, "example.com.", RecordType::A);
    let timeout = Duration::from_millis(200);

    let start = std::time::Instant::now();
    let result = WireExchange::new()
        .exchange(&query, &UpstreamEndpoint::udp(server.addr()), timeout)
        .await;

    assert!(matches!(result, Err(DomainError::TransportTimeout { .. })));
    assert!(
        start.elapsed() < timeout + Duration::from_millis(150),
        "exchange took {:?}",
        start.elapsed()
    );
    assert_eq!(server.tcp_queries(), 1);
}
