use super::QueryType;
use std::net::IpAddr;
use std::sync::Arc;

/// An inbound question, immutable for the lifetime of one resolution.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    /// Fully-qualified name as received, trailing dot included.
    pub domain: Arc<str>,
    pub query_type: QueryType,
    pub client_ip: IpAddr,
}

impl DnsRequest {
    pub fn new(
        domain: impl Into<Arc<str>>,
        query_type: impl Into<QueryType>,
        client_ip: IpAddr,
    ) -> Self {
        Self {
            domain: domain.into(),
            query_type: query_type.into(),
            client_ip,
        }
    }

    /// Name used by rule matching and the record store.
    pub fn lookup_name(&self) -> String {
        normalize_domain(&self.domain)
    }
}

/// Strips the trailing dot and lowercases ASCII letters.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordKind;

    #[test]
    fn test_lookup_name_strips_trailing_dot() {
        let request = DnsRequest::new(
            "Svc.Local.",
            RecordKind::A,
            IpAddr::from([127, 0, 0, 1]),
        );
        assert_eq!(request.lookup_name(), "svc.local");
        assert_eq!(&*request.domain, "Svc.Local.");
    }
}
