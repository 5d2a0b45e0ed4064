use std::net::{Ipv4Addr, Ipv6Addr};
use tinydns_domain::{DomainPattern, RecordKind, RuleAction, RuleEntry};

fn entry(domain: &str, record_type: &str) -> RuleEntry {
    RuleEntry {
        domain: domain.to_string(),
        record_type: record_type.to_string(),
        ..Default::default()
    }
}

fn resolved(entry: &RuleEntry) -> tinydns_domain::AnswerSet {
    match entry.validate().unwrap().action {
        RuleAction::Resolve(answers) => answers,
        RuleAction::Forward => panic!("expected a resolve rule"),
    }
}

// ── domain patterns ──────────────────────────────────────────────────────────

#[test]
fn test_star_matches_everything() {
    let pattern = DomainPattern::parse("*");
    assert!(pattern.matches("example.com"));
    assert!(pattern.matches("a.b.c"));
}

#[test]
fn test_wildcard_suffix_matches_subdomains() {
    let pattern = DomainPattern::parse("*.foo.com");
    assert!(pattern.matches("bar.foo.com"));
    assert!(pattern.matches("a.b.foo.com"));
}

#[test]
fn test_wildcard_suffix_boundary() {
    // The suffix keeps its leading dot, so the apex and look-alike
    // domains are not matched.
    let pattern = DomainPattern::parse("*.foo.com");
    assert!(!pattern.matches("foo.com"));
    assert!(!pattern.matches("xfoo.com"));
}

#[test]
fn test_exact_pattern_is_normalized() {
    let pattern = DomainPattern::parse("API.Example.com.");
    assert!(pattern.matches("api.example.com"));
    assert!(!pattern.matches("www.api.example.com"));
}

// ── rule validation ──────────────────────────────────────────────────────────

#[test]
fn test_value_then_values_for_address_rules() {
    let mut rule = entry("a.example.com", "A");
    rule.value = Some("10.0.0.1".to_string());
    rule.values = vec!["10.0.0.2".to_string()];

    assert_eq!(
        resolved(&rule).a,
        vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]
    );

    let mut rule = entry("a.example.com", "AAAA");
    rule.value = Some("fd00::1".to_string());
    assert_eq!(resolved(&rule).aaaa, vec!["fd00::1".parse::<Ipv6Addr>().unwrap()]);
}

#[test]
fn test_address_rule_requires_value() {
    assert!(entry("a.example.com", "A").validate().is_err());
}

#[test]
fn test_address_rule_rejects_wrong_family() {
    let mut rule = entry("a.example.com", "A");
    rule.value = Some("fd00::1".to_string());
    assert!(rule.validate().is_err());
}

#[test]
fn test_mx_defaults_priority_and_requires_target() {
    assert!(entry("example.com", "MX").validate().is_err());

    let mut rule = entry("example.com", "MX");
    rule.target = Some("mail.example.com".to_string());
    assert_eq!(resolved(&rule).mx[0].priority, 10);

    rule.priority = Some(20);
    assert_eq!(resolved(&rule).mx[0].priority, 20);
}

#[test]
fn test_srv_requires_target_and_port() {
    let mut rule = entry("_ldap._tcp.example.com", "SRV");
    rule.target = Some("ldap.example.com".to_string());
    assert!(rule.validate().is_err());

    rule.port = Some(389);
    let answers = resolved(&rule);
    assert_eq!(answers.srv[0].port, 389);
    assert_eq!(answers.srv[0].target, "ldap.example.com");
}

#[test]
fn test_name_rules_require_value() {
    for kind in ["TXT", "CNAME", "NS", "PTR"] {
        assert!(entry("example.com", kind).validate().is_err(), "{}", kind);

        let mut rule = entry("example.com", kind);
        rule.value = Some("target.example.com".to_string());
        let answers = resolved(&rule);
        let kind: RecordKind = kind.parse().unwrap();
        assert_eq!(answers.records_for(kind).len(), 1);
    }
}

#[test]
fn test_forward_rule_needs_no_data() {
    let mut rule = entry("*.internal", "A");
    rule.action = Some("Forward".to_string());
    let validated = rule.validate().unwrap();
    assert_eq!(validated.action, RuleAction::Forward);
    assert_eq!(validated.ttl, 300);
}

#[test]
fn test_invalid_action_and_type_are_rejected() {
    let mut rule = entry("example.com", "A");
    rule.action = Some("drop".to_string());
    assert!(rule.validate().is_err());

    let mut rule = entry("example.com", "SOA");
    rule.action = Some("forward".to_string());
    assert!(rule.validate().is_err());
}

#[test]
fn test_rule_matches_domain_and_type() {
    let mut rule = entry("*.foo.com", "A");
    rule.value = Some("1.2.3.4".to_string());
    let rule = rule.validate().unwrap();

    assert!(rule.matches("bar.foo.com", RecordKind::A));
    assert!(!rule.matches("bar.foo.com", RecordKind::AAAA));
    assert!(!rule.matches("xfoo.com", RecordKind::A));
}
