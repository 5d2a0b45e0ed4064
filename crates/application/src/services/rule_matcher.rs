use std::sync::Arc;
use tinydns_domain::{ConfigRule, RecordKind};

/// Ordered configuration rules. First match by pattern and type wins.
#[derive(Debug, Clone, Default)]
pub struct RuleMatcher {
    rules: Arc<Vec<ConfigRule>>,
}

impl RuleMatcher {
    pub fn new(rules: Vec<ConfigRule>) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    /// `domain` is a lookup name (no trailing dot, lowercase).
    pub fn find(&self, domain: &str, kind: RecordKind) -> Option<&ConfigRule> {
        self.rules.iter().find(|rule| rule.matches(domain, kind))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinydns_domain::{AnswerSet, DomainPattern, RuleAction};

    fn rule(pattern: &str, kind: RecordKind, action: RuleAction) -> ConfigRule {
        ConfigRule {
            pattern: DomainPattern::parse(pattern),
            kind,
            action,
            ttl: 300,
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let first = AnswerSet::new().with_a("10.0.0.1".parse().unwrap());
        let matcher = RuleMatcher::new(vec![
            rule("*.foo.com", RecordKind::A, RuleAction::Resolve(first.clone())),
            rule("bar.foo.com", RecordKind::A, RuleAction::Forward),
        ]);

        let found = matcher.find("bar.foo.com", RecordKind::A).unwrap();
        assert_eq!(found.action, RuleAction::Resolve(first));
    }

    #[test]
    fn test_type_must_match() {
        let matcher = RuleMatcher::new(vec![rule("*", RecordKind::MX, RuleAction::Forward)]);
        assert!(matcher.find("example.com", RecordKind::A).is_none());
        assert!(matcher.find("example.com", RecordKind::MX).is_some());
    }

    #[test]
    fn test_empty_matcher_finds_nothing() {
        let matcher = RuleMatcher::default();
        assert!(matcher.is_empty());
        assert!(matcher.find("example.com", RecordKind::A).is_none());
    }
}
