//! Tests for wildcard pattern matching.

use super::{IpLikeMatcher, PatternMatcher, RegexMatcher, WildcardPattern};

fn pat(text: &str) -> WildcardPattern {
    WildcardPattern::new(text)
}

// ============================================================================
// IpLikeMatcher
// ============================================================================

mod ip_like {
    use super::*;

    fn matches(pattern: &str, address: &str) -> bool {
        IpLikeMatcher.matches(&pat(pattern), address)
    }

    #[test]
    fn star_matches_any_octet() {
        assert!(matches("192.168.*.*", "192.168.0.1"));
        assert!(matches("192.168.*.*", "192.168.254.254"));
        assert!(!matches("192.168.*.*", "192.169.0.1"));
    }

    #[test]
    fn exact_octets_must_agree() {
        assert!(matches("10.0.0.1", "10.0.0.1"));
        assert!(!matches("10.0.0.1", "10.0.0.2"));
    }

    #[test]
    fn numeric_range_is_inclusive() {
        assert!(matches("192.168.0-31.*", "192.168.0.1"));
        assert!(matches("192.168.0-31.*", "192.168.31.200"));
        assert!(!matches("192.168.0-31.*", "192.168.32.1"));
    }

    #[test]
    fn comma_list_mixes_values_and_ranges() {
        assert!(matches("10.0.0.1,5,8-10", "10.0.0.1"));
        assert!(matches("10.0.0.1,5,8-10", "10.0.0.5"));
        assert!(matches("10.0.0.1,5,8-10", "10.0.0.9"));
        assert!(!matches("10.0.0.1,5,8-10", "10.0.0.6"));
    }

    #[test]
    fn part_count_must_agree() {
        assert!(!matches("10.0.0", "10.0.0.1"));
        assert!(!matches("10.0.0.0.0", "10.0.0.1"));
    }

    #[test]
    fn family_must_agree() {
        assert!(!matches("10.0.*.*", "fe80::1"));
        assert!(!matches("fe80:*:*:*:*:*:*:*", "10.0.0.1"));
    }

    #[test]
    fn ipv6_parts_are_hex() {
        assert!(matches("fe80::1-ff", "fe80::a"));
        assert!(!matches("fe80::1-ff", "fe80::100"));
        assert!(matches("fe80::*", "fe80::1234"));
    }

    #[test]
    fn ipv6_empty_parts_match_textually() {
        // "fe80::1" splits into ["fe80", "", "1"]
        assert!(matches("fe80::1", "fe80::1"));
        assert!(matches("fe80::*", "fe80::1"));
        assert!(!matches("fe80:0:1", "fe80::1"));
    }

    #[test]
    fn zoned_pattern_requires_matching_zone() {
        assert!(matches("fe80::*%3", "fe80::1%3"));
        assert!(!matches("fe80::*%3", "fe80::1%4"));
        assert!(!matches("fe80::*%3", "fe80::1"));
    }

    #[test]
    fn unzoned_pattern_ignores_address_zone() {
        assert!(matches("fe80::*", "fe80::1%3"));
    }

    #[test]
    fn malformed_pieces_match_nothing() {
        assert!(!matches("10.0.0.x", "10.0.0.1"));
        assert!(!matches("10.0.0.5-x", "10.0.0.6"));
    }
}

// ============================================================================
// RegexMatcher
// ============================================================================

mod regex_syntax {
    use super::*;

    fn matches(pattern: &str, address: &str) -> bool {
        RegexMatcher.matches(&pat(pattern), address)
    }

    #[test]
    fn pattern_is_anchored() {
        assert!(matches(r"10\.0\.0\..*", "10.0.0.1"));
        assert!(!matches(r"0\.0\..*", "10.0.0.1"));
    }

    #[test]
    fn alternation_works() {
        assert!(matches(r"10\.0\.0\.(1|2)", "10.0.0.2"));
        assert!(!matches(r"10\.0\.0\.(1|2)", "10.0.0.3"));
    }

    #[test]
    fn invalid_expression_matches_nothing() {
        assert!(!matches(r"10\.0\.(", "10.0.0.1"));
    }
}

// ============================================================================
// Trait plumbing
// ============================================================================

#[test]
fn matcher_works_through_reference_and_box() {
    let boxed: Box<dyn PatternMatcher> = Box::new(IpLikeMatcher);
    assert!(boxed.matches(&pat("10.*.*.*"), "10.1.2.3"));

    let by_ref: &dyn PatternMatcher = &IpLikeMatcher;
    assert!(by_ref.matches(&pat("10.*.*.*"), "10.1.2.3"));
}

#[test]
fn pattern_displays_its_text() {
    assert_eq!(pat("192.168.*.*").to_string(), "192.168.*.*");
    assert_eq!(WildcardPattern::from("10.0.0.1").as_str(), "10.0.0.1");
}
