//! Wildcard matching of client addresses against trust-list entries.
//!
//! A pattern is a literal address in which `*` stands for any run of
//! characters. Matching is textual and anchored at both ends, so `10.0.*.*`
//! accepts `10.0.5.9` and a `*` may absorb more than a single octet when the
//! surrounding literals allow it.

use std::fmt;

use regex::Regex;

/// Token that stands for "any sequence of characters" inside a pattern.
pub const WILDCARD: char = '*';

/// A compiled trust-list entry.
///
/// Compilation never fails from the caller's point of view: a pattern that
/// cannot be turned into a matcher is kept for display but never matches.
///
/// # Examples
///
/// ```
/// use debug_gate::IpPattern;
///
/// let lan = IpPattern::new("192.168.*.*");
/// assert!(lan.matches("192.168.1.20"));
/// assert!(!lan.matches("192.169.1.20"));
///
/// let exact = IpPattern::new("127.0.0.1");
/// assert!(exact.matches("127.0.0.1"));
/// assert!(!exact.matches("127.0.0.10"));
/// ```
#[derive(Clone)]
pub struct IpPattern {
    source: String,
    matcher: Option<Regex>,
}

impl IpPattern {
    /// Compiles a pattern string.
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let matcher = match Regex::new(&translate(&source)) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(pattern = %source, error = %e, "trusted ip pattern will never match");
                None
            }
        };
        Self { source, matcher }
    }

    /// Returns the pattern as it was registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the pattern contains a wildcard segment.
    pub fn has_wildcard(&self) -> bool {
        self.source.contains(WILDCARD)
    }

    /// Tests `candidate` against the whole pattern.
    pub fn matches(&self, candidate: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|re| re.is_match(candidate))
    }
}

impl fmt::Debug for IpPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IpPattern").field(&self.source).finish()
    }
}

impl fmt::Display for IpPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for IpPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for IpPattern {}

impl From<&str> for IpPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for IpPattern {
    fn from(pattern: String) -> Self {
        Self::new(pattern)
    }
}

/// Returns `true` if `candidate` matches `pattern` end to end.
///
/// Malformed patterns or candidates simply fail to match.
///
/// # Examples
///
/// ```
/// use debug_gate::pattern::matches;
///
/// assert!(matches("10.0.*.*", "10.0.5.9"));
/// assert!(!matches("10.0.*.*", "10.1.5.9"));
/// assert!(!matches("10.0.*.*", "not an address"));
/// ```
pub fn matches(pattern: &str, candidate: &str) -> bool {
    IpPattern::new(pattern).matches(candidate)
}

/// Literal segments are escaped, each wildcard becomes `.*`.
fn translate(pattern: &str) -> String {
    let body = pattern
        .split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    format!(r"\A(?s:{})\z", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_is_exact() {
        assert!(matches("127.0.0.1", "127.0.0.1"));
        assert!(!matches("127.0.0.1", "127.0.0.12"));
        assert!(!matches("127.0.0.1", "1127.0.0.1"));
    }

    #[test]
    fn dots_are_literal() {
        // An unescaped dot would let "127x0y0z1" through.
        assert!(!matches("127.0.0.1", "127x0y0z1"));
    }

    #[test]
    fn wildcard_octets() {
        assert!(matches("10.0.*.*", "10.0.5.9"));
        assert!(matches("10.0.*.*", "10.0.255.255"));
        assert!(!matches("10.0.*.*", "10.1.5.9"));
        assert!(!matches("10.0.*.*", "110.0.5.9"));
    }

    #[test]
    fn wildcard_may_span_several_octets() {
        assert!(matches("10.*", "10.20.30.40"));
        assert!(matches("192.168.*.*", "192.168.1.2.3"));
    }

    #[test]
    fn ipv6_loopback() {
        assert!(matches("::1", "::1"));
        assert!(!matches("::1", "::2"));
    }

    #[test]
    fn garbage_candidates_do_not_panic() {
        assert!(!matches("10.0.*.*", ""));
        assert!(!matches("10.0.*.*", "<script>"));
        assert!(!matches("10.0.*.*", "10.0\n.1.1"));
    }

    #[test]
    fn regex_metacharacters_in_pattern_are_literal() {
        assert!(!matches("(a|b)", "a"));
        assert!(matches("(a|b)", "(a|b)"));
        assert!(!matches("1+1", "11"));
    }

    #[test]
    fn lone_wildcard_matches_everything() {
        assert!(matches("*", ""));
        assert!(matches("*", "2001:db8::1"));
    }

    #[test]
    fn pattern_accessors() {
        let p = IpPattern::new("10.0.*.*");
        assert_eq!(p.as_str(), "10.0.*.*");
        assert!(p.has_wildcard());
        assert_eq!(format!("{}", p), "10.0.*.*");
        assert_eq!(format!("{:?}", p), "IpPattern(\"10.0.*.*\")");
        assert!(!IpPattern::new("::1").has_wildcard());
    }

    #[test]
    fn equality_uses_source_text() {
        assert_eq!(IpPattern::from("::1"), IpPattern::from("::1".to_string()));
        assert_ne!(IpPattern::from("::1"), IpPattern::from("127.0.0.1"));
    }
}
