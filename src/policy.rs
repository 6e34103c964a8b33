use std::env;

use parking_lot::RwLock;

use crate::pattern::IpPattern;

/// Patterns every new [`TrustPolicy`] starts with.
///
/// Loopback over IPv4 and IPv6, plus the two private LAN ranges.
pub const DEFAULT_TRUSTED_IPS: [&str; 4] = ["127.0.0.1", "::1", "10.0.*.*", "192.168.*.*"];

/// Environment variable read by [`TrustPolicy::from_env`].
pub const TRUSTED_IPS_VAR: &str = "DEBUG_GATE_TRUSTED_IPS";

/// The set of trusted address patterns.
///
/// Constructed once at startup and shared by reference (or behind an `Arc`)
/// with every [`Dumper`](crate::Dumper). The list is ordered, may contain
/// duplicates and only ever grows. Reads and appends are synchronized, so a
/// policy can be extended from several threads.
///
/// # Examples
///
/// ```
/// use debug_gate::TrustPolicy;
///
/// let policy = TrustPolicy::new();
/// policy.register_trusted_ips("203.0.113.7");
/// policy.register_trusted_ips(["172.16.*.*", "172.17.*.*"]);
///
/// assert_eq!(policy.len(), 7);
/// assert!(policy.matches("172.16.4.4"));
/// ```
#[derive(Debug)]
pub struct TrustPolicy {
    patterns: RwLock<Vec<IpPattern>>,
}

impl TrustPolicy {
    /// Creates a policy holding [`DEFAULT_TRUSTED_IPS`].
    pub fn new() -> Self {
        Self::with_patterns(DEFAULT_TRUSTED_IPS)
    }

    /// Creates a policy that trusts no address.
    ///
    /// The local-server and interactive escape hatches still apply.
    pub fn empty() -> Self {
        Self {
            patterns: RwLock::new(Vec::new()),
        }
    }

    /// Creates a policy holding exactly the given patterns.
    pub fn with_patterns(ips: impl TrustedIps) -> Self {
        Self {
            patterns: RwLock::new(ips.into_patterns()),
        }
    }

    /// Creates a default policy extended from `DEBUG_GATE_TRUSTED_IPS`.
    ///
    /// The variable holds comma-separated patterns; blank entries are skipped.
    pub fn from_env() -> Self {
        let policy = Self::new();
        if let Ok(raw) = env::var(TRUSTED_IPS_VAR) {
            let extra = parse_list(&raw);
            tracing::debug!(count = extra.len(), "trusted ips loaded from environment");
            policy.register_trusted_ips(extra);
        }
        policy
    }

    /// Appends one or more patterns to the trust list.
    ///
    /// No deduplication is performed; registering a pattern twice is harmless.
    pub fn register_trusted_ips(&self, ips: impl TrustedIps) {
        let added = ips.into_patterns();
        if added.is_empty() {
            return;
        }
        tracing::debug!(
            patterns = ?added.iter().map(IpPattern::as_str).collect::<Vec<_>>(),
            "registering trusted ips"
        );
        self.patterns.write().extend(added);
    }

    /// Returns the first pattern that matches `candidate`, if any.
    pub fn find_match(&self, candidate: &str) -> Option<IpPattern> {
        self.patterns
            .read()
            .iter()
            .find(|p| p.matches(candidate))
            .cloned()
    }

    /// Returns `true` if any pattern matches `candidate`.
    pub fn matches(&self, candidate: &str) -> bool {
        self.patterns.read().iter().any(|p| p.matches(candidate))
    }

    /// Returns a snapshot of the registered patterns, in order.
    pub fn patterns(&self) -> Vec<String> {
        self.patterns
            .read()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    /// Returns the number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    /// Returns `true` if no pattern is registered.
    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TrustPolicy {
    fn clone(&self) -> Self {
        Self {
            patterns: RwLock::new(self.patterns.read().clone()),
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Anything that can be registered as one or more trusted patterns.
///
/// Implemented for single strings and for arrays, slices and vectors of
/// strings, so [`TrustPolicy::register_trusted_ips`] accepts either shape.
pub trait TrustedIps {
    /// Converts into compiled patterns, preserving order.
    fn into_patterns(self) -> Vec<IpPattern>;
}

impl TrustedIps for &str {
    fn into_patterns(self) -> Vec<IpPattern> {
        vec![IpPattern::new(self)]
    }
}

impl TrustedIps for String {
    fn into_patterns(self) -> Vec<IpPattern> {
        vec![IpPattern::new(self)]
    }
}

impl TrustedIps for IpPattern {
    fn into_patterns(self) -> Vec<IpPattern> {
        vec![self]
    }
}

impl<T: Into<IpPattern>> TrustedIps for Vec<T> {
    fn into_patterns(self) -> Vec<IpPattern> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<IpPattern>, const N: usize> TrustedIps for [T; N] {
    fn into_patterns(self) -> Vec<IpPattern> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Clone + Into<IpPattern>> TrustedIps for &[T] {
    fn into_patterns(self) -> Vec<IpPattern> {
        self.iter().cloned().map(Into::into).collect()
    }
}
