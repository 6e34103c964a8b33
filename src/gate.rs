use std::fmt;

use crate::client_ip::resolve_client_address;
use crate::policy::TrustPolicy;
use crate::request::RequestContext;

/// Server names that always count as a local development server.
pub const LOOPBACK_SERVER_NAMES: [&str; 2] = ["localhost", "127.0.0.1"];

/// The outcome of a trust check, carrying the reason it was reached.
///
/// # Examples
///
/// ```
/// use debug_gate::{RequestContext, TrustDecision, TrustPolicy};
///
/// let policy = TrustPolicy::new();
/// let ctx = RequestContext::request().with_remote_addr("192.168.0.12");
///
/// let decision = policy.decide(&ctx, true);
/// assert!(decision.is_allowed());
/// assert!(matches!(decision, TrustDecision::MatchedPattern { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustDecision {
    /// The request targets a loopback server name
    LocalServer,
    /// The process is interactive and the bypass was allowed
    InteractiveBypass,
    /// The resolved client address matched a trusted pattern
    MatchedPattern {
        /// The resolved client address
        address: String,
        /// The pattern that matched
        pattern: String,
    },
    /// No remote address signal was available to evaluate
    NoRemoteAddress,
    /// The resolved client address matched no trusted pattern
    Untrusted {
        /// The resolved client address
        address: String,
    },
}

impl TrustDecision {
    /// Returns `true` if debug output may be shown.
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            TrustDecision::LocalServer
                | TrustDecision::InteractiveBypass
                | TrustDecision::MatchedPattern { .. }
        )
    }
}

impl fmt::Display for TrustDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustDecision::LocalServer => write!(f, "local server"),
            TrustDecision::InteractiveBypass => write!(f, "interactive execution"),
            TrustDecision::MatchedPattern { address, pattern } => {
                write!(f, "{} matched '{}'", address, pattern)
            }
            TrustDecision::NoRemoteAddress => write!(f, "no remote address"),
            TrustDecision::Untrusted { address } => write!(f, "{} is not trusted", address),
        }
    }
}

impl TrustPolicy {
    /// Decides whether `ctx` may receive debug output.
    ///
    /// Checks, in order:
    /// 1. a loopback server name allows unconditionally
    /// 2. an interactive process allows when `allow_interactive_bypass` is set
    /// 3. a missing remote address denies
    /// 4. the resolved client address is tested against every pattern
    ///
    /// The resolved address may come from client-supplied headers; see
    /// [`resolve_client_address`](crate::resolve_client_address).
    pub fn decide(&self, ctx: &RequestContext, allow_interactive_bypass: bool) -> TrustDecision {
        let decision = self.evaluate(ctx, allow_interactive_bypass);
        tracing::debug!(allowed = decision.is_allowed(), reason = %decision, "trust decision");
        decision
    }

    /// Returns `true` if `ctx` may receive debug output.
    ///
    /// Shorthand for `decide(ctx, allow_interactive_bypass).is_allowed()`.
    pub fn is_trusted(&self, ctx: &RequestContext, allow_interactive_bypass: bool) -> bool {
        self.decide(ctx, allow_interactive_bypass).is_allowed()
    }

    fn evaluate(&self, ctx: &RequestContext, allow_interactive_bypass: bool) -> TrustDecision {
        if ctx
            .server_name()
            .is_some_and(|name| LOOPBACK_SERVER_NAMES.contains(&name))
        {
            return TrustDecision::LocalServer;
        }

        if allow_interactive_bypass && ctx.is_interactive() {
            return TrustDecision::InteractiveBypass;
        }

        if !ctx.has_remote_addr() {
            return TrustDecision::NoRemoteAddress;
        }

        let address = resolve_client_address(ctx);
        match self.find_match(&address) {
            Some(pattern) => TrustDecision::MatchedPattern {
                address,
                pattern: pattern.as_str().to_string(),
            },
            None => TrustDecision::Untrusted { address },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_server_is_always_trusted() {
        let policy = TrustPolicy::empty();
        let ctx = RequestContext::request()
            .with_server_name("localhost")
            .with_remote_addr("8.8.8.8");

        assert_eq!(policy.decide(&ctx, false), TrustDecision::LocalServer);
    }

    #[test]
    fn loopback_literal_server_is_always_trusted() {
        let policy = TrustPolicy::empty();
        let ctx = RequestContext::request().with_server_name("127.0.0.1");
        assert!(policy.is_trusted(&ctx, false));
    }

    #[test]
    fn other_server_names_do_not_bypass() {
        let policy = TrustPolicy::empty();
        let ctx = RequestContext::request()
            .with_server_name("localhost.evil.com")
            .with_remote_addr("8.8.8.8");
        assert!(!policy.is_trusted(&ctx, true));
    }

    #[test]
    fn interactive_bypass_without_address() {
        let policy = TrustPolicy::empty();
        let ctx = RequestContext::interactive();

        assert_eq!(policy.decide(&ctx, true), TrustDecision::InteractiveBypass);
    }

    #[test]
    fn interactive_bypass_can_be_disabled() {
        let policy = TrustPolicy::new();
        let ctx = RequestContext::interactive();

        assert_eq!(policy.decide(&ctx, false), TrustDecision::NoRemoteAddress);
    }

    #[test]
    fn missing_remote_address_denies() {
        let policy = TrustPolicy::new();
        let ctx = RequestContext::request().with_client_ip("127.0.0.1");

        assert_eq!(policy.decide(&ctx, true), TrustDecision::NoRemoteAddress);
    }

    #[test]
    fn lan_address_is_trusted() {
        let policy = TrustPolicy::new();
        let ctx = RequestContext::request().with_remote_addr("10.0.5.9");

        assert_eq!(
            policy.decide(&ctx, true),
            TrustDecision::MatchedPattern {
                address: "10.0.5.9".to_string(),
                pattern: "10.0.*.*".to_string(),
            }
        );
    }

    #[test]
    fn public_address_is_untrusted() {
        let policy = TrustPolicy::new();
        let ctx = RequestContext::request().with_remote_addr("10.1.5.9");

        assert_eq!(
            policy.decide(&ctx, true),
            TrustDecision::Untrusted {
                address: "10.1.5.9".to_string()
            }
        );
    }

    #[test]
    fn spoofed_header_is_honoured() {
        // Accepted risk: the client-supplied header outranks the peer address.
        let policy = TrustPolicy::new();
        let ctx = RequestContext::request()
            .with_remote_addr("8.8.8.8")
            .with_client_ip("127.0.0.1");

        assert!(policy.is_trusted(&ctx, true));
    }

    #[test]
    fn registered_pattern_takes_effect() {
        let policy = TrustPolicy::new();
        let ctx = RequestContext::request().with_remote_addr("203.0.113.50");
        assert!(!policy.is_trusted(&ctx, true));

        policy.register_trusted_ips("203.0.113.*");
        assert!(policy.is_trusted(&ctx, true));
    }

    #[test]
    fn decision_display() {
        assert_eq!(TrustDecision::LocalServer.to_string(), "local server");
        assert_eq!(
            TrustDecision::Untrusted {
                address: "1.2.3.4".to_string()
            }
            .to_string(),
            "1.2.3.4 is not trusted"
        );
    }
}
