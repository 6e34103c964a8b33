//! Resolution of the "real" client address behind proxies and load balancers.
//!
//! # Trust limitation
//!
//! Both override headers are supplied by the client and are preferred over
//! the transport-layer address. A client can therefore claim any address,
//! including one on the trust list. The trust gate is a convenience for
//! keeping debug output away from casual visitors, not an access control.

use crate::request::RequestContext;

/// Returns the best guess at the originating client address.
///
/// Precedence, highest first:
/// 1. the `Client-IP` header, if present and non-empty
/// 2. the `X-Forwarded-For` header, if present and non-empty
/// 3. the transport-layer remote address
///
/// Returns an empty string when none of them is available. The value is
/// returned verbatim; a forwarded-for chain is not split.
///
/// # Examples
///
/// ```
/// use debug_gate::{resolve_client_address, RequestContext};
///
/// let ctx = RequestContext::request()
///     .with_remote_addr("9.9.9.9")
///     .with_forwarded_for("5.6.7.8");
///
/// assert_eq!(resolve_client_address(&ctx), "5.6.7.8");
/// ```
pub fn resolve_client_address(ctx: &RequestContext) -> String {
    [ctx.client_ip(), ctx.forwarded_for(), ctx.remote_addr()]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
        .to_string()
}
