//! Request adapter for mapping HTTP requests to a [`RequestContext`].

use std::collections::HashMap;
use std::net::SocketAddr;

use crate::request::RequestContext;

use super::ExtractRequestContext;

/// Header carrying a client-declared address.
pub const CLIENT_IP_HEADER: &str = "Client-IP";

/// Header carrying the proxy forwarding chain.
pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

/// Adapter for converting framework-specific HTTP requests into a
/// [`RequestContext`].
///
/// This type holds simple, owned data so it does not couple to any
/// framework. Integrations should implement `From<FrameworkRequest>` for
/// `RequestAdapter` or fill it with the builder methods. Header names are
/// matched case-insensitively; the last value set for a name wins.
///
/// # Examples
///
/// ```
/// use debug_gate::web::{ExtractRequestContext, RequestAdapter};
///
/// let adapter = RequestAdapter::new()
///     .server_name("api.example.com")
///     .remote_addr("198.51.100.4")
///     .header("client-ip", "10.0.0.9");
///
/// let ctx = adapter.extract_request_context();
/// assert_eq!(ctx.client_ip(), Some("10.0.0.9"));
/// assert!(!ctx.is_interactive());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestAdapter {
    server_name: Option<String>,
    remote_addr: Option<String>,
    /// Keys are lowercased
    headers: HashMap<String, String>,
}

impl RequestAdapter {
    /// Creates an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host name the server answered on.
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Sets the peer address of the connection.
    pub fn remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Sets the peer address from a socket address, dropping the port.
    pub fn remote_socket(self, peer: SocketAddr) -> Self {
        self.remote_addr(peer.ip().to_string())
    }

    /// Adds a request header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Returns a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the number of distinct headers held.
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }
}

impl ExtractRequestContext for RequestAdapter {
    fn extract_request_context(&self) -> RequestContext {
        let mut ctx = RequestContext::request();

        if let Some(name) = nonempty(self.server_name.as_deref()) {
            ctx = ctx.with_server_name(name);
        }
        if let Some(addr) = nonempty(self.remote_addr.as_deref()) {
            ctx = ctx.with_remote_addr(addr);
        }
        if let Some(ip) = nonempty(self.header_value(CLIENT_IP_HEADER)) {
            ctx = ctx.with_client_ip(ip);
        }
        if let Some(chain) = nonempty(self.header_value(FORWARDED_FOR_HEADER)) {
            ctx = ctx.with_forwarded_for(chain);
        }

        tracing::trace!(
            remote_addr = ctx.remote_addr().unwrap_or_default(),
            "request context extracted"
        );
        ctx
    }
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
