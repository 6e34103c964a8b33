use std::env;

/// Environment variable holding the declared server name.
pub const SERVER_NAME_VAR: &str = "SERVER_NAME";
/// Environment variable holding the transport-layer peer address.
pub const REMOTE_ADDR_VAR: &str = "REMOTE_ADDR";
/// Environment variable holding the `Client-IP` request header.
pub const CLIENT_IP_VAR: &str = "HTTP_CLIENT_IP";
/// Environment variable holding the `X-Forwarded-For` request header.
pub const FORWARDED_FOR_VAR: &str = "HTTP_X_FORWARDED_FOR";
/// Environment variable set by gateway-hosted (CGI) processes.
pub const GATEWAY_INTERFACE_VAR: &str = "GATEWAY_INTERFACE";

/// The execution context a dump is evaluated against.
///
/// Holds the signals the trust decision reads: the declared server name,
/// the transport-layer remote address, the two client-supplied override
/// headers and whether the process is running interactively rather than
/// servicing an inbound request.
///
/// The header fields are attacker-controllable. They are carried as plain
/// strings and never validated here.
///
/// # Examples
///
/// ```
/// use debug_gate::RequestContext;
///
/// let ctx = RequestContext::request()
///     .with_server_name("app.example.com")
///     .with_remote_addr("10.0.3.7")
///     .with_forwarded_for("203.0.113.9");
///
/// assert!(!ctx.is_interactive());
/// assert_eq!(ctx.remote_addr(), Some("10.0.3.7"));
///
/// let cli = RequestContext::interactive();
/// assert!(cli.is_interactive());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    server_name: Option<String>,
    remote_addr: Option<String>,
    client_ip: Option<String>,
    forwarded_for: Option<String>,
    interactive: bool,
}

impl RequestContext {
    /// Creates an empty, non-interactive request context.
    pub fn request() -> Self {
        Self::default()
    }

    /// Creates a context for a direct command invocation.
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            ..Self::default()
        }
    }

    /// Builds a context from CGI-style environment variables.
    ///
    /// The process counts as interactive when neither `GATEWAY_INTERFACE`
    /// nor `REMOTE_ADDR` is present.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a context from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let remote_addr = get(REMOTE_ADDR_VAR);
        let interactive = get(GATEWAY_INTERFACE_VAR).is_none() && remote_addr.is_none();

        Self {
            server_name: get(SERVER_NAME_VAR),
            remote_addr,
            client_ip: get(CLIENT_IP_VAR),
            forwarded_for: get(FORWARDED_FOR_VAR),
            interactive,
        }
    }

    /// Sets the declared server name.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Sets the transport-layer remote address.
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Sets the `Client-IP` header value.
    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Sets the `X-Forwarded-For` header value.
    pub fn with_forwarded_for(mut self, chain: impl Into<String>) -> Self {
        self.forwarded_for = Some(chain.into());
        self
    }

    /// Marks the context as interactive or request-bound.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Returns the declared server name.
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Returns the transport-layer remote address.
    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    /// Returns the `Client-IP` header value.
    pub fn client_ip(&self) -> Option<&str> {
        self.client_ip.as_deref()
    }

    /// Returns the `X-Forwarded-For` header value.
    pub fn forwarded_for(&self) -> Option<&str> {
        self.forwarded_for.as_deref()
    }

    /// Returns `true` when running outside of a network-request context.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Returns `true` if a non-empty remote address signal is present.
    pub fn has_remote_addr(&self) -> bool {
        self.remote_addr.as_deref().is_some_and(|a| !a.is_empty())
    }
}
