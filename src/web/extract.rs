//! Extraction boundary trait for web integration.

use crate::request::RequestContext;

/// Builds a [`RequestContext`] from a framework-specific request.
///
/// Implementations only map fields. They never decide trust; that is the
/// job of [`TrustPolicy::decide`](crate::TrustPolicy::decide).
///
/// # Examples
///
/// ```
/// use debug_gate::web::ExtractRequestContext;
/// use debug_gate::RequestContext;
///
/// struct MyFrameworkRequest {
///     host: String,
///     peer: String,
/// }
///
/// impl ExtractRequestContext for MyFrameworkRequest {
///     fn extract_request_context(&self) -> RequestContext {
///         RequestContext::request()
///             .with_server_name(self.host.clone())
///             .with_remote_addr(self.peer.clone())
///     }
/// }
///
/// let req = MyFrameworkRequest {
///     host: "app.local".to_string(),
///     peer: "10.0.0.3".to_string(),
/// };
/// assert_eq!(req.extract_request_context().remote_addr(), Some("10.0.0.3"));
/// ```
pub trait ExtractRequestContext {
    /// Returns the request as seen by the trust gate.
    ///
    /// The returned context is never interactive.
    fn extract_request_context(&self) -> RequestContext;
}

impl<T: ExtractRequestContext + ?Sized> ExtractRequestContext for &T {
    fn extract_request_context(&self) -> RequestContext {
        (**self).extract_request_context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PeerOnly(&'static str);

    impl ExtractRequestContext for PeerOnly {
        fn extract_request_context(&self) -> RequestContext {
            RequestContext::request().with_remote_addr(self.0)
        }
    }

    #[test]
    fn trait_object_extraction() {
        let req = PeerOnly("192.168.0.1");
        let boxed: Box<dyn ExtractRequestContext> = Box::new(req);

        let ctx = boxed.extract_request_context();
        assert_eq!(ctx.remote_addr(), Some("192.168.0.1"));
        assert!(!ctx.is_interactive());
    }

    #[test]
    fn reference_forwards() {
        let req = PeerOnly("10.1.1.1");
        let ctx = (&req).extract_request_context();
        assert!(ctx.has_remote_addr());
    }
}
