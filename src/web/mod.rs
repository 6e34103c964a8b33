//! Web framework integration surface.
//!
//! This module maps framework request types onto [`RequestContext`], the
//! only input the trust gate looks at. It contains no framework-specific
//! code; integrations fill a [`RequestAdapter`] from their own request type
//! and call [`ExtractRequestContext::extract_request_context`].
//!
//! Header values are copied verbatim. `Client-IP` and `X-Forwarded-For` are
//! supplied by the client and can be forged, so a deployment that trusts
//! them must make sure a proxy it controls sets them.
//!
//! # Example Flow
//!
//! ```
//! use debug_gate::web::{ExtractRequestContext, RequestAdapter};
//! use debug_gate::{Dumper, TrustPolicy};
//!
//! let policy = TrustPolicy::new();
//!
//! let adapter = RequestAdapter::new()
//!     .server_name("shop.example.com")
//!     .remote_addr("203.0.113.7")
//!     .header("X-Forwarded-For", "10.0.4.2");
//!
//! let mut dumper = Dumper::new(&policy, adapter.extract_request_context(), Vec::new());
//! assert!(dumper.is_trusted());
//! ```

mod adapter;
mod extract;

pub use adapter::{RequestAdapter, CLIENT_IP_HEADER, FORWARDED_FOR_HEADER};
pub use extract::ExtractRequestContext;
