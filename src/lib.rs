//! Trust-gated debug dumping.
//!
//! This crate writes human-readable dumps of runtime values, type labels and
//! call stacks, but only when the current execution context is trusted:
//! a local development server, an interactive process, or a client whose
//! address matches a registered wildcard pattern. Untrusted callers get
//! nothing, silently.
//!
//! # Core Types
//!
//! - [`TrustPolicy`]: Ordered, growable list of trusted address patterns
//! - [`RequestContext`]: The request signals the trust decision reads
//! - [`Value`]: Owned, tagged tree of anything that can be dumped
//! - [`Dumper`]: Binds a policy and a request to an output stream
//! - [`LogSink`]: Optional collaborator that receives every written dump
//!
//! # Examples
//!
//! ```
//! use debug_gate::{dump, Dumper, RequestContext, TrustPolicy, Value};
//!
//! let policy = TrustPolicy::new();
//! policy.register_trusted_ips("203.0.113.*");
//!
//! let ctx = RequestContext::request()
//!     .with_server_name("shop.example.com")
//!     .with_remote_addr("203.0.113.40");
//!
//! let mut dumper = Dumper::new(&policy, ctx, Vec::new());
//! let outcome = dump!(dumper, Value::mapping([("sku", "<A-1>")]), "Cart").unwrap();
//! assert!(outcome.is_written());
//!
//! let html = String::from_utf8(dumper.into_inner()).unwrap();
//! assert!(html.contains("[sku] => &lt;A-1&gt;"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod caller;
mod client_ip;
mod config;
mod dumper;
mod error;
mod gate;
mod macros;
pub mod pattern;
mod policy;
mod render;
mod request;
mod sink;
mod value;
pub mod web;

pub use caller::{capture_stack, describe_caller, CallerContext, Frame, CALLER_FRAME};
pub use client_ip::resolve_client_address;
pub use config::{DumpConfig, DEFAULT_BACKTRACE_DEPTH, DEFAULT_SEPARATOR_WIDTH};
pub use dumper::{DumpOutcome, Dumper, BLOCK_STYLE};
pub use error::Error;
pub use gate::{TrustDecision, LOOPBACK_SERVER_NAMES};
pub use pattern::IpPattern;
pub use policy::{TrustPolicy, TrustedIps, DEFAULT_TRUSTED_IPS, TRUSTED_IPS_VAR};
pub use render::{
    classify, escape_markup, is_numeric_text, print_structure, print_structure_bounded,
    render_safe, render_safe_bounded, DEFAULT_MAX_DEPTH, DEPTH_LIMIT_MARKER,
};
pub use request::RequestContext;
pub use sink::{LogSink, TracingLogSink, VecLogSink, DUMP_TARGET};
pub use value::{Record, Resource, Value};
