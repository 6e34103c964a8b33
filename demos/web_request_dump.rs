//! Web request dump demonstration.
//!
//! This example shows how the trust gate treats requests arriving through
//! a web framework:
//! 1. Map the framework request onto a `RequestAdapter`
//! 2. Extract the `RequestContext`
//! 3. Inspect the trust decision
//! 4. Dump into a buffer that would become part of the response body
//!
//! Run with: `cargo run --example web_request_dump`

use debug_gate::web::{ExtractRequestContext, RequestAdapter};
use debug_gate::{dump, Dumper, Error, TrustPolicy, Value, VecLogSink};

/// Simulates a request as a framework would hand it over
struct FrameworkRequest {
    host: &'static str,
    peer: &'static str,
    headers: &'static [(&'static str, &'static str)],
    query: &'static [(&'static str, &'static str)],
}

impl ExtractRequestContext for FrameworkRequest {
    fn extract_request_context(&self) -> debug_gate::RequestContext {
        self.headers
            .iter()
            .fold(
                RequestAdapter::new().server_name(self.host).remote_addr(self.peer),
                |adapter, (name, value)| adapter.header(name, *value),
            )
            .extract_request_context()
    }
}

fn handle(policy: &TrustPolicy, req: &FrameworkRequest) -> Result<String, Error> {
    let ctx = req.extract_request_context();
    println!("  decision: {}", policy.decide(&ctx, true));

    let sink = VecLogSink::new();
    let mut dumper = Dumper::new(policy, ctx, Vec::new()).with_log_sink(&sink);

    let query = Value::mapping(req.query.iter().copied());
    dump!(dumper, query, "Query parameters")?;

    println!("  log sink received {} message(s)", sink.len());
    Ok(String::from_utf8_lossy(&dumper.into_inner()).into_owned())
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let policy = TrustPolicy::new();
    policy.register_trusted_ips("203.0.113.*");

    let requests = [
        (
            "office network",
            FrameworkRequest {
                host: "shop.example.com",
                peer: "192.168.1.40",
                headers: &[],
                query: &[("q", "<script>alert(1)</script>")],
            },
        ),
        (
            "partner behind proxy",
            FrameworkRequest {
                host: "shop.example.com",
                peer: "198.51.100.1",
                headers: &[("X-Forwarded-For", "203.0.113.8")],
                query: &[("page", "2")],
            },
        ),
        (
            "public visitor",
            FrameworkRequest {
                host: "shop.example.com",
                peer: "198.51.100.77",
                headers: &[("User-Agent", "Mozilla/5.0")],
                query: &[("q", "shoes")],
            },
        ),
        (
            "local dev server",
            FrameworkRequest {
                host: "localhost",
                peer: "198.51.100.77",
                headers: &[],
                query: &[],
            },
        ),
    ];

    for (label, req) in &requests {
        println!("=== {} ===", label);
        let body = handle(&policy, req)?;
        if body.is_empty() {
            println!("  (no debug output)");
        } else {
            println!("{}", body);
        }
    }

    Ok(())
}
