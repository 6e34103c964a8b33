//! Integration tests for the web request boundary.
//!
//! These tests run the complete flow from a framework request to a trust
//! decision and a rendered dump.

use std::net::SocketAddr;

use debug_gate::web::{ExtractRequestContext, RequestAdapter};
use debug_gate::{dump, dump_checked, Dumper, TrustDecision, TrustPolicy, Value, BLOCK_STYLE};

/// Stand-in for a framework request type.
struct IncomingRequest {
    host: &'static str,
    peer: SocketAddr,
    headers: Vec<(&'static str, &'static str)>,
}

impl From<&IncomingRequest> for RequestAdapter {
    fn from(req: &IncomingRequest) -> Self {
        req.headers.iter().fold(
            RequestAdapter::new()
                .server_name(req.host)
                .remote_socket(req.peer),
            |adapter, (name, value)| adapter.header(name, *value),
        )
    }
}

fn incoming(peer: &str, headers: Vec<(&'static str, &'static str)>) -> IncomingRequest {
    IncomingRequest {
        host: "shop.example.com",
        peer: peer.parse().unwrap(),
        headers,
    }
}

#[test]
fn lan_peer_gets_rendered_block() {
    let policy = TrustPolicy::new();
    let req = incoming("192.168.10.20:40000", vec![]);
    let ctx = RequestAdapter::from(&req).extract_request_context();

    let mut dumper = Dumper::new(&policy, ctx, Vec::new());
    let outcome = dump!(dumper, Value::mapping([("q", "<script>")]), "Search").unwrap();
    assert!(outcome.is_written());

    let html = String::from_utf8(dumper.into_inner()).unwrap();
    assert!(html.contains(BLOCK_STYLE));
    assert!(html.contains("[q] => &lt;script&gt;"));
    assert!(!html.contains("<script>"));
}

#[test]
fn public_peer_is_denied() {
    let policy = TrustPolicy::new();
    let req = incoming("198.51.100.7:443", vec![("User-Agent", "curl/8.0")]);
    let ctx = RequestAdapter::from(&req).extract_request_context();

    assert_eq!(
        policy.decide(&ctx, true),
        TrustDecision::Untrusted {
            address: "198.51.100.7".to_string()
        }
    );

    let mut dumper = Dumper::new(&policy, ctx, Vec::new());
    assert!(!dump_checked!(dumper, "anything").unwrap().is_written());
    assert!(dumper.into_inner().is_empty());
}

#[test]
fn forwarded_for_behind_proxy() {
    let policy = TrustPolicy::new();
    let req = incoming("203.0.113.1:8080", vec![("X-Forwarded-For", "10.0.7.7")]);
    let ctx = RequestAdapter::from(&req).extract_request_context();

    match policy.decide(&ctx, true) {
        TrustDecision::MatchedPattern { address, pattern } => {
            assert_eq!(address, "10.0.7.7");
            assert_eq!(pattern, "10.0.*.*");
        }
        other => panic!("unexpected decision: {}", other),
    }
}

#[test]
fn client_ip_header_outranks_forwarded_for() {
    let policy = TrustPolicy::new();
    let req = incoming(
        "203.0.113.1:8080",
        vec![("x-forwarded-for", "10.0.7.7"), ("CLIENT-IP", "198.51.100.2")],
    );
    let ctx = RequestAdapter::from(&req).extract_request_context();

    assert!(!policy.is_trusted(&ctx, true));
}

#[test]
fn localhost_host_overrides_peer() {
    let policy = TrustPolicy::empty();
    let req = IncomingRequest {
        host: "localhost",
        peer: "198.51.100.7:443".parse().unwrap(),
        headers: vec![],
    };
    let ctx = RequestAdapter::from(&req).extract_request_context();

    assert_eq!(policy.decide(&ctx, false), TrustDecision::LocalServer);
}

#[test]
fn extracted_context_ignores_interactive_bypass() {
    let policy = TrustPolicy::empty();
    let ctx = RequestAdapter::new().extract_request_context();

    assert!(!ctx.is_interactive());
    assert_eq!(policy.decide(&ctx, true), TrustDecision::NoRemoteAddress);
}
