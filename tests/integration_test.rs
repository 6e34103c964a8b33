use std::sync::Arc;
use std::thread;

use debug_gate::pattern::matches;
use debug_gate::{
    classify, describe_caller, dump, dump_backtrace, dump_type, render_safe,
    resolve_client_address, Dumper, DumpOutcome, Frame, Record, RequestContext, TrustPolicy,
    Value, VecLogSink,
};

#[test]
fn wildcard_octets_match() {
    assert!(matches("10.0.*.*", "10.0.5.9"));
    assert!(!matches("10.0.*.*", "10.1.5.9"));
}

#[test]
fn wildcard_absorbs_more_than_one_octet() {
    // matching is textual, so `*` is not limited to an octet
    assert!(matches("10.*", "10.0.5.9"));
    assert!(matches("10.0.*.*", "10.0.5.6.7"));
}

#[test]
fn malformed_inputs_do_not_match() {
    assert!(!matches("10.0.*.*", "not an address"));
    assert!(!matches("10.0.*.*", ""));
    assert!(matches("", ""));
}

#[test]
fn client_address_precedence() {
    let full = RequestContext::request()
        .with_client_ip("1.2.3.4")
        .with_forwarded_for("5.6.7.8")
        .with_remote_addr("9.9.9.9");
    assert_eq!(resolve_client_address(&full), "1.2.3.4");

    let no_client_ip = RequestContext::request()
        .with_forwarded_for("5.6.7.8")
        .with_remote_addr("9.9.9.9");
    assert_eq!(resolve_client_address(&no_client_ip), "5.6.7.8");

    let remote_only = RequestContext::request().with_remote_addr("9.9.9.9");
    assert_eq!(resolve_client_address(&remote_only), "9.9.9.9");

    assert_eq!(resolve_client_address(&RequestContext::request()), "");
}

#[test]
fn localhost_server_is_always_trusted() {
    let policy = TrustPolicy::empty();
    let ctx = RequestContext::request()
        .with_server_name("localhost")
        .with_remote_addr("8.8.8.8");

    assert!(policy.is_trusted(&ctx, false));
}

#[test]
fn interactive_is_trusted_without_address() {
    let policy = TrustPolicy::empty();
    assert!(policy.is_trusted(&RequestContext::interactive(), true));
}

#[test]
fn request_without_address_is_untrusted() {
    let policy = TrustPolicy::new();
    let ctx = RequestContext::request().with_server_name("app.example.com");
    assert!(!policy.is_trusted(&ctx, true));
}

#[test]
fn spoofed_header_is_honoured() {
    // Documented limitation: the override headers win over the peer address.
    let policy = TrustPolicy::new();
    let ctx = RequestContext::request()
        .with_remote_addr("203.0.113.99")
        .with_client_ip("127.0.0.1");

    assert!(policy.is_trusted(&ctx, true));
}

#[test]
fn render_safe_escapes_text_only() {
    let mapping = Value::mapping([("name", "<b>x</b>")]);
    assert_eq!(
        render_safe(&mapping),
        Value::mapping([("name", "&lt;b&gt;x&lt;/b&gt;")])
    );

    let seq = Value::Sequence(vec![Value::from("<i>"), Value::from(5), Value::from(true)]);
    assert_eq!(
        render_safe(&seq),
        Value::Sequence(vec![
            Value::from("&lt;i&gt;"),
            Value::from(5),
            Value::from(true)
        ])
    );
}

#[test]
fn render_safe_leaves_input_untouched() {
    let original = Value::from(Record::new("User").field("bio", "<script>"));
    let before = original.clone();

    let _ = render_safe(&original);
    assert_eq!(original, before);
}

#[test]
fn classify_labels() {
    assert_eq!(classify(&Value::mapping([("a", 1)])), "Array");
    assert_eq!(classify(&Value::from("42")), "Number");
    assert_eq!(classify(&Value::from("abc")), "String");
    assert_eq!(classify(&Value::from(Record::new("Invoice"))), "Invoice");
    assert_eq!(classify(&Value::Null), "unknown");
}

#[test]
fn untrusted_dump_writes_nothing_anywhere() {
    let policy = TrustPolicy::new();
    let sink = VecLogSink::new();
    let ctx = RequestContext::request()
        .with_server_name("shop.example.com")
        .with_remote_addr("198.51.100.1");
    let mut dumper = Dumper::new(&policy, ctx, Vec::new()).with_log_sink(&sink);

    assert_eq!(dump!(dumper, "secret").unwrap(), DumpOutcome::Suppressed);
    assert_eq!(dump_type!(dumper, "secret").unwrap(), DumpOutcome::Suppressed);
    assert_eq!(dump_backtrace!(dumper).unwrap(), DumpOutcome::Suppressed);

    assert!(sink.is_empty());
    assert!(dumper.into_inner().is_empty());
}

#[test]
fn describe_caller_method() {
    let stack = [
        Frame::method("Dumper", "::", "dump"),
        Frame::method("Foo", "::", "bar"),
    ];
    let caller = describe_caller(&stack, 1);
    assert!(caller.to_string().contains("Method::Foo::bar"));
}

#[test]
fn describe_caller_shallow_stack() {
    let stack = [Frame::function("dump")];
    assert!(describe_caller(&stack, 1).is_empty());
    assert!(describe_caller(&[], 1).is_empty());
}

#[test]
fn registered_pattern_opens_the_gate() {
    let policy = TrustPolicy::new();
    let ctx = RequestContext::request().with_remote_addr("172.16.4.2");
    assert!(!policy.is_trusted(&ctx, true));

    policy.register_trusted_ips(vec!["172.16.*.*"]);
    assert!(policy.is_trusted(&ctx, true));
}

#[test]
fn trust_list_shared_across_threads() {
    let policy = Arc::new(TrustPolicy::empty());

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let policy = Arc::clone(&policy);
            thread::spawn(move || policy.register_trusted_ips(format!("10.{}.*.*", n)))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(policy.len(), 4);
    let ctx = RequestContext::request().with_remote_addr("10.3.0.1");
    assert!(policy.is_trusted(&ctx, true));
}

#[test]
fn end_to_end_rendered_dump() {
    let policy = TrustPolicy::new();
    let sink = VecLogSink::new();
    let ctx = RequestContext::request()
        .with_server_name("shop.example.com")
        .with_remote_addr("10.0.8.8");
    let mut dumper = Dumper::new(&policy, ctx, Vec::new()).with_log_sink(&sink);

    let order = Record::new("Order")
        .field("id", 1001)
        .field("note", "<em>rush</em>")
        .field("lines", vec!["A-1", "B-2"]);
    let outcome = dump!(dumper, order, "Order", true).unwrap();
    assert!(outcome.should_halt());

    let html = String::from_utf8(dumper.into_inner()).unwrap();
    assert!(html.contains("<h2 style=\"color: #000000;\">Order</h2>"));
    assert!(html.contains("Fired from Function::end_to_end_rendered_dump line"));
    assert!(html.contains("Order Object"));
    assert!(html.contains("[note] => &lt;em&gt;rush&lt;/em&gt;"));

    let logged = sink.into_vec();
    assert_eq!(logged.len(), 1);
    assert!(logged[0].starts_with("Order\nFired from"));
    assert!(logged[0].contains("[note] => <em>rush</em>"));
}
