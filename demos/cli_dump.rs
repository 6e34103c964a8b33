//! Command-line dump demonstration.
//!
//! Run from a terminal, the process is interactive, so the trust gate opens
//! without an address and dumps are written as plain text:
//! 1. Dump a record with a header
//! 2. Print the type label of a few values
//! 3. Print a short backtrace
//!
//! Run with: `cargo run --example cli_dump`

use debug_gate::{
    dump, dump_backtrace, dump_type, Dumper, Error, Record, RequestContext, Resource,
    TracingLogSink, TrustPolicy, Value,
};

struct Inventory {
    items: Vec<(&'static str, u32)>,
}

impl Inventory {
    fn report(&self, dumper: &mut Dumper<'_>) -> Result<(), Error> {
        let stock = Value::mapping(self.items.iter().map(|(sku, qty)| (*sku, *qty)));
        dump!(dumper, stock, "Inventory")?;
        Ok(())
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let policy = TrustPolicy::from_env();
    let ctx = RequestContext::from_env();
    let sink = TracingLogSink;
    let mut dumper = Dumper::stdout(&policy, ctx).with_log_sink(&sink);

    println!("Interactive: {}", dumper.request().is_interactive());

    let user = Record::new("User")
        .field("name", "alice")
        .field("roles", vec!["admin", "<ops>"])
        .field("last_login", Value::Null)
        .field("session", Resource::new("stream", 7));
    dump!(dumper, user, "Current user")?;

    Inventory {
        items: vec![("A-100", 3), ("B-200", 0)],
    }
    .report(&mut dumper)?;

    dump_type!(dumper, "42", "What is \"42\"?")?;
    dump_type!(dumper, vec![1.5, 2.5], "And a list?")?;

    dump_backtrace!(dumper, 3, "Where am I")?;

    let outcome = dump!(dumper, "done", "", true)?;
    outcome.exit_if_requested();
    Ok(())
}
