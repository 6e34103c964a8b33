//! Call-site capturing shorthands for the [`Dumper`](crate::Dumper) methods.
//!
//! Each macro records the enclosing function with
//! [`call_site!`](crate::call_site) so the caller line names it.

/// Dumps a value: `dump!(dumper, value [, header [, halt]])`.
///
/// # Examples
///
/// ```
/// use debug_gate::{dump, Dumper, RequestContext, TrustPolicy};
///
/// let policy = TrustPolicy::new();
/// let ctx = RequestContext::request().with_remote_addr("10.0.0.8");
/// let mut dumper = Dumper::new(&policy, ctx, Vec::new());
///
/// fn load_cart(dumper: &mut Dumper<'_, Vec<u8>>) {
///     dump!(dumper, vec![1, 2, 3], "cart ids").unwrap();
/// }
/// load_cart(&mut dumper);
///
/// let html = String::from_utf8(dumper.into_inner()).unwrap();
/// assert!(html.contains("Fired from Function::load_cart"));
/// ```
#[macro_export]
macro_rules! dump {
    ($dumper:expr, $value:expr $(,)?) => {
        $crate::dump!($dumper, $value, "", false)
    };
    ($dumper:expr, $value:expr, $header:expr $(,)?) => {
        $crate::dump!($dumper, $value, $header, false)
    };
    ($dumper:expr, $value:expr, $header:expr, $halt:expr $(,)?) => {
        $dumper.at($crate::call_site!()).dump($value, $header, $halt)
    };
}

/// Dumps the shape label of a value: `dump_type!(dumper, value [, header [, halt]])`.
#[macro_export]
macro_rules! dump_type {
    ($dumper:expr, $value:expr $(,)?) => {
        $crate::dump_type!($dumper, $value, "", false)
    };
    ($dumper:expr, $value:expr, $header:expr $(,)?) => {
        $crate::dump_type!($dumper, $value, $header, false)
    };
    ($dumper:expr, $value:expr, $header:expr, $halt:expr $(,)?) => {
        $dumper.at($crate::call_site!()).dump_type($value, $header, $halt)
    };
}

/// Dumps a value through the standalone checked entry point.
#[macro_export]
macro_rules! dump_checked {
    ($dumper:expr, $value:expr $(,)?) => {
        $crate::dump_checked!($dumper, $value, "", false)
    };
    ($dumper:expr, $value:expr, $header:expr $(,)?) => {
        $crate::dump_checked!($dumper, $value, $header, false)
    };
    ($dumper:expr, $value:expr, $header:expr, $halt:expr $(,)?) => {
        $dumper.at($crate::call_site!()).dump_checked($value, $header, $halt)
    };
}

/// Dumps the call stack: `dump_backtrace!(dumper [, max_depth [, header]])`.
///
/// Without `max_depth` the dumper's configured depth is used.
#[macro_export]
macro_rules! dump_backtrace {
    ($dumper:expr $(,)?) => {{
        let depth = $dumper.config().backtrace_depth;
        $crate::dump_backtrace!($dumper, depth, "")
    }};
    ($dumper:expr, $depth:expr $(,)?) => {
        $crate::dump_backtrace!($dumper, $depth, "")
    };
    ($dumper:expr, $depth:expr, $header:expr $(,)?) => {
        $dumper.at($crate::call_site!()).dump_backtrace($depth, $header)
    };
}
