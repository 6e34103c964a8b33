//! The dump entry points.
//!
//! Every entry point runs the same pipeline: decide trust, resolve the
//! caller, render the value, write the block, forward to the log sink. A
//! denied trust check returns [`DumpOutcome::Suppressed`] before anything is
//! computed or written.

use std::io::{self, Write};
use std::panic::Location;

use crate::caller::{
    capture_stack, describe_caller, CallerContext, Frame, CALLER_FRAME, PATH_SEPARATOR,
};
use crate::config::DumpConfig;
use crate::error::Error;
use crate::policy::TrustPolicy;
use crate::render::{classify, print_markup_bounded, print_structure_bounded};
use crate::request::RequestContext;
use crate::sink::LogSink;
use crate::value::Value;

/// Inline style of the non-interactive block.
pub const BLOCK_STYLE: &str = "background-color: #FAFAFA; border: 1px solid #BBBBBB; \
text-align: left; font-size: 9pt; line-height: 125%; margin: 0.5em 1em 1.8em; \
overflow: auto; padding: 0.99em;";

/// What happened to a dump request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpOutcome {
    /// The caller was not trusted; nothing was written
    Suppressed,
    /// The dump was written
    Written {
        /// The caller asked for execution to stop
        halt: bool,
    },
}

impl DumpOutcome {
    /// Returns `true` if the dump was written.
    pub fn is_written(&self) -> bool {
        matches!(self, DumpOutcome::Written { .. })
    }

    /// Returns `true` if the caller should stop further execution.
    pub fn should_halt(&self) -> bool {
        matches!(self, DumpOutcome::Written { halt: true })
    }

    /// Ends the process when a halt was requested.
    ///
    /// Embedders that need to keep control should check
    /// [`should_halt`](Self::should_halt) instead.
    pub fn exit_if_requested(self) -> Self {
        if self.should_halt() {
            tracing::debug!("halting after dump");
            std::process::exit(0);
        }
        self
    }
}

/// Writes trust-gated debug dumps to an output stream.
///
/// A `Dumper` binds a shared [`TrustPolicy`] to one [`RequestContext`] and
/// one output stream. Output is plain text for interactive execution and a
/// styled, escaped block otherwise.
///
/// # Examples
///
/// ```
/// use debug_gate::{Dumper, RequestContext, TrustPolicy, Value};
///
/// let policy = TrustPolicy::new();
/// let mut dumper = Dumper::new(&policy, RequestContext::interactive(), Vec::new());
///
/// let outcome = dumper
///     .dump(Value::mapping([("id", 7)]), "order", false)
///     .expect("write to memory");
///
/// assert!(outcome.is_written());
/// let text = String::from_utf8(dumper.into_inner()).unwrap();
/// assert!(text.contains("[id] => 7"));
/// ```
pub struct Dumper<'a, W: Write = io::Stdout> {
    policy: &'a TrustPolicy,
    request: RequestContext,
    out: W,
    log_sink: Option<&'a dyn LogSink>,
    config: DumpConfig,
    call_site: Option<Frame>,
}

impl<'a> Dumper<'a, io::Stdout> {
    /// Creates a dumper writing to standard output.
    pub fn stdout(policy: &'a TrustPolicy, request: RequestContext) -> Self {
        Self::new(policy, request, io::stdout())
    }
}

impl<'a, W: Write> Dumper<'a, W> {
    /// Creates a dumper writing to `out`.
    pub fn new(policy: &'a TrustPolicy, request: RequestContext, out: W) -> Self {
        Self {
            policy,
            request,
            out,
            log_sink: None,
            config: DumpConfig::default(),
            call_site: None,
        }
    }

    /// Forwards every written dump to `sink` as well.
    pub fn with_log_sink(mut self, sink: &'a dyn LogSink) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: DumpConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DumpConfig {
        &self.config
    }

    /// Returns the request context dumps are evaluated against.
    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Returns `true` if the current context may receive output.
    pub fn is_trusted(&self) -> bool {
        self.policy
            .is_trusted(&self.request, self.config.allow_interactive_bypass)
    }

    /// Sets the call site reported by the next dump.
    ///
    /// Used by the `dump!` family of macros. Without it the location of the
    /// method call comes from `#[track_caller]` and the enclosing function is
    /// looked up in a captured backtrace.
    pub fn at(&mut self, site: Frame) -> &mut Self {
        self.call_site = Some(site);
        self
    }

    /// Consumes the dumper and returns the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Dumps `value` under `header`.
    ///
    /// Interactive output is the header between separator lines followed by
    /// the raw structural print. Otherwise the header is decorated as a
    /// heading, the caller is appended and the escaped value is written
    /// inside a styled block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing to the output stream fails.
    #[track_caller]
    pub fn dump(
        &mut self,
        value: impl Into<Value>,
        header: &str,
        halt: bool,
    ) -> Result<DumpOutcome, Error> {
        let site = self.take_site(Location::caller());
        self.dump_from(value.into(), header, halt, site, "dump")
    }

    /// Dumps the shape label of `value` instead of the value itself.
    ///
    /// The header is always decorated as a heading and always carries the
    /// caller block, in both output modes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing to the output stream fails.
    #[track_caller]
    pub fn dump_type(
        &mut self,
        value: impl Into<Value>,
        header: &str,
        halt: bool,
    ) -> Result<DumpOutcome, Error> {
        let site = self.take_site(Location::caller());
        if !self.is_trusted() {
            return Ok(self.suppressed("dump_type"));
        }

        let caller = self.caller_context("dump_type", site);
        let mut decorated = if header.is_empty() {
            String::new()
        } else {
            format!("<h2>{}</h2>", header)
        };
        decorated.push_str(&caller_block(&caller));
        decorated.push('\n');

        let value = value.into();
        let label = Value::from(classify(&value));
        self.emit(&label, &decorated, &decorated, halt)
    }

    /// Same as [`dump`](Self::dump), with its own trust check up front.
    ///
    /// The trust gate is evaluated here and again inside the shared dump
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing to the output stream fails.
    #[track_caller]
    pub fn dump_checked(
        &mut self,
        value: impl Into<Value>,
        header: &str,
        halt: bool,
    ) -> Result<DumpOutcome, Error> {
        let site = self.take_site(Location::caller());
        if !self.is_trusted() {
            return Ok(self.suppressed("dump_checked"));
        }
        self.dump_from(value.into(), header, halt, site, "dump_checked")
    }

    /// Dumps the current call stack.
    ///
    /// Levels `0..=max_depth` are kept, each as a record with `file`,
    /// `line`, `function`, `class` and `type` keys. Level 0 is the caller of
    /// this method.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing to the output stream fails.
    #[track_caller]
    pub fn dump_backtrace(&mut self, max_depth: usize, header: &str) -> Result<DumpOutcome, Error> {
        let site = self.take_site(Location::caller());
        if !self.is_trusted() {
            return Ok(self.suppressed("dump_backtrace"));
        }

        let frames = caller_stack(site.clone(), max_depth);
        let caller = self.caller_context("dump_backtrace", site);

        let mut decorated = header.to_string();
        decorated.push_str(&caller_block(&caller));
        decorated.push('\n');

        let value = Value::Sequence(frames.iter().map(Frame::to_value).collect());
        self.emit(&value, &decorated, &decorated, false)
    }

    fn dump_from(
        &mut self,
        value: Value,
        header: &str,
        halt: bool,
        site: Frame,
        operation: &str,
    ) -> Result<DumpOutcome, Error> {
        if !self.is_trusted() {
            return Ok(self.suppressed(operation));
        }

        let mut plain = header.to_string();
        let mut markup = header.to_string();

        if !self.request.is_interactive() {
            if !header.is_empty() && !looks_like_heading(header) {
                markup = format!("<h2 style=\"color: #000000;\">{}</h2>", header);
            }

            let caller = self.caller_context(operation, site);
            markup.push('\n');
            markup.push_str(&caller_block(&caller));
            plain.push('\n');
            plain.push_str(&fired_from(&caller));
            plain.push('\n');
        }

        self.emit(&value, &plain, &markup, halt)
    }

    fn emit(
        &mut self,
        value: &Value,
        plain_header: &str,
        markup_header: &str,
        halt: bool,
    ) -> Result<DumpOutcome, Error> {
        let max_depth = self.config.max_render_depth;
        let mut block = String::new();

        if self.request.is_interactive() {
            let separator = format!("\n{}", "=".repeat(self.config.separator_width));
            if !plain_header.is_empty() {
                block.push_str(&separator);
                block.push('\n');
                block.push_str(plain_header);
                block.push_str(&separator);
            }
            if !is_loose_empty(value) {
                block.push('\n');
                block.push_str(&print_structure_bounded(value, max_depth));
            }
        } else {
            block.push_str("\n<pre style=\"");
            block.push_str(BLOCK_STYLE);
            block.push_str("\">");
            block.push_str(markup_header);
            block.push('\n');
            block.push_str(&print_markup_bounded(value, max_depth));
            block.push_str("\n</pre>");
        }

        self.out.write_all(block.as_bytes())?;
        self.out.flush()?;

        if let Some(sink) = self.log_sink {
            let raw = print_structure_bounded(value, max_depth);
            if plain_header.is_empty() {
                sink.log_message(&raw);
            } else {
                sink.log_message(&format!("{}{}", plain_header, raw));
            }
        }

        tracing::trace!(bytes = block.len(), halt, "dump written");
        Ok(DumpOutcome::Written { halt })
    }

    fn take_site(&mut self, location: &Location<'_>) -> Frame {
        self.call_site
            .take()
            .unwrap_or_else(|| Frame::from_location(location))
    }

    fn caller_context(&self, operation: &str, site: Frame) -> CallerContext {
        let site = match site.function {
            Some(_) => site,
            None => site.or(enclosing_frame()),
        };
        let stack = [Frame::method("Dumper", "::", operation), site];
        describe_caller(&stack, CALLER_FRAME)
    }

    fn suppressed(&mut self, operation: &str) -> DumpOutcome {
        self.call_site = None;
        tracing::trace!(operation, "dump suppressed for untrusted caller");
        DumpOutcome::Suppressed
    }
}

/// Captured frames above this crate, with the known call site merged into
/// the first one and the list cut to `0..=max_depth`.
fn caller_stack(site: Frame, max_depth: usize) -> Vec<Frame> {
    let mut frames: Vec<Frame> = capture_stack()
        .into_iter()
        .skip_while(is_own_frame)
        .collect();

    match frames.first_mut() {
        Some(first) => *first = site.or(std::mem::take(first)),
        None => frames.push(site),
    }

    frames.truncate(max_depth.saturating_add(1));
    frames
}

/// Names of the first captured frame outside this module.
///
/// Only the function, type and kind are taken; the location stays the one
/// reported by `#[track_caller]`. Empty when symbols are unavailable.
fn enclosing_frame() -> Frame {
    capture_stack()
        .into_iter()
        .find(|frame| frame.function.is_some() && !is_own_frame(frame))
        .map(|frame| Frame {
            function: frame.function,
            class: frame.class,
            kind: frame.kind,
            ..Frame::default()
        })
        .unwrap_or_default()
}

fn is_own_frame(frame: &Frame) -> bool {
    let function = frame.function.as_deref().unwrap_or_default();
    frame.class.as_deref().is_some_and(is_dumper_type)
        || matches!(function, "caller_stack" | "enclosing_frame")
}

/// `Dumper`, `Dumper<W>` or a path ending in either.
fn is_dumper_type(class: &str) -> bool {
    let base = class.split('<').next().unwrap_or(class);
    base.rsplit(PATH_SEPARATOR).next() == Some("Dumper")
}

fn looks_like_heading(header: &str) -> bool {
    header.contains("<h2>") || header.contains("<h3")
}

fn fired_from(caller: &CallerContext) -> String {
    format!("Fired from {}", caller)
}

fn caller_block(caller: &CallerContext) -> String {
    format!(
        "<h3 style=\"border-bottom: 1px dashed #805E42;\">{}</h3>",
        fired_from(caller)
    )
}

/// Empty text and `false` print nothing, so the body is skipped.
fn is_loose_empty(value: &Value) -> bool {
    matches!(value, Value::Bool(false)) || value.as_text().is_some_and(str::is_empty)
}
