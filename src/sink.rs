use std::cell::RefCell;

/// Target used by [`TracingLogSink`] events.
pub const DUMP_TARGET: &str = "debug_gate::dump";

/// An external log collaborator that receives every written dump.
///
/// The sink gets the header followed by the raw (unescaped) structural
/// print of the value. It is only invoked after the trust check passed.
///
/// # Examples
///
/// ```
/// use debug_gate::{LogSink, VecLogSink};
///
/// let sink = VecLogSink::new();
/// sink.log_message("cart\nArray\n(\n)\n");
///
/// assert_eq!(sink.len(), 1);
/// ```
pub trait LogSink {
    /// Records one dump message.
    fn log_message(&self, text: &str);
}

impl<T: LogSink + ?Sized> LogSink for &T {
    fn log_message(&self, text: &str) {
        (**self).log_message(text)
    }
}

impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    fn log_message(&self, text: &str) {
        (**self).log_message(text)
    }
}

/// A sink that forwards dumps to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log_message(&self, text: &str) {
        tracing::debug!(target: DUMP_TARGET, "{}", text);
    }
}

/// A sink that collects messages in memory.
///
/// Useful in tests and for embedders that ship dumps somewhere after the
/// request finishes.
#[derive(Debug, Default)]
pub struct VecLogSink {
    messages: RefCell<Vec<String>>,
}

impl VecLogSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of messages received.
    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    /// Returns `true` if no message was received.
    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Provides borrowed access to the messages via callback.
    pub fn with_messages<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[String]) -> R,
    {
        f(&self.messages.borrow())
    }

    /// Consumes the sink and returns the collected messages.
    pub fn into_vec(self) -> Vec<String> {
        self.messages.into_inner()
    }
}

impl LogSink for VecLogSink {
    fn log_message(&self, text: &str) {
        self.messages.borrow_mut().push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_in_order() {
        let sink = VecLogSink::new();
        sink.log_message("one");
        sink.log_message("two");

        assert_eq!(sink.len(), 2);
        sink.with_messages(|m| assert_eq!(m[0], "one"));
        assert_eq!(sink.into_vec(), vec!["one", "two"]);
    }

    #[test]
    fn vec_sink_default_is_empty() {
        assert!(VecLogSink::default().is_empty());
    }

    #[test]
    fn reference_forwards() {
        let sink = VecLogSink::new();
        let by_ref: &dyn LogSink = &sink;
        (&by_ref).log_message("via ref");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn tracing_sink_emits_without_subscriber() {
        TracingLogSink.log_message("no subscriber installed");
    }

    #[test]
    fn tracing_sink_with_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingLogSink.log_message("Array\n(\n)\n");
        });
    }
}
