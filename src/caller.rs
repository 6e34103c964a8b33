//! Call-site capture and description.
//!
//! Frames come from two places: the [`call_site!`](crate::call_site) macro,
//! which records the enclosing function path plus `file!()`/`line!()`, and
//! [`capture_stack`], which walks a forced [`Backtrace`]. Both produce the
//! same [`Frame`] shape so [`describe_caller`] does not care which was used.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;

use crate::value::Value;

/// Index of the frame that invoked a dump entry point.
///
/// Frame 0 is the entry point itself.
pub const CALLER_FRAME: usize = 1;

/// Separator placed between a type name and a function name.
pub const PATH_SEPARATOR: &str = "::";

/// One frame of a call stack.
///
/// Every field is optional; frames captured without debug info carry only
/// what the platform could resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Function name, without its enclosing type
    pub function: Option<String>,
    /// Enclosing type, for associated functions and methods
    pub class: Option<String>,
    /// Marker between `class` and `function`
    pub kind: Option<String>,
    /// Source file path
    pub file: Option<String>,
    /// Source line number
    pub line: Option<u32>,
}

impl Frame {
    /// Creates a frame for a free function.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            function: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates a frame for a method or associated function.
    pub fn method(
        class: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            function: Some(name.into()),
            class: Some(class.into()),
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Creates a frame from a symbol path such as `app::Cart::total`.
    ///
    /// Trailing hashes and closure segments are dropped. When the segment
    /// before the function name looks like a type (leading uppercase) or the
    /// symbol is a `<T as Trait>::f` form, it becomes the `class`.
    pub fn from_symbol(symbol: &str) -> Self {
        let symbol = strip_noise(symbol.trim());
        if symbol.is_empty() {
            return Self::default();
        }

        if let Some(rest) = symbol.strip_prefix('<') {
            if let Some(close) = matching_angle(rest) {
                let class = &rest[..close];
                if let Some(function) = rest[close + 1..].strip_prefix(PATH_SEPARATOR) {
                    return Self::method(class, PATH_SEPARATOR, function);
                }
            }
            return Self::function(symbol);
        }

        let mut segments = split_path(symbol);
        let function = segments.pop().unwrap_or_default();
        match segments.last() {
            Some(owner) if owner.starts_with(|c: char| c.is_ascii_uppercase()) => {
                Self::method(*owner, PATH_SEPARATOR, function)
            }
            _ => Self::function(function),
        }
    }

    /// Creates a frame holding only the location of `location`.
    pub fn from_location(location: &Location<'_>) -> Self {
        Self::default().with_location(location.file(), location.line())
    }

    /// Sets the source location.
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Fills in any field `self` is missing from `other`.
    pub fn or(mut self, other: Frame) -> Self {
        self.function = self.function.or(other.function);
        self.class = self.class.or(other.class);
        self.kind = self.kind.or(other.kind);
        self.file = self.file.or(other.file);
        self.line = self.line.or(other.line);
        self
    }

    /// Converts into a plain descriptor record for dumping.
    ///
    /// Keys are `file`, `line`, `function`, `class` and `type`; absent
    /// fields are null.
    pub fn to_value(&self) -> Value {
        Value::mapping([
            ("file", Value::from(self.file.clone())),
            ("line", Value::from(self.line)),
            ("function", Value::from(self.function.clone())),
            ("class", Value::from(self.class.clone())),
            ("type", Value::from(self.kind.clone())),
        ])
    }
}

fn strip_noise(symbol: &str) -> &str {
    let mut s = symbol;
    loop {
        let before = s;
        if let Some((head, hash)) = s.rsplit_once("::h") {
            if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
                s = head;
            }
        }
        s = s.strip_suffix("::{{closure}}").unwrap_or(s);
        if s == before {
            return s;
        }
    }
}

/// Splits a symbol path at `::` separators outside of generic arguments.
fn split_path(symbol: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut chars = symbol.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ':' if depth == 0 && matches!(chars.peek(), Some((_, ':'))) => {
                segments.push(&symbol[start..i]);
                chars.next();
                start = i + PATH_SEPARATOR.len();
            }
            _ => {}
        }
    }
    segments.push(&symbol[start..]);
    segments
}

/// Position of the `>` closing an already-opened `<`.
fn matching_angle(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// A resolved description of the code that triggered a dump.
///
/// # Examples
///
/// ```
/// use debug_gate::{describe_caller, Frame};
///
/// let stack = [
///     Frame::method("Dumper", "::", "dump"),
///     Frame::method("Foo", "::", "bar").with_location("src/foo.rs", 12),
/// ];
///
/// let ctx = describe_caller(&stack, 1);
/// assert_eq!(ctx.to_string(), "Method::Foo::bar line 12 of \"src/foo.rs\"");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    /// Enclosing function name
    pub function: Option<String>,
    /// Enclosing type name
    pub class: Option<String>,
    /// Invocation-kind marker
    pub kind: Option<String>,
    /// Source file path
    pub file: Option<String>,
    /// Source line number
    pub line: Option<u32>,
}

impl CallerContext {
    /// Returns `Method::<class><kind><function>`, `Function::<function>`,
    /// or an empty string when the frame names no function.
    pub fn descriptor(&self) -> String {
        match (&self.class, &self.kind, &self.function) {
            (Some(class), Some(kind), Some(function)) if !kind.is_empty() => {
                format!("Method::{}{}{}", class, kind, function)
            }
            (_, _, Some(function)) => format!("Function::{}", function),
            _ => String::new(),
        }
    }

    /// Returns `line <N> of "<file>"` when both are known.
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("line {} of \"{}\"", line, file)),
            _ => None,
        }
    }

    /// Returns `true` if nothing about the caller is known.
    pub fn is_empty(&self) -> bool {
        self.descriptor().is_empty() && self.location().is_none()
    }
}

impl fmt::Display for CallerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptor = self.descriptor();
        match self.location() {
            Some(location) if descriptor.is_empty() => f.write_str(&location),
            Some(location) => write!(f, "{} {}", descriptor, location),
            None => f.write_str(&descriptor),
        }
    }
}

impl From<&Frame> for CallerContext {
    fn from(frame: &Frame) -> Self {
        Self {
            function: frame.function.clone(),
            class: frame.class.clone(),
            kind: frame.kind.clone(),
            file: frame.file.clone(),
            line: frame.line,
        }
    }
}

/// Describes the frame at `frame_index` of `stack` (innermost first).
///
/// A stack shallower than expected yields an empty context.
pub fn describe_caller(stack: &[Frame], frame_index: usize) -> CallerContext {
    stack
        .get(frame_index)
        .map(CallerContext::from)
        .unwrap_or_default()
}

/// Captures the current call stack, innermost frame first.
///
/// Frames belonging to the capture machinery are dropped. Without debug
/// info the platform may resolve nothing, in which case the result is empty.
pub fn capture_stack() -> Vec<Frame> {
    let trace = Backtrace::force_capture().to_string();
    parse_symbols(&trace)
        .into_iter()
        .skip_while(|(symbol, _)| is_capture_symbol(symbol))
        .map(|(_, frame)| frame)
        .collect()
}

fn is_capture_symbol(symbol: &str) -> bool {
    symbol.contains("backtrace") || strip_noise(symbol).ends_with("capture_stack")
}

/// Parses the textual rendering of a [`Backtrace`].
///
/// Each frame is a `N: symbol` line optionally followed by an
/// `at file:line:col` line.
#[cfg(test)]
fn parse_backtrace(trace: &str) -> Vec<Frame> {
    parse_symbols(trace)
        .into_iter()
        .map(|(_, frame)| frame)
        .collect()
}

fn parse_symbols(trace: &str) -> Vec<(String, Frame)> {
    let mut frames: Vec<(String, Frame)> = Vec::new();
    for line in trace.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            if let Some((_, frame)) = frames.last_mut() {
                if frame.file.is_none() {
                    let (file, line_no) = split_location(location);
                    frame.file = Some(file.to_string());
                    frame.line = line_no;
                }
            }
        } else if let Some((index, symbol)) = line.split_once(": ") {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                frames.push((symbol.to_string(), Frame::from_symbol(symbol)));
            }
        }
    }
    frames
}

/// Splits `file:line[:col]`; a leading `./` is dropped so paths read the
/// same as `file!()`.
fn split_location(location: &str) -> (&str, Option<u32>) {
    let location = location.strip_prefix("./").unwrap_or(location);
    let mut parts = location.rsplitn(3, ':');
    let col = parts.next();
    let line = parts.next();
    let file = parts.next();
    match (file, line, col) {
        (Some(file), Some(line), Some(col)) if col.parse::<u32>().is_ok() => {
            (file, line.parse().ok())
        }
        _ => match location.rsplit_once(':') {
            Some((file, line)) => match line.parse() {
                Ok(n) => (file, Some(n)),
                Err(_) => (location, None),
            },
            None => (location, None),
        },
    }
}

/// Captures a [`Frame`] for the enclosing function at the invocation site.
///
/// # Examples
///
/// ```
/// use debug_gate::call_site;
///
/// fn handler() -> debug_gate::Frame {
///     call_site!()
/// }
///
/// let frame = handler();
/// assert_eq!(frame.function.as_deref(), Some("handler"));
/// assert!(frame.line.is_some());
/// ```
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        $crate::Frame::from_symbol(name.strip_suffix("::__here").unwrap_or(name))
            .with_location(file!(), line!())
    }};
}
