//! Markup-safe rendering, shape classification and the structural print.
//!
//! Everything here is pure: values are borrowed, never modified, and a new
//! tree is returned where a transformation is needed.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::value::{Record, Value};

/// Default nesting depth at which rendering stops descending.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Placeholder substituted for containers nested deeper than the bound.
pub const DEPTH_LIMIT_MARKER: &str = "*DEPTH LIMIT*";

const INDENT: usize = 4;

/// Replaces markup-significant characters with their entity forms.
///
/// Covers `&`, `<`, `>`, `"` and `'`. Returns the input unchanged (and
/// unallocated) when there is nothing to escape.
///
/// # Examples
///
/// ```
/// use debug_gate::escape_markup;
///
/// assert_eq!(escape_markup("<b>x</b>"), "&lt;b&gt;x&lt;/b&gt;");
/// assert_eq!(escape_markup("it's \"fine\""), "it&#039;s &quot;fine&quot;");
/// assert_eq!(escape_markup("plain"), "plain");
/// ```
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Returns an escaped copy of `value`, bounded at [`DEFAULT_MAX_DEPTH`].
///
/// Text is escaped with [`escape_markup`]; sequences, mappings and records
/// keep their shape, keys and field names; every other value is copied
/// unchanged. The input is never modified.
///
/// # Examples
///
/// ```
/// use debug_gate::{render_safe, Value};
///
/// let original = Value::mapping([("name", "<b>x</b>")]);
/// let rendered = render_safe(&original);
///
/// assert_eq!(rendered, Value::mapping([("name", "&lt;b&gt;x&lt;/b&gt;")]));
/// assert_eq!(original, Value::mapping([("name", "<b>x</b>")]));
/// ```
pub fn render_safe(value: &Value) -> Value {
    render_safe_bounded(value, DEFAULT_MAX_DEPTH)
}

/// Like [`render_safe`], but with an explicit nesting bound.
///
/// A container at depth `max_depth` or deeper (the root is depth 0) is
/// replaced by the text [`DEPTH_LIMIT_MARKER`].
pub fn render_safe_bounded(value: &Value, max_depth: usize) -> Value {
    render_at(value, 0, max_depth)
}

fn render_at(value: &Value, depth: usize, max_depth: usize) -> Value {
    if !value.is_scalar() && depth >= max_depth {
        return Value::Text(DEPTH_LIMIT_MARKER.to_string());
    }

    let render_entries = |entries: &[(String, Value)]| -> Vec<(String, Value)> {
        entries
            .iter()
            .map(|(k, v)| (k.clone(), render_at(v, depth + 1, max_depth)))
            .collect()
    };

    match value {
        Value::Text(s) => Value::Text(escape_markup(s).into_owned()),
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|v| render_at(v, depth + 1, max_depth))
                .collect(),
        ),
        Value::Mapping(entries) => Value::Mapping(render_entries(entries)),
        Value::Record(record) => Value::Record(Record::from_parts(
            record.type_name().to_string(),
            render_entries(record.fields()),
        )),
        other => other.clone(),
    }
}

/// Returns a label describing the runtime shape of `value`.
///
/// Checked in priority order: a record yields its type name, a resource its
/// kind, sequences and mappings `"Array"`, numbers and numeric-looking text
/// `"Number"`, other text `"String"`, and anything else `"unknown"`.
///
/// # Examples
///
/// ```
/// use debug_gate::{classify, Record, Value};
///
/// assert_eq!(classify(&Value::mapping([("a", 1)])), "Array");
/// assert_eq!(classify(&Value::from("42")), "Number");
/// assert_eq!(classify(&Value::from("abc")), "String");
/// assert_eq!(classify(&Value::from(Record::new("Invoice"))), "Invoice");
/// assert_eq!(classify(&Value::Bool(true)), "unknown");
/// ```
pub fn classify(value: &Value) -> &str {
    match value {
        Value::Record(record) => record.type_name(),
        Value::Resource(resource) => resource.kind(),
        Value::Sequence(_) | Value::Mapping(_) => "Array",
        Value::Int(_) | Value::Float(_) => "Number",
        Value::Text(s) if is_numeric_text(s) => "Number",
        Value::Text(_) => "String",
        Value::Bool(_) | Value::Null => "unknown",
    }
}

/// Returns `true` if `text` reads as a decimal number.
///
/// Accepts surrounding whitespace, an optional sign, digits with an optional
/// fraction (or a bare fraction such as `.5`) and an optional exponent.
pub fn is_numeric_text(text: &str) -> bool {
    let s = text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };

    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = match frac_part {
        Some(f) => all_digits(int_part) && all_digits(f) && !(int_part.is_empty() && f.is_empty()),
        None => !int_part.is_empty() && all_digits(int_part),
    };

    let exponent_ok = match exponent {
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && all_digits(e)
        }
        None => true,
    };

    mantissa_ok && exponent_ok
}

/// Prints `value` in the indented structural layout used by dumps.
///
/// ```text
/// Array
/// (
///     [name] => alice
///     [roles] => Array
///         (
///             [0] => admin
///         )
///
/// )
/// ```
///
/// `true` prints as `1`, `false` and null as nothing, resources as
/// `Resource id #<n>`, records as `<Type> Object`. Nesting is bounded at
/// [`DEFAULT_MAX_DEPTH`].
pub fn print_structure(value: &Value) -> String {
    print_structure_bounded(value, DEFAULT_MAX_DEPTH)
}

/// Like [`print_structure`], but with an explicit nesting bound.
pub fn print_structure_bounded(value: &Value, max_depth: usize) -> String {
    Printer::new(max_depth, false).print(value)
}

/// Escaped structural print for markup output.
///
/// Text values go through [`render_safe_bounded`]; keys, field names and
/// record type names are escaped while printing.
pub(crate) fn print_markup_bounded(value: &Value, max_depth: usize) -> String {
    Printer::new(max_depth, true).print(&render_safe_bounded(value, max_depth))
}

struct Printer {
    out: String,
    max_depth: usize,
    escape_names: bool,
}

impl Printer {
    fn new(max_depth: usize, escape_names: bool) -> Self {
        Self {
            out: String::new(),
            max_depth,
            escape_names,
        }
    }

    fn print(mut self, value: &Value) -> String {
        self.value(value, 0, 0);
        self.out
    }

    fn name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.escape_names {
            escape_markup(name)
        } else {
            Cow::Borrowed(name)
        }
    }

    fn value(&mut self, value: &Value, indent: usize, depth: usize) {
        if !value.is_scalar() && depth >= self.max_depth {
            self.out.push_str(DEPTH_LIMIT_MARKER);
            return;
        }

        match value {
            Value::Null | Value::Bool(false) => {}
            Value::Bool(true) => self.out.push('1'),
            Value::Int(i) => {
                let _ = write!(self.out, "{}", i);
            }
            Value::Float(f) => self.out.push_str(&format_float(*f)),
            Value::Text(s) => self.out.push_str(s),
            Value::Resource(r) => {
                let _ = write!(self.out, "Resource id #{}", r.id());
            }
            Value::Sequence(items) => {
                self.out.push_str("Array\n");
                let keyed = items.iter().enumerate().map(|(i, v)| (i.to_string(), v));
                self.entries(keyed, indent, depth);
            }
            Value::Mapping(entries) => {
                self.out.push_str("Array\n");
                let keyed: Vec<_> = entries
                    .iter()
                    .map(|(k, v)| (self.name(k).into_owned(), v))
                    .collect();
                self.entries(keyed, indent, depth);
            }
            Value::Record(record) => {
                let type_name = self.name(record.type_name()).into_owned();
                let _ = writeln!(self.out, "{} Object", type_name);
                let keyed: Vec<_> = record
                    .fields()
                    .iter()
                    .map(|(k, v)| (self.name(k).into_owned(), v))
                    .collect();
                self.entries(keyed, indent, depth);
            }
        }
    }

    fn entries<'v, I>(&mut self, entries: I, indent: usize, depth: usize)
    where
        I: IntoIterator<Item = (String, &'v Value)>,
    {
        self.pad(indent);
        self.out.push_str("(\n");
        for (key, value) in entries {
            self.pad(indent + INDENT);
            let _ = write!(self.out, "[{}] => ", key);
            self.value(value, indent + INDENT * 2, depth + 1);
            self.out.push('\n');
        }
        self.pad(indent);
        self.out.push_str(")\n");
    }

    fn pad(&mut self, n: usize) {
        self.out.extend(std::iter::repeat(' ').take(n));
    }
}

/// Significant digits kept when printing floats.
const FLOAT_PRECISION: i32 = 14;

/// Prints `f` with [`FLOAT_PRECISION`] significant digits.
///
/// Exponents below -4 or at least the precision switch to `1.5E+20` form;
/// trailing fractional zeros are dropped.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return (if f > 0.0 { "INF" } else { "-INF" }).to_string();
    }
    if f == 0.0 {
        return (if f.is_sign_negative() { "-0" } else { "0" }).to_string();
    }

    let scientific = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, f);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= FLOAT_PRECISION {
        let mantissa = trim_fraction(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        if mantissa.contains('.') {
            format!("{}E{}{}", mantissa, sign, exponent.abs())
        } else {
            format!("{}.0E{}{}", mantissa, sign, exponent.abs())
        }
    } else {
        let decimals = (FLOAT_PRECISION - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, f)).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
