//! Tagged value model for anything that can be dumped.
//!
//! A [`Value`] is an owned tree, so a dump can never observe a cycle; deep
//! trees are bounded at render time instead (see
//! [`render_safe_bounded`](crate::render_safe_bounded)).

use std::collections::{BTreeMap, HashMap};

/// A dumpable runtime value.
///
/// # Examples
///
/// ```
/// use debug_gate::{Record, Value};
///
/// let user = Value::from(
///     Record::new("User")
///         .field("name", "<b>alice</b>")
///         .field("roles", vec!["admin", "ops"])
///         .field("active", true),
/// );
///
/// assert!(matches!(user, Value::Record(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,
    /// A boolean
    Bool(bool),
    /// An integer
    Int(i64),
    /// A floating point number
    Float(f64),
    /// Text, which may contain markup
    Text(String),
    /// An ordered sequence
    Sequence(Vec<Value>),
    /// An ordered mapping with text keys
    Mapping(Vec<(String, Value)>),
    /// A typed record with named fields
    Record(Record),
    /// An opaque handle such as a file or socket
    Resource(Resource),
}

impl Value {
    /// Builds a mapping from key/value pairs, keeping their order.
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the text if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for values that hold no nested values.
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Value::Sequence(_) | Value::Mapping(_) | Value::Record(_)
        )
    }

    /// Looks up a mapping key or record field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let entries = match self {
            Value::Mapping(entries) => entries,
            Value::Record(record) => &record.fields,
            _ => return None,
        };
        entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// A value with a concrete type name and named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates a record of the given type with no fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, returning the record for chaining.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Returns the concrete type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub(crate) fn from_parts(type_name: String, fields: Vec<(String, Value)>) -> Self {
        Self { type_name, fields }
    }
}

/// An opaque handle, identified by its kind and a numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    kind: String,
    id: u64,
}

impl Resource {
    /// Creates a resource descriptor, e.g. `Resource::new("stream", 3)`.
    pub fn new(kind: impl Into<String>, id: u64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }

    /// Returns the resource kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the resource id.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        Value::Resource(resource)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Float(n as f64),
        }
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::from(n as u64)
    }
}

impl From<isize> for Value {
    fn from(n: isize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::Sequence(items.iter().cloned().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Value::mapping(map)
    }
}

/// Keys are sorted so the dump is stable across runs.
impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        let mut entries: Vec<(String, Value)> =
            map.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Mapping(entries)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}
