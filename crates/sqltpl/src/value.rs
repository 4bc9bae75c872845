//! Template arguments.
//!
//! [`Arg`] is the closed set of values a template placeholder can bind to.
//! The skip sentinel is its own variant ([`Arg::Skip`]), so no user value can
//! ever be mistaken for it.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Key of a mapping argument (used by `?a` and `?#`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgKey {
    /// Named key: rendered as an assignment target by `?a`.
    Name(String),
    /// Positional key: only the value is rendered.
    Index(i64),
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKey::Name(name) => f.write_str(name),
            ArgKey::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for ArgKey {
    fn from(value: &str) -> Self {
        ArgKey::Name(value.to_string())
    }
}

impl From<String> for ArgKey {
    fn from(value: String) -> Self {
        ArgKey::Name(value)
    }
}

impl From<i64> for ArgKey {
    fn from(value: i64) -> Self {
        ArgKey::Index(value)
    }
}

impl From<i32> for ArgKey {
    fn from(value: i32) -> Self {
        ArgKey::Index(i64::from(value))
    }
}

/// A positional template argument.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Arg {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Sequence: element `n` has the positional key `n`.
    List(Vec<Arg>),
    /// Ordered mapping.
    Map(Vec<(ArgKey, Arg)>),
    /// The skip sentinel: drops the conditional block it is bound in.
    Skip,
}

/// Return the skip sentinel.
///
/// Bind it to any placeholder of a `{ ... }` block to omit that block.
pub fn skip() -> Arg {
    Arg::Skip
}

impl Arg {
    /// Build an ordered mapping argument.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<ArgKey>,
        V: Into<Arg>,
    {
        Arg::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence argument.
    pub fn list<V: Into<Arg>>(items: impl IntoIterator<Item = V>) -> Self {
        Arg::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Arg::Skip)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Null)
    }

    /// `true` for `List` and `Map`.
    pub fn is_composite(&self) -> bool {
        matches!(self, Arg::List(_) | Arg::Map(_))
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Null => "null",
            Arg::Int(_) => "integer",
            Arg::Float(_) => "float",
            Arg::Bool(_) => "boolean",
            Arg::Text(_) => "string",
            Arg::List(_) => "list",
            Arg::Map(_) => "map",
            Arg::Skip => "skip",
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => f.write_str("NULL"),
            Arg::Int(i) => write!(f, "{i}"),
            Arg::Float(x) => write!(f, "{x}"),
            Arg::Bool(b) => write!(f, "{b}"),
            Arg::Text(s) => f.write_str(s),
            Arg::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Arg::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Arg::Skip => f.write_str("<skip>"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_uint {
    ($($t:ty),*) => {
        $(
            /// Saturates at `i64::MAX`.
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::Int(i64::try_from(value).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

impl_from_wide_uint!(u64, usize);

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Float(f64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Text(value.clone())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Null, Into::into)
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(value: Vec<T>) -> Self {
        Arg::list(value)
    }
}

impl<T: Into<Arg>, const N: usize> From<[T; N]> for Arg {
    fn from(value: [T; N]) -> Self {
        Arg::list(value)
    }
}

/// JSON key marking the skip sentinel: `{"$skip": true}`.
pub const JSON_SKIP_KEY: &str = "$skip";

/// Object keys in canonical decimal form (`"0"`, `"-5"`, not `"05"` or `"+1"`)
/// become positional keys; everything else stays a name.
fn json_key(key: String) -> ArgKey {
    let digits = key.strip_prefix('-').unwrap_or(&key);
    let canonical = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
        && key != "-0";

    match key.parse::<i64>() {
        Ok(i) if canonical => ArgKey::Index(i),
        _ => ArgKey::Name(key),
    }
}

impl From<serde_json::Value> for Arg {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Arg::Null,
            Value::Bool(b) => Arg::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Arg::Int(i),
                None => Arg::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Arg::Text(s),
            Value::Array(items) => Arg::List(items.into_iter().map(Arg::from).collect()),
            Value::Object(obj) => {
                if obj.len() == 1 && obj.get(JSON_SKIP_KEY) == Some(&Value::Bool(true)) {
                    return Arg::Skip;
                }
                Arg::Map(
                    obj.into_iter()
                        .map(|(k, v)| (json_key(k), Arg::from(v)))
                        .collect(),
                )
            }
        }
    }
}

impl<'de> Deserialize<'de> for Arg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Arg::from)
    }
}

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```ignore
/// use sqltpl::{args, skip};
///
/// let args = args![1, "O'Brien", None::<i64>, skip()];
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($value)),+]
    };
}
