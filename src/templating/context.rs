//! The data context views are rendered with, and dotted key-path resolution.

use serde::Serialize;
use serde_json::{Map, Value};

/// Named values available to `(:= key.path:)` directives.
///
/// One context belongs to one view. A load borrows it for the whole resolution
/// chain, so every include sees the same values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataContext {
    values: Map<String, Value>,
}

/// Outcome of resolving a dotted key path.
#[derive(Debug, PartialEq)]
pub enum Resolution<'a> {
    /// Every segment resolved, or the first segment is a scalar.
    Found(&'a Value),
    /// Descent stopped at `missing`; `value` is the last value reached.
    Partial { value: &'a Value, missing: String },
    /// The first segment is not in the context.
    Missing,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any previous value.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// A copy of the value assigned to `name`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Compact JSON of the whole context.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.values).unwrap_or_else(|_| "{}".to_string())
    }

    /// Resolve `user.profile.name` style paths.
    ///
    /// The first segment is looked up in the context. A scalar there is used as-is
    /// and the remaining segments are ignored. Objects and arrays are descended one
    /// segment at a time (arrays by numeric index); when a segment is absent the
    /// descent stops and the value reached so far is reported as [`Resolution::Partial`].
    pub fn resolve(&self, key_path: &str) -> Resolution<'_> {
        let mut segments = key_path.split('.');
        let first = segments.next().unwrap_or_default();
        let Some(mut value) = self.values.get(first) else {
            return Resolution::Missing;
        };

        if !(value.is_object() || value.is_array()) {
            return Resolution::Found(value);
        }

        for segment in segments.filter(|s| !s.is_empty()) {
            let next = match value {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            match next {
                Some(next) => value = next,
                None => {
                    return Resolution::Partial {
                        value,
                        missing: segment.to_string(),
                    };
                }
            }
        }

        Resolution::Found(value)
    }
}

impl From<Map<String, Value>> for DataContext {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// Text a value is interpolated as.
///
/// Strings are inserted verbatim, other scalars use their JSON spelling, and arrays
/// and objects are serialized as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
