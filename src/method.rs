//! HTTP request methods and the per-method lookup table.

use serde::Deserialize;
use std::{fmt, str::FromStr};

/// The fixed set of HTTP verbs a function can register a route for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Connect,
        Method::Options,
        Method::Trace,
        Method::Patch,
    ];

    fn index(self) -> usize {
        match self {
            Method::Get => 0,
            Method::Head => 1,
            Method::Post => 2,
            Method::Put => 3,
            Method::Delete => 4,
            Method::Connect => 5,
            Method::Options => 6,
            Method::Trace => 7,
            Method::Patch => 8,
        }
    }

    /// The lowercase name, as used for configuration keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Head => "head",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "delete",
            Method::Connect => "connect",
            Method::Options => "options",
            Method::Trace => "trace",
            Method::Patch => "patch",
        }
    }

    /// Parse a wire method, ignoring case. Absent, empty, or unknown methods
    /// yield `None`, which the dispatcher treats as unmatched.
    pub fn from_wire(method: Option<&str>) -> Option<Self> {
        method.and_then(|m| m.trim().parse().ok())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized HTTP method `{0}`")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_owned()))
    }
}

impl TryFrom<String> for Method {
    type Error = UnknownMethod;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A fixed-size table holding at most one entry per [`Method`].
#[derive(Debug)]
pub struct MethodTable<T> {
    slots: [Option<T>; 9],
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        MethodTable {
            slots: Default::default(),
        }
    }
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` for `method`, returning whatever was there before.
    pub fn insert(&mut self, method: Method, value: T) -> Option<T> {
        self.slots[method.index()].replace(value)
    }

    pub fn get(&self, method: Method) -> Option<&T> {
        self.slots[method.index()].as_ref()
    }

    pub fn contains(&self, method: Method) -> bool {
        self.get(method).is_some()
    }

    /// The methods that have an entry, in canonical order.
    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        Method::ALL.into_iter().filter(|m| self.contains(*m))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Patch".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn unknown_or_missing_methods_are_unmatched() {
        assert!("PURGE".parse::<Method>().is_err());
        assert_eq!(Method::from_wire(None), None);
        assert_eq!(Method::from_wire(Some("")), None);
        assert_eq!(Method::from_wire(Some("options")), Some(Method::Options));
    }

    #[test]
    fn table_holds_one_entry_per_method() {
        let mut table = MethodTable::new();
        assert!(table.is_empty());
        assert_eq!(table.insert(Method::Post, 1), None);
        assert_eq!(table.insert(Method::Post, 2), Some(1));
        table.insert(Method::Get, 3);

        assert_eq!(table.get(Method::Post), Some(&2));
        assert_eq!(table.get(Method::Put), None);
        assert_eq!(table.methods().collect::<Vec<_>>(), [Method::Get, Method::Post]);
    }

    #[test]
    fn deserializes_from_any_case() {
        let m: Vec<Method> = serde_json::from_str(r#"["GET", "post"]"#).unwrap();
        assert_eq!(m, [Method::Get, Method::Post]);
        assert!(serde_json::from_str::<Method>(r#""FETCH""#).is_err());
    }
}
