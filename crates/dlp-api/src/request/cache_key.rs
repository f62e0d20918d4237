//! Cache keys that ignore parameter insertion order

use std::collections::BTreeMap;
use std::fmt;

/// Scalar parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum CacheParam {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for CacheParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheParam::Str(s) => f.write_str(s),
            CacheParam::Int(i) => write!(f, "{}", i),
            CacheParam::Float(x) => write!(f, "{}", x),
            CacheParam::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CacheParam {
    fn from(value: &str) -> Self {
        CacheParam::Str(value.to_string())
    }
}

impl From<String> for CacheParam {
    fn from(value: String) -> Self {
        CacheParam::Str(value)
    }
}

impl From<&String> for CacheParam {
    fn from(value: &String) -> Self {
        CacheParam::Str(value.clone())
    }
}

impl From<i64> for CacheParam {
    fn from(value: i64) -> Self {
        CacheParam::Int(value)
    }
}

impl From<i32> for CacheParam {
    fn from(value: i32) -> Self {
        CacheParam::Int(value as i64)
    }
}

impl From<u32> for CacheParam {
    fn from(value: u32) -> Self {
        CacheParam::Int(value as i64)
    }
}

impl From<f64> for CacheParam {
    fn from(value: f64) -> Self {
        CacheParam::Float(value)
    }
}

impl From<bool> for CacheParam {
    fn from(value: bool) -> Self {
        CacheParam::Bool(value)
    }
}

/// `prefix:k1=v1&k2=v2` with keys sorted lexicographically.
///
/// Empty params give `prefix:`. A key repeated in `params` keeps its last value.
pub fn generate_cache_key<I, K, V>(prefix: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<CacheParam>,
{
    let sorted: BTreeMap<String, CacheParam> = params
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();

    let body = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}:{}", prefix, body)
}
