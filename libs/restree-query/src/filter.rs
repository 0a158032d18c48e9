use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::{Error, VALUE_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOp {
    Equals,
    /// Operator name nothing understands; such filters reject every child.
    Unknown(String),
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOp::Equals => write!(f, "equals"),
            FilterOp::Unknown(op) => write!(f, "{op}"),
        }
    }
}

/// A single `name:value` constraint from the `where` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub propname: String,
    pub value: String,
    pub op: FilterOp,
}

impl Filter {
    #[must_use]
    pub fn equals(propname: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            propname: propname.into(),
            value: value.into(),
            op: FilterOp::Equals,
        }
    }

    /// Parse one `name:value` pair. The value may itself contain `:`.
    ///
    /// # Errors
    /// Returns `Error::InvalidFilter` when the separator or the name is missing.
    pub fn parse(pair: &str) -> Result<Self, Error> {
        let (name, value) = pair
            .split_once(':')
            .ok_or_else(|| Error::InvalidFilter(pair.to_owned()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidFilter(pair.to_owned()));
        }
        Ok(Self::equals(name, value.trim()))
    }

    /// Whether a child passes this filter.
    ///
    /// Scalar children are seen as `{"_value": child}`.
    #[must_use]
    pub fn matches(&self, child: &Value) -> bool {
        let FilterOp::Equals = self.op else {
            return false;
        };
        lookup(child, &self.propname).is_some_and(|v| value_text(v) == self.value)
    }
}

/// Parse the comma-separated `where` parameter.
///
/// # Errors
/// Returns `Error::InvalidFilter` for any malformed pair.
pub fn parse_where(raw: &str) -> Result<Vec<Filter>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Filter::parse)
        .collect()
}

/// Property of a child view; scalars only expose `_value`.
pub(crate) fn lookup<'a>(child: &'a Value, key: &str) -> Option<&'a Value> {
    match child {
        Value::Object(map) => map.get(key),
        scalar if key == VALUE_KEY => Some(scalar),
        _ => None,
    }
}

/// Text form used for literal comparison: strings as-is, everything else as JSON.
#[must_use]
pub fn value_text(v: &Value) -> Cow<'_, str> {
    match v {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_pair() {
        let f = Filter::parse("color:red").unwrap();
        assert_eq!(f, Filter::equals("color", "red"));

        let f = Filter::parse("url:http://x").unwrap();
        assert_eq!(f.value, "http://x");
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert!(matches!(Filter::parse("color"), Err(Error::InvalidFilter(_))));
        assert!(matches!(Filter::parse(":red"), Err(Error::InvalidFilter(_))));
    }

    #[test]
    fn parse_where_list() {
        let filters = parse_where("color:red, size:3,").unwrap();
        assert_eq!(
            filters,
            vec![Filter::equals("color", "red"), Filter::equals("size", "3")]
        );
        assert!(parse_where("").unwrap().is_empty());
    }

    #[test]
    fn equality_is_textual() {
        let f = Filter::equals("size", "3");
        assert!(f.matches(&json!({"size": 3})));
        assert!(f.matches(&json!({"size": "3"})));
        assert!(!f.matches(&json!({"size": 4})));
        assert!(!f.matches(&json!({"other": 3})));
    }

    #[test]
    fn scalars_expose_value_key() {
        assert!(Filter::equals("_value", "red").matches(&json!("red")));
        assert!(!Filter::equals("color", "red").matches(&json!("red")));
    }

    #[test]
    fn unknown_operator_fails_closed() {
        let f = Filter {
            propname: "color".to_owned(),
            value: "red".to_owned(),
            op: FilterOp::Unknown("like".to_owned()),
        };
        assert!(!f.matches(&json!({"color": "red"})));
    }
}
