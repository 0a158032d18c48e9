use std::borrow::Cow;
use std::cmp::Ordering as CmpOrdering;
use std::fmt;

use serde_json::Value;

use crate::filter::lookup;
use crate::{Error, NAME_KEY, NAME_PROP};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SortDir {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

/// One sort key from the `order` parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ordering {
    pub key: String,
    pub dir: SortDir,
}

impl Ordering {
    #[must_use]
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            dir: SortDir::Asc,
        }
    }

    #[must_use]
    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            dir: SortDir::Desc,
        }
    }

    #[must_use]
    pub fn descending(&self) -> bool {
        self.dir == SortDir::Desc
    }

    /// Parse one token: `key`, `+key`, `-key`, `key+` or `key-`.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` when no key remains after the sign.
    pub fn parse(token: &str) -> Result<Self, Error> {
        let token = token.trim();
        let (dir, key) = if let Some(rest) = token.strip_prefix('-') {
            (SortDir::Desc, rest)
        } else if let Some(rest) = token.strip_prefix('+') {
            (SortDir::Asc, rest)
        } else if let Some(rest) = token.strip_suffix('-') {
            (SortDir::Desc, rest)
        } else if let Some(rest) = token.strip_suffix('+') {
            (SortDir::Asc, rest)
        } else {
            (SortDir::Asc, token)
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidOrder(token.to_owned()));
        }
        Ok(Self {
            key: key.to_owned(),
            dir,
        })
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dir {
            SortDir::Asc => write!(f, "+{}", self.key),
            SortDir::Desc => write!(f, "-{}", self.key),
        }
    }
}

/// Parse the comma-separated `order` parameter, skipping empty tokens.
///
/// # Errors
/// Returns `Error::InvalidOrder` for a sign without a key.
pub fn parse_order(raw: &str) -> Result<Vec<Ordering>, Error> {
    raw.split(',')
        .filter(|t| !t.trim().is_empty())
        .map(Ordering::parse)
        .collect()
}

/// Sort `(name, view)` pairs so the first ordering is the most significant key.
///
/// Orderings are applied last-to-first as stable sorts. `_name` is the child
/// name; `name` is the child's property when it has one, else its child name.
pub fn sort_by_orderings<T>(
    items: &mut [(String, T)],
    orderings: &[Ordering],
    view: impl Fn(&T) -> &Value,
) {
    for ordering in orderings.iter().rev() {
        items.sort_by(|(a_name, a), (b_name, b)| {
            let ord = if ordering.key == NAME_KEY {
                a_name.cmp(b_name)
            } else {
                compare_opt(
                    sort_key(a_name, view(a), &ordering.key).as_deref(),
                    sort_key(b_name, view(b), &ordering.key).as_deref(),
                )
            };
            if ordering.descending() { ord.reverse() } else { ord }
        });
    }
}

fn sort_key<'a>(name: &str, child: &'a Value, key: &str) -> Option<Cow<'a, Value>> {
    match lookup(child, key) {
        Some(v) => Some(Cow::Borrowed(v)),
        None if key == NAME_PROP => Some(Cow::Owned(Value::String(name.to_owned()))),
        None => None,
    }
}

fn compare_opt(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (None, Some(_)) => CmpOrdering::Less,
        (Some(_), None) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    }
}

fn rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total pre-order over JSON values: values of different types order by type,
/// numbers numerically, strings and arrays lexicographically, objects by size.
#[must_use]
pub fn compare_values(a: &Value, b: &Value) -> CmpOrdering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(x, y)| compare_values(x, y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names<T>(items: &[(String, T)]) -> Vec<&str> {
        items.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn parse_signs() {
        assert_eq!(Ordering::parse("name").unwrap(), Ordering::asc("name"));
        assert_eq!(Ordering::parse("+name").unwrap(), Ordering::asc("name"));
        assert_eq!(Ordering::parse("-name").unwrap(), Ordering::desc("name"));
        assert_eq!(Ordering::parse("name-").unwrap(), Ordering::desc("name"));
        assert_eq!(Ordering::parse("name+").unwrap(), Ordering::asc("name"));
        assert!(Ordering::parse("-").is_err());
    }

    #[test]
    fn parse_list_skips_blanks() {
        let order = parse_order("-age, name,,").unwrap();
        assert_eq!(order, vec![Ordering::desc("age"), Ordering::asc("name")]);
        assert_eq!(order[0].to_string(), "-age");
    }

    #[test]
    fn descending_by_name() {
        let mut items = vec![
            ("a".to_owned(), json!(2)),
            ("b".to_owned(), json!(1)),
        ];
        sort_by_orderings(&mut items, &[Ordering::desc("_name")], |v| v);
        assert_eq!(names(&items), ["b", "a"]);
    }

    #[test]
    fn name_falls_back_to_child_name() {
        for input in [["a", "b"], ["b", "a"]] {
            let mut items: Vec<(String, Value)> = input
                .iter()
                .map(|n| ((*n).to_owned(), json!(if *n == "a" { 2 } else { 1 })))
                .collect();
            sort_by_orderings(&mut items, &[Ordering::desc("name")], |v| v);
            assert_eq!(names(&items), ["b", "a"]);
            sort_by_orderings(&mut items, &[Ordering::asc("name")], |v| v);
            assert_eq!(names(&items), ["a", "b"]);
        }
    }

    #[test]
    fn name_property_wins_over_child_name() {
        let mut items = vec![
            ("a".to_owned(), json!({"name": "zed"})),
            ("b".to_owned(), json!({"name": "amy"})),
            ("c".to_owned(), json!({})),
        ];
        sort_by_orderings(&mut items, &[Ordering::asc("name")], |v| v);
        assert_eq!(names(&items), ["b", "c", "a"]);
    }

    #[test]
    fn unknown_property_keeps_input_order() {
        let mut items = vec![
            ("b".to_owned(), json!(1)),
            ("a".to_owned(), json!(2)),
        ];
        sort_by_orderings(&mut items, &[Ordering::desc("size")], |v| v);
        assert_eq!(names(&items), ["b", "a"]);
    }

    #[test]
    fn first_ordering_is_primary() {
        let mut items = vec![
            ("x".to_owned(), json!({"color": "red", "size": 2})),
            ("y".to_owned(), json!({"color": "blue", "size": 2})),
            ("z".to_owned(), json!({"color": "red", "size": 1})),
        ];
        sort_by_orderings(
            &mut items,
            &[Ordering::asc("size"), Ordering::desc("color")],
            |v| v,
        );
        assert_eq!(names(&items), ["z", "x", "y"]);
    }

    #[test]
    fn scalar_children_sort_by_value() {
        let mut items = vec![
            ("a".to_owned(), json!(3)),
            ("b".to_owned(), json!(1)),
            ("c".to_owned(), json!(2)),
        ];
        sort_by_orderings(&mut items, &[Ordering::asc("_value")], |v| v);
        assert_eq!(names(&items), ["b", "c", "a"]);
    }

    #[test]
    fn mixed_types_order_by_rank() {
        assert_eq!(compare_values(&json!(null), &json!(1)), CmpOrdering::Less);
        assert_eq!(compare_values(&json!("a"), &json!(1)), CmpOrdering::Greater);
        assert_eq!(compare_values(&json!([1, 2]), &json!([1, 3])), CmpOrdering::Less);
        assert_eq!(compare_values(&json!(1.5), &json!(1)), CmpOrdering::Greater);
    }
}
