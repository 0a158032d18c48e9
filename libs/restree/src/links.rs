//! Hyperlink and pagination metadata
//!
//! Structured bodies are decorated with `_self`, `_parent` and `_top` links, and
//! pageable bodies additionally with `_next` / `_prev`. Links never replace keys
//! the body already has.

use std::collections::BTreeMap;

use restree_query::{DEFAULT_COUNT, VALUE_KEY};
use serde_json::{Map, Value};

pub const SELF: &str = "_self";
pub const PARENT: &str = "_parent";
pub const TOP: &str = "_top";
pub const NEXT: &str = "_next";
pub const PREV: &str = "_prev";
pub const ITEMS: &str = "_items";
pub const NAME: &str = "_name";

/// Query parameters owned by the link assembler.
pub const PAGING_PARAMS: [&str; 3] = ["offset", "page", "count"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

impl Link {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("href".to_owned(), Value::String(self.href.clone()));
        Value::Object(map)
    }
}

/// Paging state and carried query used to build links for one body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkParams {
    pub page: Option<u64>,
    pub offset: Option<u64>,
    pub count: Option<u64>,
    /// Step for offset links when `count` is absent, [`DEFAULT_COUNT`] if unset.
    pub default_count: Option<u64>,
    /// Whether next/prev links make sense for the target.
    pub pageable: bool,
    /// Non-paging query parameters repeated in every link.
    pub query: BTreeMap<String, String>,
}

impl LinkParams {
    #[must_use]
    pub fn pageable(mut self, pageable: bool) -> Self {
        self.pageable = pageable;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_default_count(mut self, count: u64) -> Self {
        self.default_count = Some(count);
        self
    }

    /// Carry every request parameter except the paging ones.
    #[must_use]
    pub fn carrying(mut self, query: &BTreeMap<String, String>) -> Self {
        self.query = query
            .iter()
            .filter(|(k, _)| !PAGING_PARAMS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self
    }

    fn current_query(&self) -> BTreeMap<String, String> {
        let mut query = self.query.clone();
        for (key, value) in [("page", self.page), ("offset", self.offset), ("count", self.count)] {
            if let Some(v) = value {
                query.insert(key.to_owned(), v.to_string());
            }
        }
        query
    }
}

/// `/` followed by the percent-encoded segments joined with `/`.
#[must_use]
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let encoded: Vec<String> = segments
        .iter()
        .map(|s| urlencoding::encode(s.as_ref()).into_owned())
        .collect();
    format!("/{}", encoded.join("/"))
}

/// `?k=v&...` sorted by key, or an empty string for an empty query.
#[must_use]
pub fn join_query(query: &BTreeMap<String, String>) -> String {
    if query.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("?{}", pairs.join("&"))
}

#[must_use]
pub fn join_url<S: AsRef<str>>(segments: &[S], query: &BTreeMap<String, String>) -> String {
    format!("{}{}", join_path(segments), join_query(query))
}

/// Wrap a body so it can carry link keys: mappings pass through, `null` becomes
/// an empty mapping and anything else lands under `_value`.
#[must_use]
pub fn as_mapping(item: Value) -> Map<String, Value> {
    match item {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert(VALUE_KEY.to_owned(), other);
            map
        }
    }
}

/// Link metadata for the body at `path`.
#[must_use]
pub fn links<S: AsRef<str>>(path: &[S], params: &LinkParams) -> Vec<(&'static str, Link)> {
    let current = params.current_query();
    let parent = &path[..path.len().saturating_sub(1)];

    let mut top = current.clone();
    top.remove("page");
    top.remove("offset");

    let mut out = vec![
        (SELF, Link::new(join_url(path, &current))),
        (PARENT, Link::new(join_path(parent))),
        (TOP, Link::new(join_url(path, &top))),
    ];

    if !params.pageable {
        return out;
    }

    let with = |key: &str, value: u64| {
        let mut q = current.clone();
        q.insert(key.to_owned(), value.to_string());
        Link::new(join_url(path, &q))
    };

    if let Some(offset) = params.offset {
        let count = params
            .count
            .or(params.default_count)
            .unwrap_or(DEFAULT_COUNT);
        out.push((NEXT, with("offset", offset.saturating_add(count))));
        if offset > count {
            out.push((PREV, with("offset", offset - count)));
        }
    } else if let Some(page) = params.page {
        out.push((NEXT, with("page", page.saturating_add(1))));
        if page > 1 {
            out.push((PREV, with("page", page - 1)));
        }
    }
    out
}

/// Merge link metadata into `item`; existing keys are left untouched.
#[must_use]
pub fn hateoas<S: AsRef<str>>(path: &[S], item: Value, params: &LinkParams) -> Map<String, Value> {
    let mut body = as_mapping(item);
    for (key, link) in links(path, params) {
        body.entry(key).or_insert_with(|| link.to_value());
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn href(body: &Map<String, Value>, key: &str) -> Option<String> {
        body.get(key)
            .and_then(|l| l.get("href"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    const HW: [&str; 2] = ["hello", "world"];

    #[test]
    fn plain_body_gets_self_parent_top() {
        let body = hateoas(&HW, json!({"foo": "bar"}), &LinkParams::default());
        assert_eq!(body["foo"], "bar");
        assert_eq!(href(&body, SELF).as_deref(), Some("/hello/world"));
        assert_eq!(href(&body, PARENT).as_deref(), Some("/hello"));
        assert_eq!(href(&body, TOP).as_deref(), Some("/hello/world"));
        assert!(!body.contains_key(NEXT));
        assert!(!body.contains_key(PREV));
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn two_segment_path_with_mapping() {
        let body = hateoas(&["a", "b"], json!({"x": 1}), &LinkParams::default());
        assert_eq!(href(&body, SELF).as_deref(), Some("/a/b"));
        assert_eq!(href(&body, PARENT).as_deref(), Some("/a"));
        assert_eq!(href(&body, TOP).as_deref(), Some("/a/b"));
    }

    #[test]
    fn page_links() {
        let params = LinkParams::default().pageable(true).with_page(2);
        let body = hateoas(&HW, json!({"foo": "bar"}), &params);
        assert_eq!(href(&body, SELF).as_deref(), Some("/hello/world?page=2"));
        assert_eq!(href(&body, NEXT).as_deref(), Some("/hello/world?page=3"));
        assert_eq!(href(&body, PREV).as_deref(), Some("/hello/world?page=1"));
        assert_eq!(href(&body, TOP).as_deref(), Some("/hello/world"));
    }

    #[test]
    fn first_page_has_no_prev() {
        let params = LinkParams::default().pageable(true).with_page(1);
        let body = hateoas(&HW, Value::Null, &params);
        assert_eq!(href(&body, NEXT).as_deref(), Some("/hello/world?page=2"));
        assert!(!body.contains_key(PREV));
    }

    #[test]
    fn offset_links() {
        let params = LinkParams::default()
            .pageable(true)
            .with_offset(30)
            .with_count(10);
        let body = hateoas(&HW, Value::Null, &params);
        assert_eq!(href(&body, SELF).as_deref(), Some("/hello/world?count=10&offset=30"));
        assert_eq!(href(&body, NEXT).as_deref(), Some("/hello/world?count=10&offset=40"));
        assert_eq!(href(&body, PREV).as_deref(), Some("/hello/world?count=10&offset=20"));
        assert_eq!(href(&body, TOP).as_deref(), Some("/hello/world?count=10"));
    }

    #[test]
    fn small_offset_has_no_prev() {
        let params = LinkParams::default()
            .pageable(true)
            .with_offset(5)
            .with_count(10);
        let body = hateoas(&HW, Value::Null, &params);
        assert_eq!(href(&body, NEXT).as_deref(), Some("/hello/world?count=10&offset=15"));
        assert!(!body.contains_key(PREV));
    }

    #[test]
    fn offset_without_count_steps_by_default() {
        let params = LinkParams::default().pageable(true).with_offset(0);
        let body = hateoas(&HW, Value::Null, &params);
        assert_eq!(href(&body, NEXT).as_deref(), Some("/hello/world?offset=20"));

        let params = params.with_default_count(5);
        let body = hateoas(&HW, Value::Null, &params);
        assert_eq!(href(&body, NEXT).as_deref(), Some("/hello/world?offset=5"));
    }

    #[test]
    fn not_pageable_ignores_paging() {
        let params = LinkParams::default().with_page(4);
        let body = hateoas(&HW, Value::Null, &params);
        assert!(!body.contains_key(NEXT));
        assert!(!body.contains_key(PREV));
    }

    #[test]
    fn scalars_are_wrapped() {
        for item in [json!(""), json!(true), json!("bar"), json!(["bar"])] {
            let body = hateoas(&HW, item.clone(), &LinkParams::default());
            assert_eq!(body[VALUE_KEY], item);
        }
        let body = hateoas(&HW, Value::Null, &LinkParams::default());
        assert!(!body.contains_key(VALUE_KEY));
    }

    #[test]
    fn existing_keys_win() {
        let body = hateoas(&HW, json!({"_self": "mine"}), &LinkParams::default());
        assert_eq!(body[SELF], "mine");
    }

    #[test]
    fn carried_query_is_kept_but_paging_is_replaced() {
        let query: BTreeMap<String, String> = [
            ("where", "color:red"),
            ("offset", "99"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        let params = LinkParams::default().carrying(&query).with_offset(10);
        let body = hateoas(&HW, Value::Null, &params);
        assert_eq!(
            href(&body, SELF).as_deref(),
            Some("/hello/world?offset=10&where=color%3Ared")
        );
        assert_eq!(href(&body, TOP).as_deref(), Some("/hello/world?where=color%3Ared"));
    }

    #[test]
    fn root_links() {
        let body = hateoas::<&str>(&[], Value::Null, &LinkParams::default());
        assert_eq!(href(&body, SELF).as_deref(), Some("/"));
        assert_eq!(href(&body, PARENT).as_deref(), Some("/"));
    }

    #[test]
    fn path_segments_are_encoded() {
        assert_eq!(join_path(&["a b", "c/d"]), "/a%20b/c%2Fd");
        assert_eq!(join_path::<&str>(&[]), "/");
    }

    #[test]
    fn query_is_sorted_and_encoded() {
        let query: BTreeMap<String, String> = [("b", "2"), ("a", "x y")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        assert_eq!(join_query(&query), "?a=x%20y&b=2");
        assert_eq!(join_query(&BTreeMap::new()), "");
    }
}
