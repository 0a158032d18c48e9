#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Listing queries for restree collections
//!
//! A [`ChildQuery`] carries what a collection resource needs to produce one page
//! of children: offset, count, `where` filters and `order` keys. Resources that
//! hold their children in memory can hand the whole listing to
//! [`ChildQuery::apply`]; others translate the query to their own backend.

pub mod error_mapping;
pub mod filter;
pub mod limits;
pub mod order;
pub mod page;

use std::collections::BTreeMap;

use serde_json::Value;

pub use filter::{Filter, FilterOp, parse_where, value_text};
pub use limits::QueryLimits;
pub use order::{Ordering, SortDir, compare_values, parse_order, sort_by_orderings};
pub use page::{DEFAULT_COUNT, Paging};

/// Synthetic key naming a child by its name rather than a property.
pub const NAME_KEY: &str = "_name";
/// Order key that reads the `name` property, falling back to the child name.
pub const NAME_PROP: &str = "name";
/// Synthetic key under which scalar bodies are exposed.
pub const VALUE_KEY: &str = "_value";

/// Unified error type for query parsing and validation.
///
/// All variants surface as 400 Malformed Input (see `error_mapping`).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid '{param}' parameter: {value}")]
    InvalidInteger { param: &'static str, value: String },

    #[error("invalid where clause: {0}")]
    InvalidFilter(String),

    #[error("invalid order token: {0}")]
    InvalidOrder(String),

    #[error("'{param}' exceeds the limit of {limit}")]
    LimitExceeded { param: &'static str, limit: u64 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct ChildQuery {
    pub offset: Option<u64>,
    pub count: Option<u64>,
    pub filters: Vec<Filter>,
    pub order: Vec<Ordering>,
}

impl ChildQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the request query and its normalized paging.
    ///
    /// # Errors
    /// Returns `Error::InvalidFilter` / `Error::InvalidOrder` for bad `where` / `order`.
    pub fn from_query(query: &BTreeMap<String, String>, paging: &Paging) -> Result<Self, Error> {
        let filters = query
            .get("where")
            .map(|raw| parse_where(raw))
            .transpose()?
            .unwrap_or_default();
        let order = query
            .get("order")
            .map(|raw| parse_order(raw))
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            offset: paging.offset,
            count: paging.count,
            filters,
            order,
        })
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_order(mut self, ordering: Ordering) -> Self {
        self.order.push(ordering);
        self
    }

    /// Whether a child view passes every filter.
    #[must_use]
    pub fn accepts(&self, view: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(view))
    }

    /// Filter, order and slice an in-memory listing.
    ///
    /// `view` yields the JSON value filters and orderings look at.
    #[must_use]
    pub fn apply<T>(&self, items: Vec<(String, T)>, view: impl Fn(&T) -> Value) -> Vec<(String, T)> {
        let mut rows: Vec<(String, (T, Value))> = items
            .into_iter()
            .filter_map(|(name, item)| {
                let v = view(&item);
                self.accepts(&v).then_some((name, (item, v)))
            })
            .collect();

        sort_by_orderings(&mut rows, &self.order, |(_, v)| v);

        let skip = self
            .offset
            .map_or(0, |o| usize::try_from(o).unwrap_or(usize::MAX));
        let take = self
            .count
            .map_or(usize::MAX, |c| usize::try_from(c).unwrap_or(usize::MAX));

        rows.into_iter()
            .skip(skip)
            .take(take)
            .map(|(name, (item, _))| (name, item))
            .collect()
    }
}
