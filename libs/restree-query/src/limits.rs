//! Input limits for listing queries
//!
//! Caps applied before a query reaches a resource:
//! - Maximum `count` value
//! - Maximum number of `where` filters
//! - Maximum number of `order` keys

use serde::{Deserialize, Serialize};

use crate::{ChildQuery, Error};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    /// Maximum value for `count` (default: 1000)
    pub max_count: u64,
    /// Maximum number of filters in `where` (default: 16)
    pub max_filters: usize,
    /// Maximum number of keys in `order` (default: 8)
    pub max_order_keys: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_count: 1000,
            max_filters: 16,
            max_order_keys: 8,
        }
    }
}

impl QueryLimits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_count(mut self, max: u64) -> Self {
        self.max_count = max;
        self
    }

    #[must_use]
    pub fn with_max_filters(mut self, max: usize) -> Self {
        self.max_filters = max;
        self
    }

    #[must_use]
    pub fn with_max_order_keys(mut self, max: usize) -> Self {
        self.max_order_keys = max;
        self
    }

    /// # Errors
    /// Returns `Error::LimitExceeded` naming the first parameter over its cap.
    pub fn validate(&self, query: &ChildQuery) -> Result<(), Error> {
        if query.count.is_some_and(|c| c > self.max_count) {
            return Err(Error::LimitExceeded {
                param: "count",
                limit: self.max_count,
            });
        }
        if query.filters.len() > self.max_filters {
            return Err(Error::LimitExceeded {
                param: "where",
                limit: self.max_filters as u64,
            });
        }
        if query.order.len() > self.max_order_keys {
            return Err(Error::LimitExceeded {
                param: "order",
                limit: self.max_order_keys as u64,
            });
        }
        Ok(())
    }
}
