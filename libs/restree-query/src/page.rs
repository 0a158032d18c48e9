use std::collections::BTreeMap;

use crate::Error;

/// Page size assumed for link arithmetic when the request names none.
pub const DEFAULT_COUNT: u64 = 20;

/// Paging parameters after normalization.
///
/// - `offset` absent with `page` and `count` present: `offset = (page - 1) * count`
/// - `offset` and `page` both absent: `page = 1`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Paging {
    pub offset: Option<u64>,
    pub page: Option<u64>,
    pub count: Option<u64>,
}

impl Paging {
    /// Read `offset`, `page` and `count` from a query map and normalize them.
    ///
    /// # Errors
    /// Returns `Error::InvalidInteger` for non-numeric values or `page=0`.
    pub fn from_query(query: &BTreeMap<String, String>) -> Result<Self, Error> {
        let offset = parse_param(query, "offset")?;
        let page = parse_param(query, "page")?;
        let count = parse_param(query, "count")?;
        Self::normalize(offset, page, count)
    }

    /// # Errors
    /// Returns `Error::InvalidInteger` when `page` is zero.
    pub fn normalize(
        offset: Option<u64>,
        page: Option<u64>,
        count: Option<u64>,
    ) -> Result<Self, Error> {
        if page == Some(0) {
            return Err(Error::InvalidInteger {
                param: "page",
                value: "0".to_owned(),
            });
        }
        let paging = match (offset, page, count) {
            (None, Some(page), Some(count)) => Self {
                offset: Some((page - 1).saturating_mul(count)),
                page: Some(page),
                count: Some(count),
            },
            (None, None, count) => Self {
                offset: None,
                page: Some(1),
                count,
            },
            (offset, page, count) => Self {
                offset,
                page,
                count,
            },
        };
        Ok(paging)
    }
}

fn parse_param(query: &BTreeMap<String, String>, param: &'static str) -> Result<Option<u64>, Error> {
    query
        .get(param)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| Error::InvalidInteger {
                param,
                value: raw.clone(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn defaults_to_first_page() {
        let p = Paging::from_query(&query(&[])).unwrap();
        assert_eq!(
            p,
            Paging {
                offset: None,
                page: Some(1),
                count: None
            }
        );
    }

    #[test]
    fn page_and_count_compute_offset() {
        let p = Paging::from_query(&query(&[("page", "3"), ("count", "10")])).unwrap();
        assert_eq!(p.offset, Some(20));
        assert_eq!(p.page, Some(3));
    }

    #[test]
    fn explicit_offset_wins() {
        let p = Paging::from_query(&query(&[("offset", "5"), ("page", "3"), ("count", "10")]))
            .unwrap();
        assert_eq!(p.offset, Some(5));
    }

    #[test]
    fn offset_alone_has_no_page() {
        let p = Paging::from_query(&query(&[("offset", "30")])).unwrap();
        assert_eq!(p.offset, Some(30));
        assert_eq!(p.page, None);
    }

    #[test]
    fn malformed_integers_are_rejected() {
        let err = Paging::from_query(&query(&[("count", "ten")])).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidInteger {
                param: "count",
                value: "ten".to_owned()
            }
        );
        assert!(Paging::from_query(&query(&[("offset", "-1")])).is_err());
        assert!(Paging::from_query(&query(&[("page", "0")])).is_err());
    }
}
