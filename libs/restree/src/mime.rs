//! Media-type patterns for `Accept` negotiation and declared `Content-Type`
//!
//! Parsing never fails: missing parts degrade to the `*` wildcard and parameters
//! without `=` get an empty value. Matching is one-directional, the pattern side
//! constrains the candidate.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub const WILDCARD: &str = "*";
pub const CHARSET: &str = "charset";

#[derive(Debug, Clone)]
pub struct MimeType {
    major: String,
    minor: String,
    // unique keys, declaration order kept for rendering
    props: Vec<(String, String)>,
}

impl MimeType {
    #[must_use]
    pub fn new(major: impl Into<String>, minor: impl Into<String>) -> Self {
        let major = major.into();
        let minor = minor.into();
        Self {
            major: if major.is_empty() { WILDCARD.to_owned() } else { major },
            minor: if minor.is_empty() { WILDCARD.to_owned() } else { minor },
            props: Vec::new(),
        }
    }

    /// `*/*`
    #[must_use]
    pub fn any() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }

    /// Set a parameter, replacing an existing value in place.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_prop(key.into(), value.into());
        self
    }

    fn set_prop(&mut self, key: String, value: String) {
        match self.props.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.props.push((key, value)),
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        let mut parts = s.trim().split(';');
        let base = parts.next().map(str::trim).unwrap_or_default();
        let (major, minor) = base.split_once('/').unwrap_or((base, ""));
        let mut mime = Self::new(major.trim(), minor.trim());
        for part in parts {
            if part.trim().is_empty() {
                continue;
            }
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            mime.set_prop(k.trim().to_owned(), v.trim().to_owned());
        }
        mime
    }

    #[must_use]
    pub fn major(&self) -> &str {
        &self.major
    }

    #[must_use]
    pub fn minor(&self) -> &str {
        &self.minor
    }

    #[must_use]
    pub fn prop(&self, key: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn props(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Accept-list quality, 1.0 when absent and 0.0 when unparsable.
    #[must_use]
    pub fn q(&self) -> f32 {
        self.prop("q")
            .map_or(1.0, |q| q.parse::<f32>().unwrap_or(0.0))
    }

    /// Whether `candidate` satisfies this pattern.
    ///
    /// Major and minor must be equal unless the pattern side is `*`. For each key
    /// in `compared_props` that this pattern defines, the candidate must carry the
    /// same value. Other parameters are ignored.
    #[must_use]
    pub fn matches(&self, candidate: &MimeType, compared_props: &[&str]) -> bool {
        if self.major != WILDCARD && self.major != candidate.major {
            return false;
        }
        if self.minor != WILDCARD && self.minor != candidate.minor {
            return false;
        }
        compared_props.iter().all(|key| match self.prop(key) {
            Some(wanted) => candidate.prop(key) == Some(wanted),
            None => true,
        })
    }

    /// Copy without the `q` parameter, as sent back in `Content-Type`.
    #[must_use]
    pub fn without_q(&self) -> Self {
        let mut out = self.clone();
        out.props.retain(|(k, _)| k != "q");
        out
    }
}

impl PartialEq for MimeType {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.props.len() == other.props.len()
            && self.props().all(|(k, v)| other.prop(k) == Some(v))
    }
}

impl Eq for MimeType {}

impl Default for MimeType {
    fn default() -> Self {
        Self::any()
    }
}

impl FromStr for MimeType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.major, self.minor)?;
        for (k, v) in &self.props {
            write!(f, ";{k}={v}")?;
        }
        Ok(())
    }
}

/// Parse an `Accept` header, most preferred first (stable on equal `q`).
#[must_use]
pub fn parse_accept(header: &str) -> Vec<MimeType> {
    let mut items: Vec<MimeType> = header
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(MimeType::parse)
        .collect();
    items.sort_by(|a, b| b.q().total_cmp(&a.q()));
    if items.is_empty() {
        items.push(MimeType::any());
    }
    items
}
