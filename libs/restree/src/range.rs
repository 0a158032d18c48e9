//! `Range` / `Content-Range` header handling
//!
//! Only a single `bytes=<start>-<end>` range is understood. The header's end is
//! inclusive; internally ranges are half-open.

use restree_errors::RestError;

use crate::resource::ByteRange;

const BYTES_UNIT: &str = "bytes";

/// Parse a `Range` header value. An omitted end means "to the end of the body".
///
/// # Errors
/// Returns a malformed error for any other unit or syntax.
pub fn parse_range(header: &str) -> Result<ByteRange, RestError> {
    let malformed = || RestError::malformed(format!("unsupported range: {header}"));

    let (unit, ranges) = header.trim().split_once('=').ok_or_else(malformed)?;
    if unit.trim() != BYTES_UNIT {
        return Err(malformed());
    }
    let (start, end) = ranges.trim().split_once('-').ok_or_else(malformed)?;
    let start: u64 = start.trim().parse().map_err(|_| malformed())?;
    let end = match end.trim() {
        "" => u64::MAX,
        last => {
            let last: u64 = last.parse().map_err(|_| malformed())?;
            if last < start {
                return Err(malformed());
            }
            last.saturating_add(1)
        }
    };
    Ok(ByteRange::new(start, end))
}

/// `Content-Range` value for a served half-open range.
#[must_use]
pub fn content_range(range: ByteRange, total: u64) -> String {
    format!(
        "{BYTES_UNIT} {}-{}/{total}",
        range.start,
        range.end.saturating_sub(1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_end_becomes_exclusive() {
        assert_eq!(parse_range("bytes=0-2").unwrap(), ByteRange::new(0, 3));
        assert_eq!(parse_range(" bytes = 4 - 4 ").unwrap(), ByteRange::new(4, 5));
    }

    #[test]
    fn open_end() {
        assert_eq!(parse_range("bytes=3-").unwrap(), ByteRange::new(3, u64::MAX));
    }

    #[test]
    fn malformed_ranges() {
        for bad in ["", "bytes", "items=0-2", "bytes=a-2", "bytes=-5", "bytes=5-2", "bytes=0-x"] {
            assert!(parse_range(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn content_range_uses_inclusive_end() {
        assert_eq!(content_range(ByteRange::new(0, 3), 5), "bytes 0-2/5");
    }
}
