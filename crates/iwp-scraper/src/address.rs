//! Decomposition of detail-page address text into [`AddressInfo`].
//!
//! The site renders US addresses as
//! `street[, street2[, street3]], city, <zip> <state>, United States`,
//! with the zipcode *before* the state. Segments are counted from the end:
//! country is last, zipcode/state second to last, city third to last, and
//! up to three leading segments are street lines.

use iwp_core::{AddressInfo, StructuredAddress};

/// Marker that selects the US decomposition.
pub const US_COUNTRY: &str = "United States";

const SEPARATOR: &str = ", ";

/// Parses raw address text from an incident detail page.
///
/// Text that does not mention [`US_COUNTRY`] is returned unchanged as
/// [`AddressInfo::Unstructured`]. Short or malformed US addresses never fail;
/// components that cannot be located are left empty.
#[must_use]
pub fn parse_address(raw: &str) -> AddressInfo {
    if !raw.contains(US_COUNTRY) {
        return AddressInfo::Unstructured {
            raw: raw.to_owned(),
        };
    }

    let segments: Vec<&str> = raw.split(',').map(str::trim).collect();
    let n = segments.len();

    let country = from_end(&segments, 1).to_owned();
    let (zipcode, state) = split_zip_state(from_end(&segments, 2));
    let city = from_end(&segments, 3).to_owned();

    // Street lines only exist once country, zip/state and city are accounted for.
    let street_line = |i: usize| -> String {
        if n >= i + 4 {
            segments[i].to_owned()
        } else {
            String::new()
        }
    };
    let street = street_line(0);
    let street2 = street_line(1);
    let street3 = street_line(2);

    let standardized = standardize(
        &[
            street.as_str(),
            street2.as_str(),
            street3.as_str(),
            city.as_str(),
        ],
        &state,
        &zipcode,
        &country,
    );

    AddressInfo::Structured(StructuredAddress {
        raw: raw.to_owned(),
        standardized,
        street,
        street2,
        street3,
        city,
        state,
        zipcode,
        country,
    })
}

/// Segment `back` positions from the end, or `""` when the address is too short.
fn from_end<'a>(segments: &[&'a str], back: usize) -> &'a str {
    segments
        .len()
        .checked_sub(back)
        .and_then(|i| segments.get(i))
        .copied()
        .unwrap_or_default()
}

/// Splits `"32765 Florida"` into `("32765", "Florida")` at the first space.
///
/// A segment without a space is a bare zipcode when it is all digits and a
/// bare state otherwise.
fn split_zip_state(segment: &str) -> (String, String) {
    match segment.split_once(' ') {
        Some((zip, state)) => (zip.trim().to_owned(), state.trim().to_owned()),
        None if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) => {
            (segment.to_owned(), String::new())
        }
        None => (String::new(), segment.to_owned()),
    }
}

/// Rebuilds the address with the zipcode following the state.
fn standardize(lines: &[&str], state: &str, zipcode: &str, country: &str) -> String {
    let state_zip = [state, zipcode]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    lines
        .iter()
        .copied()
        .chain([state_zip.as_str(), country])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

#[cfg(test)]
#[path = "address_test.rs"]
mod tests;
