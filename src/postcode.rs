use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // UK postcode shape: 1-2 letters, digit, optional alphanumeric,
    // optional space, digit, 2 letters.
    static ref POSTCODE_REGEX: Regex =
        Regex::new(r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}$").unwrap();
}

/// Check whether a string matches the UK postcode grammar.
///
/// Case-insensitive, pure. Returns `false` for anything that does not
/// match; there is no other failure mode.
pub fn validate_postcode(postcode: &str) -> bool {
    POSTCODE_REGEX.is_match(postcode)
}
