use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use std::time::Duration;

const POSTCODES_URL: &str = "https://api.postcodes.io/postcodes";
const USER_AGENT: &str = "parkmap/0.1.0 (https://github.com/parkmap/parkmap)";

/// Geocoding failure surfaced to the caller. The caller decides whether
/// to show it to the user; there is no retry.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("failed to reach postcode lookup service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("postcode not found or service unreachable (status {0})")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Deserialize)]
struct PostcodesResponse {
    result: PostcodeResult,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    latitude: f64,
    longitude: f64,
}

/// Geocode a UK postcode to latitude/longitude coordinates.
///
/// Uses the postcodes.io lookup API. The postcode is assumed to have
/// passed [`crate::postcode::validate_postcode`] already; an unknown
/// postcode comes back as a 404 and maps to [`GeocodeError::Status`].
pub fn geocode_postcode(postcode: &str) -> Result<(f64, f64), GeocodeError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()?;

    let encoded = utf8_percent_encode(postcode, NON_ALPHANUMERIC);
    let url = format!("{}/{}", POSTCODES_URL, encoded);

    let response = client.get(&url).send()?;

    if !response.status().is_success() {
        return Err(GeocodeError::Status(response.status()));
    }

    let parsed: PostcodesResponse = response.json()?;
    Ok((parsed.result.latitude, parsed.result.longitude))
}
