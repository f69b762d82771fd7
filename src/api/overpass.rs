use crate::config::OverpassConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const USER_AGENT: &str = "parkmap/0.1.0 (https://github.com/parkmap/parkmap)";

/// Tag keys whose presence marks a way as street parking. Any one of
/// them triggers street classification downstream.
pub const STREET_PARKING_KEYS: [&str; 8] = [
    "parking:lane",
    "parking:lane:both",
    "parking:lane:right",
    "parking:lane:left",
    "parking:condition",
    "parking:lane:both:parallel",
    "parking:lane:both:diagonal",
    "parking:lane:both:perpendicular",
];

/// Parking data fetch failure. Callers may degrade to an empty facility
/// list instead of surfacing this.
#[derive(Debug, thiserror::Error)]
pub enum ParkingFetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Overpass API returned error status: {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to parse Overpass JSON response: {0}")]
    Parse(#[source] reqwest::Error),

    #[error("Overpass API failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// A single element from Overpass (node, way or relation)
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: u64,
    /// Resolved way geometry, present because the query asks for `geom`
    #[serde(default)]
    pub geometry: Option<Vec<GeomPoint>>,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// A point of resolved way geometry
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeomPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Build the Overpass QL query for parking around a center point.
///
/// Selects dedicated parking amenities (ways and relations) plus ways
/// carrying any street-parking tag key, all within `radius_m` meters.
/// `out body geom` resolves way geometry inline so no separate node
/// lookup pass is needed.
fn build_parking_query(center: (f64, f64), radius_m: u32) -> String {
    let (lat, lon) = center;

    let mut query = String::from("[out:json][timeout:25];\n(\n");
    query.push_str(&format!(
        "  way[\"amenity\"=\"parking\"](around:{radius_m},{lat},{lon});\n"
    ));
    query.push_str(&format!(
        "  relation[\"amenity\"=\"parking\"](around:{radius_m},{lat},{lon});\n"
    ));
    for key in STREET_PARKING_KEYS {
        query.push_str(&format!(
            "  way[\"{key}\"](around:{radius_m},{lat},{lon});\n"
        ));
    }
    query.push_str(");\nout body geom;");
    query
}

/// Fetch parking elements around a center point from the Overpass API.
///
/// Returns the raw element list unfiltered; classification is the
/// interpreter's job. Retries 429/504 and transport failures across the
/// configured mirror list.
pub fn fetch_parking(
    center: (f64, f64),
    radius_m: u32,
    config: &OverpassConfig,
) -> Result<OverpassResponse, ParkingFetchError> {
    let query = build_parking_query(center, radius_m);
    execute_overpass_query(&query, config)
}

fn execute_overpass_query(
    query: &str,
    config: &OverpassConfig,
) -> Result<OverpassResponse, ParkingFetchError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(ParkingFetchError::Client)?;

    let mut last_error = String::from("no mirrors configured");

    for attempt in 0..config.max_retries {
        if attempt > 0 {
            // Overpass recommends waiting when overloaded
            let wait_secs = 10 * attempt as u64;
            eprintln!(
                "Overpass API busy, retrying in {} seconds (attempt {}/{})",
                wait_secs,
                attempt + 1,
                config.max_retries
            );
            std::thread::sleep(Duration::from_secs(wait_secs));
        }

        // Rotate through the mirror list across attempts
        let url = match config.urls.get(attempt as usize % config.urls.len().max(1)) {
            Some(u) => u,
            None => break,
        };

        // Overpass expects form-encoded POST data: data=<query>
        let response = match client.post(url).form(&[("data", query)]).send() {
            Ok(r) => r,
            Err(e) => {
                last_error = format!("{}: {}", url, e);
                continue;
            }
        };

        match response.status().as_u16() {
            200 => {
                return response.json().map_err(ParkingFetchError::Parse);
            }
            429 | 504 => {
                // Too Many Requests / Gateway Timeout are retriable
                last_error = format!("{} returned status {}", url, response.status());
                continue;
            }
            _ => {
                return Err(ParkingFetchError::Status(response.status()));
            }
        }
    }

    Err(ParkingFetchError::Exhausted {
        attempts: config.max_retries,
        last: last_error,
    })
}
