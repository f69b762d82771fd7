use serde::Serialize;

/// Parking facility classification based on the OSM `parking` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParkingCategory {
    Surface,
    Underground,
    MultiStorey,
    Street,
    Unknown,
}

impl ParkingCategory {
    /// Classify a `parking` tag value into a category.
    ///
    /// Unrecognized values map to `Unknown`; the absent-tag default is
    /// decided at the call site, not here.
    pub fn from_parking_tag(tag: &str) -> ParkingCategory {
        match tag {
            "underground" => ParkingCategory::Underground,
            "multi-storey" => ParkingCategory::MultiStorey,
            "surface" => ParkingCategory::Surface,
            "street" => ParkingCategory::Street,
            _ => ParkingCategory::Unknown,
        }
    }

    /// Capitalized label for popups and the terminal summary
    pub fn label(&self) -> &'static str {
        match self {
            ParkingCategory::Surface => "Surface",
            ParkingCategory::Underground => "Underground",
            ParkingCategory::MultiStorey => "Multi-storey",
            ParkingCategory::Street => "Street",
            ParkingCategory::Unknown => "Unknown",
        }
    }
}

/// A typed parking facility ready for rendering.
///
/// Created fresh per query and discarded with the result set. Street
/// facilities are synthesized from sampled points along a tagged way;
/// their ids are `element_id * 1000 + sample_index`, which stays unique
/// as long as a way yields fewer than 1000 samples (the sampling policy
/// yields at most 3).
#[derive(Debug, Clone, Serialize)]
pub struct ParkingFacility {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    pub category: ParkingCategory,
    pub restrictions: Vec<String>,
}
