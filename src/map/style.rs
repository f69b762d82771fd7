use crate::domain::ParkingCategory;

/// Visual descriptor for a facility marker. Street markers are smaller
/// and use the parking-sign glyph so sampled points read as a row of
/// lightweight pins rather than full facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    /// CSS hex color for the marker disc
    pub color: &'static str,
    /// Glyph shown inside the disc
    pub glyph: &'static str,
    /// Disc diameter in pixels
    pub size_px: u32,
}

/// Map a parking category to its marker style.
///
/// Pure function, constructed per render call; there is no shared icon
/// state.
pub fn marker_style(category: ParkingCategory) -> MarkerStyle {
    let color = match category {
        ParkingCategory::Underground => "#4C51BF",
        ParkingCategory::MultiStorey => "#2B6CB0",
        ParkingCategory::Surface => "#2F855A",
        ParkingCategory::Street => "#D97706",
        ParkingCategory::Unknown => "#4A5568",
    };

    if category == ParkingCategory::Street {
        MarkerStyle {
            color,
            glyph: "🅿️",
            size_px: 24,
        }
    } else {
        MarkerStyle {
            color,
            glyph: "P",
            size_px: 32,
        }
    }
}
