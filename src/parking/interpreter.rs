use crate::api::overpass::{Element, GeomPoint, OverpassResponse, STREET_PARKING_KEYS};
use crate::domain::{ParkingCategory, ParkingFacility};
use std::collections::HashMap;

type Tags = HashMap<String, String>;

/// Interpret raw Overpass elements into parking facilities.
///
/// Only way elements with resolved geometry contribute; nodes and
/// relations are skipped. Street-parking ways are sampled into multiple
/// point facilities, dedicated parking areas become a single facility at
/// their geometry midpoint. Noisy or missing tags never fail this pass;
/// every field falls back to a documented default so partial data still
/// renders.
pub fn interpret_parking(response: &OverpassResponse) -> Vec<ParkingFacility> {
    let mut facilities = Vec::new();

    for element in &response.elements {
        if element.type_ != "way" {
            continue;
        }

        let geometry = match &element.geometry {
            Some(g) if !g.is_empty() => g,
            _ => continue,
        };

        let empty_tags = Tags::new();
        let tags = element.tags.as_ref().unwrap_or(&empty_tags);

        // Street classification is checked first and wins over the
        // amenity-based path
        if is_street_parking(tags) {
            facilities.extend(sample_street_facilities(element, geometry, tags));
        } else {
            facilities.push(area_facility(element, geometry, tags));
        }
    }

    facilities
}

/// A way is street parking iff it carries any street-parking tag key.
/// Set membership, not a hierarchy.
fn is_street_parking(tags: &Tags) -> bool {
    STREET_PARKING_KEYS.iter().any(|key| tags.contains_key(*key))
}

/// Emit one facility per sampled geometry point along a street.
///
/// `interval = max(1, len / 3)` targets roughly 3 markers per segment,
/// fewer for very short ways, never zero for non-empty geometry. Sampled
/// ids are `way_id * 1000 + index`, unique within the way for any
/// sample count below 1000.
fn sample_street_facilities(
    element: &Element,
    geometry: &[GeomPoint],
    tags: &Tags,
) -> Vec<ParkingFacility> {
    let interval = (geometry.len() / 3).max(1);

    geometry
        .iter()
        .enumerate()
        .step_by(interval)
        .map(|(i, point)| ParkingFacility {
            id: element.id * 1000 + i as u64,
            lat: point.lat,
            lon: point.lon,
            name: facility_name(tags, true),
            capacity: None,
            category: ParkingCategory::Street,
            restrictions: extract_restrictions(tags),
        })
        .collect()
}

/// A dedicated parking area becomes one facility at the midpoint of its
/// geometry sequence (an approximation, not a centroid).
fn area_facility(element: &Element, geometry: &[GeomPoint], tags: &Tags) -> ParkingFacility {
    let midpoint = geometry[geometry.len() / 2];

    // Absent `parking` tag defaults to surface here; unrecognized
    // explicit values still classify as unknown
    let category = tags
        .get("parking")
        .map(|value| ParkingCategory::from_parking_tag(value))
        .unwrap_or(ParkingCategory::Surface);

    ParkingFacility {
        id: element.id,
        lat: midpoint.lat,
        lon: midpoint.lon,
        name: facility_name(tags, false),
        capacity: tags.get("capacity").and_then(|c| c.parse().ok()),
        category,
        restrictions: extract_restrictions(tags),
    }
}

/// Display name: explicit `name` tag when present, a synthesized
/// street label for street parking, "Parking Space" otherwise.
fn facility_name(tags: &Tags, is_street: bool) -> String {
    if let Some(name) = tags.get("name") {
        return name.clone();
    }

    if is_street {
        let street = tags
            .get("addr:street")
            .or_else(|| tags.get("highway"))
            .map(String::as_str)
            .unwrap_or("Street");
        return format!("{} ({} parking)", street, arrangement(tags));
    }

    "Parking Space".to_string()
}

fn arrangement(tags: &Tags) -> &'static str {
    if tags.contains_key("parking:lane:both:parallel") {
        "Parallel"
    } else if tags.contains_key("parking:lane:both:diagonal") {
        "Diagonal"
    } else if tags.contains_key("parking:lane:both:perpendicular") {
        "Perpendicular"
    } else {
        "Street"
    }
}

/// Collect human-readable restrictions in a fixed order. Absent tags
/// are omitted; the order is preserved for display stability.
fn extract_restrictions(tags: &Tags) -> Vec<String> {
    let mut restrictions = Vec::new();

    if let Some(condition) = tags.get("parking:condition") {
        restrictions.push(condition.clone());
    }
    if let Some(maxstay) = tags.get("parking:maxstay") {
        restrictions.push(format!("Max stay: {}", maxstay));
    }
    if tags.get("parking:fee").map(String::as_str) == Some("yes") {
        restrictions.push("Paid parking".to_string());
    }
    if let Some(maxstay) = tags.get("parking:lane:both:maxstay") {
        restrictions.push(format!("Max stay: {}", maxstay));
    }
    if let Some(restriction) = tags.get("parking:lane:both:restriction") {
        restrictions.push(restriction.clone());
    }

    restrictions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn way(id: u64, points: &[(f64, f64)], tags: &[(&str, &str)]) -> Element {
        Element {
            type_: "way".to_string(),
            id,
            geometry: Some(
                points
                    .iter()
                    .map(|&(lat, lon)| GeomPoint { lat, lon })
                    .collect(),
            ),
            tags: Some(
                tags.iter()
                    .map(|&(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            lat: None,
            lon: None,
        }
    }

    fn response(elements: Vec<Element>) -> OverpassResponse {
        OverpassResponse { elements }
    }

    #[test]
    fn test_underground_way_with_capacity() {
        let r = response(vec![way(
            10,
            &[(51.50, -0.14), (51.51, -0.15), (51.52, -0.16)],
            &[
                ("amenity", "parking"),
                ("parking", "underground"),
                ("capacity", "40"),
            ],
        )]);

        let facilities = interpret_parking(&r);
        assert_eq!(facilities.len(), 1);

        let f = &facilities[0];
        assert_eq!(f.id, 10);
        assert_eq!(f.category, ParkingCategory::Underground);
        assert_eq!(f.capacity, Some(40));
        assert_eq!(f.name, "Parking Space");
        // midpoint of 3 points is index 1
        assert_eq!(f.lat, 51.51);
        assert_eq!(f.lon, -0.15);
    }

    #[test]
    fn test_street_way_samples_three_points() {
        let points: Vec<(f64, f64)> = (0..9).map(|i| (51.50 + i as f64 * 0.001, -0.14)).collect();
        let r = response(vec![way(
            7,
            &points,
            &[
                ("highway", "residential"),
                ("parking:lane:both:parallel", "yes"),
            ],
        )]);

        let facilities = interpret_parking(&r);
        // 9 points, interval 3 -> indices 0, 3, 6
        assert_eq!(facilities.len(), 3);

        assert_eq!(facilities[0].id, 7000);
        assert_eq!(facilities[1].id, 7003);
        assert_eq!(facilities[2].id, 7006);

        assert_eq!(facilities[0].lat, points[0].0);
        assert_eq!(facilities[1].lat, points[3].0);
        assert_eq!(facilities[2].lat, points[6].0);

        for f in &facilities {
            assert_eq!(f.category, ParkingCategory::Street);
            assert_eq!(f.name, "residential (Parallel parking)");
            assert_eq!(f.capacity, None);
        }
    }

    #[test]
    fn test_short_street_samples_every_point() {
        let r = response(vec![way(
            3,
            &[(51.50, -0.14), (51.51, -0.15)],
            &[("parking:lane", "parallel")],
        )]);

        // len 2 -> interval max(1, 0) = 1, one facility per point
        let facilities = interpret_parking(&r);
        assert_eq!(facilities.len(), 2);
        assert_eq!(facilities[0].id, 3000);
        assert_eq!(facilities[1].id, 3001);
    }

    #[test]
    fn test_street_classification_wins_over_amenity() {
        let r = response(vec![way(
            5,
            &[(51.50, -0.14)],
            &[
                ("amenity", "parking"),
                ("parking", "underground"),
                ("parking:condition", "residents only"),
            ],
        )]);

        let facilities = interpret_parking(&r);
        assert_eq!(facilities.len(), 1);
        assert_eq!(facilities[0].category, ParkingCategory::Street);
    }

    #[test]
    fn test_restriction_order() {
        let r = response(vec![way(
            5,
            &[(51.50, -0.14), (51.51, -0.15)],
            &[
                ("amenity", "parking"),
                ("parking:maxstay", "2 hours"),
                ("parking:fee", "yes"),
            ],
        )]);

        let facilities = interpret_parking(&r);
        assert_eq!(
            facilities[0].restrictions,
            vec!["Max stay: 2 hours".to_string(), "Paid parking".to_string()]
        );
    }

    #[test]
    fn test_all_restrictions_keep_fixed_order() {
        let r = response(vec![way(
            5,
            &[(51.50, -0.14)],
            &[
                ("parking:condition", "disc"),
                ("parking:maxstay", "1 hour"),
                ("parking:fee", "yes"),
                ("parking:lane:both:maxstay", "30 minutes"),
                ("parking:lane:both:restriction", "no loading"),
            ],
        )]);

        let facilities = interpret_parking(&r);
        assert_eq!(
            facilities[0].restrictions,
            vec![
                "disc",
                "Max stay: 1 hour",
                "Paid parking",
                "Max stay: 30 minutes",
                "no loading"
            ]
        );
    }

    #[test]
    fn test_unrecognized_parking_value_is_unknown() {
        let r = response(vec![way(
            5,
            &[(51.50, -0.14)],
            &[("amenity", "parking"), ("parking", "rooftop")],
        )]);

        let facilities = interpret_parking(&r);
        assert_eq!(facilities[0].category, ParkingCategory::Unknown);
    }

    #[test]
    fn test_absent_parking_tag_defaults_to_surface() {
        let r = response(vec![way(5, &[(51.50, -0.14)], &[("amenity", "parking")])]);

        let facilities = interpret_parking(&r);
        assert_eq!(facilities[0].category, ParkingCategory::Surface);
    }

    #[test]
    fn test_explicit_name_tag_wins() {
        let r = response(vec![way(
            5,
            &[(51.50, -0.14)],
            &[("amenity", "parking"), ("name", "NCP Victoria")],
        )]);

        let facilities = interpret_parking(&r);
        assert_eq!(facilities[0].name, "NCP Victoria");
    }

    #[test]
    fn test_street_name_prefers_addr_street() {
        let r = response(vec![way(
            5,
            &[(51.50, -0.14)],
            &[
                ("addr:street", "Baker Street"),
                ("highway", "residential"),
                ("parking:lane:both", "parallel"),
            ],
        )]);

        let facilities = interpret_parking(&r);
        assert_eq!(facilities[0].name, "Baker Street (Street parking)");
    }

    #[test]
    fn test_unparseable_capacity_degrades_to_none() {
        let r = response(vec![way(
            5,
            &[(51.50, -0.14)],
            &[("amenity", "parking"), ("capacity", "about 40")],
        )]);

        let facilities = interpret_parking(&r);
        assert_eq!(facilities[0].capacity, None);
    }

    #[test]
    fn test_skips_nodes_and_ways_without_geometry() {
        let r = response(vec![
            Element {
                type_: "node".to_string(),
                id: 1,
                geometry: None,
                tags: None,
                lat: Some(51.5),
                lon: Some(-0.14),
            },
            Element {
                type_: "way".to_string(),
                id: 2,
                geometry: None,
                tags: Some(HashMap::from([(
                    "amenity".to_string(),
                    "parking".to_string(),
                )])),
                lat: None,
                lon: None,
            },
        ]);

        assert!(interpret_parking(&r).is_empty());
    }

    #[test]
    fn test_way_without_tags_still_renders() {
        let mut r = response(vec![way(9, &[(51.50, -0.14), (51.51, -0.15)], &[])]);
        r.elements[0].tags = None;

        let facilities = interpret_parking(&r);
        assert_eq!(facilities.len(), 1);
        assert_eq!(facilities[0].name, "Parking Space");
        assert_eq!(facilities[0].category, ParkingCategory::Surface);
        assert!(facilities[0].restrictions.is_empty());
    }
}
