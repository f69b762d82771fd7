use crate::domain::ParkingFacility;
use crate::map::style::marker_style;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Per-marker data embedded into the page as JSON. Icon and popup
/// markup are rendered on this side so the page script stays a dumb
/// loop.
#[derive(Debug, Serialize)]
struct MarkerData {
    lat: f64,
    lon: f64,
    size: u32,
    icon_html: String,
    popup_html: String,
}

/// Render a standalone interactive map page for a facility result set.
///
/// The page loads Leaflet from a CDN, centers on the geocoded
/// coordinate at zoom 15, draws the default center marker plus a
/// translucent search-radius circle, and adds one styled marker with a
/// popup per facility. All facility text is HTML-escaped before
/// embedding.
pub fn render_map(center: (f64, f64), radius_m: u32, facilities: &[ParkingFacility]) -> String {
    let (lat, lon) = center;

    let markers: Vec<MarkerData> = facilities
        .iter()
        .map(|f| {
            let style = marker_style(f.category);
            MarkerData {
                lat: f.lat,
                lon: f.lon,
                size: style.size_px,
                icon_html: icon_html(f),
                popup_html: popup_html(f),
            }
        })
        .collect();

    // Escaped facility text cannot re-introduce "</script>" into the page
    let markers_json = serde_json::to_string(&markers).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>parkmap</title>
<link rel="stylesheet" href="{LEAFLET_CSS}">
<style>
  html, body {{ height: 100%; margin: 0; }}
  #map {{ height: 100%; }}
  .parking-marker div {{
    border-radius: 50%;
    display: flex;
    align-items: center;
    justify-content: center;
    color: white;
    font-weight: bold;
    box-shadow: 0 2px 4px rgba(0,0,0,0.2);
  }}
  .popup h3 {{ margin: 0 0 4px 0; }}
  .popup p {{ margin: 2px 0; font-size: 13px; }}
  .popup ul {{ margin: 2px 0; padding-left: 18px; font-size: 13px; }}
</style>
</head>
<body>
<div id="map"></div>
<script src="{LEAFLET_JS}"></script>
<script>
var markers = {markers_json};
var map = L.map('map').setView([{lat}, {lon}], 15);
L.tileLayer('{TILE_URL}', {{ attribution: '{TILE_ATTRIBUTION}' }}).addTo(map);
L.marker([{lat}, {lon}]).addTo(map);
L.circle([{lat}, {lon}], {{
  radius: {radius_m},
  color: '#3B82F6',
  fillColor: '#3B82F6',
  fillOpacity: 0.1
}}).addTo(map);
markers.forEach(function (m) {{
  var icon = L.divIcon({{
    className: 'parking-marker',
    html: m.icon_html,
    iconSize: [m.size, m.size],
    iconAnchor: [m.size / 2, m.size / 2]
  }});
  L.marker([m.lat, m.lon], {{ icon: icon }}).addTo(map).bindPopup(m.popup_html);
}});
</script>
</body>
</html>
"#
    )
}

fn icon_html(facility: &ParkingFacility) -> String {
    let style = marker_style(facility.category);
    let font_px = if style.size_px < 32 { 12 } else { 14 };
    format!(
        "<div style=\"background-color:{};width:{}px;height:{}px;font-size:{}px;\">{}</div>",
        style.color, style.size_px, style.size_px, font_px, style.glyph
    )
}

fn popup_html(facility: &ParkingFacility) -> String {
    let mut popup = String::from("<div class=\"popup\">");
    popup.push_str(&format!("<h3>{}</h3>", escape_html(&facility.name)));
    popup.push_str(&format!("<p>Type: {}</p>", facility.category.label()));

    if let Some(capacity) = facility.capacity {
        popup.push_str(&format!("<p>Capacity: {} spaces</p>", capacity));
    }

    if !facility.restrictions.is_empty() {
        popup.push_str("<p><b>Restrictions:</b></p><ul>");
        for restriction in &facility.restrictions {
            popup.push_str(&format!("<li>{}</li>", escape_html(restriction)));
        }
        popup.push_str("</ul>");
    }

    popup.push_str("</div>");
    popup
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Write the rendered map page to disk.
pub fn write_map(path: &Path, html: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create map file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html.as_bytes())?;
    writer.flush()?;
    Ok(())
}
