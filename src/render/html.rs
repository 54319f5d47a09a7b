use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;

use crate::domain::{IconSpec, Marker, MarkerStyle};
use crate::map::MapView;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

#[derive(Serialize)]
struct PageData<'a> {
    center: [f64; 2],
    zoom: u8,
    tiles: TileData<'a>,
    icons: IconData,
    markers: Vec<MarkerData>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileData<'a> {
    url: &'a str,
    max_zoom: u8,
    attribution: &'a str,
}

#[derive(Serialize)]
struct IconData {
    current_location: IconSpec,
    nearby_service: IconSpec,
}

#[derive(Serialize)]
struct MarkerData {
    lat: f64,
    lon: f64,
    style: MarkerStyle,
    title: String,
    /// HTML, escaped by maud
    popup: String,
    open: bool,
}

impl From<&Marker> for MarkerData {
    fn from(marker: &Marker) -> Self {
        Self {
            lat: marker.location.lat,
            lon: marker.location.lon,
            style: marker.style,
            title: marker.title.clone(),
            popup: popup_html(marker),
            open: marker.open_popup,
        }
    }
}

/// Popup body for `bindPopup`: bold heading, optional second line
fn popup_html(marker: &Marker) -> String {
    html! {
        @if let Some(detail) = &marker.popup.detail {
            strong { (marker.popup.heading) }
            br;
            (detail)
        } @else {
            (marker.popup.heading)
        }
    }
    .into_string()
}

/// Make serialized JSON safe to sit inside a `<script>` element.
///
/// `<`, `>` and `&` only ever occur inside JSON string literals, where the
/// `\uXXXX` forms decode to the same characters.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

const MAP_CSS: &str = "html, body, #map { height: 100%; margin: 0; }";

const MAP_SCRIPT: &str = r#"const map = L.map('map').setView(data.center, data.zoom);
L.tileLayer(data.tiles.url, {
  maxZoom: data.tiles.maxZoom,
  attribution: data.tiles.attribution
}).addTo(map);
const icons = {
  current_location: new L.Icon(data.icons.current_location),
  nearby_service: new L.Icon(data.icons.nearby_service)
};
data.markers.forEach(m => {
  const marker = L.marker([m.lat, m.lon], { icon: icons[m.style], title: m.title })
    .addTo(map)
    .bindPopup(m.popup);
  if (m.open) marker.openPopup();
});
"#;

/// Render the map as a self-contained Leaflet page.
///
/// Map state is embedded as one JSON object; the inline script only turns
/// it into Leaflet layers.
pub fn render_html(map: &MapView, title: &str) -> String {
    let tiles = map.tiles();
    let data = PageData {
        center: [map.center().lat, map.center().lon],
        zoom: map.zoom(),
        tiles: TileData {
            url: &tiles.url,
            max_zoom: tiles.max_zoom,
            attribution: &tiles.attribution,
        },
        icons: IconData {
            current_location: MarkerStyle::CurrentLocation.icon(),
            nearby_service: MarkerStyle::NearbyService.icon(),
        },
        markers: map.markers().iter().map(MarkerData::from).collect(),
    };

    // Serializing plain structs of strings and numbers cannot fail
    let json = serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string());
    let script = format!("\nconst data = {};\n{}", script_safe_json(&json), MAP_SCRIPT);

    page(title, &script).into_string()
}

fn page(title: &str, script: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href=(LEAFLET_CSS);
                style { (PreEscaped(MAP_CSS)) }
            }
            body {
                div id="map" {}
                script src=(LEAFLET_JS) {}
                script { (PreEscaped(script)) }
            }
        }
    }
}
