pub mod geojson;
pub mod html;
pub mod table;

use serde::Deserialize;

use crate::map::MapView;

pub use geojson::to_geojson;
pub use html::render_html;
pub use table::render_table;

/// How the map is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone Leaflet page
    #[default]
    Html,
    /// GeoJSON FeatureCollection
    Geojson,
    /// Plain-text list, nearest first
    Table,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Geojson => "geojson",
            OutputFormat::Table => "txt",
        }
    }
}

/// Render the map in the requested format
pub fn render(map: &MapView, format: OutputFormat, title: &str) -> String {
    match format {
        OutputFormat::Html => render_html(map, title),
        OutputFormat::Geojson => {
            let mut out = to_geojson(map).to_string();
            out.push('\n');
            out
        }
        OutputFormat::Table => render_table(map, title),
    }
}
