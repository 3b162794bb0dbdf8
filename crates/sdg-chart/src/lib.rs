//! Bar chart of SDG prediction scores.
//!
//! Rasterizes one bar per goal in canonical 1–17 order into a PNG, with the
//! official goal icons under the x-axis when an icon directory is configured.
//! The PNG can be embedded in HTML as a base64 data URI.

mod error;
mod render;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

pub use error::ChartError;
pub use render::{ChartOptions, find_system_font, goal_values, render_png};

pub const CHART_TITLE: &str = "SDG Classification Predictions";

/// `data:image/png;base64,...` for an encoded PNG.
pub fn to_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64_STANDARD.encode(png))
}

/// `<img>` fragment embedding the chart.
pub fn html_fragment(png: &[u8]) -> String {
    format!("<img alt=\"{CHART_TITLE}\" src=\"{}\">", to_data_uri(png))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn data_uri_round_trips_through_base64() {
        let uri = to_data_uri(PNG_MAGIC);
        let encoded = uri.strip_prefix("data:image/png;base64,").unwrap();
        let decoded = BASE64_STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, PNG_MAGIC);
    }

    #[test]
    fn fragment_is_an_img_tag() {
        let html = html_fragment(PNG_MAGIC);
        let prefix = "<img alt=\"SDG Classification Predictions\" src=\"data:image/png;base64,";
        assert!(html.starts_with(prefix));
        assert!(html.ends_with("\">"));
    }
}
