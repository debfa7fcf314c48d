//! Rating histogram rendered as a standalone SVG document.
//!
//! One bar per movie on a fixed 0-10 rating axis, mirroring the catalog's
//! rating scale.

use crate::types::Movie;
use std::fs;
use std::path::{Path, PathBuf};

const BAR_SLOT: f64 = 56.0;
const BAR_WIDTH: f64 = 40.0;
const PLOT_HEIGHT: f64 = 280.0;
const MARGIN_LEFT: f64 = 48.0;
const MARGIN_TOP: f64 = 48.0;
const LABEL_AREA: f64 = 110.0;
const RATING_MAX: f64 = 10.0;

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the catalog's ratings as an SVG bar chart.
pub fn render_histogram(movies: &[Movie]) -> String {
    let width = MARGIN_LEFT + (movies.len().max(1) as f64) * BAR_SLOT + 24.0;
    let height = MARGIN_TOP + PLOT_HEIGHT + LABEL_AREA;
    let baseline = MARGIN_TOP + PLOT_HEIGHT;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" \
         viewBox=\"0 0 {width:.0} {height:.0}\" font-family=\"sans-serif\">\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.0}\" y=\"24\" font-size=\"18\" font-weight=\"bold\">Movie Ratings</text>\n",
        MARGIN_LEFT
    ));

    // Gridlines and axis labels every 2 rating points.
    for step in (0..=10).step_by(2) {
        let y = baseline - (step as f64 / RATING_MAX) * PLOT_HEIGHT;
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT:.0}\" y1=\"{y:.1}\" x2=\"{:.0}\" y2=\"{y:.1}\" \
             stroke=\"#ddd\" stroke-width=\"1\"/>\n",
            width - 16.0
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.0}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\" \
             fill=\"#555\">{step}</text>\n",
            MARGIN_LEFT - 8.0,
            y + 4.0
        ));
    }

    for (i, movie) in movies.iter().enumerate() {
        let rating = movie.rating.clamp(0.0, RATING_MAX);
        let bar_height = (rating / RATING_MAX) * PLOT_HEIGHT;
        let x = MARGIN_LEFT + (i as f64) * BAR_SLOT + (BAR_SLOT - BAR_WIDTH) / 2.0;
        let y = baseline - bar_height;
        let label_x = x + BAR_WIDTH / 2.0;
        let label_y = baseline + 14.0;

        svg.push_str(&format!(
            "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{BAR_WIDTH:.0}\" \
             height=\"{bar_height:.1}\" fill=\"lightblue\" stroke=\"#8bb\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\" \
             fill=\"#333\">{:.1}</text>\n",
            label_x,
            y - 4.0,
            rating
        ));
        svg.push_str(&format!(
            "  <text x=\"{label_x:.1}\" y=\"{label_y:.1}\" font-size=\"11\" fill=\"#333\" \
             text-anchor=\"start\" transform=\"rotate(45 {label_x:.1} {label_y:.1})\">{}</text>\n",
            xml_escape(&movie.title)
        ));
    }

    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT:.0}\" y1=\"{baseline:.1}\" x2=\"{:.0}\" y2=\"{baseline:.1}\" \
         stroke=\"#333\" stroke-width=\"1.5\"/>\n",
        width - 16.0
    ));
    svg.push_str("</svg>\n");
    svg
}

/// Write the rating histogram to an .svg file.
///
/// Returns the path to the written chart.
pub fn export_chart(movies: &[Movie], output: &Path) -> Result<PathBuf, String> {
    if output.extension().and_then(|e| e.to_str()) != Some("svg") {
        return Err(format!(
            "Invalid file name '{}'. Please include .svg at the end",
            output.display()
        ));
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }
    let svg = render_histogram(movies);
    fs::write(output, svg).map_err(|e| format!("Failed to write chart: {}", e))?;
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, rating: f64) -> Movie {
        Movie {
            title: title.to_string(),
            year: 2000,
            rating,
            poster_url: None,
        }
    }

    #[test]
    fn renders_one_bar_per_movie() {
        let movies = vec![movie("A", 5.0), movie("B", 7.5), movie("C", 9.1)];
        let svg = render_histogram(&movies);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("Movie Ratings"));
    }

    #[test]
    fn escapes_titles_in_labels() {
        let svg = render_histogram(&[movie("Fast & Furious", 6.0)]);
        assert!(svg.contains("Fast &amp; Furious"));
        assert!(!svg.contains("Fast & Furious"));
    }

    #[test]
    fn ratings_clamp_to_axis() {
        let svg = render_histogram(&[movie("Broken", 12.0)]);
        // A 12.0 rating draws a full-height bar, not one that overflows the axis.
        assert!(svg.contains("height=\"280.0\""));
    }

    #[test]
    fn empty_catalog_renders_axis_only() {
        let svg = render_histogram(&[]);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect").count(), 0);
    }

    #[test]
    fn export_rejects_non_svg_extension() {
        let err = export_chart(&[], Path::new("chart.png")).unwrap_err();
        assert!(err.contains(".svg"));
    }
}
