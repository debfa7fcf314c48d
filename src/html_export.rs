//! Static website export for the movie catalog.
//!
//! Renders a single-page movie grid from an embedded template.

use crate::types::Movie;
use std::fs;
use std::path::PathBuf;
use tera::{Context, Tera};

const SITE_TEMPLATE: &str = include_str!("templates/site.html");

/// Poster shown when a movie has none.
const PLACEHOLDER_POSTER: &str = "https://dummyimage.com/128x193/cccccc/000000.png&text=No+Image";

/// Options for website export.
pub struct SiteExportOptions {
    pub output_dir: PathBuf,
    pub title: String,
}

/// Movie representation handed to the template.
#[derive(Debug, serde::Serialize)]
struct TemplateMovie {
    title: String,
    year: i32,
    rating: f64,
    poster_url: String,
    imdb_url: String,
}

impl From<&Movie> for TemplateMovie {
    fn from(movie: &Movie) -> Self {
        let poster_url = movie
            .poster()
            .unwrap_or(PLACEHOLDER_POSTER)
            .to_string();
        let imdb_url = format!(
            "https://www.imdb.com/find?q={}",
            movie.title.replace(' ', "+")
        );
        TemplateMovie {
            title: movie.title.clone(),
            year: movie.year,
            rating: movie.rating,
            poster_url,
            imdb_url,
        }
    }
}

fn build_context(movies: &[Movie], options: &SiteExportOptions) -> Context {
    let mut context = Context::new();
    context.insert("title", &options.title);
    context.insert(
        "generated_at",
        &chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    let template_movies: Vec<TemplateMovie> = movies.iter().map(TemplateMovie::from).collect();
    context.insert("movies", &template_movies);
    context
}

/// Export the catalog as a static website.
///
/// Returns the path to the generated index.html file.
pub fn export_site(movies: &[Movie], options: &SiteExportOptions) -> Result<PathBuf, String> {
    fs::create_dir_all(&options.output_dir)
        .map_err(|e| format!("Failed to create output directory: {}", e))?;

    let mut tera = Tera::default();
    tera.add_raw_template("site.html", SITE_TEMPLATE)
        .map_err(|e| format!("Failed to add site template: {}", e))?;

    let context = build_context(movies, options);
    let html = tera
        .render("site.html", &context)
        .map_err(|e| format!("Failed to render template: {}", e))?;

    let output_path = options.output_dir.join("index.html");
    fs::write(&output_path, html).map_err(|e| format!("Failed to write output: {}", e))?;

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movies() -> Vec<Movie> {
        vec![
            Movie {
                title: "The Godfather".to_string(),
                year: 1972,
                rating: 9.2,
                poster_url: Some("https://example.com/godfather.jpg".to_string()),
            },
            Movie {
                title: "Heat".to_string(),
                year: 1995,
                rating: 8.3,
                poster_url: None,
            },
        ]
    }

    fn render(movies: &[Movie], title: &str) -> String {
        let mut tera = Tera::default();
        tera.add_raw_template("site.html", SITE_TEMPLATE).unwrap();
        let options = SiteExportOptions {
            output_dir: PathBuf::from("unused"),
            title: title.to_string(),
        };
        tera.render("site.html", &build_context(movies, &options))
            .unwrap()
    }

    #[test]
    fn renders_title_and_movie_grid() {
        let html = render(&sample_movies(), "My favorite movies collection");
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("My favorite movies collection"));
        assert!(html.contains("The Godfather"));
        assert!(html.contains("https://example.com/godfather.jpg"));
    }

    #[test]
    fn missing_poster_uses_placeholder() {
        // Tera escapes the URL's ampersand inside the attribute, so match
        // on the host/path part only.
        let html = render(&sample_movies(), "Movies");
        assert!(html.contains("dummyimage.com/128x193"));
    }

    #[test]
    fn titles_link_to_imdb_search() {
        let html = render(&sample_movies(), "Movies");
        assert!(html.contains("https://www.imdb.com/find?q=The+Godfather"));
    }

    #[test]
    fn empty_catalog_still_renders() {
        let html = render(&[], "Movies");
        assert!(html.contains("0 movies"));
    }
}
