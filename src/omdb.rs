//! Movie metadata lookup against the OMDb API.
//!
//! One GET per lookup, keyed by title. The payload is validated defensively:
//! OMDb reports "not found" inside a 200 response, year fields may carry
//! ranges, and rating/poster fields may be the literal string "N/A".

use crate::types::Movie;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

const OMDB_URL: &str = "http://www.omdbapi.com/";

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("year pattern is valid"));

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Movie '{0}' not found on OMDb")]
    NotFound(String),

    #[error("Could not parse a year from {0:?}")]
    UnparseableYear(String),

    #[error("OMDb returned an unexpected payload: {0}")]
    BadPayload(String),

    #[error("No OMDb API key configured (set OMDB_API_KEY or api_key in cinelog.yaml)")]
    MissingApiKey,
}

/// Raw OMDb response shape. Fields we don't read are ignored.
#[derive(Debug, Deserialize)]
pub struct OmdbPayload {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

pub fn build_client() -> Result<reqwest::Client, FetchError> {
    Ok(reqwest::Client::builder()
        .user_agent(format!("cinelog/{}", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .build()?)
}

/// Reduce an OMDb year field to its first 4-digit run.
/// Series render as ranges ("1999–2003"); the first year wins.
fn parse_year(raw: &str) -> Option<i32> {
    YEAR_RE.find(raw).and_then(|m| m.as_str().parse().ok())
}

/// Parse an imdbRating field. "N/A" and unparseable values fall back to 0.0.
fn parse_rating(raw: Option<&str>) -> f64 {
    match raw {
        Some("N/A") | None => 0.0,
        Some(value) => value.parse().unwrap_or(0.0),
    }
}

/// Convert a validated OMDb payload into a movie record.
pub fn movie_from_payload(requested: &str, payload: OmdbPayload) -> Result<Movie, FetchError> {
    if payload.response != "True" {
        return Err(FetchError::NotFound(requested.to_string()));
    }

    let title = payload
        .title
        .ok_or_else(|| FetchError::BadPayload("missing Title field".to_string()))?;

    let raw_year = payload.year.unwrap_or_default();
    let year = parse_year(&raw_year).ok_or(FetchError::UnparseableYear(raw_year))?;

    let rating = parse_rating(payload.imdb_rating.as_deref());
    let poster_url = payload
        .poster
        .filter(|p| !p.is_empty() && p != "N/A");

    Ok(Movie {
        title,
        year,
        rating,
        poster_url,
    })
}

/// Fetch metadata for a title from OMDb.
pub async fn fetch_movie(
    client: &reqwest::Client,
    api_key: &str,
    title: &str,
) -> Result<Movie, FetchError> {
    if api_key.is_empty() {
        return Err(FetchError::MissingApiKey);
    }

    info!("event=omdb_fetch module=omdb status=start title={title:?}");
    let resp = client
        .get(OMDB_URL)
        .query(&[("apikey", api_key), ("t", title)])
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        warn!("event=omdb_fetch module=omdb status=error http_status={status}");
        return Err(FetchError::BadPayload(format!("HTTP status {status}")));
    }

    let payload: OmdbPayload = resp.json().await?;
    let movie = movie_from_payload(title, payload)?;
    info!(
        "event=omdb_fetch module=omdb status=ok title={:?} year={}",
        movie.title, movie.year
    );
    Ok(movie)
}
