//! Aggregations and queries over an in-memory movie list.
//!
//! Every presentation path loads the full catalog first (at most a few dozen
//! rows) and hands it to the pure functions here.

use crate::types::{Movie, YearOrder};
use serde::Serialize;

/// Minimum similarity for a fuzzy search hit.
const FUZZY_FLOOR: f64 = 0.7;

/// Rating statistics over the whole catalog.
#[derive(Debug, Serialize)]
pub struct RatingStats {
    pub count: usize,
    pub average: f64,
    pub median: f64,
    /// Movies tied at the maximum rating.
    pub best: Vec<Movie>,
    /// Movies tied at the minimum rating.
    pub worst: Vec<Movie>,
}

/// Compute rating statistics. Returns None for an empty catalog.
pub fn compute_stats(movies: &[Movie]) -> Option<RatingStats> {
    if movies.is_empty() {
        return None;
    }

    let mut ratings: Vec<f64> = movies.iter().map(|m| m.rating).collect();
    ratings.sort_by(|a, b| a.total_cmp(b));

    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
    let median = if ratings.len() % 2 == 1 {
        ratings[ratings.len() / 2]
    } else {
        let mid = ratings.len() / 2;
        (ratings[mid - 1] + ratings[mid]) / 2.0
    };

    let max = *ratings.last().expect("ratings is non-empty");
    let min = ratings[0];
    let best = movies.iter().filter(|m| m.rating == max).cloned().collect();
    let worst = movies.iter().filter(|m| m.rating == min).cloned().collect();

    Some(RatingStats {
        count: movies.len(),
        average,
        median,
        best,
        worst,
    })
}

/// Catalog sorted by rating, best first.
pub fn sorted_by_rating(movies: &[Movie]) -> Vec<Movie> {
    let mut sorted = movies.to_vec();
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    sorted
}

/// Catalog sorted by release year.
pub fn sorted_by_year(movies: &[Movie], order: YearOrder) -> Vec<Movie> {
    let mut sorted = movies.to_vec();
    match order {
        YearOrder::NewestFirst => sorted.sort_by(|a, b| b.year.cmp(&a.year)),
        YearOrder::OldestFirst => sorted.sort_by(|a, b| a.year.cmp(&b.year)),
    }
    sorted
}

/// Result of a title search.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// One or more titles start with the query.
    Prefix { movies: Vec<Movie> },
    /// A single title matches the query exactly.
    Exact { movie: Movie },
    /// Closest fuzzy match at or above the similarity floor.
    Fuzzy { movie: Movie, score: f64 },
    /// Nothing matched.
    NotFound,
}

/// Search the catalog for a title.
///
/// Precedence: case-insensitive prefix matches win, then a case-insensitive
/// exact match, then the best fuzzy match scoring at least the floor.
pub fn search_movies(movies: &[Movie], query: &str) -> SearchOutcome {
    let needle = query.trim().to_lowercase();

    let prefix: Vec<Movie> = movies
        .iter()
        .filter(|m| m.title.to_lowercase().starts_with(&needle))
        .cloned()
        .collect();
    if !prefix.is_empty() {
        return SearchOutcome::Prefix { movies: prefix };
    }

    if let Some(exact) = movies.iter().find(|m| m.title.to_lowercase() == needle) {
        return SearchOutcome::Exact {
            movie: exact.clone(),
        };
    }

    let mut best: Option<(&Movie, f64)> = None;
    for movie in movies {
        let score = strsim::jaro_winkler(&needle, &movie.title.to_lowercase());
        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((movie, score));
        }
    }

    match best {
        Some((movie, score)) if score >= FUZZY_FLOOR => SearchOutcome::Fuzzy {
            movie: movie.clone(),
            score,
        },
        _ => SearchOutcome::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, year: i32, rating: f64) -> Movie {
        Movie {
            title: title.to_string(),
            year,
            rating,
            poster_url: None,
        }
    }

    fn catalog() -> Vec<Movie> {
        vec![
            movie("Heat", 1995, 8.3),
            movie("Alien", 1979, 8.5),
            movie("Aliens", 1986, 8.4),
            movie("The Room", 2003, 3.6),
        ]
    }

    #[test]
    fn stats_on_empty_catalog_is_none() {
        assert!(compute_stats(&[]).is_none());
    }

    #[test]
    fn stats_mean_median_best_worst() {
        let stats = compute_stats(&catalog()).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.average - 7.2).abs() < 1e-9);
        // Even count: median is the midpoint of the two middle ratings.
        assert!((stats.median - 8.35).abs() < 1e-9);
        assert_eq!(stats.best.len(), 1);
        assert_eq!(stats.best[0].title, "Alien");
        assert_eq!(stats.worst[0].title, "The Room");
    }

    #[test]
    fn stats_reports_all_ties() {
        let movies = vec![movie("A", 2000, 9.0), movie("B", 2001, 9.0)];
        let stats = compute_stats(&movies).unwrap();
        assert_eq!(stats.best.len(), 2);
        assert_eq!(stats.worst.len(), 2);
    }

    #[test]
    fn rating_sort_is_descending() {
        let sorted = sorted_by_rating(&catalog());
        assert_eq!(sorted[0].title, "Alien");
        assert_eq!(sorted[3].title, "The Room");
    }

    #[test]
    fn year_sort_honors_order() {
        let newest = sorted_by_year(&catalog(), YearOrder::NewestFirst);
        assert_eq!(newest[0].title, "The Room");
        let oldest = sorted_by_year(&catalog(), YearOrder::OldestFirst);
        assert_eq!(oldest[0].title, "Alien");
    }

    #[test]
    fn prefix_match_wins_over_exact() {
        // "alien" is both an exact match and a prefix of "Aliens";
        // prefix results include both.
        match search_movies(&catalog(), "alien") {
            SearchOutcome::Prefix { movies } => {
                let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
                assert_eq!(titles, vec!["Alien", "Aliens"]);
            }
            other => panic!("expected prefix outcome, got {other:?}"),
        }
    }

    #[test]
    fn fuzzy_match_catches_typos() {
        match search_movies(&catalog(), "alein") {
            SearchOutcome::Fuzzy { movie, score } => {
                assert_eq!(movie.title, "Alien");
                assert!(score >= 0.7);
            }
            other => panic!("expected fuzzy outcome, got {other:?}"),
        }
    }

    #[test]
    fn garbage_query_is_not_found() {
        assert!(matches!(
            search_movies(&catalog(), "zzzzqqqq"),
            SearchOutcome::NotFound
        ));
    }
}
