//! Core types for movie records and catalog queries.

use serde::{Deserialize, Serialize};

/// A single movie record. `title` is the unique key within the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl Movie {
    /// Poster URL if one is usable. The OMDb API reports missing posters
    /// as the literal string "N/A".
    pub fn poster(&self) -> Option<&str> {
        self.poster_url
            .as_deref()
            .filter(|u| !u.is_empty() && *u != "N/A")
    }

    /// One-line listing form, e.g. `Heat: (1995): Rating 8.3`.
    pub fn summary_line(&self) -> String {
        format!("{}: ({}): Rating {}", self.title, self.year, self.rating)
    }
}

/// Sort direction for year-ordered listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearOrder {
    NewestFirst,
    OldestFirst,
}

/// New rating/year values for an update operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovieUpdate {
    pub year: i32,
    pub rating: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poster_filters_na_and_empty() {
        let mut movie = Movie {
            title: "Heat".to_string(),
            year: 1995,
            rating: 8.3,
            poster_url: Some("https://example.com/heat.jpg".to_string()),
        };
        assert_eq!(movie.poster(), Some("https://example.com/heat.jpg"));

        movie.poster_url = Some("N/A".to_string());
        assert_eq!(movie.poster(), None);

        movie.poster_url = Some(String::new());
        assert_eq!(movie.poster(), None);

        movie.poster_url = None;
        assert_eq!(movie.poster(), None);
    }
}
