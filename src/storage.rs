//! SQLite-backed storage for the movie catalog.
//!
//! All catalog data lives in a single `movies` table keyed by title. Every
//! operation is a parameterized statement over a connection the caller owns.

use crate::types::{Movie, MovieUpdate};
use log::{error, info};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default database filename, created in the working directory.
pub const DEFAULT_DB_FILE: &str = "movies.db";

/// Config filename looked up next to the database.
pub const CONFIG_FILE: &str = "cinelog.yaml";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Movie '{0}' already exists in the catalog")]
    AlreadyExists(String),
    #[error("Movie '{0}' not found")]
    NotFound(String),
}

/// Catalog configuration read from cinelog.yaml.
#[derive(Debug, serde::Deserialize, serde::Serialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub db: String,
    #[serde(default)]
    pub site_title: String,
}

impl CatalogConfig {
    /// OMDb API key, with the environment variable taking precedence
    /// over the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("OMDB_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| Some(self.api_key.clone()).filter(|k| !k.is_empty()))
    }

    pub fn site_title_or_default(&self) -> String {
        if self.site_title.is_empty() {
            "My favorite movies collection".to_string()
        } else {
            self.site_title.clone()
        }
    }
}

/// Read cinelog.yaml from the given directory. A missing or malformed
/// file degrades to defaults.
pub fn load_config(dir: &Path) -> CatalogConfig {
    let config_path = dir.join(CONFIG_FILE);
    std::fs::read_to_string(&config_path)
        .ok()
        .and_then(|content| serde_yaml::from_str(&content).ok())
        .unwrap_or_default()
}

/// Open the catalog database file, creating the schema if needed.
pub fn open_db(path: impl AsRef<Path>) -> Result<Connection, StorageError> {
    info!("event=db_open module=storage status=start mode=file");
    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=db_open module=storage status=error mode=file error={err}");
            return Err(err.into());
        }
    };
    bootstrap_connection(&conn)?;
    info!("event=db_open module=storage status=ok mode=file");
    Ok(conn)
}

/// Open an in-memory catalog database with the schema applied.
pub fn open_db_in_memory() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory()?;
    bootstrap_connection(&conn)?;
    Ok(conn)
}

fn bootstrap_connection(conn: &Connection) -> Result<(), StorageError> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS movies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT UNIQUE NOT NULL,
            year INTEGER NOT NULL,
            rating REAL NOT NULL,
            poster_url TEXT
        )",
        [],
    )?;
    Ok(())
}

fn movie_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Movie> {
    Ok(Movie {
        title: row.get("title")?,
        year: row.get("year")?,
        rating: row.get("rating")?,
        poster_url: row.get("poster_url")?,
    })
}

/// All movies in the catalog, ordered by title.
pub fn list_movies(conn: &Connection) -> Result<Vec<Movie>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT title, year, rating, poster_url FROM movies
         ORDER BY title COLLATE NOCASE ASC",
    )?;
    let movies = stmt
        .query_map([], movie_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(movies)
}

/// Look up a single movie by exact title.
pub fn get_movie(conn: &Connection, title: &str) -> Result<Option<Movie>, StorageError> {
    let movie = conn
        .query_row(
            "SELECT title, year, rating, poster_url FROM movies WHERE title = ?1",
            [title],
            movie_from_row,
        )
        .optional()?;
    Ok(movie)
}

/// Insert a new movie. Titles are unique; inserting a duplicate fails.
pub fn add_movie(conn: &Connection, movie: &Movie) -> Result<(), StorageError> {
    let exists: i64 = conn.query_row(
        "SELECT COUNT(*) FROM movies WHERE title = ?1",
        [movie.title.as_str()],
        |row| row.get(0),
    )?;
    if exists > 0 {
        return Err(StorageError::AlreadyExists(movie.title.clone()));
    }
    conn.execute(
        "INSERT INTO movies (title, year, rating, poster_url) VALUES (?1, ?2, ?3, ?4)",
        params![movie.title, movie.year, movie.rating, movie.poster_url],
    )?;
    info!(
        "event=movie_add module=storage status=ok title={:?}",
        movie.title
    );
    Ok(())
}

/// Delete a movie by exact title.
pub fn delete_movie(conn: &Connection, title: &str) -> Result<(), StorageError> {
    let changed = conn.execute("DELETE FROM movies WHERE title = ?1", [title])?;
    if changed == 0 {
        return Err(StorageError::NotFound(title.to_string()));
    }
    info!("event=movie_delete module=storage status=ok title={title:?}");
    Ok(())
}

/// Replace a movie's year and rating.
pub fn update_movie(
    conn: &Connection,
    title: &str,
    update: MovieUpdate,
) -> Result<(), StorageError> {
    let changed = conn.execute(
        "UPDATE movies SET year = ?2, rating = ?3 WHERE title = ?1",
        params![title, update.year, update.rating],
    )?;
    if changed == 0 {
        return Err(StorageError::NotFound(title.to_string()));
    }
    info!("event=movie_update module=storage status=ok title={title:?}");
    Ok(())
}

/// Pick one movie at random, or None when the catalog is empty.
pub fn random_movie(conn: &Connection) -> Result<Option<Movie>, StorageError> {
    let movie = conn
        .query_row(
            "SELECT title, year, rating, poster_url FROM movies
             ORDER BY random() LIMIT 1",
            [],
            movie_from_row,
        )
        .optional()?;
    Ok(movie)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str, year: i32, rating: f64) -> Movie {
        Movie {
            title: title.to_string(),
            year,
            rating,
            poster_url: None,
        }
    }

    #[test]
    fn add_and_list_roundtrip() {
        let conn = open_db_in_memory().unwrap();
        add_movie(&conn, &sample("Heat", 1995, 8.3)).unwrap();
        add_movie(&conn, &sample("Alien", 1979, 8.5)).unwrap();

        let movies = list_movies(&conn).unwrap();
        assert_eq!(movies.len(), 2);
        // Listing is title-ordered, case-insensitively.
        assert_eq!(movies[0].title, "Alien");
        assert_eq!(movies[1].title, "Heat");
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let conn = open_db_in_memory().unwrap();
        add_movie(&conn, &sample("Heat", 1995, 8.3)).unwrap();
        let err = add_movie(&conn, &sample("Heat", 1995, 8.3)).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[test]
    fn get_returns_none_for_missing_title() {
        let conn = open_db_in_memory().unwrap();
        assert!(get_movie(&conn, "Nope").unwrap().is_none());

        add_movie(&conn, &sample("Heat", 1995, 8.3)).unwrap();
        let movie = get_movie(&conn, "Heat").unwrap().unwrap();
        assert_eq!(movie.year, 1995);
    }

    #[test]
    fn delete_missing_movie_is_not_found() {
        let conn = open_db_in_memory().unwrap();
        let err = delete_movie(&conn, "Heat").unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn update_changes_year_and_rating() {
        let conn = open_db_in_memory().unwrap();
        add_movie(&conn, &sample("Heat", 1995, 8.3)).unwrap();
        update_movie(
            &conn,
            "Heat",
            MovieUpdate {
                year: 1996,
                rating: 9.0,
            },
        )
        .unwrap();

        let movie = get_movie(&conn, "Heat").unwrap().unwrap();
        assert_eq!(movie.year, 1996);
        assert_eq!(movie.rating, 9.0);
    }

    #[test]
    fn random_on_empty_catalog_is_none() {
        let conn = open_db_in_memory().unwrap();
        assert!(random_movie(&conn).unwrap().is_none());

        add_movie(&conn, &sample("Heat", 1995, 8.3)).unwrap();
        let movie = random_movie(&conn).unwrap().unwrap();
        assert_eq!(movie.title, "Heat");
    }

    #[test]
    fn config_defaults_when_file_missing() {
        let config = load_config(Path::new("/nonexistent"));
        assert!(config.api_key.is_empty());
        assert_eq!(
            config.site_title_or_default(),
            "My favorite movies collection"
        );
    }
}
