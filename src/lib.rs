//! cinelog - a movie catalog manager for the terminal.
//!
//! This library provides the catalog's storage layer (SQLite), OMDb metadata
//! lookup, aggregate queries (stats, sort, fuzzy search), and the static
//! exports (website, rating histogram) behind the `cinelog` binary.

pub mod catalog;
pub mod chart;
pub mod html_export;
pub mod menu;
pub mod omdb;
pub mod storage;
pub mod types;

pub use catalog::{
    RatingStats, SearchOutcome, compute_stats, search_movies, sorted_by_rating, sorted_by_year,
};
pub use chart::{export_chart, render_histogram};
pub use html_export::{SiteExportOptions, export_site};
pub use omdb::{FetchError, build_client, fetch_movie};
pub use storage::{
    CatalogConfig, DEFAULT_DB_FILE, StorageError, add_movie, delete_movie, get_movie, list_movies,
    load_config, open_db, open_db_in_memory, random_movie, update_movie,
};
pub use types::{Movie, MovieUpdate, YearOrder};
