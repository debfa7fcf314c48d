//! cinelog CLI - command-line interface for the movie catalog.
//!
//! Each menu operation is also available as a one-shot subcommand; running
//! without a subcommand starts the interactive menu.

use cinelog::{
    CatalogConfig, Movie, MovieUpdate, SearchOutcome, SiteExportOptions, StorageError, YearOrder,
    compute_stats, export_chart, export_site, search_movies, sorted_by_rating, sorted_by_year,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rusqlite::Connection;
use serde_json::json;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "cinelog")]
#[command(about = "A movie catalog manager for the terminal")]
#[command(version)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all movies in the catalog
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Fetch a movie from OMDb and add it to the catalog
    Add {
        /// Movie title to look up
        title: String,

        /// OMDb API key (overrides OMDB_API_KEY and cinelog.yaml)
        #[arg(long)]
        api_key: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Delete a movie by title
    Delete {
        /// Exact movie title
        title: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Update a movie's year and rating
    Update {
        /// Exact movie title
        title: String,

        /// New release year
        #[arg(long)]
        year: i32,

        /// New rating (0-10)
        #[arg(long)]
        rating: f64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show rating statistics for the catalog
    Stats {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Pick a random movie
    Random {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Search movies by title (prefix, exact, then fuzzy)
    Search {
        /// Title or part of a title
        query: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List movies sorted by rating or year
    Sort {
        /// Sort key (rating, year)
        key: String,

        /// Year order (newest, oldest)
        #[arg(short, long, default_value = "newest")]
        order: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write the rating histogram as an SVG chart
    Chart {
        /// Output file (must end in .svg)
        #[arg(short, long, default_value = "ratings.svg")]
        output: PathBuf,
    },

    /// Generate the static website for the catalog
    Export {
        /// Output directory
        #[arg(short, long)]
        output: Option<String>,

        /// Page title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Start the interactive menu (default when no subcommand is given)
    Menu,
}

fn is_json(format: &str) -> bool {
    format == "json"
}

fn emit_error(format: &str, code: &str, detail: &str) -> ! {
    if is_json(format) {
        eprintln!("{}", json!({"error": code, "detail": detail}));
    } else {
        eprintln!("{}", format!("Error: {}", detail).red());
    }
    process::exit(1);
}

fn open_catalog(db: Option<PathBuf>, config: &CatalogConfig) -> Connection {
    let path = db.unwrap_or_else(|| {
        if config.db.is_empty() {
            PathBuf::from(cinelog::DEFAULT_DB_FILE)
        } else {
            PathBuf::from(&config.db)
        }
    });
    match cinelog::open_db(&path) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!(
                "{}",
                format!("Error: could not open {}: {}", path.display(), e).red()
            );
            process::exit(1);
        }
    }
}

fn load_movies_or_exit(conn: &Connection, format: &str) -> Vec<Movie> {
    match cinelog::list_movies(conn) {
        Ok(movies) => movies,
        Err(e) => emit_error(format, "storage_error", &e.to_string()),
    }
}

fn print_movie_lines(movies: &[Movie]) {
    for movie in movies {
        println!("{}", movie.summary_line());
    }
}

fn main() {
    // Keep the logger handle alive for the process lifetime. Logging is off
    // by default so the interactive menu stays clean; RUST_LOG enables it.
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.start())
        .ok();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = cinelog::load_config(&cwd);

    match cli.command {
        None | Some(Commands::Menu) => {
            let conn = open_catalog(cli.db, &config);
            if let Err(e) = cinelog::menu::run(&conn, &config) {
                eprintln!("{}", format!("Error: {}", e).red());
                process::exit(1);
            }
        }

        Some(Commands::List { format }) => {
            let conn = open_catalog(cli.db, &config);
            let movies = load_movies_or_exit(&conn, &format);
            if is_json(&format) {
                println!("{}", serde_json::to_string_pretty(&movies).unwrap());
            } else {
                println!("{} movies in total\n", movies.len());
                for movie in &movies {
                    println!("{}: ({}) - Rating: {}", movie.title, movie.year, movie.rating);
                    match movie.poster() {
                        Some(url) => println!("Poster URL: {url}"),
                        None => println!("Poster not available."),
                    }
                    println!();
                }
            }
        }

        Some(Commands::Add {
            title,
            api_key,
            format,
        }) => {
            let conn = open_catalog(cli.db, &config);
            let api_key = api_key
                .or_else(|| config.resolved_api_key())
                .unwrap_or_default();

            let client = match cinelog::build_client() {
                Ok(client) => client,
                Err(e) => emit_error(&format, "client_error", &e.to_string()),
            };
            let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
            let movie = match rt.block_on(cinelog::fetch_movie(&client, &api_key, &title)) {
                Ok(movie) => movie,
                Err(e) => emit_error(&format, "fetch_error", &e.to_string()),
            };

            match cinelog::add_movie(&conn, &movie) {
                Ok(()) => {
                    if is_json(&format) {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&json!({
                                "success": true,
                                "movie": movie,
                            }))
                            .unwrap()
                        );
                    } else {
                        println!(
                            "{}",
                            format!("Movie '{}' added successfully.", movie.title).green()
                        );
                    }
                }
                Err(e) => emit_error(&format, "add_error", &e.to_string()),
            }
        }

        Some(Commands::Delete { title, format }) => {
            let conn = open_catalog(cli.db, &config);
            match cinelog::delete_movie(&conn, &title) {
                Ok(()) => {
                    if is_json(&format) {
                        println!("{}", json!({"success": true, "title": title}));
                    } else {
                        println!(
                            "{}",
                            format!("Movie '{}' deleted successfully.", title).green()
                        );
                    }
                }
                Err(e @ StorageError::NotFound(_)) => {
                    emit_error(&format, "not_found", &e.to_string())
                }
                Err(e) => emit_error(&format, "storage_error", &e.to_string()),
            }
        }

        Some(Commands::Update {
            title,
            year,
            rating,
            format,
        }) => {
            let conn = open_catalog(cli.db, &config);
            match cinelog::update_movie(&conn, &title, MovieUpdate { year, rating }) {
                Ok(()) => {
                    if is_json(&format) {
                        println!(
                            "{}",
                            json!({"success": true, "title": title, "year": year, "rating": rating})
                        );
                    } else {
                        println!(
                            "{}",
                            format!("Movie '{}' updated successfully.", title).green()
                        );
                    }
                }
                Err(e @ StorageError::NotFound(_)) => {
                    emit_error(&format, "not_found", &e.to_string())
                }
                Err(e) => emit_error(&format, "storage_error", &e.to_string()),
            }
        }

        Some(Commands::Stats { format }) => {
            let conn = open_catalog(cli.db, &config);
            let movies = load_movies_or_exit(&conn, &format);
            let Some(stats) = compute_stats(&movies) else {
                emit_error(&format, "empty_catalog", "No movies in the database.");
            };
            if is_json(&format) {
                println!("{}", serde_json::to_string_pretty(&stats).unwrap());
            } else {
                println!("Average rating is: {:.2}", stats.average);
                println!("Median rating is: {:.2}", stats.median);
                for movie in &stats.best {
                    println!(
                        "The best movie is {} with a rating of {}",
                        movie.title, movie.rating
                    );
                }
                for movie in &stats.worst {
                    println!(
                        "The worst movie is {} with a rating of {}",
                        movie.title, movie.rating
                    );
                }
            }
        }

        Some(Commands::Random { format }) => {
            let conn = open_catalog(cli.db, &config);
            match cinelog::random_movie(&conn) {
                Ok(Some(movie)) => {
                    if is_json(&format) {
                        println!("{}", serde_json::to_string_pretty(&movie).unwrap());
                    } else {
                        println!(
                            "Your movie for tonight is: {} ({}) with a rating of {}",
                            movie.title, movie.year, movie.rating
                        );
                    }
                }
                Ok(None) => emit_error(&format, "empty_catalog", "No movies in the database."),
                Err(e) => emit_error(&format, "storage_error", &e.to_string()),
            }
        }

        Some(Commands::Search { query, format }) => {
            let conn = open_catalog(cli.db, &config);
            let movies = load_movies_or_exit(&conn, &format);
            let outcome = search_movies(&movies, &query);
            if is_json(&format) {
                println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
                return;
            }
            match outcome {
                SearchOutcome::Prefix { movies } => {
                    println!("Movies starting with {query}");
                    print_movie_lines(&movies);
                }
                SearchOutcome::Exact { movie } => {
                    println!("Exact match found: {}", movie.summary_line());
                }
                SearchOutcome::Fuzzy { movie, score } => {
                    println!("No exact match found.\nDid you mean: {}?", movie.title);
                    println!("{} (match score: {:.2})", movie.summary_line(), score);
                }
                SearchOutcome::NotFound => {
                    emit_error(&format, "not_found", "Movie with that title not found")
                }
            }
        }

        Some(Commands::Sort {
            key,
            order,
            format,
        }) => {
            let conn = open_catalog(cli.db, &config);
            let movies = load_movies_or_exit(&conn, &format);
            let sorted = match key.as_str() {
                "rating" => sorted_by_rating(&movies),
                "year" => {
                    let order = match order.as_str() {
                        "newest" => YearOrder::NewestFirst,
                        "oldest" => YearOrder::OldestFirst,
                        _ => emit_error(
                            &format,
                            "invalid_order",
                            &format!("Invalid order: {}. Must be newest or oldest", order),
                        ),
                    };
                    sorted_by_year(&movies, order)
                }
                _ => emit_error(
                    &format,
                    "invalid_key",
                    &format!("Invalid sort key: {}. Must be rating or year", key),
                ),
            };
            if is_json(&format) {
                println!("{}", serde_json::to_string_pretty(&sorted).unwrap());
            } else {
                print_movie_lines(&sorted);
            }
        }

        Some(Commands::Chart { output }) => {
            let conn = open_catalog(cli.db, &config);
            let movies = load_movies_or_exit(&conn, "text");
            if movies.is_empty() {
                eprintln!("{}", "Error: No movies in the database.".red());
                process::exit(1);
            }
            match export_chart(&movies, &output) {
                Ok(path) => println!("{}", format!("Chart saved as {}", path.display()).green()),
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                    process::exit(1);
                }
            }
        }

        Some(Commands::Export { output, title }) => {
            let conn = open_catalog(cli.db, &config);
            let movies = load_movies_or_exit(&conn, "text");
            let options = SiteExportOptions {
                output_dir: PathBuf::from(output.unwrap_or_else(|| "_site".to_string())),
                title: title.unwrap_or_else(|| config.site_title_or_default()),
            };
            match export_site(&movies, &options) {
                Ok(path) => {
                    println!("{}", format!("Website exported to {}", path.display()).green())
                }
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                    process::exit(1);
                }
            }
        }
    }
}
