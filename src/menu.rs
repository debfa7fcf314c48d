//! Interactive menu loop for the movie catalog.
//!
//! Reads a numeric choice from stdin, dispatches to one presentation
//! function per operation, and loops until the user exits.

use crate::catalog::{self, SearchOutcome};
use crate::chart;
use crate::html_export::{SiteExportOptions, export_site};
use crate::omdb;
use crate::storage::{self, CatalogConfig, StorageError};
use crate::types::{Movie, MovieUpdate, YearOrder};
use colored::Colorize;
use rusqlite::Connection;
use std::io::{self, Write};
use std::path::Path;

/// Run the menu loop until the user picks exit (0) or stdin closes.
pub fn run(conn: &Connection, config: &CatalogConfig) -> io::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    loop {
        print_menu();
        let choice = match prompt("Enter choice between 0 and 11: ") {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };
        if choice.is_empty() {
            println!("{}", "Invalid choice. Please enter a number".red());
            continue;
        }
        let choice: u32 = match choice.parse() {
            Ok(n) => n,
            Err(_) => {
                println!("{}", "Invalid input. Please enter a valid number".red());
                continue;
            }
        };

        match choice {
            0 => {
                println!("Bye!");
                break;
            }
            1 => list_movies(conn)?,
            2 => add_movie(conn, config, &runtime)?,
            3 => delete_movie(conn)?,
            4 => update_movie(conn)?,
            5 => stats(conn)?,
            6 => random_movie(conn)?,
            7 => search_movie(conn)?,
            8 => sorted_by_rating(conn)?,
            9 => create_histogram(conn)?,
            10 => sorted_by_year(conn)?,
            11 => generate_website(conn, config)?,
            _ => {
                println!("{}", "Input invalid please try again".red());
                continue;
            }
        }

        match prompt(&"Press Enter to continue: ".green().to_string()) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn print_menu() {
    println!();
    println!("{}", "********** My Movies Database **********".blue());
    println!();
    println!("\tMenu");
    println!();
    println!(
        "0. \tExit\n\
         1. \tList Movies\n\
         2. \tAdd Movie\n\
         3. \tDelete Movie\n\
         4. \tUpdate Movie\n\
         5. \tStats\n\
         6. \tRandom Movie\n\
         7. \tSearch Movie\n\
         8. \tMovies Sorted by Rating\n\
         9. \tCreate Rating Histogram\n\
         10.\tMovies Sorted by Year\n\
         11.\tGenerate Website"
    );
    println!();
}

/// Prompt for one trimmed line. A closed stdin reports UnexpectedEof so the
/// caller can wind down instead of spinning.
fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    let bytes = io::stdin().read_line(&mut line)?;
    if bytes == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

/// Prompt until the input parses, echoing `error_msg` on failure.
fn prompt_parse<T: std::str::FromStr>(label: &str, error_msg: &str) -> io::Result<T> {
    loop {
        match prompt(label)?.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("{}", error_msg.red()),
        }
    }
}

fn load_or_report(conn: &Connection) -> io::Result<Option<Vec<Movie>>> {
    match storage::list_movies(conn) {
        Ok(movies) => Ok(Some(movies)),
        Err(e) => {
            println!("{}", format!("Error: {e}").red());
            Ok(None)
        }
    }
}

fn print_movie_block(movie: &Movie) {
    println!("{}: ({}) - Rating: {}", movie.title, movie.year, movie.rating);
    match movie.poster() {
        Some(url) => println!("Poster URL: {url}"),
        None => println!("Poster not available."),
    }
    println!();
}

fn list_movies(conn: &Connection) -> io::Result<()> {
    let Some(movies) = load_or_report(conn)? else {
        return Ok(());
    };
    println!("{} movies in total\n", movies.len());
    for movie in &movies {
        print_movie_block(movie);
    }
    Ok(())
}

fn add_movie(
    conn: &Connection,
    config: &CatalogConfig,
    runtime: &tokio::runtime::Runtime,
) -> io::Result<()> {
    let title = prompt(&"Enter movie title to add: ".cyan().to_string())?;
    if title.is_empty() {
        println!("{}", "Movie title cannot be empty.".red());
        return Ok(());
    }

    let api_key = config.resolved_api_key().unwrap_or_default();
    let fetched = omdb::build_client()
        .map_err(|e| e.to_string())
        .and_then(|client| {
            runtime
                .block_on(omdb::fetch_movie(&client, &api_key, &title))
                .map_err(|e| e.to_string())
        });

    let movie = match fetched {
        Ok(movie) => movie,
        Err(e) => {
            println!("{}", format!("Could not fetch movie data: {e}").red());
            return Ok(());
        }
    };

    match storage::add_movie(conn, &movie) {
        Ok(()) => println!("Movie '{}' added successfully.", movie.title),
        Err(e) => println!("{}", format!("{e}").red()),
    }
    Ok(())
}

fn delete_movie(conn: &Connection) -> io::Result<()> {
    let title = prompt("Enter movie name to delete: ")?;
    if title.is_empty() {
        println!("{}", "Movie name cannot be empty".red());
        return Ok(());
    }
    match storage::delete_movie(conn, &title) {
        Ok(()) => println!("Movie {title} successfully deleted"),
        Err(StorageError::NotFound(_)) => println!("Movie doesn't exist"),
        Err(e) => println!("{}", format!("Error: {e}").red()),
    }
    Ok(())
}

fn update_movie(conn: &Connection) -> io::Result<()> {
    let title = prompt("Enter movie name to be updated: ")?;
    if title.is_empty() {
        println!("{}", "Movie name cannot be empty".red());
        return Ok(());
    }

    let current = match storage::get_movie(conn, &title) {
        Ok(Some(movie)) => movie,
        Ok(None) => {
            println!("Movie {title} doesn't exist");
            return Ok(());
        }
        Err(e) => {
            println!("{}", format!("Error: {e}").red());
            return Ok(());
        }
    };
    println!("The current year of {} is {}", current.title, current.year);

    let rating: f64 = prompt_parse(
        "Enter new movie rating: ",
        "Invalid input, please enter a number for the rating",
    )?;
    let year: i32 = prompt_parse(
        "Enter new movie year: ",
        "Invalid input, please enter a valid year",
    )?;

    match storage::update_movie(conn, &title, MovieUpdate { year, rating }) {
        Ok(()) => println!("Movie {title} successfully updated"),
        Err(e) => println!("{}", format!("Error: {e}").red()),
    }
    Ok(())
}

fn stats(conn: &Connection) -> io::Result<()> {
    let Some(movies) = load_or_report(conn)? else {
        return Ok(());
    };
    let Some(stats) = catalog::compute_stats(&movies) else {
        println!("{}", "No movies in the database.".red());
        return Ok(());
    };
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
    Ok(())
}

fn random_movie(conn: &Connection) -> io::Result<()> {
    match storage::random_movie(conn) {
        Ok(Some(movie)) => println!(
            "Your movie for tonight is: {} ({}) with a rating of {}",
            movie.title, movie.year, movie.rating
        ),
        Ok(None) => println!("{}", "No movies in the database.".red()),
        Err(e) => println!("{}", format!("Error: {e}").red()),
    }
    Ok(())
}

fn search_movie(conn: &Connection) -> io::Result<()> {
    let query = prompt("Enter part of the movie name: ")?;
    if query.is_empty() {
        println!("{}", "Search cannot be empty".red());
        return Ok(());
    }
    let Some(movies) = load_or_report(conn)? else {
        return Ok(());
    };

    match catalog::search_movies(&movies, &query) {
        SearchOutcome::Prefix { movies: hits } => {
            println!("\nMovies starting with {query}");
            for movie in &hits {
                println!("{}", movie.summary_line());
            }
        }
        SearchOutcome::Exact { movie } => {
            println!("Exact match found: {}", movie.summary_line());
        }
        SearchOutcome::Fuzzy { movie, score } => {
            println!("No exact match found.\nDid you mean: {}?", movie.title);
            println!("{} (match score: {:.2})", movie.summary_line(), score);
        }
        SearchOutcome::NotFound => {
            println!("{}", "Movie with that title not found".red());
        }
    }
    Ok(())
}

fn sorted_by_rating(conn: &Connection) -> io::Result<()> {
    let Some(movies) = load_or_report(conn)? else {
        return Ok(());
    };
    for movie in catalog::sorted_by_rating(&movies) {
        println!("{}", movie.summary_line());
    }
    Ok(())
}

fn create_histogram(conn: &Connection) -> io::Result<()> {
    let Some(movies) = load_or_report(conn)? else {
        return Ok(());
    };
    if movies.is_empty() {
        println!("{}", "No movies in the database.".red());
        return Ok(());
    }

    let filename = prompt("Enter a file name to save the chart, for example, chart.svg: ")?;
    match chart::export_chart(&movies, Path::new(&filename)) {
        Ok(path) => println!("Chart saved as {}", path.display()),
        Err(e) => println!("{}", format!("Error: {e}").red()),
    }
    Ok(())
}

fn sorted_by_year(conn: &Connection) -> io::Result<()> {
    println!("How would you like to sort the movies?");
    println!("1. Newest First");
    println!("2. Oldest First");

    let order = match prompt("Enter 1 or 2: ")?.as_str() {
        "1" => YearOrder::NewestFirst,
        "2" => YearOrder::OldestFirst,
        _ => {
            println!("{}", "Invalid choice. Please enter 1 or 2.".red());
            return Ok(());
        }
    };

    let Some(movies) = load_or_report(conn)? else {
        return Ok(());
    };
    for movie in catalog::sorted_by_year(&movies, order) {
        println!("{}", movie.summary_line());
    }
    Ok(())
}

fn generate_website(conn: &Connection, config: &CatalogConfig) -> io::Result<()> {
    let Some(movies) = load_or_report(conn)? else {
        return Ok(());
    };
    let options = SiteExportOptions {
        output_dir: "_site".into(),
        title: config.site_title_or_default(),
    };
    match export_site(&movies, &options) {
        Ok(path) => println!(
            "{}",
            format!("Website was generated successfully: {}", path.display()).green()
        ),
        Err(e) => println!("{}", format!("Error: {e}").red()),
    }
    Ok(())
}
