//! Integration tests for static website export.

use assert_cmd::cargo::cargo_bin_cmd;
use cinelog::{Movie, open_db};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn seed_db(dir: &Path) -> PathBuf {
    let db_path = dir.join("movies.db");
    let conn = open_db(&db_path).unwrap();
    cinelog::add_movie(
        &conn,
        &Movie {
            title: "The Godfather".to_string(),
            year: 1972,
            rating: 9.2,
            poster_url: Some("https://example.com/godfather.jpg".to_string()),
        },
    )
    .unwrap();
    cinelog::add_movie(
        &conn,
        &Movie {
            title: "Heat".to_string(),
            year: 1995,
            rating: 8.3,
            poster_url: None,
        },
    )
    .unwrap();
    db_path
}

#[test]
fn test_export_creates_index() {
    let dir = TempDir::new().unwrap();
    let db_path = seed_db(dir.path());
    let site_dir = dir.path().join("site");

    let mut cmd = cargo_bin_cmd!("cinelog");
    cmd.args([
        "--db",
        db_path.to_str().unwrap(),
        "export",
        "--output",
        site_dir.to_str().unwrap(),
    ])
    .current_dir(dir.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("Website exported to"));

    let index_path = site_dir.join("index.html");
    assert!(index_path.exists(), "index.html should be created");

    let content = fs::read_to_string(&index_path).unwrap();
    assert!(content.contains("<!DOCTYPE html>"), "Should be valid HTML");
    assert!(
        content.contains("My favorite movies collection"),
        "Should contain the default title"
    );
    assert!(content.contains("The Godfather"), "Should list movies");
    assert!(
        content.contains("https://example.com/godfather.jpg"),
        "Should include poster URLs"
    );
}

#[test]
fn test_export_with_custom_title() {
    let dir = TempDir::new().unwrap();
    let db_path = seed_db(dir.path());
    let site_dir = dir.path().join("site");

    let mut cmd = cargo_bin_cmd!("cinelog");
    cmd.args([
        "--db",
        db_path.to_str().unwrap(),
        "export",
        "--output",
        site_dir.to_str().unwrap(),
        "--title",
        "Late Night Picks",
    ])
    .current_dir(dir.path())
    .assert()
    .success();

    let content = fs::read_to_string(site_dir.join("index.html")).unwrap();
    assert!(
        content.contains("Late Night Picks"),
        "Should contain custom title"
    );
}

#[test]
fn test_export_uses_placeholder_poster() {
    let dir = TempDir::new().unwrap();
    let db_path = seed_db(dir.path());
    let site_dir = dir.path().join("site");

    let mut cmd = cargo_bin_cmd!("cinelog");
    cmd.args([
        "--db",
        db_path.to_str().unwrap(),
        "export",
        "--output",
        site_dir.to_str().unwrap(),
    ])
    .current_dir(dir.path())
    .assert()
    .success();

    let content = fs::read_to_string(site_dir.join("index.html")).unwrap();
    assert!(
        content.contains("dummyimage.com/128x193"),
        "Movies without posters should fall back to the placeholder"
    );
}

#[test]
fn test_export_links_to_imdb_search() {
    let dir = TempDir::new().unwrap();
    let db_path = seed_db(dir.path());
    let site_dir = dir.path().join("site");

    let mut cmd = cargo_bin_cmd!("cinelog");
    cmd.args([
        "--db",
        db_path.to_str().unwrap(),
        "export",
        "--output",
        site_dir.to_str().unwrap(),
    ])
    .current_dir(dir.path())
    .assert()
    .success();

    let content = fs::read_to_string(site_dir.join("index.html")).unwrap();
    assert!(content.contains("https://www.imdb.com/find?q=The+Godfather"));
}
