//! # Seed Data Generator
//!
//! Populates the database with a demo film catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./filmsearch_dev.db (or $FILMSEARCH_DB_PATH when set)
//! cargo run -p filmsearch-db --bin seed
//!
//! # Specify database path
//! cargo run -p filmsearch-db --bin seed -- --db ./data/catalog.db
//!
//! # Print the catalog overview as JSON afterwards
//! cargo run -p filmsearch-db --bin seed -- --json
//! ```
//!
//! ## Generated Films
//! Every title in [`CATALOG`] is loaded once under its category, with a
//! release year spread over 1975-2024 and a rotating rating and length.
//! Seeding is skipped when the catalog already holds films.

use std::env;

use tracing_subscriber::EnvFilter;

use filmsearch_core::Film;
use filmsearch_db::loader::{catalog_size, load_films};
use filmsearch_db::{catalog_overview, Database, DbConfig};

const DEFAULT_DB_PATH: &str = "./filmsearch_dev.db";

/// Demo categories and the titles filed under them.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Action",
        &[
            "Academy Dinosaur",
            "Bright Encounters",
            "Clash Freddy",
            "Drifter Commandments",
            "Excitement Eve",
            "Forrest Sons",
            "Grosse Wonderful",
            "Harbor Assassin",
        ],
    ),
    (
        "Comedy",
        &[
            "Airplane Sierra",
            "Bunch Minds",
            "Caper Motions",
            "Daisy Menagerie",
            "Elephant Trojan",
            "Flintstones Happiness",
        ],
    ),
    (
        "Drama",
        &[
            "Apocalypse Flamingos",
            "Blade Polish",
            "Chitty Lock",
            "Dancing Fever",
            "Empire Malkovich",
            "Gilbert Pelican",
            "Hanover Galaxy",
        ],
    ),
    (
        "Horror",
        &[
            "Alabama Devil",
            "Backlash Undefeated",
            "Carrie Bunch",
            "Dynamite Tarzan",
            "Eyes Driving",
        ],
    ),
    (
        "Sci-Fi",
        &[
            "Alien Center",
            "Barbarella Streetcar",
            "Cheaper Clyde",
            "Divine Resurrection",
            "Engagement Matrix",
            "Frontier Cabin",
        ],
    ),
    (
        "Documentary",
        &[
            "Affair Prejudice",
            "Beach Heartbreakers",
            "Coast Rainbow",
            "Deep Crusade",
        ],
    ),
];

/// Ratings assigned in rotation.
const RATINGS: &[&str] = &["G", "PG", "PG-13", "R", "NC-17"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<String> = None;
    let mut print_json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--json" | "-j" => print_json = true,
            "--help" | "-h" => {
                println!("Film Search Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path");
                println!("                     (default: $FILMSEARCH_DB_PATH, else {DEFAULT_DB_PATH})");
                println!("  -j, --json         Print the catalog overview as JSON");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {other}"),
        }
        i += 1;
    }

    let config = match db_path {
        Some(path) => DbConfig::new(path),
        None => DbConfig::from_env_or(DEFAULT_DB_PATH)?,
    };

    println!("🎬 Film Search Seed Data Generator");
    println!("==================================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = catalog_size(db.pool()).await?;
    if existing > 0 {
        println!("⚠ Catalog already has {existing} films");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
    } else {
        let films = demo_films();
        let start = std::time::Instant::now();
        let loaded = load_films(db.pool(), &films).await?;
        println!("✓ Loaded {loaded} films in {:?}", start.elapsed());
    }

    let overview = catalog_overview(&db.films(), &db.analytics()).await?;

    println!();
    println!("Catalog overview:");
    println!(
        "  Years: {} - {}",
        overview.years.min_year, overview.years.max_year
    );
    for stat in &overview.categories {
        println!(
            "  {:<12} {:>3} films  ({}-{})",
            stat.name,
            stat.film_count,
            stat.min_year.map(|y| y.to_string()).unwrap_or_default(),
            stat.max_year.map(|y| y.to_string()).unwrap_or_default(),
        );
    }

    if print_json {
        println!();
        println!("{}", serde_json::to_string_pretty(&overview)?);
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,filmsearch=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}

/// Expands [`CATALOG`] into films with deterministic details.
fn demo_films() -> Vec<Film> {
    CATALOG
        .iter()
        .flat_map(|(category, titles)| titles.iter().map(move |title| (*category, *title)))
        .enumerate()
        .map(|(seed, (category, title))| Film {
            title: title.to_string(),
            release_year: Some(1975 + ((seed * 7) % 50) as i32),
            rating: Some(RATINGS[seed % RATINGS.len()].to_string()),
            length: Some(80 + ((seed * 13) % 90) as i32),
            description: Some(format!("A {} about {}", category.to_lowercase(), title)),
            category: category.to_string(),
        })
        .collect()
}
