//! Shared helpers for the crate's unit tests.

use std::sync::{Arc, Mutex};

use filmsearch_core::Film;

use crate::error::DbError;
use crate::loader::load_films;
use crate::observer::FailureObserver;
use crate::{Database, DbConfig};

/// The three-film catalog used throughout the repository tests.
pub(crate) const SAMPLE_CATALOG: &[(&str, i32, &str)] = &[
    ("Alpha", 2001, "Action"),
    ("Beta", 2001, "Drama"),
    ("Gamma", 2010, "Action"),
];

pub(crate) fn film(title: &str, year: i32, category: &str) -> Film {
    Film {
        title: title.to_string(),
        release_year: Some(year),
        rating: Some("PG".to_string()),
        length: Some(100),
        description: Some(format!("A film called {title}")),
        category: category.to_string(),
    }
}

/// Fresh in-memory database with the schema applied and no films.
pub(crate) async fn catalog_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// Fresh database loaded with `films`.
pub(crate) async fn seeded_db(films: &[(&str, i32, &str)]) -> Database {
    let db = catalog_db().await;
    let films: Vec<Film> = films
        .iter()
        .map(|(title, year, category)| film(title, *year, category))
        .collect();
    load_films(db.pool(), &films).await.unwrap();
    db
}

/// Database whose failures are captured by a [`RecordingObserver`].
pub(crate) async fn observed_db(
    films: &[(&str, i32, &str)],
) -> (Database, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    let db = seeded_db(films).await.with_observer(observer.clone());
    (db, observer)
}

/// Drops a table so every query touching it fails.
pub(crate) async fn drop_table(db: &Database, table: &str) {
    sqlx::query(&format!("DROP TABLE {table}"))
        .execute(db.pool())
        .await
        .unwrap();
}

/// Observer that remembers which operations were degraded.
#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    events: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingObserver {
    pub(crate) fn operations(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(op, _)| *op).collect()
    }
}

impl FailureObserver for RecordingObserver {
    fn degraded(&self, operation: &'static str, error: &DbError) {
        self.events
            .lock()
            .unwrap()
            .push((operation, error.to_string()));
    }
}
