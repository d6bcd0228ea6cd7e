//! # Catalog Loader
//!
//! Inserts films into the catalog tables. The running application never
//! writes the catalog; this exists for the `seed` binary and for tests that
//! need a known catalog.

use sqlx::SqlitePool;
use tracing::debug;

use filmsearch_core::Film;

use crate::error::{DbError, DbResult};

/// Inserts one film, creating its category on first use.
///
/// Runs in a single transaction: a film is never left without its
/// category link.
pub async fn insert_film(pool: &SqlitePool, film: &Film) -> DbResult<()> {
    debug!(title = %film.title, category = %film.category, "Loading film");

    let mut tx = pool.begin().await.map_err(DbError::acquire)?;

    sqlx::query("INSERT INTO category (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
        .bind(&film.category)
        .execute(&mut *tx)
        .await?;

    let category_id: i64 = sqlx::query_scalar("SELECT category_id FROM category WHERE name = ?1")
        .bind(&film.category)
        .fetch_one(&mut *tx)
        .await?;

    let film_id = sqlx::query(
        r#"
        INSERT INTO film (title, release_year, rating, length, description)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&film.title)
    .bind(film.release_year)
    .bind(film.rating.as_deref())
    .bind(film.length)
    .bind(film.description.as_deref())
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    sqlx::query("INSERT INTO film_category (film_id, category_id) VALUES (?1, ?2)")
        .bind(film_id)
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Inserts films in order; returns how many were loaded.
pub async fn load_films(pool: &SqlitePool, films: &[Film]) -> DbResult<usize> {
    for film in films {
        insert_film(pool, film).await?;
    }
    Ok(films.len())
}

/// Number of films in the catalog.
pub async fn catalog_size(pool: &SqlitePool) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM film")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog_db, film};

    #[tokio::test]
    async fn test_categories_are_shared() {
        let db = catalog_db().await;

        insert_film(db.pool(), &film("Alpha", 2001, "Action")).await.unwrap();
        insert_film(db.pool(), &film("Gamma", 2010, "Action")).await.unwrap();

        let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(categories, 1);
        assert_eq!(catalog_size(db.pool()).await.unwrap(), 2);
    }
}
