//! # Database Pool Management
//!
//! Connection pool creation, configuration, and scoped connection access.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Process Startup                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from_env() / DbConfig::new(path) ← explicit configuration   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │  with_connection(|conn| ...) per repository call               │
//! │       ▼                                                                 │
//! │  Request 1 ──► acquires Conn1 ──► query ──► Conn1 back in pool         │
//! │  Request 2 ──► acquires Conn2 ──► query ──► Conn2 back in pool         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so analytics writes do
//! not block catalog reads.

use std::env;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions,
    SqliteSynchronous,
};
use sqlx::SqlitePool;
use tracing::{debug, error, info};

use crate::error::{ConfigError, DbError, DbResult};
use crate::functions;
use crate::migrations;
use crate::observer::{FailureObserver, TracingObserver};
use crate::repository::analytics::SearchAnalyticsRepository;
use crate::repository::film::FilmRepository;

/// Future returned by a [`Database::with_connection`] operation.
pub type ConnFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, sqlx::Error>> + Send + 'c>>;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// Built once at process startup and handed to [`Database::new`]; nothing
/// in this crate reads connection settings from global state.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/filmsearch/catalog.db")
///     .max_connections(8)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection before failing.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Environment variable holding the database file path (required).
    pub const ENV_PATH: &'static str = "FILMSEARCH_DB_PATH";
    /// Environment variable overriding `max_connections`.
    pub const ENV_MAX_CONNECTIONS: &'static str = "FILMSEARCH_DB_MAX_CONNECTIONS";
    /// Environment variable overriding `connect_timeout`, in seconds.
    pub const ENV_CONNECT_TIMEOUT_SECS: &'static str = "FILMSEARCH_DB_CONNECT_TIMEOUT_SECS";

    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// ## Variables
    /// - `FILMSEARCH_DB_PATH` - required
    /// - `FILMSEARCH_DB_MAX_CONNECTIONS` - optional, default 5
    /// - `FILMSEARCH_DB_CONNECT_TIMEOUT_SECS` - optional, default 30
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(Self::ENV_PATH)
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired(Self::ENV_PATH.to_string()))?;

        let mut config = DbConfig::new(path);

        if let Some(raw) = lookup(Self::ENV_MAX_CONNECTIONS) {
            config.max_connections = raw
                .trim()
                .parse()
                .ok()
                .filter(|n: &u32| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue(Self::ENV_MAX_CONNECTIONS.to_string()))?;
        }

        if let Some(raw) = lookup(Self::ENV_CONNECT_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::InvalidValue(Self::ENV_CONNECT_TIMEOUT_SECS.to_string())
            })?;
            config.connect_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Like [`from_env`](Self::from_env), but uses `default_path` when
    /// `FILMSEARCH_DB_PATH` is unset or blank.
    ///
    /// Invalid optional settings are still errors.
    pub fn from_env_or(default_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::from_lookup_or(|key| env::var(key).ok(), default_path)
    }

    /// Same as [`from_env_or`](Self::from_env_or) with a custom variable source.
    pub fn from_lookup_or<F>(lookup: F, default_path: impl Into<PathBuf>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_path = default_path.into();
        let default_path = default_path.to_string_lossy();

        Self::from_lookup(|key| {
            let value = lookup(key);
            let blank = value.as_deref().map_or(true, |v| v.trim().is_empty());
            if key == Self::ENV_PATH && blank {
                Some(default_path.to_string())
            } else {
                value
            }
        })
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Database handle: connection provider plus repository access.
///
/// Cheap to clone; clones share the pool and the failure observer.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::from_env()?).await?;
///
/// let films = db.films().list_new_releases(0).await?;
/// db.analytics().record_query("Matrix").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Receives degraded query failures.
    observer: Arc<dyn FailureObserver>,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL, NORMAL synchronous, foreign keys
    /// 3. Creates the connection pool, registering `unicode_lower` on each
    ///    new connection
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        // sqlite://path creates file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .after_connect(|conn, _meta| Box::pin(async move { functions::register(conn).await }))
            .connect_with(connect_options)
            .await
            .map_err(DbError::acquire)?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            observer: Arc::new(TracingObserver),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Replaces the failure observer (default: [`TracingObserver`]).
    pub fn with_observer(mut self, observer: Arc<dyn FailureObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs database migrations.
    ///
    /// Idempotent: applied migrations are tracked in `_sqlx_migrations`.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For loaders and diagnostics. Read paths go through
    /// [`with_connection`](Self::with_connection).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) fn observer(&self) -> &dyn FailureObserver {
        self.observer.as_ref()
    }

    /// Runs `operation` on one pooled connection.
    ///
    /// ## Guarantees
    /// - Exactly one connection is acquired per call
    /// - The connection goes back to the pool on every exit path (it is
    ///   released when the guard drops, including on error and panic)
    /// - Acquisition failures are logged and returned as
    ///   `ConnectionFailed`/`PoolExhausted`, without retrying
    /// - Errors from `operation` itself are converted with `DbError::from`
    ///
    /// ## Example
    /// ```rust,ignore
    /// let n: i64 = db
    ///     .with_connection(|conn| Box::pin(async move {
    ///         sqlx::query_scalar("SELECT COUNT(*) FROM film").fetch_one(conn).await
    ///     }))
    ///     .await?;
    /// ```
    pub async fn with_connection<T, F>(&self, operation: F) -> DbResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> ConnFuture<'c, T>,
    {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            error!(error = %e, "Failed to acquire database connection");
            DbError::acquire(e)
        })?;

        let result = operation(&mut *conn).await;
        drop(conn);

        result.map_err(DbError::from)
    }

    /// Returns the film repository.
    pub fn films(&self) -> FilmRepository {
        FilmRepository::new(self.clone())
    }

    /// Returns the search analytics repository.
    pub fn analytics(&self) -> SearchAnalyticsRepository {
        SearchAnalyticsRepository::new(self.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, every repository call fails with
    /// `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("FILMSEARCH_DB_PATH", "/data/catalog.db"),
            ("FILMSEARCH_DB_MAX_CONNECTIONS", "8"),
            ("FILMSEARCH_DB_CONNECT_TIMEOUT_SECS", "3"),
        ]);

        let config = DbConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/data/catalog.db"));
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(config.run_migrations);
    }

    #[test]
    fn test_config_from_lookup_errors() {
        let missing = DbConfig::from_lookup(|_| None);
        assert!(matches!(missing, Err(ConfigError::MissingRequired(_))));

        let bad_pool = DbConfig::from_lookup(|k| match k {
            "FILMSEARCH_DB_PATH" => Some("catalog.db".to_string()),
            "FILMSEARCH_DB_MAX_CONNECTIONS" => Some("zero".to_string()),
            _ => None,
        });
        assert!(matches!(bad_pool, Err(ConfigError::InvalidValue(_))));

        let zero_pool = DbConfig::from_lookup(|k| match k {
            "FILMSEARCH_DB_PATH" => Some("catalog.db".to_string()),
            "FILMSEARCH_DB_MAX_CONNECTIONS" => Some("0".to_string()),
            _ => None,
        });
        assert!(matches!(zero_pool, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_config_default_path_only_replaces_missing_path() {
        let config = DbConfig::from_lookup_or(|_| None, "fallback.db").unwrap();
        assert_eq!(config.database_path, PathBuf::from("fallback.db"));

        let config = DbConfig::from_lookup_or(
            |k| (k == "FILMSEARCH_DB_PATH").then(|| "/data/catalog.db".to_string()),
            "fallback.db",
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/data/catalog.db"));

        // A bad optional setting is reported, never papered over by the default
        let bad_pool = DbConfig::from_lookup_or(
            |k| (k == "FILMSEARCH_DB_MAX_CONNECTIONS").then(|| "abc".to_string()),
            "fallback.db",
        );
        assert!(matches!(bad_pool, Err(ConfigError::InvalidValue(_))));
    }

    #[tokio::test]
    async fn test_with_connection_runs_operation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let answer: i64 = db
            .with_connection(|conn| {
                Box::pin(async move { sqlx::query_scalar::<_, i64>("SELECT 41 + 1").fetch_one(conn).await })
            })
            .await
            .unwrap();

        assert_eq!(answer, 42);
    }

    #[tokio::test]
    async fn test_with_connection_releases_after_failure() {
        // Single-connection pool: a leaked connection would make the second
        // call time out.
        let db = Database::new(DbConfig::in_memory().connect_timeout(Duration::from_secs(1)))
            .await
            .unwrap();

        let failed: DbResult<i64> = db
            .with_connection(|conn| {
                Box::pin(async move {
                    sqlx::query_scalar::<_, i64>("SELECT * FROM no_such_table")
                        .fetch_one(conn)
                        .await
                })
            })
            .await;
        assert!(matches!(failed, Err(DbError::QueryFailed(_))));

        let ok: i64 = db
            .with_connection(|conn| {
                Box::pin(async move { sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(conn).await })
            })
            .await
            .unwrap();
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn test_with_connection_on_closed_pool() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let result: DbResult<i64> = db
            .with_connection(|conn| {
                Box::pin(async move { sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(conn).await })
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_connection_failure(), "{err:?}");
    }
}
