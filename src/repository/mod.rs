//! Repository layer for database operations

pub mod books;
pub mod borrows;

use std::str::FromStr;
use std::time::Duration;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Sqlite, Transaction,
};

use crate::{config::DatabaseConfig, error::AppResult};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Reader and writer pools over the same SQLite database
#[derive(Clone)]
pub struct DbPools {
    pub reader: Pool<Sqlite>,
    /// Single connection; every write transaction runs here, one at a time
    pub writer: Pool<Sqlite>,
}

/// True for URLs whose database lives inside one connection
fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Open the pools for the configured SQLite database.
///
/// SQLite allows one writer at a time and a deferred transaction that
/// upgrades to a writer fails with `SQLITE_BUSY` instead of waiting, so
/// writes queue for the single writer connection while reads use the
/// reader pool. An in-memory database lives inside a single connection,
/// so both pools are the same one-connection pool that is never recycled.
pub async fn connect(config: &DatabaseConfig) -> AppResult<DbPools> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    let acquire_timeout = Duration::from_secs(config.busy_timeout_secs.max(1) * 2);

    if is_in_memory(&config.url) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await?;
        return Ok(DbPools {
            reader: pool.clone(),
            writer: pool,
        });
    }

    let writer = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(acquire_timeout)
        .connect_with(options.clone())
        .await?;

    let reader = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await?;

    Ok(DbPools { reader, writer })
}

/// Main repository struct holding the database pools
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    writer: Pool<Sqlite>,
    pub books: books::BooksRepository,
    pub borrows: borrows::BorrowsRepository,
}

impl Repository {
    /// Create a new repository over the given pools
    pub fn new(pools: DbPools) -> Self {
        let DbPools { reader, writer } = pools;
        Self {
            books: books::BooksRepository::new(reader.clone()),
            borrows: borrows::BorrowsRepository::new(reader.clone()),
            pool: reader,
            writer,
        }
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> AppResult<()> {
        MIGRATOR
            .run(&self.writer)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(())
    }

    /// Start a write transaction on the writer connection; dropping it
    /// without commit rolls back
    pub async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        Ok(self.writer.begin().await?)
    }

    /// Check that the store answers
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:catalog?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://bookshelf.db"));
        assert!(!is_in_memory("sqlite:data/bookshelf.db?mode=rwc"));
    }
}
