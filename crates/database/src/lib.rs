//! SQLite persistence layer for Slayd Bot.
//!
//! This crate provides async database operations for the user ledger
//! (credits and referrals) and per-user conversation state using SQLx with
//! SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, NewUser, user};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:slayd.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Sign up a user; repeated calls are no-ops
//!     user::create_user(db.pool(), &NewUser::new(123456789)).await?;
//!     let spent = user::debit_credit(db.pool(), 123456789).await?;
//!     assert!(spent);
//!
//!     Ok(())
//! }
//! ```

pub mod conversation_state;
pub mod error;
pub mod models;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{ConversationRecord, NewUser, User};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent update handlers.
    pub const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/slayd.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_is_repeatable() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();

        assert_eq!(user::count_users(db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ledger_and_state_roundtrip() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        user::create_user(db.pool(), &NewUser::new(77)).await.unwrap();
        conversation_state::upsert_state(db.pool(), 77, "awaiting_name", "{}")
            .await
            .unwrap();

        let fetched = user::get_user(db.pool(), 77).await.unwrap().unwrap();
        assert_eq!(fetched.referral_code, user::referral_code_for(77));

        let state = conversation_state::get_state(db.pool(), 77)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.step, "awaiting_name");

        db.close().await;
    }
}
