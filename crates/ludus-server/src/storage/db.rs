//! SQLite database handle for the Ludus backend.

use std::path::Path;

use ludus_core::db::{DatabaseError, open_pool, open_pool_in_memory};
use sqlx::{Pool, Sqlite};
use tracing::info;

#[derive(Clone)]
pub struct GameDatabase {
    pool: Pool<Sqlite>,
}

impl GameDatabase {
    /// Open or create the database at the given path and run migrations.
    pub async fn open(path: &Path) -> Result<Self, DatabaseError> {
        let pool = open_pool(path).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        let pool = open_pool_in_memory().await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        info!("Game database migrations complete");
        Ok(())
    }

    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
