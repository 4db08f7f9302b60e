use std::time::Duration;

use migration::{SchemaManager, TARGET_VERSION};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use tracing::{debug, info};

use crate::error::{SchemaError, StorageInitError};

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Owned handle to the local SQLite store.
///
/// The pool is capped at one connection: all reads and writes go through a
/// single writer, and an in-memory database lives only as long as that
/// connection does.
pub struct Storage {
    db: DatabaseConnection,
}

impl Storage {
    /// Opens the database and brings its schema to [`TARGET_VERSION`].
    pub async fn open(database_url: &str) -> Result<Self, StorageInitError> {
        let mut options = ConnectOptions::new(database_url.to_string());
        options
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(false);

        let db = Database::connect(options).await?;

        for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"] {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }

        ensure_schema(&db).await?;
        debug!(url = %database_url, "storage ready");
        Ok(Self { db })
    }

    pub async fn open_in_memory() -> Result<Self, StorageInitError> {
        Self::open(IN_MEMORY_URL).await
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn close(self) -> Result<(), DbErr> {
        self.db.close().await
    }
}

/// Creates missing tables and indexes, then runs any upgrade steps between the
/// stored version and [`TARGET_VERSION`].
///
/// The version row is written only after every step has succeeded, so an
/// interrupted upgrade repeats from its starting version on the next open.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), SchemaError> {
    let manager = SchemaManager::new(db);
    migration::baseline().up(&manager).await?;

    let Some(stored) = stored_version(db).await? else {
        write_version(db, "INSERT INTO schema_version (version) VALUES (?)").await?;
        info!(version = TARGET_VERSION, "created schema");
        return Ok(());
    };

    if stored > TARGET_VERSION {
        return Err(SchemaError::UnsupportedDowngrade { found: stored, supported: TARGET_VERSION });
    }

    if stored == TARGET_VERSION {
        debug!(version = stored, "schema up to date");
        return Ok(());
    }

    info!(from = stored, to = TARGET_VERSION, "migrating schema");
    for version in stored..TARGET_VERSION {
        let step = migration::upgrade_from(version).ok_or(SchemaError::MissingMigration(version))?;
        debug!(step = step.name(), from = version, "applying migration");
        step.up(&manager).await?;
    }

    write_version(db, "UPDATE schema_version SET version = ?").await?;
    info!(version = TARGET_VERSION, "schema migrated");
    Ok(())
}

pub async fn stored_version(db: &DatabaseConnection) -> Result<Option<i32>, DbErr> {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT version FROM schema_version LIMIT 1".to_string(),
        ))
        .await?;

    row.map(|row| row.try_get::<i32>("", "version")).transpose()
}

async fn write_version(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        sql,
        [TARGET_VERSION.into()],
    ))
    .await?;
    Ok(())
}
