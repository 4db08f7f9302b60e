use std::fmt::Display;

use sea_orm::DbErr;

/// Marker stored when a failure carries no description of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error(transparent)]
    Db(#[from] DbErr),

    #[error(
        "database schema version {found} is newer than this build supports (max {supported})"
    )]
    UnsupportedDowngrade { found: i32, supported: i32 },

    #[error("no migration registered from schema version {0}")]
    MissingMigration(i32),
}

/// Creating or migrating the local schema failed; fatal at startup.
#[derive(Debug, thiserror::Error)]
#[error("storage initialization failed: {0}")]
pub struct StorageInitError(#[from] pub SchemaError);

impl From<DbErr> for StorageInitError {
    fn from(err: DbErr) -> Self {
        Self(SchemaError::Db(err))
    }
}

/// One named operation against the local store failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Failed to {operation}: {message}")]
pub struct QueryError {
    pub operation: &'static str,
    pub message: String,
}

impl QueryError {
    pub fn new(operation: &'static str, cause: impl Display) -> Self {
        let message = cause.to_string();
        let message = if message.trim().is_empty() { UNKNOWN_ERROR.to_string() } else { message };
        Self { operation, message }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("API request failed: {message}")]
    Api { message: String, status: Option<u16>, endpoint: String },

    #[error("Network request failed: {message}")]
    Network { message: String },
}

impl RemoteError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { status, .. } => *status,
            RemoteError::Network { .. } => None,
        }
    }

    /// 404s will not change on retry; everything else might.
    pub fn is_retryable(&self) -> bool {
        self.status() != Some(404)
    }
}

/// Any failure the store catches while reconciling with the remote service.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl SyncError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Query(_) => true,
            SyncError::Remote(err) => err.is_retryable(),
        }
    }
}
