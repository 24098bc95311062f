use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Opening the SQLite file or running a statement failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("Schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Stored records could not be encoded: {0}")]
    Json(#[from] serde_json::Error),

    /// The stored payload is not a record list; it is left as is until cleared.
    #[error("Stored records under '{key}' are unreadable; clear them before saving: {source}")]
    Unreadable {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
