use thiserror::Error;

/// Failure surfaced by the storage gateway: connection, constraint, timeout,
/// or an undecodable row. One kind, underlying cause attached.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed row: {0}")]
    Decode(String),
}

/// Operation-level failures surfaced to callers of the resolvers.
#[derive(Error, Debug)]
pub enum HubError {
    /// Malformed input, rejected before any store call.
    #[error("validation error: {0}")]
    Validation(String),

    /// The store call ran but affected nothing.
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
