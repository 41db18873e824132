use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid document store configuration: {0}")]
    ConnectionConfigError(String),

    #[error("Document store operation failed: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Failed to convert a payload into a document: {0}")]
    BsonSerialization(#[from] bson::ser::Error),

    #[error("The store assigned a non-ObjectId identifier in collection '{0}'")]
    UnexpectedIdentifier(&'static str),

    #[error("A stored document is missing an expected field: {0}")]
    MalformedDocument(#[from] bson::document::ValueAccessError),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Malformed identifiers, dates or batch entries.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness check matched an existing record.
    #[error("{0}")]
    Conflict(String),

    /// A referenced student or course does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        DbError::Validation(err.to_string())
    }
}
