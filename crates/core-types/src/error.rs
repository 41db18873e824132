use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("No data provided")]
    EmptyPayload,

    #[error("Missing required fields: {0}")]
    MissingFields(&'static str),

    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDate(String),
}
