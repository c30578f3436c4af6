use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid date: {0} (expected DD/MM/YYYY)")]
    InvalidDate(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown transaction type: {0}")]
    UnknownType(String),

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
