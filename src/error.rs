use thiserror::Error;

/// A TL-B unpack shape violation, unknown tag, bad reference count, or
/// encoding failure encountered while turning a cell tree into schema
/// records. One failed bundle aborts the whole parse (see `Parser::parse`).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("block: {0}")]
    Block(String),
    #[error("message: {0}")]
    Message(String),
    #[error("transaction: {0}")]
    Transaction(String),
    #[error("transaction description: {0}")]
    Descr(String),
    #[error("phase: {0}")]
    Phase(String),
    #[error("account state: {0}")]
    Account(String),
    #[error("cell: {0}")]
    Cell(String),
}

impl ParseError {
    pub fn block(detail: impl Into<String>) -> Self {
        ParseError::Block(detail.into())
    }
    pub fn message(detail: impl Into<String>) -> Self {
        ParseError::Message(detail.into())
    }
    pub fn transaction(detail: impl Into<String>) -> Self {
        ParseError::Transaction(detail.into())
    }
    pub fn descr(detail: impl Into<String>) -> Self {
        ParseError::Descr(detail.into())
    }
    pub fn phase(detail: impl Into<String>) -> Self {
        ParseError::Phase(detail.into())
    }
    pub fn account(detail: impl Into<String>) -> Self {
        ParseError::Account(detail.into())
    }
}

impl From<everscale_types::error::Error> for ParseError {
    fn from(e: everscale_types::error::Error) -> Self {
        ParseError::Cell(e.to_string())
    }
}

/// Errors surfaced by the store: batch inserts, snapshot upserts, and
/// snapshot lookups.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("db error: {0}")]
    Db(String),
}

impl StoreError {
    pub fn db(detail: impl Into<String>) -> Self {
        StoreError::Db(detail.into())
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        StoreError::Db(e.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        StoreError::Db(e.to_string())
    }
}
