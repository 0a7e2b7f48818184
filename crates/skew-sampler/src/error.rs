use thiserror::Error;

/// Errors raised by sampler construction, queries and fit analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("item {item} out of range for domain of {item_count} items")]
    OutOfRange { item: u64, item_count: u64 },
    #[error("empty sample")]
    EmptySample,
}

pub type Result<T> = std::result::Result<T, Error>;
