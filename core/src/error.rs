use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The hash table could not grow; the table is left as it was before the resize.
    #[error("hash table could not grow from {current} to {requested} buckets")]
    CapacityFault { current: usize, requested: usize },
}
