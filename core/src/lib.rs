//! In-memory full-text search: a chained hash table, field-aware inverted
//! indexes built on it, a text normalizer and TF-IDF ranking.

pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod field_index;
pub mod hash_table;
pub mod normalizer;
pub mod ranker;

pub use document::{DocId, Document, DocumentStore};
pub use engine::{EngineConfig, SearchEngine};
pub use error::{Result, SearchError};
pub use field_index::{Field, FieldIndexer, IndexEntry, Posting};
pub use hash_table::ChainedHashTable;
pub use normalizer::{
    IdentityLemmatizer, Lemmatizer, Mode, Normalizer, NormalizerConfig, SnowballLemmatizer,
};
pub use ranker::RankingMethod;
