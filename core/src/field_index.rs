use crate::document::DocId;
use crate::error::Result;
use crate::hash_table::ChainedHashTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which part of a document a term was indexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_count: u32, // occurrences of the term in this document's field
}

/// Postings for one term. `document_frequency` always equals `postings.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexEntry {
    postings: BTreeMap<DocId, Posting>,
    document_frequency: usize,
}

impl IndexEntry {
    pub fn postings(&self) -> impl Iterator<Item = &Posting> + '_ {
        self.postings.values()
    }

    pub fn posting(&self, doc_id: DocId) -> Option<&Posting> {
        self.postings.get(&doc_id)
    }

    pub fn document_frequency(&self) -> usize {
        self.document_frequency
    }

    fn record(&mut self, doc_id: DocId) {
        self.postings
            .entry(doc_id)
            .and_modify(|p| p.term_count += 1)
            .or_insert(Posting { doc_id, term_count: 1 });
        self.document_frequency = self.postings.len();
    }
}

/// Inverted index for a single field, keyed by normalized term.
#[derive(Debug, Clone)]
pub struct FieldIndexer {
    field: Field,
    terms: ChainedHashTable<String, IndexEntry>,
}

impl FieldIndexer {
    pub fn new(field: Field) -> Self {
        Self { field, terms: ChainedHashTable::new() }
    }

    pub fn with_capacity(field: Field, capacity: usize) -> Self {
        Self { field, terms: ChainedHashTable::with_capacity(capacity) }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Records one occurrence of `term` in `doc_id`.
    pub fn insert(&mut self, term: &str, doc_id: DocId) -> Result<()> {
        self.terms
            .get_or_insert_with(term.to_string(), IndexEntry::default)?
            .record(doc_id);
        Ok(())
    }

    /// Makes room for every term of `terms` not yet indexed, so inserting them afterwards cannot fail.
    pub fn reserve_for<I, S>(&mut self, terms: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fresh: BTreeSet<String> = terms
            .into_iter()
            .filter(|t| !self.terms.contains_key(t.as_ref()))
            .map(|t| t.as_ref().to_string())
            .collect();
        self.terms.reserve(fresh.len())
    }

    /// `None` means the term was never indexed in this field.
    pub fn lookup(&self, term: &str) -> Option<&IndexEntry> {
        self.terms.get(term)
    }

    /// Union of the documents containing any of `terms`.
    pub fn documents_containing<I, S>(&self, terms: I) -> BTreeSet<DocId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        terms
            .into_iter()
            .filter_map(|t| self.lookup(t.as_ref()))
            .flat_map(|entry| entry.postings.keys().copied())
            .collect()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.terms.capacity()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &IndexEntry)> + '_ {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }
}
