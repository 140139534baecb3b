use crate::document::{DocId, Document, DocumentStore};
use crate::error::Result;
use crate::field_index::{Field, FieldIndexer};
use crate::hash_table::DEFAULT_CAPACITY;
use crate::normalizer::{Lemmatizer, Mode, Normalizer, NormalizerConfig, SnowballLemmatizer};
use crate::ranker::{self, RankingMethod};
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Initial bucket count of each field's hash table.
    pub initial_capacity: usize,
    pub normalizer: NormalizerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { initial_capacity: DEFAULT_CAPACITY, normalizer: NormalizerConfig::default() }
    }
}

/// Write-once, read-many search engine over a title index and a content index.
pub struct SearchEngine {
    store: DocumentStore,
    titles: FieldIndexer,
    content: FieldIndexer,
    normalizer: Normalizer,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    /// Default configuration with the Snowball lemmatizer.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default(), SnowballLemmatizer)
    }

    pub fn with_config(config: EngineConfig, lemmatizer: impl Lemmatizer + 'static) -> Self {
        Self {
            store: DocumentStore::new(),
            titles: FieldIndexer::with_capacity(Field::Title, config.initial_capacity),
            content: FieldIndexer::with_capacity(Field::Content, config.initial_capacity),
            normalizer: Normalizer::new(config.normalizer, lemmatizer),
        }
    }

    /// Stores the document under the next id and indexes both fields.
    ///
    /// Both indexes grow before the document is stored. If either cannot grow, the
    /// error is returned and the engine is left exactly as it was.
    pub fn add_document(&mut self, title: &str, content: &str) -> Result<DocId> {
        let title_terms: Vec<String> = self.normalizer.normalize(title, Mode::Plain).collect();
        let content_terms: Vec<String> = self.normalizer.normalize(content, Mode::NounFiltered).collect();
        self.titles.reserve_for(&title_terms)?;
        self.content.reserve_for(&content_terms)?;

        let mut counts: HashMap<&str, u32> = HashMap::new();
        for term in &content_terms {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }
        let norm = counts.values().map(|c| f64::from(*c).powi(2)).sum::<f64>().sqrt();

        let doc_id = self.store.insert(title.to_string(), content.to_string(), content_terms.len(), norm);
        for term in &title_terms {
            self.titles.insert(term, doc_id)?;
        }
        for term in &content_terms {
            self.content.insert(term, doc_id)?;
        }
        trace!(doc_id, length = content_terms.len(), "indexed document");
        Ok(doc_id)
    }

    pub fn search_by_title(&self, query: &str) -> BTreeSet<DocId> {
        self.titles.documents_containing(self.normalizer.normalize(query, Mode::Plain))
    }

    pub fn search_by_content(&self, query: &str) -> BTreeSet<DocId> {
        self.content.documents_containing(self.normalizer.normalize(query, Mode::Plain))
    }

    /// TF-IDF ranking over the content index.
    pub fn ranked_search(&self, query: &str) -> Vec<(DocId, f64)> {
        self.rank(query, RankingMethod::TfIdf)
    }

    pub fn rank(&self, query: &str, method: RankingMethod) -> Vec<(DocId, f64)> {
        let terms: Vec<String> = self.normalizer.normalize(query, Mode::Plain).collect();
        if terms.is_empty() {
            return Vec::new();
        }
        ranker::rank(ranker::score(method, terms.as_slice(), &self.content, &self.store))
    }

    pub fn get_document(&self, doc_id: DocId) -> Option<&Document> {
        self.store.get(doc_id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.store.iter()
    }

    pub fn index(&self, field: Field) -> &FieldIndexer {
        match field {
            Field::Title => &self.titles,
            Field::Content => &self.content,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
