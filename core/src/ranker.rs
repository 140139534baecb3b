//! Relevance scoring over the content index.
//!
//! Every method scores only documents that contain at least one query term;
//! documents without a match are left out rather than scored zero.

use crate::document::{DocId, DocumentStore};
use crate::field_index::FieldIndexer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMethod {
    /// Number of distinct query terms found in the document.
    KeywordMatching,
    #[default]
    TfIdf,
    /// Cosine between query and document term-count vectors.
    CosineSimilarity,
}

/// `ln(N / (1 + df))`. Negative once a term is in nearly every document; not clamped.
pub fn idf(total_docs: usize, document_frequency: usize) -> f64 {
    (total_docs as f64 / (1 + document_frequency) as f64).ln()
}

pub fn score<S: AsRef<str>>(
    method: RankingMethod,
    query_terms: &[S],
    content: &FieldIndexer,
    store: &DocumentStore,
) -> HashMap<DocId, f64> {
    match method {
        RankingMethod::KeywordMatching => keyword_matching(query_terms, content),
        RankingMethod::TfIdf => tf_idf(query_terms, content, store),
        RankingMethod::CosineSimilarity => cosine_similarity(query_terms, content, store),
    }
}

/// Sums `tf * idf` per query term occurrence, with `tf = term_count / length`.
pub fn tf_idf<S: AsRef<str>>(
    query_terms: &[S],
    content: &FieldIndexer,
    store: &DocumentStore,
) -> HashMap<DocId, f64> {
    let total = store.len();
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for term in query_terms {
        let Some(entry) = content.lookup(term.as_ref()) else { continue };
        let idf_t = idf(total, entry.document_frequency());
        for p in entry.postings() {
            let Some(length) = store.length(p.doc_id).filter(|&l| l > 0) else { continue };
            let tf = f64::from(p.term_count) / length as f64;
            *scores.entry(p.doc_id).or_insert(0.0) += tf * idf_t;
        }
    }
    scores
}

pub fn keyword_matching<S: AsRef<str>>(query_terms: &[S], content: &FieldIndexer) -> HashMap<DocId, f64> {
    let distinct: BTreeSet<&str> = query_terms.iter().map(|t| t.as_ref()).collect();
    let mut scores: HashMap<DocId, f64> = HashMap::new();
    for entry in distinct.into_iter().filter_map(|t| content.lookup(t)) {
        for p in entry.postings() {
            *scores.entry(p.doc_id).or_insert(0.0) += 1.0;
        }
    }
    scores
}

pub fn cosine_similarity<S: AsRef<str>>(
    query_terms: &[S],
    content: &FieldIndexer,
    store: &DocumentStore,
) -> HashMap<DocId, f64> {
    let mut query_counts: HashMap<&str, u32> = HashMap::new();
    for term in query_terms {
        *query_counts.entry(term.as_ref()).or_insert(0) += 1;
    }

    // Terms unknown to the corpus have no dimension in the document space.
    let mut query_norm = 0.0f64;
    let mut dots: HashMap<DocId, f64> = HashMap::new();
    for (term, q_count) in &query_counts {
        let Some(entry) = content.lookup(term) else { continue };
        let q = f64::from(*q_count);
        query_norm += q * q;
        for p in entry.postings() {
            *dots.entry(p.doc_id).or_insert(0.0) += q * f64::from(p.term_count);
        }
    }
    let query_norm = query_norm.sqrt();

    dots.into_iter()
        .filter_map(|(doc_id, dot)| {
            let doc_norm = store.get(doc_id)?.norm;
            (doc_norm > 0.0 && query_norm > 0.0).then(|| (doc_id, dot / (query_norm * doc_norm)))
        })
        .collect()
}

/// Orders scores descending, breaking ties by ascending document id.
pub fn rank(scores: HashMap<DocId, f64>) -> Vec<(DocId, f64)> {
    let mut ranked: Vec<(DocId, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
}
