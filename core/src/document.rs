use serde::{Deserialize, Serialize};

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub content: String,
    /// Number of normalized content terms, fixed at ingestion.
    pub length: usize,
    /// Euclidean norm of the content term-count vector, fixed at ingestion.
    pub norm: f64,
}

/// Documents in ingestion order. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> DocId {
        self.docs.len() as DocId + 1
    }

    pub fn insert(&mut self, title: String, content: String, length: usize, norm: f64) -> DocId {
        let id = self.next_id();
        self.docs.push(Document { id, title, content, length, norm });
        id
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        self.docs.get(idx)
    }

    pub fn length(&self, id: DocId) -> Option<usize> {
        self.get(id).map(|d| d.length)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> + '_ {
        self.docs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_from_one() {
        let mut store = DocumentStore::new();
        assert_eq!(store.insert("a".into(), "x".into(), 1, 1.0), 1);
        assert_eq!(store.insert("b".into(), "y".into(), 2, 1.0), 2);
        assert_eq!(store.get(2).unwrap().title, "b");
        assert_eq!(store.length(1), Some(1));
        assert!(store.get(0).is_none());
        assert!(store.get(3).is_none());
        assert_eq!(store.next_id(), 3);
    }
}
