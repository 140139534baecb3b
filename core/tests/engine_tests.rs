use docsearch_core::{EngineConfig, Field, IdentityLemmatizer, RankingMethod, SearchEngine};
use std::collections::BTreeSet;

fn sample_engine() -> SearchEngine {
    let mut engine = SearchEngine::new();
    engine.add_document("Cats and Dogs", "The cat sat on the mat. The dog barked.").unwrap();
    engine.add_document("Dog Care", "Dogs need water and food daily.").unwrap();
    engine.add_document("Gold Mining", "Gold is a material found in rock.").unwrap();
    engine
}

#[test]
fn ranked_dog_query_excludes_gold() {
    let engine = sample_engine();
    let ranked = engine.ranked_search("dog");
    let ids: Vec<u32> = ranked.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![1, 2]);
    // df = 2 of 3 documents, so idf = ln(3 / 3) = 0 and the tie falls back to id order.
    assert!(ranked.iter().all(|(_, score)| score.abs() < 1e-12));
}

#[test]
fn title_search_for_gold() {
    let engine = sample_engine();
    assert_eq!(engine.search_by_title("gold"), BTreeSet::from([3]));
    assert_eq!(engine.search_by_title("dogs"), BTreeSet::from([1, 2]));
}

#[test]
fn content_search_is_or_semantics() {
    let engine = sample_engine();
    assert_eq!(engine.search_by_content("rock"), BTreeSet::from([3]));
    assert_eq!(engine.search_by_content("cat rock"), BTreeSet::from([1, 3]));
    assert!(engine.search_by_content("barked").is_empty());
}

#[test]
fn ranked_results_always_match_a_term() {
    let engine = sample_engine();
    for query in ["dog", "gold water", "cat", "mat rock food", "nothing here", "the"] {
        let terms: Vec<String> = engine.normalizer().normalize(query, docsearch_core::Mode::Plain).collect();
        for method in [RankingMethod::TfIdf, RankingMethod::KeywordMatching, RankingMethod::CosineSimilarity] {
            for (id, _) in engine.rank(query, method) {
                let content = engine.index(Field::Content);
                assert!(
                    terms.iter().any(|t| content.lookup(t).and_then(|e| e.posting(id)).is_some()),
                    "{method:?} returned doc {id} for {query:?} without a matching term"
                );
            }
        }
    }
}

#[test]
fn rare_terms_outrank_common_ones() {
    let engine = sample_engine();
    let ranked = engine.ranked_search("cat dog");
    assert_eq!(ranked[0].0, 1);
    assert!(ranked[0].1 > 0.0);
}

#[test]
fn majority_terms_produce_negative_scores() {
    let mut engine = SearchEngine::with_config(EngineConfig::default(), IdentityLemmatizer);
    for body in ["Water flows.", "Water and stone.", "Water, sand and clay."] {
        engine.add_document("t", body).unwrap();
    }
    let ranked = engine.ranked_search("water");
    assert_eq!(ranked.len(), 3);
    assert!(ranked.iter().all(|(_, s)| *s < 0.0));
    // tf: 1/1, 1/2, 1/3, so the longest document is least penalized
    assert_eq!(ranked.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![3, 2, 1]);
}

#[test]
fn term_counts_match_occurrences() {
    let mut engine = SearchEngine::with_config(EngineConfig::default(), IdentityLemmatizer);
    let id = engine.add_document("Gold gold GOLD", "Gold, gold and more gold. The gold!").unwrap();
    let title = engine.index(Field::Title).lookup("gold").unwrap();
    assert_eq!(title.posting(id).unwrap().term_count, 3);
    let content = engine.index(Field::Content).lookup("gold").unwrap();
    assert_eq!(content.posting(id).unwrap().term_count, 4);
    assert_eq!(content.document_frequency(), 1);
}

#[test]
fn small_initial_capacity_grows_with_vocabulary() {
    let config = EngineConfig { initial_capacity: 16, ..EngineConfig::default() };
    let mut engine = SearchEngine::with_config(config, IdentityLemmatizer);
    let title: Vec<String> = (0..20).map(|i| format!("word{i}")).collect();
    engine.add_document(&title.join(" "), "").unwrap();
    assert_eq!(engine.index(Field::Title).len(), 20);
    assert_eq!(engine.index(Field::Title).capacity(), 32);
    for word in &title {
        assert_eq!(engine.search_by_title(word), BTreeSet::from([1]));
    }
}

#[test]
fn keyword_and_cosine_rankings() {
    let engine = sample_engine();
    let keyword = engine.rank("dog water", RankingMethod::KeywordMatching);
    assert_eq!(keyword[0], (2, 2.0));
    assert_eq!(keyword[1], (1, 1.0));
    let cosine = engine.rank("gold rock", RankingMethod::CosineSimilarity);
    assert_eq!(cosine.len(), 1);
    assert_eq!(cosine[0].0, 3);
}

#[test]
fn documents_serialize_for_rendering() {
    let engine = sample_engine();
    let doc = serde_json::to_value(engine.get_document(3).unwrap()).unwrap();
    assert_eq!(doc["id"], 3);
    assert_eq!(doc["title"], "Gold Mining");
    assert_eq!(doc["length"], 3);
    assert!(engine.get_document(4).is_none());
}
