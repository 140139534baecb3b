use docsearch_core::{IdentityLemmatizer, Mode, Normalizer, NormalizerConfig};

#[test]
fn it_normalizes_and_stems() {
    let n = Normalizer::default();
    let words: Vec<String> = n.normalize("Running Runners RUN! The menu.", Mode::Plain).collect();
    // Snowball reduces every form of "run" to the same term
    assert_eq!(words.iter().filter(|w| *w == "run").count(), 2);
    assert!(words.contains(&"menu".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let n = Normalizer::default();
    let words: Vec<String> = n.normalize("The quick brown fox and the lazy dog", Mode::Plain).collect();
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn folded_diacritics_survive_stripping() {
    let config = NormalizerConfig { fold_diacritics: true, ..NormalizerConfig::default() };
    let n = Normalizer::new(config, IdentityLemmatizer);
    let words: Vec<String> = n.normalize("The café's menu.", Mode::Plain).collect();
    assert_eq!(words, vec!["cafes", "menu"]);
}

#[test]
fn queries_are_not_noun_filtered() {
    let n = Normalizer::new(NormalizerConfig::default(), IdentityLemmatizer);
    assert_eq!(n.normalize("quickly barked", Mode::Plain).count(), 2);
    assert_eq!(n.normalize("quickly barked", Mode::NounFiltered).count(), 0);
}
