//! Text normalization: punctuation stripping, lowercasing, stopword removal,
//! an optional heuristic noun filter, and lemmatization.

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::str::SplitWhitespace;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_TERM_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9\s]").expect("valid regex");
    static ref ENGLISH: Stemmer = Stemmer::create(Algorithm::English);
}

const STOPWORDS: &[&str] = &[
    "a", "about", "all", "an", "and", "any", "are", "as", "at", "be", "been", "but", "by", "can",
    "did", "do", "does", "down", "for", "from", "had", "has", "have", "he", "her", "his", "how",
    "i", "if", "in", "is", "it", "its", "just", "me", "mine", "my", "no", "not", "now", "of", "on",
    "or", "our", "out", "she", "so", "some", "than", "that", "the", "their", "them", "then",
    "they", "this", "to", "up", "us", "was", "we", "were", "when", "where", "which", "who",
    "whom", "why", "will", "with", "yes", "you", "your", "yours",
];

const DETERMINERS: &[&str] = &["a", "an", "the"];

const COLLECTIVE_NOUNS: &[&str] = &[
    "army", "audience", "band", "board", "class", "committee", "company", "council", "crew",
    "crowd", "family", "flock", "government", "group", "herd", "jury", "pack", "public", "staff",
    "team",
];

const MATERIAL_NOUNS: &[&str] = &[
    "air", "bronze", "clay", "coal", "concrete", "copper", "cotton", "diamond", "food", "glass",
    "gold", "iron", "leather", "marble", "milk", "oil", "paper", "plastic", "rock", "salt", "sand",
    "silk", "silver", "steel", "stone", "sugar", "water", "wood", "wool",
];

const ABSTRACT_NOUNS: &[&str] = &[
    "anger", "beauty", "courage", "education", "fear", "freedom", "friendship", "happiness",
    "health", "honesty", "hope", "idea", "information", "joy", "justice", "kindness",
    "knowledge", "love", "patience", "peace", "science", "success", "time", "trust", "truth",
    "wisdom",
];

const POSSESSIVE_SUFFIXES: &[&str] = &["'s", "\u{2019}s", "s'"];

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// Word lists and switches for a [`Normalizer`]. All lists hold lowercase terms.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    pub stopwords: HashSet<String>,
    pub determiners: HashSet<String>,
    pub collective_nouns: HashSet<String>,
    pub material_nouns: HashSet<String>,
    pub abstract_nouns: HashSet<String>,
    pub possessive_suffixes: Vec<String>,
    /// Decompose (NFKD) before stripping, so accented letters keep their base letter.
    pub fold_diacritics: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            stopwords: word_set(STOPWORDS),
            determiners: word_set(DETERMINERS),
            collective_nouns: word_set(COLLECTIVE_NOUNS),
            material_nouns: word_set(MATERIAL_NOUNS),
            abstract_nouns: word_set(ABSTRACT_NOUNS),
            possessive_suffixes: POSSESSIVE_SUFFIXES.iter().map(|s| (*s).to_string()).collect(),
            fold_diacritics: false,
        }
    }
}

/// Maps a normalized term to its base form. The choice decides which index
/// entry a term lands in, so indexing and querying must share one policy.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, term: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, term: &str) -> String {
        term.to_string()
    }
}

/// English Snowball stemmer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowballLemmatizer;

impl Lemmatizer for SnowballLemmatizer {
    fn lemmatize(&self, term: &str) -> String {
        ENGLISH.stem(term).into_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stopword filtering only. Used for titles and all queries.
    Plain,
    /// Additionally keeps only words accepted by one of [`NOUN_RULES`].
    NounFiltered,
}

/// A word as seen by the noun rules.
#[derive(Debug, Clone, Copy)]
pub struct WordContext<'a> {
    /// The whitespace-delimited word exactly as it appears in the text.
    pub raw: &'a str,
    /// `raw` with punctuation stripped, case preserved.
    pub stripped: &'a str,
    /// `stripped`, lowercased.
    pub term: &'a str,
    /// Lowercased stripped form of the preceding word, if any.
    pub previous: Option<&'a str>,
    pub is_first: bool,
}

pub struct NounRule {
    pub name: &'static str,
    pub matches: fn(&WordContext<'_>, &NormalizerConfig) -> bool,
}

/// Evaluated in order; a word is kept as soon as one rule matches.
///
/// Beyond the six shape and word-list rules, `after_determiner` also keeps any word
/// directly preceded by a determiner (`a`, `an`, `the`).
pub const NOUN_RULES: &[NounRule] = &[
    NounRule { name: "capitalized", matches: capitalized },
    NounRule { name: "after_determiner", matches: after_determiner },
    NounRule { name: "collective", matches: collective },
    NounRule { name: "material", matches: material },
    NounRule { name: "possessive", matches: possessive },
    NounRule { name: "hyphenated", matches: hyphenated },
    NounRule { name: "abstract", matches: abstract_noun },
];

fn capitalized(word: &WordContext<'_>, config: &NormalizerConfig) -> bool {
    let upper = word.stripped.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    upper && (!word.is_first || !after_determiner(word, config))
}

fn after_determiner(word: &WordContext<'_>, config: &NormalizerConfig) -> bool {
    word.previous.is_some_and(|p| config.determiners.contains(p))
}

fn collective(word: &WordContext<'_>, config: &NormalizerConfig) -> bool {
    config.collective_nouns.contains(word.term)
}

fn material(word: &WordContext<'_>, config: &NormalizerConfig) -> bool {
    config.material_nouns.contains(word.term)
}

fn possessive(word: &WordContext<'_>, config: &NormalizerConfig) -> bool {
    let raw = word.raw.trim_end_matches(['.', ',', ';', ':', '!', '?', '"', ')']);
    config.possessive_suffixes.iter().any(|s| raw.ends_with(s.as_str()))
}

fn hyphenated(word: &WordContext<'_>, _config: &NormalizerConfig) -> bool {
    word.raw.contains('-')
}

fn abstract_noun(word: &WordContext<'_>, config: &NormalizerConfig) -> bool {
    config.abstract_nouns.contains(word.term)
}

pub struct Normalizer {
    config: NormalizerConfig,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default(), SnowballLemmatizer)
    }
}

impl Normalizer {
    pub fn new(config: NormalizerConfig, lemmatizer: impl Lemmatizer + 'static) -> Self {
        Self { config, lemmatizer: Box::new(lemmatizer) }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Lazily yields the terms of `text` in source order. The iterator is
    /// `Clone`, so a sequence can be replayed from the start.
    pub fn normalize<'a>(&'a self, text: &'a str, mode: Mode) -> Terms<'a> {
        Terms { normalizer: self, words: text.split_whitespace(), previous: None, seen: 0, mode }
    }

    pub fn is_stopword(&self, term: &str) -> bool {
        self.config.stopwords.contains(term)
    }

    /// Name of the first noun rule accepting `word`.
    pub fn noun_rule(&self, word: &WordContext<'_>) -> Option<&'static str> {
        NOUN_RULES.iter().find(|rule| (rule.matches)(word, &self.config)).map(|rule| rule.name)
    }

    fn strip(&self, raw: &str) -> String {
        if self.config.fold_diacritics {
            let folded: String = raw.nfkd().collect();
            NON_TERM_CHARS.replace_all(&folded, "").into_owned()
        } else {
            NON_TERM_CHARS.replace_all(raw, "").into_owned()
        }
    }
}

#[derive(Clone)]
pub struct Terms<'a> {
    normalizer: &'a Normalizer,
    words: SplitWhitespace<'a>,
    previous: Option<String>,
    seen: usize,
    mode: Mode,
}

impl Iterator for Terms<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for raw in self.words.by_ref() {
            let stripped = self.normalizer.strip(raw);
            if stripped.is_empty() {
                continue;
            }
            let term = stripped.to_ascii_lowercase();
            let previous = self.previous.replace(term.clone());
            let is_first = self.seen == 0;
            self.seen += 1;

            if self.normalizer.is_stopword(&term) {
                continue;
            }
            if self.mode == Mode::NounFiltered {
                let word = WordContext {
                    raw,
                    stripped: &stripped,
                    term: &term,
                    previous: previous.as_deref(),
                    is_first,
                };
                if self.normalizer.noun_rule(&word).is_none() {
                    continue;
                }
            }
            return Some(self.normalizer.lemmatizer.lemmatize(&term));
        }
        None
    }
}
