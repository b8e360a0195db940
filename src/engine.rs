use std::sync::Arc;

use crate::corpus::{Phrase, PhraseCorpus};
use crate::normalize::normalize;
use crate::settings::MatchSettings;
use crate::similarity::similarity;

/// Which comparison produced a phrase's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Sesotho,
    English,
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub phrase: Option<&'a Phrase>,
    pub score: f64,
    pub signal: Option<Signal>,
}

/// Normalized comparison forms of one phrase, computed once at startup.
#[derive(Debug, Clone)]
struct IndexedPhrase {
    sesotho: String,
    english: String,
    keywords: Vec<String>,
}

impl IndexedPhrase {
    fn new(phrase: &Phrase) -> Self {
        Self {
            sesotho: normalize(&phrase.sesotho_phrase),
            english: normalize(&phrase.english_translation),
            keywords: phrase
                .keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }
}

/// Scores an utterance against every phrase in the corpus.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    corpus: Arc<PhraseCorpus>,
    index: Vec<IndexedPhrase>,
    settings: MatchSettings,
}

impl MatchEngine {
    pub fn new(corpus: Arc<PhraseCorpus>, settings: MatchSettings) -> Self {
        let index = corpus.phrases().iter().map(IndexedPhrase::new).collect();
        Self {
            corpus,
            index,
            settings,
        }
    }

    pub fn corpus(&self) -> &PhraseCorpus {
        &self.corpus
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Best phrase for `user_input` by the max of its Sesotho, discounted
    /// English and keyword scores. Ties go to the phrase loaded first.
    pub fn find_best_match(&self, user_input: &str) -> MatchResult<'_> {
        let input = normalize(user_input);
        let mut best = MatchResult {
            phrase: None,
            score: 0.0,
            signal: None,
        };

        for (phrase, indexed) in self.corpus.phrases().iter().zip(&self.index) {
            let (score, signal) = self.score(&input, indexed);
            if best.phrase.is_none() || score > best.score {
                best = MatchResult {
                    phrase: Some(phrase),
                    score,
                    signal: Some(signal),
                };
            }
        }

        if let Some(phrase) = best.phrase {
            log::debug!(
                "best match for {:?}: phrase {} score {:.3} via {:?}",
                input,
                phrase.id,
                best.score,
                best.signal
            );
        }
        best
    }

    fn score(&self, input: &str, phrase: &IndexedPhrase) -> (f64, Signal) {
        let sesotho = similarity(input, &phrase.sesotho);
        let english = similarity(input, &phrase.english) * self.settings.english_weight;
        let keyword = if phrase.keywords.iter().any(|k| input.contains(k.as_str())) {
            self.settings.keyword_score
        } else {
            0.0
        };

        let mut best = (sesotho, Signal::Sesotho);
        if english > best.0 {
            best = (english, Signal::English);
        }
        if keyword > best.0 {
            best = (keyword, Signal::Keyword);
        }
        best
    }

    /// Strictly above the acceptance threshold.
    pub fn accepts(&self, score: f64) -> bool {
        score > self.settings.acceptance_threshold
    }

    /// Strictly above the direct-match threshold.
    pub fn is_direct(&self, score: f64) -> bool {
        score > self.settings.direct_match_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrase(id: u32, sesotho: &str, english: &str, keywords: &[&str]) -> Phrase {
        Phrase {
            id,
            sesotho_phrase: sesotho.to_string(),
            english_translation: english.to_string(),
            category: "general".to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            difficulty: "beginner".to_string(),
        }
    }

    fn engine(phrases: Vec<Phrase>) -> MatchEngine {
        let corpus = PhraseCorpus::new(phrases, vec![], vec![]).unwrap();
        MatchEngine::new(Arc::new(corpus), MatchSettings::default())
    }

    #[test]
    fn test_exact_sesotho_match() {
        let engine = engine(vec![
            phrase(1, "Lumela", "Hello", &["lumela"]),
            phrase(2, "Kea leboha", "Thank you", &[]),
        ]);
        let result = engine.find_best_match("Lumela!");
        assert_eq!(result.phrase.unwrap().id, 1);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.signal, Some(Signal::Sesotho));
    }

    #[test]
    fn test_english_match_is_discounted() {
        let engine = engine(vec![phrase(1, "Kea leboha", "Thank you", &[])]);
        let result = engine.find_best_match("thank you");
        assert_eq!(result.signal, Some(Signal::English));
        assert!((result.score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_scores_fixed_value() {
        let engine = engine(vec![phrase(1, "Kea leboha haholo", "Thank you very much", &["Leboha"])]);
        let input = "ke re leboha ho wena motswalle wa ka wa kgale haholo";
        let result = engine.find_best_match(input);
        assert_eq!(result.signal, Some(Signal::Keyword));
        assert_eq!(result.score, 0.85);
    }

    #[test]
    fn test_keyword_never_exceeds_fixed_score() {
        let engine = engine(vec![phrase(1, "zzzz", "qqqq", &["leboha", "kea", "ha"])]);
        let result = engine.find_best_match("kea leboha haholo");
        assert_eq!(result.score, 0.85);
    }

    #[test]
    fn test_empty_keywords_are_ignored() {
        let engine = engine(vec![phrase(1, "zzzz", "qqqq", &[""])]);
        let result = engine.find_best_match("kea leboha");
        assert_ne!(result.signal, Some(Signal::Keyword));
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_near_exact_text_beats_keyword() {
        let engine = engine(vec![
            phrase(1, "Sala", "Stay", &["hantle"]),
            phrase(2, "Sala hantle", "Stay well", &[]),
        ]);
        let result = engine.find_best_match("sala hantle");
        assert_eq!(result.phrase.unwrap().id, 2);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_tie_keeps_first_phrase() {
        let engine = engine(vec![
            phrase(7, "Dumela", "Hi", &[]),
            phrase(3, "Dumela", "Hello", &[]),
        ]);
        let result = engine.find_best_match("dumela");
        assert_eq!(result.phrase.unwrap().id, 7);
    }

    #[test]
    fn test_empty_corpus_has_no_match() {
        let engine = engine(vec![]);
        let result = engine.find_best_match("lumela");
        assert!(result.phrase.is_none());
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_zero_score_still_returns_first_phrase() {
        let engine = engine(vec![phrase(4, "abc", "def", &[]), phrase(5, "ghi", "jkl", &[])]);
        let result = engine.find_best_match("xyz");
        assert_eq!(result.phrase.unwrap().id, 4);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_deterministic_and_bounded() {
        let engine = engine(vec![
            phrase(1, "Lumela", "Hello", &["lumela"]),
            phrase(2, "O kae?", "How are you?", &["kae"]),
            phrase(3, "Ke phela hantle", "I am well", &[]),
        ]);
        for input in ["lumela ntate", "how are you", "ke phela", "", "???"] {
            let first = engine.find_best_match(input);
            let second = engine.find_best_match(input);
            assert_eq!(first, second);
            assert!((0.0..=1.0).contains(&first.score));
            let id = first.phrase.unwrap().id;
            assert!(engine.corpus().phrase(id).is_some());
        }
    }

    #[test]
    fn test_threshold_boundaries() {
        let engine = engine(vec![]);
        assert!(!engine.accepts(0.5));
        assert!(engine.accepts(0.50001));
        assert!(!engine.is_direct(0.8));
        assert!(engine.is_direct(0.80001));
    }
}
