use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::engine::MatchEngine;

pub const NO_MATCH_REPLY: &str = "Ke kopa o pheta hape, ha ke a utlwisisa hantle.";
pub const NO_MATCH_REPLY_ENGLISH: &str = "Please repeat that, I did not quite understand.";
pub const UNKNOWN_INTENT: &str = "unknown";

/// How a reply was produced.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    DirectMatch,
    CloseMatch,
    PhraseOnly,
    NoMatch,
    /// Input rejected before matching, e.g. too long.
    #[serde(rename = "none")]
    Rejected,
    Empty,
    Error,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::DirectMatch => "direct_match",
            MatchType::CloseMatch => "close_match",
            MatchType::PhraseOnly => "phrase_only",
            MatchType::NoMatch => "no_match",
            MatchType::Rejected => "none",
            MatchType::Empty => "empty",
            MatchType::Error => "error",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseBundle {
    pub response: String,
    pub english: String,
    pub match_type: MatchType,
    pub intent: String,
    pub confidence: f64,
}

impl ResponseBundle {
    pub fn no_match() -> Self {
        Self {
            response: NO_MATCH_REPLY.to_string(),
            english: NO_MATCH_REPLY_ENGLISH.to_string(),
            match_type: MatchType::NoMatch,
            intent: UNKNOWN_INTENT.to_string(),
            confidence: 0.0,
        }
    }
}

/// Two decimals, halves to even.
fn round2(score: f64) -> f64 {
    (score * 100.0).round_ties_even() / 100.0
}

/// Turns the engine's best match into a reply, picking uniformly among the
/// phrase's responses.
pub struct ResponseSelector {
    engine: MatchEngine,
    rng: Mutex<StdRng>,
}

impl ResponseSelector {
    pub fn new(engine: MatchEngine) -> Self {
        Self::with_rng(engine, StdRng::from_entropy())
    }

    pub fn with_seed(engine: MatchEngine, seed: u64) -> Self {
        Self::with_rng(engine, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(engine: MatchEngine, rng: StdRng) -> Self {
        Self {
            engine,
            rng: Mutex::new(rng),
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn generate_response(&self, user_input: &str) -> ResponseBundle {
        let best = self.engine.find_best_match(user_input);
        let phrase = match best.phrase {
            Some(phrase) if self.engine.accepts(best.score) => phrase,
            _ => return ResponseBundle::no_match(),
        };

        let confidence = round2(best.score);
        let intent = phrase.category.clone();
        let candidates = self.engine.corpus().responses_for(phrase.id);
        let chosen = candidates.choose(&mut *self.rng.lock()).copied();

        match chosen {
            Some(response) => ResponseBundle {
                response: response.response_sesotho.clone(),
                english: response.response_english.clone(),
                match_type: if self.engine.is_direct(best.score) {
                    MatchType::DirectMatch
                } else {
                    MatchType::CloseMatch
                },
                intent,
                confidence,
            },
            None => ResponseBundle {
                response: format!(
                    "U itse: \"{}\". Ka Senyesemane: \"{}\".",
                    phrase.sesotho_phrase, phrase.english_translation
                ),
                english: format!(
                    "You said: \"{}\", which means \"{}\" in English.",
                    phrase.sesotho_phrase, phrase.english_translation
                ),
                match_type: MatchType::PhraseOnly,
                intent,
                confidence,
            },
        }
    }
}
