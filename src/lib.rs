//! Phrase matching and reply selection for a Sesotho conversation partner.
//!
//! Free text is normalized, scored against every phrase in a fixed corpus
//! and answered with one of the stored responses for the best phrase.

pub mod api;
pub mod chat;
pub mod corpus;
pub mod engine;
pub mod interaction_log;
pub mod normalize;
pub mod responder;
pub mod settings;
pub mod similarity;

pub use chat::{ChatReply, ChatService};
pub use corpus::{Category, Phrase, PhraseCorpus, PhraseDetail, Response};
pub use engine::{MatchEngine, MatchResult, Signal};
pub use interaction_log::InteractionLogger;
pub use responder::{MatchType, ResponseBundle, ResponseSelector};
pub use settings::{MatchSettings, Settings};
