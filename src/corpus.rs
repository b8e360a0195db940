use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

use crate::settings::DataSettings;

pub type PhraseId = u32;

fn default_difficulty() -> String {
    "beginner".to_string()
}

/// A learning-corpus entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Phrase {
    pub id: PhraseId,
    pub sesotho_phrase: String,
    pub english_translation: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

/// A candidate reply tied to one phrase through `phrase_id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Response {
    pub phrase_id: PhraseId,
    pub response_sesotho: String,
    pub response_english: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A phrase decorated with its responses. Always an owned copy.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PhraseDetail {
    #[serde(flatten)]
    pub phrase: Phrase,
    pub responses: Vec<Response>,
}

/// Read-only view over the phrase, response and category tables.
///
/// Built once at startup and shared behind an `Arc`; nothing here takes
/// `&mut self`.
#[derive(Debug, Default)]
pub struct PhraseCorpus {
    phrases: Vec<Phrase>,
    responses: Vec<Response>,
    categories: Vec<Category>,
    by_id: HashMap<PhraseId, usize>,
}

impl PhraseCorpus {
    pub fn new(
        phrases: Vec<Phrase>,
        responses: Vec<Response>,
        categories: Vec<Category>,
    ) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(phrases.len());
        for (idx, phrase) in phrases.iter().enumerate() {
            if by_id.insert(phrase.id, idx).is_some() {
                bail!("duplicate phrase id {}", phrase.id);
            }
        }
        Ok(Self {
            phrases,
            responses,
            categories,
            by_id,
        })
    }

    /// Loads the three JSON tables from `data.dir`. A missing file yields an
    /// empty table; a malformed one is an error.
    pub fn load(data: &DataSettings) -> Result<Self> {
        let dir = Path::new(&data.dir);
        let phrases: Vec<Phrase> = load_table(&dir.join(&data.phrases_file))?;
        let responses: Vec<Response> = load_table(&dir.join(&data.responses_file))?;
        let categories: Vec<Category> = load_table(&dir.join(&data.categories_file))?;

        let corpus = Self::new(phrases, responses, categories)
            .with_context(|| format!("Invalid corpus in {:?}", dir))?;
        let dangling = corpus
            .responses
            .iter()
            .filter(|r| !corpus.by_id.contains_key(&r.phrase_id))
            .count();
        if dangling > 0 {
            log::debug!("{} responses reference unknown phrase ids", dangling);
        }
        Ok(corpus)
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    pub fn phrase(&self, id: PhraseId) -> Option<&Phrase> {
        self.by_id.get(&id).map(|&idx| &self.phrases[idx])
    }

    pub fn phrases_in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Phrase> {
        self.phrases.iter().filter(move |p| p.category == category)
    }

    /// Responses for `id` in load order. Unknown ids simply have none.
    pub fn responses_for(&self, id: PhraseId) -> Vec<&Response> {
        self.responses.iter().filter(|r| r.phrase_id == id).collect()
    }

    pub fn phrase_detail(&self, id: PhraseId) -> Option<PhraseDetail> {
        let phrase = self.phrase(id)?.clone();
        let responses = self.responses_for(id).into_iter().cloned().collect();
        Some(PhraseDetail { phrase, responses })
    }
}

fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        log::warn!("{:?} not found, using an empty table", path);
        return Ok(Vec::new());
    }
    let content =
        read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let rows: Vec<T> =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?;
    log::info!("Loaded {} rows from {:?}", rows.len(), path);
    Ok(rows)
}
