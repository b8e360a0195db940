use anyhow::{bail, Context, Result};
use serde::Deserialize;

const ENV_PREFIX: &str = "MOLEBOHENG";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DataSettings {
    pub dir: String,
    pub phrases_file: String,
    pub responses_file: String,
    pub categories_file: String,
    pub interaction_log: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            phrases_file: "phrases.json".to_string(),
            responses_file: "responses.json".to_string(),
            categories_file: "categories.json".to_string(),
            interaction_log: "data/interactions.jsonl".to_string(),
        }
    }
}

/// Scoring weights and acceptance thresholds for the match engine.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MatchSettings {
    /// Multiplier applied to similarity against the English gloss.
    pub english_weight: f64,
    /// Fixed score for a phrase whose keyword occurs in the input.
    pub keyword_score: f64,
    /// Scores at or below this are treated as no match.
    pub acceptance_threshold: f64,
    /// Scores above this are direct matches, the rest close matches.
    pub direct_match_threshold: f64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            english_weight: 0.8,
            keyword_score: 0.85,
            acceptance_threshold: 0.5,
            direct_match_threshold: 0.8,
        }
    }
}

impl MatchSettings {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("english_weight", self.english_weight),
            ("keyword_score", self.keyword_score),
            ("acceptance_threshold", self.acceptance_threshold),
            ("direct_match_threshold", self.direct_match_threshold),
        ];
        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                bail!("matching.{} must be within [0, 1], got {}", name, value);
            }
        }
        if self.acceptance_threshold > self.direct_match_threshold {
            bail!(
                "matching.acceptance_threshold ({}) exceeds matching.direct_match_threshold ({})",
                self.acceptance_threshold,
                self.direct_match_threshold
            );
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LimitSettings {
    pub max_input_chars: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_input_chars: 500,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub matching: MatchSettings,
    pub limits: LimitSettings,
}

impl Settings {
    /// Reads `<name>.toml` if present, then `MOLEBOHENG__SECTION__KEY`
    /// environment overrides.
    pub fn load(name: &str) -> Result<Self> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.matching.validate()?;
        Ok(settings)
    }
}
