//! Configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys). Provides helpers to expand
//! `~` and `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::types::DuplicatePolicy;

/// Environment variable naming the generation model; wins over config files.
pub const GEN_MODEL_ENV: &str = "GEN_MODEL_ID";
pub const DEFAULT_GEN_MODEL: &str = "tinyllama";

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> { Self::load_in(Path::new(".")) }

    /// Loads config files from `dir` instead of the working directory.
    pub fn load_in(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, env_name };
        config.validate()?;
        Ok(config)
    }

    pub fn env_name(&self) -> &str { &self.env_name }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed settings, with `GEN_MODEL_ID` applied on top.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        if let Ok(model) = env::var(GEN_MODEL_ENV) {
            if !model.trim().is_empty() {
                settings.generation.model = model;
            }
        }
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.retrieval.dimension == 0 {
            return Err(Error::InvalidConfig("retrieval.dimension must be positive".into()).into());
        }
        if settings.retrieval.case_discovery_top_k == 0 || settings.retrieval.legal_aid_top_k == 0 {
            return Err(Error::InvalidConfig("retrieval top_k values must be positive".into()).into());
        }
        if settings.retrieval.case_discovery_index == settings.retrieval.legal_aid_index {
            tracing::warn!(
                path = %settings.retrieval.case_discovery_index,
                "both retrieval agents share one index file; only one process may build it at a time"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub corpus_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self { Self { corpus_dir: "data/casedocs".to_string() } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub dimension: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub case_discovery_index: String,
    pub legal_aid_index: String,
    pub case_discovery_top_k: usize,
    pub legal_aid_top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            dimension: 768,
            duplicate_policy: DuplicatePolicy::Accumulate,
            case_discovery_index: "indexes/case_discovery.idx".to_string(),
            legal_aid_index: "indexes/legal_aid.idx".to_string(),
            case_discovery_top_k: 5,
            legal_aid_top_k: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    Model,
    Hash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    pub model_dir: String,
    pub max_len: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { backend: EmbeddingBackend::Model, model_dir: "models/bge-base-en-v1.5".to_string(), max_len: 512 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub base_url: String,
    pub model: String,
    /// No timeout when absent: a hung model hangs the request.
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self { base_url: "http://localhost:11434".to_string(), model: DEFAULT_GEN_MODEL.to_string(), timeout_secs: None }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
