//! Layered configuration: built-in defaults, then an optional `glossa.toml`,
//! then `GLOSSA__SECTION__KEY` environment variables.

use crate::Language;
use anyhow::{Context, bail};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "glossa.toml";
pub const CONFIG_PATH_ENV: &str = "GLOSSA_CONFIG";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Dummy,
}

/// How much deliberation the model may spend before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningLevel {
    /// Do not send the option; non-reasoning chat models answer without deliberating.
    None,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: ProviderKind,
    pub model: String,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub reasoning_effort: ReasoningLevel,
}

impl Default for LlmSettings {
    fn default() -> Self {
        LlmSettings {
            provider: ProviderKind::OpenAi,
            model: "gpt-4.1-nano".to_owned(),
            api_base: None,
            api_key: None,
            reasoning_effort: ReasoningLevel::None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub source_lang: Language,
    pub target_lang: Language,
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            source_lang: Language::English,
            target_lang: Language::Arabic,
        }
    }
}

impl Settings {
    /// Loads settings for the running process and checks that the API key is present.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let env = Environment::with_prefix("GLOSSA")
            .prefix_separator("__")
            .separator("__");

        let mut settings = Self::build(Some(&path), env)?;
        if settings.llm.api_key.is_none() {
            settings.llm.api_key = std::env::var(API_KEY_ENV).ok();
        }
        settings.ensure_credentials()?;
        Ok(settings)
    }

    pub fn build(file: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(false));
        }
        let settings = builder
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;
        Ok(settings)
    }

    pub fn ensure_credentials(&self) -> anyhow::Result<()> {
        let has_key = self
            .llm
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if self.llm.provider == ProviderKind::OpenAi && !has_key {
            bail!(
                "No API key configured: set {} or llm.api_key in {}",
                API_KEY_ENV,
                DEFAULT_CONFIG_FILE
            );
        }
        Ok(())
    }
}
