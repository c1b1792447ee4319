//! TOML configuration with environment overrides.
//!
//! Every section and field has a default, so a missing config file yields a
//! fully usable [`Config`]. After the file is parsed, these environment
//! variables are applied on top:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LLM_PROVIDER` | `llm.provider` |
//! | `MODEL_NAME` | `llm.model` |
//! | `OLLAMA_BASE_URL` | `llm.url` |
//! | `MCP_SERVER_HOST` / `MCP_SERVER_PORT` | `server.bind` |
//! | `KNOWLEDGE_BASE_PATH` | `knowledge_base.path` |
//! | `LOG_LEVEL` | `logging.level` |
//!
//! `OPENAI_API_KEY` is read by the OpenAI client itself.

use anyhow::{bail, Context, Result};
use doc_analyst_core::score::{BonusMode, ScoreParams, DEFAULT_PHRASE_BONUS};
use doc_analyst_core::search::{SearchParams, DEFAULT_FINAL_LIMIT};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeBaseConfig {
    #[serde(default = "default_kb_path")]
    pub path: PathBuf,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            path: default_kb_path(),
        }
    }
}

fn default_kb_path() -> PathBuf {
    PathBuf::from("./knowledge_base")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_final_limit")]
    pub final_limit: usize,
    #[serde(default = "default_phrase_bonus")]
    pub phrase_bonus: u64,
    #[serde(default)]
    pub bonus_mode: BonusMode,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            final_limit: default_final_limit(),
            phrase_bonus: default_phrase_bonus(),
            bonus_mode: BonusMode::default(),
        }
    }
}

fn default_final_limit() -> usize {
    DEFAULT_FINAL_LIMIT
}
fn default_phrase_bonus() -> u64 {
    DEFAULT_PHRASE_BONUS
}

impl RetrievalConfig {
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            final_limit: self.final_limit,
            score: ScoreParams {
                phrase_bonus: self.phrase_bonus,
                bonus_mode: self.bonus_mode,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the backend. Defaults per provider when unset.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "ollama".to_string()
}
fn default_model() -> String {
    "llama3.2".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Where clients reach the tool server. Defaults to `http://{bind}`.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_bind() -> String {
    "localhost:8000".to_string()
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        match &self.url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}", self.bind),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load the config file (if present), apply environment overrides, and
/// validate the result.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        parse_config(&content)?
    } else {
        Config::default()
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse config file")
}

impl Config {
    /// Apply environment-style overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Some(model) = lookup("MODEL_NAME") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            self.llm.url = Some(url);
        }
        if let Some(path) = lookup("KNOWLEDGE_BASE_PATH") {
            self.knowledge_base.path = PathBuf::from(path);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        let host = lookup("MCP_SERVER_HOST");
        let port = lookup("MCP_SERVER_PORT");
        if host.is_some() || port.is_some() {
            let (default_host, default_port) = split_bind(&self.server.bind);
            let host = host.unwrap_or(default_host);
            let port = match port {
                Some(p) => {
                    let n: u16 = p
                        .parse()
                        .with_context(|| format!("MCP_SERVER_PORT must be a port number, got '{}'", p))?;
                    n.to_string()
                }
                None => default_port,
            };
            self.server.bind = format!("{}:{}", host, port);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.final_limit < 1 {
            bail!("retrieval.final_limit must be >= 1");
        }
        if self.llm.timeout_secs == 0 {
            bail!("llm.timeout_secs must be > 0");
        }
        if self.server.timeout_secs == 0 {
            bail!("server.timeout_secs must be > 0");
        }
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }

        match self.llm.provider.as_str() {
            "ollama" | "openai" => {}
            other => bail!(
                "Unsupported LLM provider: '{}'. Must be ollama or openai.",
                other
            ),
        }

        Ok(())
    }
}

fn split_bind(bind: &str) -> (String, String) {
    match bind.rsplit_once(':') {
        Some((host, port)) => (host.to_string(), port.to_string()),
        None => (bind.to_string(), "8000".to_string()),
    }
}
