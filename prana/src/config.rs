use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_list(var: &str) -> Vec<String> {
    env::var(var)
        .map(|val| {
            val.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub reasoning: ReasoningConfig,
    pub integrations: IntegrationsConfig,
    pub quota: QuotaConfig,
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
    pub busy_timeout_ms: u64,
    pub journal_mode: String,
    pub synchronous: String,
}

impl DatabaseConfig {
    /// Local file database with default pragmas.
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            url: path.into(),
            auth_token: None,
            local_path: None,
            busy_timeout_ms: 5000,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
        }
    }
}

/// Knobs of the reasoning pipeline. The defaults are the calibrated values;
/// changing them changes recommendations.
#[derive(Debug, Clone, Deserialize)]
pub struct ReasoningConfig {
    pub adherence_window_days: i64,
    pub memory_retrieval_limit: u32,
    pub explanation_rule_limit: usize,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            adherence_window_days: 3,
            memory_retrieval_limit: 5,
            explanation_rule_limit: 3,
        }
    }
}

/// Third-party lookups used by the nutrition and yoga planners.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationsConfig {
    pub usda_api_key: Option<String>,
    pub usda_base_url: String,
    pub youtube_api_key: Option<String>,
    pub youtube_base_url: String,
    pub timeout_secs: u64,
    pub nutrient_cache_size: usize,
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            usda_api_key: None,
            usda_base_url: "https://api.nal.usda.gov/fdc/v1".to_string(),
            youtube_api_key: None,
            youtube_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_secs: 10,
            nutrient_cache_size: 256,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ApiLimit {
    pub daily: u32,
    pub per_user_daily: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotaConfig {
    pub usda: ApiLimit,
    pub youtube: ApiLimit,
    pub openai: ApiLimit,
    /// Largest tolerated gap between the busiest and the quietest user.
    pub max_spread: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            usda: ApiLimit {
                daily: 100,
                per_user_daily: 10,
            },
            youtube: ApiLimit {
                daily: 100,
                per_user_daily: 10,
            },
            openai: ApiLimit {
                daily: 50,
                per_user_daily: 5,
            },
            max_spread: 5,
        }
    }
}

impl QuotaConfig {
    /// Limits for a named API. Unknown APIs get a per-user budget of 10.
    pub fn limit_for(&self, api: &str) -> ApiLimit {
        match api {
            "usda" => self.usda,
            "youtube" => self.youtube,
            "openai" => self.openai,
            _ => ApiLimit {
                daily: 100,
                per_user_daily: 10,
            },
        }
    }
}

/// LLM configuration for recipe generation
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        let reasoning_defaults = ReasoningConfig::default();
        let integration_defaults = IntegrationsConfig::default();
        let quota_defaults = QuotaConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("PRANA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PRANA_PORT", 8000),
                api_keys: parse_list("PRANA_API_KEYS"),
                cors_origins: parse_list("PRANA_CORS_ORIGINS"),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:prana.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
                busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
                journal_mode: env::var("DATABASE_JOURNAL_MODE")
                    .unwrap_or_else(|_| "WAL".to_string()),
                synchronous: env::var("DATABASE_SYNCHRONOUS")
                    .unwrap_or_else(|_| "NORMAL".to_string()),
            },
            reasoning: ReasoningConfig {
                adherence_window_days: parse_env_or(
                    "ADHERENCE_WINDOW_DAYS",
                    reasoning_defaults.adherence_window_days,
                ),
                memory_retrieval_limit: parse_env_or(
                    "MEMORY_RETRIEVAL_LIMIT",
                    reasoning_defaults.memory_retrieval_limit,
                ),
                explanation_rule_limit: parse_env_or(
                    "EXPLANATION_RULE_LIMIT",
                    reasoning_defaults.explanation_rule_limit,
                ),
            },
            integrations: IntegrationsConfig {
                usda_api_key: env::var("USDA_API_KEY").ok(),
                usda_base_url: env::var("USDA_BASE_URL")
                    .unwrap_or(integration_defaults.usda_base_url),
                youtube_api_key: env::var("YOUTUBE_API_KEY").ok(),
                youtube_base_url: env::var("YOUTUBE_BASE_URL")
                    .unwrap_or(integration_defaults.youtube_base_url),
                timeout_secs: parse_env_or(
                    "INTEGRATION_TIMEOUT_SECS",
                    integration_defaults.timeout_secs,
                ),
                nutrient_cache_size: parse_env_or(
                    "NUTRIENT_CACHE_SIZE",
                    integration_defaults.nutrient_cache_size,
                ),
            },
            quota: QuotaConfig {
                usda: ApiLimit {
                    daily: parse_env_or("QUOTA_USDA_DAILY", quota_defaults.usda.daily),
                    per_user_daily: parse_env_or(
                        "QUOTA_USDA_PER_USER",
                        quota_defaults.usda.per_user_daily,
                    ),
                },
                youtube: ApiLimit {
                    daily: parse_env_or("QUOTA_YOUTUBE_DAILY", quota_defaults.youtube.daily),
                    per_user_daily: parse_env_or(
                        "QUOTA_YOUTUBE_PER_USER",
                        quota_defaults.youtube.per_user_daily,
                    ),
                },
                openai: ApiLimit {
                    daily: parse_env_or("QUOTA_OPENAI_DAILY", quota_defaults.openai.daily),
                    per_user_daily: parse_env_or(
                        "QUOTA_OPENAI_PER_USER",
                        quota_defaults.openai.per_user_daily,
                    ),
                },
                max_spread: parse_env_or("FAIRNESS_MAX_SPREAD", quota_defaults.max_spread),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 2),
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    ("local", model)
}
