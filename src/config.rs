use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_QUESTION_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub webhook: Option<WebhookConfig>,
    pub generator: GeneratorConfig,
    pub quiz: QuizConfig,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Url,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub question_count: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

impl GeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            max_tokens: 4000,
            temperature: 0.7,
            timeout: Duration::from_secs(90),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let telegram_token = required("TELOXIDE_TOKEN")?;

        let mut generator = GeneratorConfig::new(required("OPENAI_API_KEY")?);
        if let Some(base_url) = var("OPENAI_BASE_URL") {
            generator.base_url = base_url;
        }
        if let Some(model) = var("OPENAI_MODEL") {
            generator.model = model;
        }
        if let Some(max_tokens) = var("OPENAI_MAX_TOKENS") {
            generator.max_tokens = parse_value("OPENAI_MAX_TOKENS", max_tokens)?;
        }
        if let Some(temperature) = var("OPENAI_TEMPERATURE") {
            generator.temperature = parse_value("OPENAI_TEMPERATURE", temperature)?;
        }
        if let Some(timeout) = var("OPENAI_TIMEOUT_SECS") {
            generator.timeout = Duration::from_secs(parse_value("OPENAI_TIMEOUT_SECS", timeout)?);
        }

        let mut quiz = QuizConfig::default();
        if let Some(count) = var("QUIZ_QUESTION_COUNT") {
            quiz.question_count = parse_value("QUIZ_QUESTION_COUNT", count.clone())?;
            if quiz.question_count == 0 {
                return Err(ConfigError::Invalid {
                    name: "QUIZ_QUESTION_COUNT",
                    value: count,
                });
            }
        }

        let webhook = match (var("NGROK_URL"), var("NGROK_ADDR")) {
            (Some(url), Some(addr)) => Some(WebhookConfig {
                url: parse_value("NGROK_URL", url)?,
                addr: parse_value("NGROK_ADDR", addr)?,
            }),
            _ => None,
        };

        Ok(Self {
            telegram_token,
            webhook,
            generator,
            quiz,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "error".into()),
        })
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
