use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_PEXELS_BASE_URL: &str = "https://api.pexels.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub workers: usize,
    pub gemini: GeminiConfig,
    pub pexels: PexelsConfig,
    pub upstream_timeout: Duration,
    pub store_capacity: u64,
    pub store_ttl: Duration,
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct PexelsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

// Keys stay out of Debug output so the config can be logged at startup.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for PexelsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PexelsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    /// Missing API keys are allowed; they force the fallback paths.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(AppConfig {
            bind_address: non_empty("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            workers: parse_or(&lookup, "WORKERS", num_cpus::get())?,
            gemini: GeminiConfig {
                api_key: non_empty("GEMINI_API_KEY"),
                model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: non_empty("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            },
            pexels: PexelsConfig {
                api_key: non_empty("PEXELS_API_KEY"),
                base_url: non_empty("PEXELS_BASE_URL").unwrap_or_else(|| DEFAULT_PEXELS_BASE_URL.to_string()),
            },
            upstream_timeout: Duration::from_secs(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 30)?),
            store_capacity: parse_or(&lookup, "STORE_CAPACITY", 10_000)?,
            store_ttl: Duration::from_secs(parse_or(&lookup, "STORE_TTL_SECS", 7 * 24 * 60 * 60)?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a number, got {:?}", key, raw)),
        _ => Ok(default),
    }
}
