use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const API_KEY: &str = "API_KEY";
    pub const PORT: &str = "PORT";
    pub const REDIS_URL: &str = "REDIS_URL";
    pub const USE_REDIS: &str = "USE_REDIS";
    pub const LLM_PROVIDER: &str = "LLM_PROVIDER";
    pub const LLM_MODEL: &str = "LLM_MODEL";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const RATE_LIMIT_PER_MIN: &str = "RATE_LIMIT_PER_MIN";
    pub const CORS_ORIGINS: &str = "CORS_ORIGINS";
    pub const PERSONA_DEFAULT: &str = "PERSONA_DEFAULT";
}

/// Default values
pub mod defaults {
    pub const API_KEY: &str = "changeme";
    pub const PORT: u16 = 8080;
    pub const LLM_PROVIDER: &str = "mock";
    pub const RATE_LIMIT_PER_MIN: u32 = 60;
    pub const CORS_ORIGINS: &str = "*";
    pub const PERSONA_DEFAULT: &str = "elderly";
}

fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(val) => matches!(
            val.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ),
        Err(_) => default,
    }
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub port: u16,
    pub redis_url: String,
    pub use_redis: bool,
    pub llm_provider: String,
    pub llm_model: String,
    pub openai_api_key: String,
    pub gemini_api_key: String,
    pub rate_limit_per_min: u32,
    pub cors_origins: Vec<String>,
    pub persona_default: String,
}

impl Config {
    pub fn from_env() -> Self {
        let redis_url = env::var(env_vars::REDIS_URL).unwrap_or_default();

        Self {
            api_key: env::var(env_vars::API_KEY)
                .unwrap_or_else(|_| defaults::API_KEY.to_string()),
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            use_redis: env_bool(env_vars::USE_REDIS, !redis_url.is_empty()),
            redis_url,
            llm_provider: env::var(env_vars::LLM_PROVIDER)
                .unwrap_or_else(|_| defaults::LLM_PROVIDER.to_string())
                .to_lowercase(),
            llm_model: env::var(env_vars::LLM_MODEL).unwrap_or_default(),
            openai_api_key: env::var(env_vars::OPENAI_API_KEY).unwrap_or_default(),
            gemini_api_key: env::var(env_vars::GEMINI_API_KEY).unwrap_or_default(),
            rate_limit_per_min: env::var(env_vars::RATE_LIMIT_PER_MIN)
                .unwrap_or_else(|_| defaults::RATE_LIMIT_PER_MIN.to_string())
                .parse()
                .unwrap_or(defaults::RATE_LIMIT_PER_MIN),
            cors_origins: env::var(env_vars::CORS_ORIGINS)
                .unwrap_or_else(|_| defaults::CORS_ORIGINS.to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            persona_default: env::var(env_vars::PERSONA_DEFAULT)
                .unwrap_or_else(|_| defaults::PERSONA_DEFAULT.to_string())
                .to_lowercase(),
        }
    }
}
