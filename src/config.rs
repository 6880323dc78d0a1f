use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        openai_api_key: get_env("OPENAI_API_KEY"),
        openai_base_url: get_env_or_default("OPENAI_BASE_URL", "https://openrouter.ai/api/v1"),
        openai_model: get_env_or_default("OPENAI_MODEL", "gpt-4o-mini"),
        port: get_env_or_default("PORT", "5000"),
    }
});

pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub port: String,
}

fn get_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("Missing required environment variable: {key}"))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
