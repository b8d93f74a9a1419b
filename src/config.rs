use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

pub const DEV_API_BASE: &str = "http://localhost:5001/api";
pub const PROD_API_PATH: &str = "/api";
pub const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl FromStr for AppEnv {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" | "local" => Ok(AppEnv::Development),
            "prod" | "production" => Ok(AppEnv::Production),
            other => Err(Error::Config(format!("Unknown APP_ENV: {}", other))),
        }
    }
}

impl AppEnv {
    /// Production logs are emitted as JSON lines.
    pub fn json_logs(&self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: Url,
    pub app_env: AppEnv,
    pub http_timeout: Duration,
    pub toast_duration: Duration,
    pub highlight_duration: Duration,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let app_env: AppEnv = env::var("APP_ENV").unwrap_or_default().parse()?;
        let origin = env::var("PUBLIC_ORIGIN").ok();
        let api_base = resolve_api_base(
            env::var("JOB_BOARD_API_BASE").ok().as_deref(),
            app_env,
            origin.as_deref(),
        )?;

        Ok(Self {
            api_base,
            app_env,
            http_timeout: Duration::from_secs(get_env_parse_or("HTTP_TIMEOUT_SECS", 10)?),
            toast_duration: Duration::from_millis(get_env_parse_or("TOAST_DURATION_MS", 3000)?),
            highlight_duration: Duration::from_millis(get_env_parse_or(
                "HIGHLIGHT_DURATION_MS",
                2000,
            )?),
        })
    }

    /// Configuration pointing at an explicit base URL with default timings.
    pub fn with_api_base(api_base: &str) -> Result<Self> {
        Ok(Self {
            api_base: parse_base(api_base)?,
            app_env: AppEnv::Development,
            http_timeout: Duration::from_secs(10),
            toast_duration: Duration::from_millis(3000),
            highlight_duration: Duration::from_millis(2000),
        })
    }
}

/// Explicit override first, then the default for the running environment.
pub fn resolve_api_base(
    explicit: Option<&str>,
    app_env: AppEnv,
    public_origin: Option<&str>,
) -> Result<Url> {
    if let Some(base) = explicit.map(str::trim).filter(|b| !b.is_empty()) {
        return parse_base(base);
    }

    match app_env {
        AppEnv::Development => parse_base(DEV_API_BASE),
        AppEnv::Production => {
            let origin = public_origin
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .unwrap_or(DEFAULT_PUBLIC_ORIGIN);
            let joined = Url::parse(origin)?.join(PROD_API_PATH)?;
            parse_base(joined.as_str())
        }
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim().trim_end_matches('/'))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("API base is not a base URL: {}", raw)));
    }
    Ok(url)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    init_config_with(Config::from_env()?)
}

pub fn init_config_with(config: Config) -> Result<()> {
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
