use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::domain::void::service::SessionSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Void feed
    pub void_default_page_size: usize,
    pub void_max_page_size: usize,
    pub void_oversample_factor: usize,
    pub void_session_idle_minutes: u64,
    pub void_max_sessions: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            void_default_page_size: env::var("VOID_DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            void_max_page_size: env::var("VOID_MAX_PAGE_SIZE")
                .unwrap_or_else(|_| "50".to_string())
                .parse()?,
            void_oversample_factor: env::var("VOID_OVERSAMPLE_FACTOR")
                .unwrap_or_else(|_| "2".to_string())
                .parse()?,
            void_session_idle_minutes: env::var("VOID_SESSION_IDLE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            void_max_sessions: env::var("VOID_MAX_SESSIONS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.void_oversample_factor == 0 {
            return Err("VOID_OVERSAMPLE_FACTOR must be at least 1".to_string());
        }
        if self.void_max_page_size == 0 {
            return Err("VOID_MAX_PAGE_SIZE must be at least 1".to_string());
        }
        if self.void_session_idle_minutes == 0 {
            return Err("VOID_SESSION_IDLE_MINUTES must be at least 1".to_string());
        }
        if self.void_max_sessions == 0 {
            return Err("VOID_MAX_SESSIONS must be at least 1".to_string());
        }
        if self.void_default_page_size == 0 || self.void_default_page_size > self.void_max_page_size {
            return Err(format!(
                "VOID_DEFAULT_PAGE_SIZE must be between 1 and {}",
                self.void_max_page_size
            ));
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            default_page_size: self.void_default_page_size,
            max_page_size: self.void_max_page_size,
            idle_timeout: Duration::from_secs(self.void_session_idle_minutes.saturating_mul(60)),
            max_sessions: self.void_max_sessions,
        }
    }
}
