//! Environment configuration for the certificate server.

use std::env;

use dotenvy::dotenv;
use thiserror::Error;

use crate::certificate::Branding;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
/// Delay clients should leave between consecutive batch downloads.
pub const DEFAULT_DOWNLOAD_STAGGER_MS: u64 = 500;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173,http://127.0.0.1:8080";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub branding: Branding,
    pub download_stagger_ms: u64,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            branding: Branding::default(),
            download_stagger_ms: DEFAULT_DOWNLOAD_STAGGER_MS,
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Unset or blank keys
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        if let Some(stagger) = get("DOWNLOAD_STAGGER_MS") {
            config.download_stagger_ms = parse_number("DOWNLOAD_STAGGER_MS", &stagger)?;
        }
        if let Some(origins) = get("ALLOWED_ORIGINS") {
            config.allowed_origins = split_origins(&origins);
        }

        let branding = &mut config.branding;
        let text_fields: [(&str, &mut String); 6] = [
            ("ORGANIZATION_NAME", &mut branding.organization_name),
            ("ORGANIZATION_TAGLINE", &mut branding.tagline),
            ("ORGANIZATION_MONOGRAM", &mut branding.monogram),
            ("VERIFY_BASE_URL", &mut branding.verify_base_url),
            ("REPRESENTATIVE_NAME", &mut branding.representative_name),
            ("REPRESENTATIVE_TITLE", &mut branding.representative_title),
        ];
        for (key, field) in text_fields {
            if let Some(value) = get(key) {
                *field = value.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.download_stagger_ms, DEFAULT_DOWNLOAD_STAGGER_MS);
        assert_eq!(config.branding.organization_name, "Volunteer Hub");
        assert_eq!(config.allowed_origins.len(), 3);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("ORGANIZATION_NAME", "Harbor Friends"),
            ("ORGANIZATION_MONOGRAM", "HF"),
            ("DOWNLOAD_STAGGER_MS", "250"),
            ("ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.branding.organization_name, "Harbor Friends");
        assert_eq!(config.branding.monogram, "HF");
        assert_eq!(config.download_stagger_ms, 250);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("HOST", "  ")])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_malformed_number_is_error() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: "PORT",
                value: "eighty".into()
            }
        );
        assert!(err.to_string().contains("PORT"));
    }
}
