//! Configuration module for environment variable parsing.
//!
//! All settings come from environment variables (optionally seeded from a
//! `.env` file by the binary). Only `CHANNEL_SECRET` is mandatory.

use std::env;
use std::path::PathBuf;

use tracing::warn;
use url::Url;

use crate::error::ConfigError;

const DEFAULT_API_BASE: &str = "https://api.line.me";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Shared secret used to verify `x-line-signature`
    pub channel_secret: String,

    /// Bearer token for the reply API
    pub channel_access_token: Option<String>,

    /// Whether extraction results are replied to the sender
    pub reply_enabled: bool,

    /// Location of the shared OTP slot
    pub otp_path: PathBuf,

    /// Port for the web server to listen on
    pub port: u16,

    /// Base URL of the messaging API
    pub api_base: Url,

    /// Outbound reply timeout in milliseconds
    pub reply_timeout_ms: u64,

    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

// Hand-written so the credentials never end up in a log line.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("channel_secret", &"<redacted>")
            .field(
                "channel_access_token",
                &self.channel_access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("reply_enabled", &self.reply_enabled)
            .field("otp_path", &self.otp_path)
            .field("port", &self.port)
            .field("api_base", &self.api_base.as_str())
            .field("reply_timeout_ms", &self.reply_timeout_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let channel_secret = lookup("CHANNEL_SECRET")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let channel_access_token = lookup("CHANNEL_ACCESS_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let reply_enabled = parse_bool(&lookup, "REPLY_ENABLED", channel_access_token.is_some());
        if reply_enabled && channel_access_token.is_none() {
            return Err(ConfigError::MissingAccessToken);
        }

        let otp_path = lookup("OTP_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("otp.txt"));

        let api_base = match lookup("LINE_API_BASE") {
            Some(raw) => Url::parse(&raw).unwrap_or_else(|e| {
                warn!(env_var = "LINE_API_BASE", value = %raw, error = %e, "Invalid URL, using default");
                default_api_base()
            }),
            None => default_api_base(),
        };

        Ok(Config {
            channel_secret,
            channel_access_token,
            reply_enabled,
            otp_path,
            port: parse_number(&lookup, "PORT", 5000),
            api_base,
            reply_timeout_ms: parse_timeout_ms(&lookup, "REPLY_TIMEOUT_MS", 8000),
            request_timeout_ms: parse_timeout_ms(&lookup, "REQUEST_TIMEOUT_MS", 30_000),
        })
    }
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("default api base is a valid URL")
}

/// Parse a numeric variable, falling back to `default` when absent or invalid.
fn parse_number<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = match lookup(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }
    }
}

/// Parse a timeout in milliseconds; zero is rejected like an unparseable value.
fn parse_timeout_ms<F>(lookup: &F, name: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match parse_number(lookup, name, default) {
        0 => {
            warn!(env_var = name, "Zero timeout, using default");
            default
        }
        ms => ms,
    }
}

/// Parse a boolean flag such as "true", "0" or "off".
fn parse_bool<F>(lookup: &F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let raw = match lookup(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::MissingSecret);
        assert_eq!(
            load(&[("CHANNEL_SECRET", "   ")]).unwrap_err(),
            ConfigError::MissingSecret
        );
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("CHANNEL_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.channel_secret, "s3cret");
        assert!(config.channel_access_token.is_none());
        assert!(!config.reply_enabled);
        assert_eq!(config.otp_path, PathBuf::from("otp.txt"));
        assert_eq!(config.port, 5000);
        assert_eq!(config.api_base.as_str(), "https://api.line.me/");
        assert_eq!(config.reply_timeout_ms, 8000);
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_token_enables_replies_by_default() {
        let config = load(&[("CHANNEL_SECRET", "s"), ("CHANNEL_ACCESS_TOKEN", "tok")]).unwrap();
        assert!(config.reply_enabled);
        assert_eq!(config.channel_access_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_reply_can_be_disabled_with_token() {
        let config = load(&[
            ("CHANNEL_SECRET", "s"),
            ("CHANNEL_ACCESS_TOKEN", "tok"),
            ("REPLY_ENABLED", "off"),
        ])
        .unwrap();
        assert!(!config.reply_enabled);
    }

    #[test]
    fn test_reply_enabled_requires_token() {
        let err = load(&[("CHANNEL_SECRET", "s"), ("REPLY_ENABLED", "true")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingAccessToken);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = load(&[
            ("CHANNEL_SECRET", "s"),
            ("PORT", "not-a-port"),
            ("REPLY_TIMEOUT_MS", "-5"),
            ("LINE_API_BASE", "::nope::"),
            ("REPLY_ENABLED", "maybe"),
        ])
        .unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.reply_timeout_ms, 8000);
        assert_eq!(config.api_base.as_str(), "https://api.line.me/");
        assert!(!config.reply_enabled);
    }

    #[test]
    fn test_zero_timeouts_fall_back() {
        let config = load(&[
            ("CHANNEL_SECRET", "s"),
            ("REPLY_TIMEOUT_MS", "0"),
            ("REQUEST_TIMEOUT_MS", " 0 "),
        ])
        .unwrap();
        assert_eq!(config.reply_timeout_ms, 8000);
        assert_eq!(config.request_timeout_ms, 30_000);

        let config = load(&[
            ("CHANNEL_SECRET", "s"),
            ("REPLY_TIMEOUT_MS", "250"),
            ("REQUEST_TIMEOUT_MS", "1000"),
        ])
        .unwrap();
        assert_eq!(config.reply_timeout_ms, 250);
        assert_eq!(config.request_timeout_ms, 1000);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CHANNEL_SECRET", "s"),
            ("OTP_FILE", "/var/run/otp/current"),
            ("PORT", "8080"),
            ("LINE_API_BASE", "http://127.0.0.1:9000"),
        ])
        .unwrap();
        assert_eq!(config.otp_path, PathBuf::from("/var/run/otp/current"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = load(&[("CHANNEL_SECRET", "topsecret"), ("CHANNEL_ACCESS_TOKEN", "tok123")]).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("topsecret"));
        assert!(!rendered.contains("tok123"));
    }
}
