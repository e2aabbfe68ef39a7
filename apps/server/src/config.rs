use heater_timer_calculator::{ClockTime, DEFAULT_REFERENCE};
use log::info;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file read error: {0}")]
    ConfigFileReadError(#[from] std::io::Error),
    #[error("Config file parsing error: {0}")]
    ConfigFileParsingError(#[from] toml::de::Error),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    listen_addr: Option<String>,
    static_dir: Option<String>,
    default_reference: Option<ClockTime>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub static_dir: String,
    /// Timer reference used when a request does not name one.
    pub default_reference: ClockTime,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: "0.0.0.0:8080".to_string(),
            static_dir: "apps/server/static".to_string(),
            default_reference: DEFAULT_REFERENCE,
        }
    }
}

/// Loads the config file at `path`. A missing file means defaults.
pub fn parse_config<P>(path: P) -> Result<Config, ConfigError>
where
    P: AsRef<Path>,
{
    match std::fs::read_to_string(&path) {
        Ok(contents) => parse_config_str(&contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("no config at {}, using defaults", path.as_ref().display());
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn parse_config_str(contents: &str) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let parsed: ConfigFile = toml::from_str(contents)?;
    if let Some(listen_addr) = parsed.listen_addr { config.listen_addr = listen_addr }
    if let Some(static_dir) = parsed.static_dir { config.static_dir = static_dir }
    if let Some(reference) = parsed.default_reference { config.default_reference = reference }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config_str("").unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.static_dir, "apps/server/static");
        assert_eq!(config.default_reference, ClockTime::HALF_PAST_MIDNIGHT);
    }

    #[test]
    fn overrides_from_toml() {
        let config = parse_config_str(
            r#"
            listen_addr = "127.0.0.1:3000"
            default_reference = "1:30 AM"
            "#,
        )
        .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
        assert_eq!(config.static_dir, "apps/server/static");
        assert_eq!(config.default_reference, ClockTime::HALF_PAST_ONE);
    }

    #[test]
    fn rejects_bad_reference() {
        let err = parse_config_str(r#"default_reference = "25:00""#).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileParsingError(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = parse_config("/nonexistent/heater-timer.toml").unwrap();
        assert_eq!(config.default_reference, DEFAULT_REFERENCE);
    }
}
