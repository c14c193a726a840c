use anyhow::{Context, Result};

use weather_core::resolver::viacep::DEFAULT_VIACEP_BASE_URL;
use weather_core::resolver::weatherapi::DEFAULT_WEATHER_API_BASE_URL;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub weather_api_key: String,
    pub viacep_base_url: String,
    pub weather_api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let weather_api_key = lookup("WEATHER_API_KEY")
            .context("the WEATHER_API_KEY environment variable is required")?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("PORT must be a valid port number")?;

        let viacep_base_url =
            lookup("VIACEP_BASE_URL").unwrap_or_else(|| DEFAULT_VIACEP_BASE_URL.into());

        let weather_api_base_url =
            lookup("WEATHER_API_BASE_URL").unwrap_or_else(|| DEFAULT_WEATHER_API_BASE_URL.into());

        Ok(Self { port, weather_api_key, viacep_base_url, weather_api_base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_weather_api_key_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("WEATHER_API_KEY"));
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = Config::from_lookup(lookup(&[("WEATHER_API_KEY", "k")]))
            .expect("config must load with only the key set");

        assert_eq!(config.port, 8080);
        assert_eq!(config.weather_api_key, "k");
        assert_eq!(config.viacep_base_url, DEFAULT_VIACEP_BASE_URL);
        assert_eq!(config.weather_api_base_url, DEFAULT_WEATHER_API_BASE_URL);
    }

    #[test]
    fn overrides_take_precedence() {
        let config = Config::from_lookup(lookup(&[
            ("WEATHER_API_KEY", "k"),
            ("PORT", "9090"),
            ("VIACEP_BASE_URL", "http://viacep.test"),
            ("WEATHER_API_BASE_URL", "http://weather.test"),
        ]))
        .expect("config must load");

        assert_eq!(config.port, 9090);
        assert_eq!(config.viacep_base_url, "http://viacep.test");
        assert_eq!(config.weather_api_base_url, "http://weather.test");
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("WEATHER_API_KEY", "k"), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
