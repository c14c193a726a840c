use anyhow::{Context, Result};

pub const DEFAULT_ORCHESTRATOR_BASE_URL: &str = "http://localhost:8080";

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub orchestrator_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("PORT must be a valid port number")?;

        let orchestrator_base_url = lookup("ORCHESTRATOR_BASE_URL")
            .unwrap_or_else(|| DEFAULT_ORCHESTRATOR_BASE_URL.into());

        Ok(Self { port, orchestrator_base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_with_empty_environment() {
        let config = Config::from_lookup(|_| None).expect("config must load from defaults");

        assert_eq!(config.port, 8080);
        assert_eq!(config.orchestrator_base_url, DEFAULT_ORCHESTRATOR_BASE_URL);
    }

    #[test]
    fn overrides_take_precedence() {
        let config = Config::from_lookup(|key| match key {
            "PORT" => Some("3000".into()),
            "ORCHESTRATOR_BASE_URL" => Some("http://orchestrator.test".into()),
            _ => None,
        })
        .expect("config must load");

        assert_eq!(config.port, 3000);
        assert_eq!(config.orchestrator_base_url, "http://orchestrator.test");
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = Config::from_lookup(|key| (key == "PORT").then(|| "not-a-port".into()))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
