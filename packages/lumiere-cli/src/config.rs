use anyhow::{bail, Context, Result};
use lumiere_admin::DEFAULT_LIMIT;
use lumiere_client::DEFAULT_BASE_URL;
use std::env;

/// Console configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
    pub page_size: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let page_size = match lookup("LUMIERE_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("LUMIERE_PAGE_SIZE must be a valid number")?,
            None => DEFAULT_LIMIT,
        };
        if page_size == 0 {
            bail!("LUMIERE_PAGE_SIZE must be positive");
        }

        Ok(Self {
            api_url: lookup("LUMIERE_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token: lookup("LUMIERE_TOKEN").filter(|t| !t.is_empty()),
            page_size,
        })
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, api_url: Option<String>, token: Option<String>) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if token.is_some() {
            self.token = token;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_BASE_URL);
        assert_eq!(config.token, None);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn environment_values_are_read() {
        let config = load(&[
            ("LUMIERE_API_URL", "https://lumiere.example/api"),
            ("LUMIERE_TOKEN", "abc"),
            ("LUMIERE_PAGE_SIZE", "50"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://lumiere.example/api");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn bad_page_size_is_rejected() {
        assert!(load(&[("LUMIERE_PAGE_SIZE", "many")]).is_err());
        assert!(load(&[("LUMIERE_PAGE_SIZE", "0")]).is_err());
    }

    #[test]
    fn flags_override_environment() {
        let config = load(&[("LUMIERE_TOKEN", "env")])
            .unwrap()
            .with_overrides(Some("http://127.0.0.1:9000/api".into()), None);
        assert_eq!(config.api_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.token.as_deref(), Some("env"));
    }
}
