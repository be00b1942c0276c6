use std::env;

use crate::domain::GoodreadsError;

pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com";
pub const DEFAULT_LOG_FILE: &str = "rattle.log";

/// OAuth1 consumer and access token pair
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("access_token", &"***")
            .field("access_token_secret", &"***")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub base_url: String,
    pub shelf: Option<String>,
    pub per_page: Option<u32>,
    pub log_file: String,
}

impl Config {
    pub fn from_env() -> Result<Self, GoodreadsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in
    /// production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GoodreadsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let credentials = match (
            var("GOODREADS_API_KEY"),
            var("GOODREADS_API_SECRET"),
            var("GOODREADS_ACCESS_TOKEN"),
            var("GOODREADS_ACCESS_TOKEN_SECRET"),
        ) {
            (Some(api_key), Some(api_secret), Some(access_token), Some(access_token_secret)) => {
                Credentials {
                    api_key,
                    api_secret,
                    access_token,
                    access_token_secret,
                }
            }
            _ => {
                return Err(GoodreadsError::Config(
                    "No API key/access tokens found.".to_string(),
                ));
            }
        };

        let per_page = match var("RATTLE_PER_PAGE") {
            Some(raw) => Some(raw.parse::<u32>().map_err(|e| {
                GoodreadsError::Config(format!("Invalid RATTLE_PER_PAGE '{}': {}", raw, e))
            })?),
            None => None,
        };

        Ok(Self {
            credentials,
            base_url: var("GOODREADS_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            shelf: var("RATTLE_SHELF"),
            per_page,
            log_file: var("RATTLE_LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        })
    }
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
        move |key: &str| map.get(key).cloned()
    }

    const CREDENTIALS: [(&str, &str); 4] = [
        ("GOODREADS_API_KEY", "key"),
        ("GOODREADS_API_SECRET", "secret"),
        ("GOODREADS_ACCESS_TOKEN", "token"),
        ("GOODREADS_ACCESS_TOKEN_SECRET", "token_secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&CREDENTIALS)).unwrap();
        assert_eq!(config.credentials.api_key, "key");
        assert_eq!(config.credentials.access_token_secret, "token_secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
        assert_eq!(config.shelf, None);
        assert_eq!(config.per_page, None);
    }

    #[test]
    fn test_missing_credential_is_config_error() {
        let err = Config::from_lookup(lookup(&CREDENTIALS[..3])).unwrap_err();
        assert!(matches!(err, GoodreadsError::Config(_)));
        assert!(err.to_string().contains("No API key/access tokens found."));
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs[1] = ("GOODREADS_API_SECRET", "  ");
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("GOODREADS_BASE_URL", "http://localhost:9000/"));
        pairs.push(("RATTLE_SHELF", "to-read"));
        pairs.push(("RATTLE_PER_PAGE", "50"));
        pairs.push(("RATTLE_LOG_FILE", "/tmp/rattle-test.log"));

        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.shelf.as_deref(), Some("to-read"));
        assert_eq!(config.per_page, Some(50));
        assert_eq!(config.log_file, "/tmp/rattle-test.log");
    }

    #[test]
    fn test_invalid_per_page() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("RATTLE_PER_PAGE", "lots"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("RATTLE_PER_PAGE"));
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let config = Config::from_lookup(lookup(&CREDENTIALS)).unwrap();
        let debug = format!("{:?}", config.credentials);
        assert!(!debug.contains("\"secret\""));
        assert!(!debug.contains("\"token\""));
        assert!(debug.contains("\"key\""));
    }
}
