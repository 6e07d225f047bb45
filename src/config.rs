// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, SearchError};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub manticore: ManticoreConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManticoreConfig {
    pub url: String,
    pub table: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Docker-secret style file holding the proxy API key.
    #[serde(default)]
    pub api_key_file: Option<PathBuf>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub page_size: usize,
    pub facet_size: usize,
    #[serde(default = "default_layouts")]
    pub fuzzy_layouts: Vec<String>,
    pub max_matches: usize,
    #[serde(default = "default_slow_query_ms")]
    pub slow_query_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

fn default_layouts() -> Vec<String> {
    vec!["ru".to_string(), "us".to_string()]
}

fn default_slow_query_ms() -> u64 {
    1500
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PARAGRAPH_SEARCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        config.manticore.resolve_api_key()?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            manticore: ManticoreConfig {
                url: "http://127.0.0.1:9308".to_string(),
                table: "library2025".to_string(),
                api_key: None,
                api_key_file: None,
                timeout_secs: 15,
            },
            search: SearchConfig {
                page_size: 20,
                facet_size: 100,
                fuzzy_layouts: default_layouts(),
                max_matches: 10_000,
                slow_query_ms: default_slow_query_ms(),
            },
            server: ServerConfig {
                bind_addr: "127.0.0.1:8080".to_string(),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.manticore.url)
            .map_err(|e| SearchError::Config(format!("manticore.url: {}", e)))?;

        if self.manticore.table.trim().is_empty() {
            return Err(SearchError::Config(
                "manticore.table must not be empty".to_string(),
            ));
        }

        if self.manticore.timeout_secs == 0 {
            return Err(SearchError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.search.page_size == 0 {
            return Err(SearchError::Config(
                "page_size must be greater than 0".to_string(),
            ));
        }

        if self.search.facet_size == 0 {
            return Err(SearchError::Config(
                "facet_size must be greater than 0".to_string(),
            ));
        }

        if self.search.max_matches < self.search.page_size {
            return Err(SearchError::Config(
                "max_matches must be at least page_size".to_string(),
            ));
        }

        Ok(())
    }
}

impl ManticoreConfig {
    /// Reads `api_key_file` when no inline key is configured.
    fn resolve_api_key(&mut self) -> Result<()> {
        if self.api_key.is_some() {
            return Ok(());
        }

        if let Some(path) = &self.api_key_file {
            let key = std::fs::read_to_string(path).map_err(|source| {
                SearchError::FileOperation {
                    path: path.clone(),
                    source,
                }
            })?;
            let key = key.trim().to_string();
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const SAMPLE: &str = r#"
[manticore]
url = "http://manticore:9308"
table = "library2025"
timeout_secs = 10

[search]
page_size = 25
facet_size = 50
max_matches = 5000

[server]
bind_addr = "0.0.0.0:8080"
"#;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_from_file() {
        let (_dir, path) = write_config(SAMPLE);
        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.manticore.url, "http://manticore:9308");
        assert_eq!(config.search.page_size, 25);
        assert_eq!(config.search.fuzzy_layouts, vec!["ru", "us"]);
        assert_eq!(config.search.slow_query_ms, 1500);
        assert!(config.manticore.api_key.is_none());
    }

    #[test]
    fn test_api_key_file_is_read_and_trimmed() {
        let mut secret = NamedTempFile::new().unwrap();
        writeln!(secret, "  s3cret  ").unwrap();

        let contents = SAMPLE.replace(
            "timeout_secs = 10",
            &format!(
                "timeout_secs = 10\napi_key_file = {:?}",
                secret.path().display().to_string()
            ),
        );
        let (_dir, path) = write_config(&contents);
        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.manticore.api_key.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_missing_api_key_file_fails() {
        let contents = SAMPLE.replace(
            "timeout_secs = 10",
            "timeout_secs = 10\napi_key_file = \"/nonexistent/secret\"",
        );
        let (_dir, path) = write_config(&contents);

        assert!(matches!(
            Config::load(Some(&path)),
            Err(SearchError::FileOperation { .. })
        ));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let (_dir, path) = write_config(&SAMPLE.replace("page_size = 25", "page_size = 0"));
        assert!(matches!(
            Config::load(Some(&path)),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let (_dir, path) = write_config(
            &SAMPLE.replace("http://manticore:9308", "manticore:9308"),
        );
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default_config().validate().is_ok());
    }
}
