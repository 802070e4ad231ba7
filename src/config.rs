use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<u32>,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size_options: default_page_size_options(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PaginationConfig {
    /// Page size used when a request or a fresh client session doesn't pick one.
    pub fn default_page_size(&self) -> u32 {
        self.page_size_options.first().copied().unwrap_or(5)
    }
}

fn default_page_size_options() -> Vec<u32> {
    vec![5, 10, 25, 50]
}
fn default_max_page_size() -> u32 {
    100
}

/// BM25 column weights for relevance ordering.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_first_name_weight")]
    pub first_name_weight: f64,
    #[serde(default = "default_last_name_weight")]
    pub last_name_weight: f64,
    #[serde(default = "default_city_weight")]
    pub city_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            first_name_weight: default_first_name_weight(),
            last_name_weight: default_last_name_weight(),
            city_weight: default_city_weight(),
        }
    }
}

fn default_first_name_weight() -> f64 {
    10.0
}
fn default_last_name_weight() -> f64 {
    5.0
}
fn default_city_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:7340".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let pagination = &config.pagination;
    if pagination.page_size_options.is_empty() {
        anyhow::bail!("pagination.page_size_options must not be empty");
    }
    if pagination.page_size_options.contains(&0) {
        anyhow::bail!("pagination.page_size_options must all be > 0");
    }
    if let Some(largest) = pagination.page_size_options.iter().max() {
        if *largest > pagination.max_page_size {
            anyhow::bail!(
                "pagination.max_page_size ({}) must be >= every page size option (largest is {})",
                pagination.max_page_size,
                largest
            );
        }
    }

    let search = &config.search;
    let weights = [
        search.first_name_weight,
        search.last_name_weight,
        search.city_weight,
    ];
    if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
        anyhow::bail!("search weights must be finite and > 0");
    }
    if search.first_name_weight < search.last_name_weight
        || search.last_name_weight < search.city_weight
    {
        anyhow::bail!("search weights must rank first_name >= last_name >= city");
    }

    if config.client.timeout_secs == 0 {
        anyhow::bail!("client.timeout_secs must be > 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_src)?;
        validate(&config)?;
        Ok(config)
    }

    const MINIMAL: &str = r#"
[db]
path = "./data/advdir.sqlite"

[server]
bind = "127.0.0.1:7340"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.pagination.page_size_options, vec![5, 10, 25, 50]);
        assert_eq!(config.pagination.default_page_size(), 5);
        assert_eq!(config.pagination.max_page_size, 100);
        assert_eq!(config.search, SearchConfig::default());
        assert_eq!(config.client.timeout_secs, 30);
    }

    #[test]
    fn test_rejects_empty_page_size_options() {
        let src = format!("{}\n[pagination]\npage_size_options = []\n", MINIMAL);
        let err = parse(&src).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_rejects_option_above_max() {
        let src = format!(
            "{}\n[pagination]\npage_size_options = [10, 500]\nmax_page_size = 100\n",
            MINIMAL
        );
        assert!(parse(&src).is_err());
    }

    #[test]
    fn test_rejects_inverted_weights() {
        let src = format!(
            "{}\n[search]\nfirst_name_weight = 1.0\nlast_name_weight = 5.0\n",
            MINIMAL
        );
        let err = parse(&src).unwrap_err();
        assert!(err.to_string().contains("first_name >= last_name"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let src = format!("{}\n[client]\ntimeout_secs = 0\n", MINIMAL);
        assert!(parse(&src).is_err());
    }
}
