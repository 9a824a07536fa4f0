use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub inference: InferenceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: RunDefaults,
    /// Benchmark tracks, executed in order on every run.
    #[serde(default)]
    pub tracks: Vec<TrackConfig>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. Empty means allow any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Model inference service configuration (embeddings + reranking)
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the inference service, e.g. "http://127.0.0.1:8081".
    pub endpoint: String,
    /// Optional env var holding a bearer token for the inference service.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Distinct embedding model clients kept resident at once.
    #[serde(default = "default_embedding_cache_slots")]
    pub embedding_cache_slots: usize,
    /// Distinct reranker model clients kept resident at once.
    #[serde(default = "default_reranker_cache_slots")]
    pub reranker_cache_slots: usize,
}

/// Run record storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_runs_dir")]
    pub runs_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            runs_dir: default_runs_dir(),
        }
    }
}

/// Defaults applied to run requests that omit a field
#[derive(Debug, Clone, Deserialize)]
pub struct RunDefaults {
    #[serde(default = "default_chunk_strategy")]
    pub chunk_strategy: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_overlap")]
    pub overlap: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            chunk_strategy: default_chunk_strategy(),
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            top_k: default_top_k(),
            embedding_model: default_embedding_model(),
        }
    }
}

/// One benchmark track: a document plus its labeled query dataset
#[derive(Debug, Clone, Deserialize)]
pub struct TrackConfig {
    pub name: String,
    pub document: PathBuf,
    pub dataset: PathBuf,
    /// Overrides the requested embedding model for this track
    /// (e.g. a multilingual model for a non-English track).
    #[serde(default)]
    pub embedding_model: Option<String>,
}

fn default_port() -> u16 {
    7860
}

fn default_batch_size() -> usize {
    64
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_embedding_cache_slots() -> usize {
    5
}

fn default_reranker_cache_slots() -> usize {
    3
}

fn default_runs_dir() -> PathBuf {
    PathBuf::from("runs")
}

fn default_chunk_strategy() -> String {
    "naive".to_string()
}

fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    50
}

fn default_top_k() -> usize {
    5
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RAGBENCH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("RAGBENCH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.inference.endpoint)
            .with_context(|| format!("inference.endpoint is not a valid URL: {}", self.inference.endpoint))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            anyhow::bail!("inference.endpoint must be http or https: {}", self.inference.endpoint);
        }

        if self.inference.batch_size == 0 {
            anyhow::bail!("inference.batch_size must be greater than 0");
        }

        if self.inference.embedding_cache_slots == 0 || self.inference.reranker_cache_slots == 0 {
            anyhow::bail!("inference cache slots must be greater than 0");
        }

        if self.defaults.top_k == 0 {
            anyhow::bail!("defaults.top_k must be greater than 0");
        }

        if self.defaults.embedding_model.trim().is_empty() {
            anyhow::bail!("defaults.embedding_model must not be empty");
        }

        if self.defaults.overlap >= self.defaults.chunk_size {
            anyhow::bail!("defaults.overlap must be less than chunk_size");
        }

        if self.tracks.is_empty() {
            anyhow::bail!("at least one [[tracks]] entry is required");
        }

        for track in &self.tracks {
            if track.name.trim().is_empty() {
                anyhow::bail!("track name must not be empty");
            }
        }

        let mut names: Vec<&str> = self.tracks.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.tracks.len() {
            anyhow::bail!("track names must be unique");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate the process-wide env var so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn base_config() -> String {
        r#"
[server]
port = 7860

[inference]
endpoint = "http://127.0.0.1:8081"
batch_size = 64

[storage]
runs_dir = "runs"

[defaults]
chunk_size = 500
overlap = 50
top_k = 5
embedding_model = "all-MiniLM-L6-v2"

[[tracks]]
name = "english"
document = "data/doc.en.txt"
dataset = "data/benchmark.en.json"

[[tracks]]
name = "telugu"
document = "data/doc.te.txt"
dataset = "data/benchmark.te.json"
embedding_model = "paraphrase-multilingual-MiniLM-L12-v2"
"#
        .to_string()
    }

    fn load_from(content: &str) -> Result<Config> {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).unwrap();

        let original = std::env::var("RAGBENCH_CONFIG").ok();
        std::env::set_var("RAGBENCH_CONFIG", config_path.to_str().unwrap());
        let result = Config::load();
        match original {
            Some(v) => std::env::set_var("RAGBENCH_CONFIG", v),
            None => std::env::remove_var("RAGBENCH_CONFIG"),
        }
        result
    }

    #[test]
    fn test_config_load_success() {
        let config = load_from(&base_config()).expect("config should load");
        assert_eq!(config.server.port, 7860);
        assert_eq!(config.inference.batch_size, 64);
        assert_eq!(config.inference.embedding_cache_slots, 5);
        assert_eq!(config.inference.reranker_cache_slots, 3);
        assert_eq!(config.defaults.chunk_strategy, "naive");
        assert_eq!(config.tracks.len(), 2);
        assert_eq!(
            config.tracks[1].embedding_model.as_deref(),
            Some("paraphrase-multilingual-MiniLM-L12-v2")
        );
    }

    #[test]
    fn test_config_rejects_degenerate_overlap() {
        let content = base_config().replace("overlap = 50", "overlap = 500");
        let err = load_from(&content).unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn test_config_rejects_zero_top_k() {
        let content = base_config().replace("top_k = 5", "top_k = 0");
        assert!(load_from(&content).is_err());
    }

    #[test]
    fn test_config_requires_tracks() {
        let content: String = base_config()
            .lines()
            .take_while(|l| !l.starts_with("[[tracks]]"))
            .map(|l| format!("{l}\n"))
            .collect();
        let err = load_from(&content).unwrap_err();
        assert!(err.to_string().contains("tracks"));
    }

    #[test]
    fn test_config_rejects_bad_endpoint() {
        let content = base_config().replace("http://127.0.0.1:8081", "not a url");
        assert!(load_from(&content).is_err());
    }

    #[test]
    fn test_config_rejects_duplicate_track_names() {
        let content = base_config().replace("name = \"telugu\"", "name = \"english\"");
        let err = load_from(&content).unwrap_err();
        assert!(err.to_string().contains("unique"));
    }
}
