use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SemstoreError};

/// Top-level configuration for the semstore service.
///
/// Loaded from a TOML file (see `SEMSTORE_CONFIG`); every section and field
/// falls back to its default when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemstoreConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

impl SemstoreConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SemstoreConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(SemstoreError::Config("server.port must not be 0".into()));
        }
        if self.search.default_top_k == 0 {
            return Err(SemstoreError::Config(
                "search.default_top_k must be at least 1".into(),
            ));
        }
        if self.search.default_top_k > self.search.max_top_k {
            return Err(SemstoreError::Config(format!(
                "search.default_top_k ({}) exceeds search.max_top_k ({})",
                self.search.default_top_k, self.search.max_top_k
            )));
        }
        if self.chunking.max_words == 0 {
            return Err(SemstoreError::Config(
                "chunking.max_words must be at least 1".into(),
            ));
        }
        if self.model.max_seq_len == 0 {
            return Err(SemstoreError::Config(
                "model.max_seq_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5005,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Sentence-embedding model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier reported by `/health`.
    pub name: String,
    /// Directory holding `model.onnx` and `tokenizer.json`.
    pub model_dir: String,
    /// Token limit; longer input is truncated.
    pub max_seq_len: usize,
    /// ONNX Runtime intra-op threads.
    pub intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "all-MiniLM-L6-v2".to_string(),
            model_dir: "models/all-MiniLM-L6-v2".to_string(),
            max_seq_len: 256,
            intra_threads: 1,
        }
    }
}

/// Query defaults and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results when the request omits `top_k`.
    pub default_top_k: usize,
    /// Upper clamp for a requested `top_k`.
    pub max_top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_top_k: 5,
            max_top_k: 100,
        }
    }
}

/// Document splitting for `/embed` requests that send raw text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Word budget per chunk when the request omits `max_tokens`.
    pub max_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_words: 500 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = SemstoreConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5005);
        assert_eq!(config.server.max_body_bytes, 1024 * 1024);
        assert_eq!(config.model.name, "all-MiniLM-L6-v2");
        assert_eq!(config.model.max_seq_len, 256);
        assert_eq!(config.search.default_top_k, 5);
        assert_eq!(config.search.max_top_k, 100);
        assert_eq!(config.chunking.max_words, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[server]
host = "127.0.0.1"
port = 5000

[model]
model_dir = "/opt/models/minilm"

[search]
default_top_k = 3
max_top_k = 20
"#;
        let file = create_temp_config(content);
        let config = SemstoreConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.model.model_dir, "/opt/models/minilm");
        assert_eq!(config.search.default_top_k, 3);
        assert_eq!(config.search.max_top_k, 20);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[server]\nport = 8080\n");
        let config = SemstoreConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.search.default_top_k, 5);
        assert_eq!(config.model.name, "all-MiniLM-L6-v2");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is not [valid toml");
        let result = SemstoreConfig::load(file.path());
        assert!(matches!(result, Err(SemstoreError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_not_found() {
        let result = SemstoreConfig::load(Path::new("/nonexistent/semstore.toml"));
        match result {
            Err(SemstoreError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected Io(NotFound), got {:?}", other),
        }
    }

    #[test]
    fn test_load_chunking_section() {
        let file = create_temp_config("[chunking]\nmax_words = 120\n");
        let config = SemstoreConfig::load(file.path()).unwrap();
        assert_eq!(config.chunking.max_words, 120);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("semstore.toml");

        let mut config = SemstoreConfig::default();
        config.server.port = 9090;
        config.search.default_top_k = 7;
        config.save(&path).unwrap();

        let loaded = SemstoreConfig::load(&path).unwrap();
        assert_eq!(loaded.server.port, 9090);
        assert_eq!(loaded.search.default_top_k, 7);
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = SemstoreConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = SemstoreConfig::default();
        config.search.default_top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_default_above_max() {
        let mut config = SemstoreConfig::default();
        config.search.default_top_k = 50;
        config.search.max_top_k = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_validate_rejects_zero_chunk_words() {
        let mut config = SemstoreConfig::default();
        config.chunking.max_words = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_seq_len() {
        let mut config = SemstoreConfig::default();
        config.model.max_seq_len = 0;
        assert!(config.validate().is_err());
    }
}
