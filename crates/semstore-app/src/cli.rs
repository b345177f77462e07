//! CLI argument definitions for the semstore binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use semstore_core::config::SemstoreConfig;

/// semstore: in-memory text embedding store with similarity search over HTTP.
#[derive(Parser, Debug, Default)]
#[command(name = "semstore", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Interface to bind.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Directory containing model.onnx and tokenizer.json.
    #[arg(short = 'm', long = "model-dir")]
    pub model_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Serve with the deterministic mock embedder instead of loading a model.
    #[arg(long = "mock-model")]
    pub mock_model: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long = "init-config")]
    pub init_config: bool,
}

/// Environment lookup, injectable for tests.
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SEMSTORE_CONFIG env var > `semstore.toml`.
    pub fn resolve_config_path(&self, env: &dyn Env) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = env.var("SEMSTORE_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("semstore.toml")
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > PORT env var > SEMSTORE_PORT env var > config.
    /// Unparseable env values are skipped.
    pub fn resolve_port(&self, env: &dyn Env, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        ["PORT", "SEMSTORE_PORT"]
            .iter()
            .filter_map(|key| env.var(key))
            .find_map(|val| val.trim().parse::<u16>().ok())
            .unwrap_or(config_port)
    }

    /// Resolve the model directory.
    ///
    /// Priority: --model-dir flag > SEMSTORE_MODEL_DIR env var > config.
    pub fn resolve_model_dir(&self, env: &dyn Env, config_dir: &str) -> PathBuf {
        if let Some(ref p) = self.model_dir {
            return p.clone();
        }
        if let Some(p) = env.var("SEMSTORE_MODEL_DIR") {
            return PathBuf::from(p);
        }
        PathBuf::from(config_dir)
    }

    /// Fold CLI and environment overrides into a loaded config.
    pub fn apply(&self, env: &dyn Env, mut config: SemstoreConfig) -> SemstoreConfig {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        config.server.port = self.resolve_port(env, config.server.port);
        config.model.model_dir = self
            .resolve_model_dir(env, &config.model.model_dir)
            .to_string_lossy()
            .to_string();
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        config
    }
}
