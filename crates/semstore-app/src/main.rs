//! semstore binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Install the tracing subscriber (and with `--init-config`, write the
//!    effective configuration back out and exit)
//! 3. Load the sentence-embedding model (eagerly, before serving)
//! 4. Start the axum REST API server

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use semstore_api::routes;
use semstore_api::state::AppState;
use semstore_core::config::SemstoreConfig;
use semstore_core::error::SemstoreError;
use semstore_vector::embedding::OnnxOptions;
use semstore_vector::{DynEmbeddingService, MockEmbedding, OnnxEmbeddingService};

use crate::cli::{CliArgs, ProcessEnv};

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

/// Load the configured embedding backend.
fn load_embedder(
    config: &SemstoreConfig,
    mock: bool,
) -> Result<Arc<dyn DynEmbeddingService>, SemstoreError> {
    if mock {
        tracing::warn!("Serving with the mock embedder; similarity scores are not semantic");
        return Ok(Arc::new(MockEmbedding::new()));
    }

    let options = OnnxOptions {
        model_name: config.model.name.clone(),
        max_seq_len: config.model.max_seq_len,
        intra_threads: config.model.intra_threads,
    };
    let service = OnnxEmbeddingService::from_directory(Path::new(&config.model.model_dir), options)?;
    Ok(Arc::new(service))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let env = ProcessEnv;

    // Config is read before tracing exists so its log level can apply.
    let config_file = args.resolve_config_path(&env);
    let (config, config_err) = match SemstoreConfig::load(&config_file) {
        Ok(config) => (config, None),
        Err(e) => (SemstoreConfig::default(), Some(e)),
    };
    let config = args.apply(&env, config);

    init_tracing(&config.general.log_level);
    tracing::info!("Starting semstore v{}", env!("CARGO_PKG_VERSION"));

    match config_err {
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(SemstoreError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %config_file.display(), "No config file, using defaults")
        }
        Some(e) => {
            tracing::error!(path = %config_file.display(), error = %e, "Invalid configuration");
            return Err(e.into());
        }
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    if args.init_config {
        config.save(&config_file)?;
        return Ok(());
    }

    let embedder = match load_embedder(&config, args.mock_model) {
        Ok(embedder) => embedder,
        Err(e) => {
            tracing::error!(
                model_dir = %config.model.model_dir,
                error = %e,
                "Failed to load embedding model"
            );
            return Err(e.into());
        }
    };
    tracing::info!(
        model = embedder.model_name(),
        dimensions = embedder.dimensions(),
        "Embedding model ready"
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    let state = AppState::new_dyn(config, embedder);

    if let Err(e) = routes::start_server(&host, port, state).await {
        tracing::error!(error = %e, "API server stopped");
        return Err(e.into());
    }

    Ok(())
}
