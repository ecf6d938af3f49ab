#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the district map application.
//!
//! Loads the budget, enrollment, and anchor datasets once at startup and
//! serves district lookups and consolidation estimates from memory. Every
//! request reads the same immutable [`DistrictDataset`].

mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use district_map_dataset::{DatasetError, DistrictDataset, paths};
use district_map_normalize::{KeyNormalizer, NormalizerConfig, NormalizerConfigError};
use thiserror::Error;

/// Environment variable naming an extra normalizer config to merge over
/// the embedded one.
pub const NORMALIZER_CONFIG_ENV: &str = "DISTRICT_MAP_NORMALIZER_CONFIG";

/// Errors that can occur while starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The normalizer configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] NormalizerConfigError),
    /// A dataset could not be loaded.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// Binding or running the HTTP server failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// The loaded datasets.
    pub dataset: Arc<DistrictDataset>,
    /// Normalizer used to key incoming district names.
    pub normalizer: Arc<KeyNormalizer>,
}

/// Where to listen and what to load.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Directory holding the three dataset files.
    pub data_dir: PathBuf,
    /// Optional normalizer config merged over the embedded defaults.
    pub normalizer_config: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `DISTRICT_MAP_DATA_DIR`, and
    /// `DISTRICT_MAP_NORMALIZER_CONFIG`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let normalizer_config = std::env::var_os(NORMALIZER_CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            bind_addr,
            port,
            data_dir: paths::data_dir(),
            normalizer_config,
        }
    }
}

/// Builds the normalizer from the embedded config plus an optional
/// override file.
///
/// # Errors
///
/// Returns an error if the override file cannot be read or is invalid.
pub fn build_normalizer(
    override_path: Option<&std::path::Path>,
) -> Result<KeyNormalizer, NormalizerConfigError> {
    let mut config = NormalizerConfig::embedded();
    if let Some(path) = override_path {
        log::info!("Merging normalizer config from {}", path.display());
        config.merge(NormalizerConfig::load(path)?);
    }
    KeyNormalizer::new(&config)
}

/// Loads the normalizer and datasets described by `config`.
///
/// # Errors
///
/// Returns an error if the normalizer config or any dataset fails to load.
pub fn load_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let normalizer = build_normalizer(config.normalizer_config.as_deref())?;
    let dataset = DistrictDataset::load_from_dir(&config.data_dir, &normalizer)?;

    let stats = dataset.stats();
    log::info!(
        "Loaded {} budgets, {} enrollments, {} anchors ({} complete districts)",
        stats.budgets,
        stats.enrollments,
        stats.anchors,
        stats.complete
    );

    Ok(AppState {
        dataset: Arc::new(dataset),
        normalizer: Arc::new(normalizer),
    })
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/stats", web::get().to(handlers::stats))
            .route("/districts", web::get().to(handlers::districts))
            .route("/districts/{key}", web::get().to(handlers::district))
            .route("/keys", web::get().to(handlers::key_lookup))
            .route("/consolidation", web::post().to(handlers::consolidation)),
    );
}

/// Starts the district map API server.
///
/// Loads the datasets, then starts the Actix-Web HTTP server. This is a
/// regular async function; the caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an error if the datasets fail to load, or if the HTTP server
/// fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = web::Data::new(load_state(&config)?);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}
