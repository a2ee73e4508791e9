use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::YamlCatalog;
use crate::dispatch::ProcessDispatcher;
use crate::orchestrator::Orchestrator;
use crate::stores::{FsArtifactStore, FsMetadataStore, InMemoryRecordStore};

use super::api::schedule as schedule_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let bind_addr = config.web.bind.clone();

    let catalog = YamlCatalog::from_file(&config.catalog.path)?;
    let orchestrator = Orchestrator::new(
        Arc::new(catalog),
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(FsArtifactStore::new(config.artifacts.root.clone())),
        Arc::new(FsMetadataStore::new(config.metadata.root.clone())),
        Arc::new(ProcessDispatcher::new(
            config.worker.command.clone(),
            config.worker.args.clone(),
            config.worker.env.clone(),
        )),
        config.upstream.policy(),
    );

    let state = AppState {
        config: Arc::new(config),
        orchestrator: Arc::new(orchestrator),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route(
            "/api/schedule/generate",
            post(schedule_handlers::generate_schedule),
        )
        .route("/api/schedule/orphans", get(schedule_handlers::get_orphans))
        .route(
            "/api/schedule/mission/{id}",
            get(schedule_handlers::get_schedules_by_mission),
        )
        .route(
            "/api/schedule/output/{id}",
            get(schedule_handlers::get_schedule_output),
        )
        .route("/api/schedule/{id}", get(schedule_handlers::get_schedule))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
