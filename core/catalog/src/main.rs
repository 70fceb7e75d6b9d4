use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use clap::Parser;
use docs_portal_catalog::{CatalogError, MetadataStore, PortalConfig, ProjectCatalog};
use docs_portal_schemas::{DocTreeNode, ProjectMetadataUpdate};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docs-portal", about = "Documentation browsing portal service")]
struct Args {
    /// Address to bind the HTTP server on
    #[arg(long, default_value = "127.0.0.1:21970", env = "DOCS_PORTAL_ADDR")]
    addr: String,

    /// Directory holding the persisted metadata document
    #[arg(long, default_value = ".docs-portal-data", env = "DOCS_PORTAL_DATA_DIR")]
    data_dir: PathBuf,

    /// JSON file mapping project names to root paths
    #[arg(long, default_value = "project-roots.json", env = "DOCS_PORTAL_ROOTS")]
    roots: PathBuf,
}

#[derive(Clone)]
struct AppState {
    catalog: Arc<Mutex<ProjectCatalog>>,
    config: Arc<PortalConfig>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Docs Portal Catalog Service v0.1.0");

    let args = Args::parse();
    let config = PortalConfig::load(args.data_dir, &args.roots)?;
    let catalog = ProjectCatalog::new(MetadataStore::new(config.store_path()));

    let state = AppState {
        catalog: Arc::new(Mutex::new(catalog)),
        config: Arc::new(config),
    };

    // CORS layer for the viewer UI
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/projects", get(list_projects))
        .route("/projects/by-category", get(projects_by_category))
        .route("/projects/:name", put(update_project))
        .route("/projects/:name/overview", get(project_overview))
        .route("/docs", get(all_doc_trees))
        .route("/docs/:name", get(project_doc_tree))
        .route("/content", get(file_content))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    info!("Starting HTTP server on {}", args.addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "docs-portal-catalog",
        "status": "healthy",
        "version": "0.1.0"
    }))
}

async fn list_projects(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let catalog = state.catalog.lock().await;

    let mut projects = Vec::new();
    for (name, path) in &state.config.project_roots {
        let metadata = catalog.get_or_create(name, path).map_err(|e| {
            error!("Failed to resolve project {}: {}", name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
        projects.push(metadata);
    }

    Ok(Json(projects))
}

async fn projects_by_category(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let catalog = state.catalog.lock().await;

    let groups = catalog
        .group_by_category(&state.config.project_roots)
        .map_err(|e| {
            error!("Failed to group projects: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(groups))
}

async fn project_overview(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let root = state
        .config
        .root_for(&name)
        .ok_or((StatusCode::NOT_FOUND, "Unknown project".to_string()))?
        .to_string();

    let catalog = state.catalog.lock().await;
    let overview = catalog.overview(&name, &root).map_err(|e| {
        error!("Failed to build overview for {}: {}", name, e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(overview))
}

async fn update_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(updates): Json<ProjectMetadataUpdate>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let catalog = state.catalog.lock().await;

    let updated = catalog.update(&name, updates).map_err(|e| match &e {
        CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        _ => {
            error!("Failed to update project {}: {}", name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })?;

    Ok(Json(updated))
}

async fn all_doc_trees(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.lock().await;

    let mut trees: BTreeMap<String, Vec<DocTreeNode>> = BTreeMap::new();
    for (name, path) in &state.config.project_roots {
        trees.insert(name.clone(), catalog.doc_tree(path));
    }

    Json(trees)
}

async fn project_doc_tree(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let root = state
        .config
        .root_for(&name)
        .ok_or((StatusCode::NOT_FOUND, "Unknown project".to_string()))?
        .to_string();

    let catalog = state.catalog.lock().await;
    let files = catalog.doc_tree(&root);

    Ok(Json(serde_json::json!({
        "project": name,
        "files": files
    })))
}

#[derive(Debug, Deserialize)]
struct ContentQuery {
    project: String,
    file: String,
}

async fn file_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let root = state
        .config
        .root_for(&query.project)
        .ok_or((StatusCode::BAD_REQUEST, "Invalid project".to_string()))?
        .to_string();

    let catalog = state.catalog.lock().await;
    let content = catalog
        .read_content(&root, &query.file)
        .map_err(|e| match e {
            CatalogError::AccessDenied(_) => (StatusCode::FORBIDDEN, "Access denied".to_string()),
            CatalogError::Io(_) => (StatusCode::NOT_FOUND, "Failed to read file".to_string()),
            other => {
                error!("Failed to read {} in {}: {}", query.file, query.project, other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        })?;

    Ok(Json(serde_json::json!({
        "project": query.project,
        "filePath": query.file,
        "content": content
    })))
}
