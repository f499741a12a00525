use crate::config::Config;
use crate::error::{KgscopeError, Result};
use crate::graph::{humanize_uri, BuildReport, GraphBuilder, GraphLimits};
use crate::render::{escape_html, render_fragment, RenderAdapter, RenderModel};
use crate::resolve::{Resolver, EMPTY_QUERY_MESSAGE};
use crate::store::query::validate_uri;
use crate::store::KnowledgeStore;
use crate::web::pages;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shown by the description endpoint when the store has no abstract.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Check if a port is available by attempting to bind to it
async fn check_port_available(addr: &str) -> bool {
    tokio::net::TcpListener::bind(addr).await.is_ok()
}

/// Shared, read-only state. Every request builds its own graph.
pub struct AppState<S> {
    store: Arc<S>,
    config: Arc<Config>,
    adapter: Arc<RenderAdapter>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            adapter: Arc::clone(&self.adapter),
        }
    }
}

impl<S: KnowledgeStore> AppState<S> {
    pub fn new(store: S, config: Config) -> Result<Self> {
        let adapter = RenderAdapter::from_config(&config.render)?;
        Ok(Self {
            store: Arc::new(store),
            config: Arc::new(config),
            adapter: Arc::new(adapter),
        })
    }
}

/// HTTP front-end server
pub struct HttpServer<S> {
    state: AppState<S>,
}

impl<S: KnowledgeStore + 'static> HttpServer<S> {
    pub fn new(store: S, config: Config) -> Result<Self> {
        Ok(Self {
            state: AppState::new(store, config)?,
        })
    }

    /// Run the HTTP server until the process is stopped
    pub async fn run(&self) -> Result<()> {
        let http = &self.state.config.http_server;
        let addr = format!("{}:{}", http.bind_address, http.port);
        let app = create_router(self.state.clone());

        if !check_port_available(&addr).await {
            return Err(KgscopeError::Config(format!(
                "Port {} is already in use. Stop the other process or set http_server.port in config.toml",
                http.port
            )));
        }

        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            KgscopeError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", addr, e),
            ))
        })?;

        log::info!("Starting kgscope on http://{}", addr);
        log::info!("SPARQL endpoint: {}", self.state.config.store.endpoint);

        axum::serve(listener, app).await.map_err(|e| {
            KgscopeError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP server error: {}", e),
            ))
        })?;

        Ok(())
    }
}

/// Create the axum router
pub fn create_router<S: KnowledgeStore + 'static>(state: AppState<S>) -> Router {
    let allowed_origins = &state.config.http_server.allowed_origins;

    // No origins configured: allow all (local use)
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/", get(handle_index).post(handle_search::<S>))
        .route("/details", get(handle_details::<S>))
        .route("/details/", get(handle_details::<S>))
        .route("/node_description", get(handle_node_description::<S>))
        .route("/api/search", get(handle_api_search::<S>))
        .route("/api/graph", get(handle_api_graph::<S>))
        .route("/health", get(handle_health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SearchForm {
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSearchParams {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphParams {
    resource: Option<String>,
    physics: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct NodeParams {
    node_uri: Option<String>,
}

#[derive(Debug, Serialize)]
struct GraphResponse {
    #[serde(flatten)]
    model: RenderModel,
    report: BuildReport,
}

/// Map a library error to a JSON error response
fn error_response(err: &KgscopeError) -> Response {
    let status = match err {
        KgscopeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        KgscopeError::StoreQuery(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

/// Non-blank trimmed value of an optional parameter
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Build the graph for a validated resource and map it for rendering
async fn expand<S: KnowledgeStore>(
    state: &AppState<S>,
    resource: &str,
    physics: bool,
) -> (String, RenderModel, BuildReport) {
    let label = humanize_uri(resource);
    let builder = GraphBuilder::new(&*state.store, GraphLimits::from(&state.config.graph));
    let graph = builder.build(resource, &label).await;
    let model = state.adapter.to_render_model(&graph, physics);
    (label, model, graph.report)
}

async fn handle_index() -> Html<String> {
    Html(pages::index_page())
}

async fn handle_search<S: KnowledgeStore>(
    State(state): State<AppState<S>>,
    Form(form): Form<SearchForm>,
) -> Response {
    let Some(query) = present(&form.query) else {
        return (
            StatusCode::BAD_REQUEST,
            Html(pages::results_page("", &[], Some(EMPTY_QUERY_MESSAGE))),
        )
            .into_response();
    };

    let resolver = Resolver::new(&*state.store, state.config.resolver.clone());
    let resolution = resolver.resolve(query).await;
    Html(pages::results_page(
        query,
        &resolution.candidates,
        resolution.error.as_deref(),
    ))
    .into_response()
}

async fn handle_details<S: KnowledgeStore>(
    State(state): State<AppState<S>>,
    Query(params): Query<GraphParams>,
) -> Response {
    let Some(resource) = present(&params.resource) else {
        return Redirect::to("/").into_response();
    };
    if let Err(e) = validate_uri(resource) {
        let message = format!("<p class=\"error\">{}</p>", escape_html(&e.to_string()));
        return (StatusCode::BAD_REQUEST, Html(message)).into_response();
    }

    let physics = params.physics.unwrap_or(state.config.render.physics);
    let (label, model, _) = expand(&state, resource, physics).await;

    match render_fragment(&model, &state.config.render.height, &state.config.render.width) {
        Ok(fragment) => Html(pages::details_page(&label, &fragment)).into_response(),
        Err(e) => {
            log::error!("Failed to render graph for {}: {}", resource, e);
            error_response(&e)
        }
    }
}

async fn handle_node_description<S: KnowledgeStore>(
    State(state): State<AppState<S>>,
    Query(params): Query<NodeParams>,
) -> Response {
    let Some(node_uri) = present(&params.node_uri) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Missing node_uri" })),
        )
            .into_response();
    };
    if let Err(e) = validate_uri(node_uri) {
        return error_response(&e);
    }

    match state.store.find_abstract(node_uri).await {
        Ok(text) => Json(serde_json::json!({
            "description": text.unwrap_or_else(|| NO_DESCRIPTION.to_string())
        }))
        .into_response(),
        Err(e) => {
            log::warn!("Abstract lookup for {} failed: {}", node_uri, e);
            error_response(&e)
        }
    }
}

async fn handle_api_search<S: KnowledgeStore>(
    State(state): State<AppState<S>>,
    Query(params): Query<ApiSearchParams>,
) -> Response {
    let Some(query) = present(&params.q) else {
        return error_response(&KgscopeError::InvalidInput("Missing q".to_string()));
    };
    let resolver = Resolver::new(&*state.store, state.config.resolver.clone());
    Json(resolver.resolve(query).await).into_response()
}

async fn handle_api_graph<S: KnowledgeStore>(
    State(state): State<AppState<S>>,
    Query(params): Query<GraphParams>,
) -> Response {
    let Some(resource) = present(&params.resource) else {
        return error_response(&KgscopeError::InvalidInput("Missing resource".to_string()));
    };
    if let Err(e) = validate_uri(resource) {
        return error_response(&e);
    }
    let physics = params.physics.unwrap_or(state.config.render.physics);
    let (_, model, report) = expand(&state, resource, physics).await;
    Json(GraphResponse { model, report }).into_response()
}

/// Handle health check endpoint
async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "kgscope",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
        .into_response()
}
