//! # Table server
//!
//! Serves one table over in-memory rows:
//!
//! - `GET /` and `POST /` answer draw requests (query string or form body)
//! - `GET /config` returns the widget configuration
//! - `GET /distinct/:column` lists the distinct values of one column
//! - `GET /metrics` returns the table counters

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::errors::{HttpError, HttpResult};
use crate::client::ClientConfiguration;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, MetricsSnapshot};
use crate::query::MemoryQueryable;
use crate::request::RequestParams;
use crate::response::DataTablesResponse;
use crate::table::DataTable;

/// Table and rows shared across handlers
pub struct TableState<E, V> {
    pub table: DataTable<E, V>,
    pub rows: MemoryQueryable<E>,
    pub metrics: Arc<MetricsRegistry>,
    pub ajax_url: String,
}

impl<E: 'static, V> TableState<E, V> {
    /// State over `rows`; the table reports into a fresh registry.
    pub fn new(table: DataTable<E, V>, rows: impl Into<Arc<[E]>>) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        Self {
            table: table.with_metrics(Arc::clone(&metrics)),
            rows: MemoryQueryable::new(rows),
            metrics,
            ajax_url: "/".to_string(),
        }
    }

    pub fn with_ajax_url(mut self, url: impl Into<String>) -> Self {
        self.ajax_url = url.into();
        self
    }
}

/// Routes for one table.
pub fn table_routes<E, V>(state: Arc<TableState<E, V>>) -> Router
where
    E: Clone + Send + Sync + 'static,
    V: Serialize + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(draw_query_handler::<E, V>).post(draw_form_handler::<E, V>))
        .route("/config", get(config_handler::<E, V>))
        .route("/distinct/:column", get(distinct_handler::<E, V>))
        .route("/metrics", get(metrics_handler::<E, V>))
        .with_state(state)
}

fn draw<E, V>(state: &TableState<E, V>, params: RequestParams) -> DataTablesResponse<V>
where
    E: Clone + 'static,
{
    match state.table.render_response(params, state.rows.clone()) {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// Filtering, sorting and counting walk every row; keep them off the async workers.
async fn draw_blocking<E, V>(
    state: Arc<TableState<E, V>>,
    params: RequestParams,
) -> HttpResult<Json<DataTablesResponse<V>>>
where
    E: Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    tokio::task::spawn_blocking(move || draw(&state, params))
        .await
        .map(Json)
        .map_err(|e| HttpError::Internal(e.to_string()))
}

async fn draw_query_handler<E, V>(
    State(state): State<Arc<TableState<E, V>>>,
    RawQuery(query): RawQuery,
) -> HttpResult<Json<DataTablesResponse<V>>>
where
    E: Clone + Send + Sync + 'static,
    V: Serialize + Send + Sync + 'static,
{
    let params = RequestParams::from_query_string(query.as_deref().unwrap_or_default());
    draw_blocking(state, params).await
}

async fn draw_form_handler<E, V>(
    State(state): State<Arc<TableState<E, V>>>,
    body: String,
) -> HttpResult<Json<DataTablesResponse<V>>>
where
    E: Clone + Send + Sync + 'static,
    V: Serialize + Send + Sync + 'static,
{
    draw_blocking(state, RequestParams::from_query_string(&body)).await
}

async fn config_handler<E, V>(State(state): State<Arc<TableState<E, V>>>) -> Json<ClientConfiguration>
where
    E: Clone + Send + Sync + 'static,
    V: Serialize + Send + Sync + 'static,
{
    Json(state.table.client_configuration(&state.ajax_url, "POST"))
}

async fn distinct_handler<E, V>(
    State(state): State<Arc<TableState<E, V>>>,
    Path(column): Path<String>,
) -> HttpResult<Json<Vec<String>>>
where
    E: Clone + Send + Sync + 'static,
    V: Serialize + Send + Sync + 'static,
{
    let values = state
        .table
        .distinct_column_values(&column, state.rows.clone())?;
    Ok(Json(values))
}

async fn metrics_handler<E, V>(State(state): State<Arc<TableState<E, V>>>) -> Json<MetricsSnapshot>
where
    E: Clone + Send + Sync + 'static,
    V: Serialize + Send + Sync + 'static,
{
    Json(state.metrics.snapshot())
}

/// HTTP server for one table
pub struct TableServer {
    config: HttpServerConfig,
    router: Router,
}

impl TableServer {
    /// Create a server; the state's ajax URL is taken from the config.
    pub fn new<E, V>(config: HttpServerConfig, state: TableState<E, V>) -> Self
    where
        E: Clone + Send + Sync + 'static,
        V: Serialize + Send + Sync + 'static,
    {
        let state = Arc::new(state.with_ajax_url(config.ajax_url.clone()));
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn build_router<E, V>(config: &HttpServerConfig, state: Arc<TableState<E, V>>) -> Router
    where
        E: Clone + Send + Sync + 'static,
        V: Serialize + Send + Sync + 'static,
    {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        table_routes(state)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process stops.
    pub async fn start(self) -> Result<(), HttpError> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|_| HttpError::BadAddress(self.config.socket_addr()))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HttpError::Internal(e.to_string()))?;

        let addr_text = addr.to_string();
        log_event_with_fields(Event::Serving, &[("addr", addr_text.as_str())]);

        axum::serve(listener, self.router)
            .await
            .map_err(|e| HttpError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ColumnDescriptor};
    use crate::config::TableConfig;
    use serde_json::{json, Value};

    fn state() -> TableState<Value, Value> {
        let catalog = Catalog::new(vec![ColumnDescriptor::new("id", "Id").orderable()]).unwrap();
        let table = DataTable::new(catalog, |row: &Value| row.clone(), TableConfig::default());
        TableState::new(table, vec![json!({"Id": 1})])
    }

    #[test]
    fn test_server_creation() {
        let server = TableServer::new(HttpServerConfig::with_port(9090), state());
        assert_eq!(server.socket_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn test_router_builds_with_origins() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _router = TableServer::new(config, state()).router();
    }

    #[test]
    fn test_draw_counts_requests() {
        let state = state();
        let response = draw(&state, RequestParams::from_query_string("draw=4"));
        assert_eq!(response.draw, 4);
        assert_eq!(state.metrics.snapshot().requests_decoded, 1);
    }

    #[tokio::test]
    async fn test_draw_runs_on_blocking_pool() {
        let state = Arc::new(state());
        let Json(response) = draw_blocking(Arc::clone(&state), RequestParams::from_query_string("draw=9"))
            .await
            .unwrap();
        assert_eq!(response.draw, 9);
        assert_eq!(response.records_filtered, 1);
        assert_eq!(state.metrics.snapshot().queries_executed, 1);
    }

    #[tokio::test]
    async fn test_bad_address_reported() {
        let config = HttpServerConfig::new("not an address", 1);
        let err = TableServer::new(config, state()).start().await.unwrap_err();
        assert_eq!(err.code(), "DT_HTTP_BAD_ADDRESS");
    }
}
