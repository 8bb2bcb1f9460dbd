use crate::error::{DiggerError, Result};
use crate::pipeline::{Digger, QueryRequest};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// First non-blank `date` value. Repeated keys are allowed and blank values
/// are skipped, so `?date=&date=2020-03-10` asks for 2020-03-10.
pub fn date_param(pairs: Vec<(String, String)>) -> Option<String> {
    pairs.into_iter().find(|(k, v)| k == "date" && !v.is_empty()).map(|(_, v)| v)
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "covid-digger",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /?date=YYYY-MM-DD`. Every request runs its own query. A query string
/// that fails to decode is treated as carrying no date.
async fn cases(
    State(digger): State<Arc<Digger>>,
    params: Option<Query<Vec<(String, String)>>>,
) -> Response {
    let date = params.and_then(|Query(pairs)| date_param(pairs));
    let req = QueryRequest { date, local_file: None };
    match digger.run(&req).await {
        Ok(report) => Json(report.regions).into_response(),
        Err(e) => {
            error!("query failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub fn create_router(digger: Arc<Digger>) -> Router {
    Router::new()
        .route("/", get(cases))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(digger)
}

/// First address `hostname:port` resolves to.
pub async fn resolve_addr(hostname: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host((hostname, port))
        .await
        .map_err(|e| DiggerError::Server(format!("cannot establish a connection: {e}")))?;
    addrs.next().ok_or_else(|| {
        DiggerError::Server(format!("cannot establish a connection: {hostname} has no address"))
    })
}

/// Serve until ctrl-c.
pub async fn serve(addr: SocketAddr, digger: Arc<Digger>) -> Result<()> {
    let app = create_router(digger);
    let server = Server::try_bind(&addr)
        .map_err(|e| DiggerError::Server(format!("cannot establish a connection: {e}")))?;
    info!("Server up, reachable at http://{}", addr);
    server
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .map_err(|e| DiggerError::Server(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn first_date_wins() {
        let p = pairs(&[("date", "2020-03-10"), ("date", "2020-03-11")]);
        assert_eq!(date_param(p).as_deref(), Some("2020-03-10"));
    }

    #[test]
    fn blank_and_foreign_keys_are_skipped() {
        assert_eq!(date_param(pairs(&[("date", "")])), None);
        assert_eq!(date_param(pairs(&[("day", "2020-03-10")])), None);
        let p = pairs(&[("date", ""), ("x", "1"), ("date", "2020-03-11")]);
        assert_eq!(date_param(p).as_deref(), Some("2020-03-11"));
        assert_eq!(date_param(Vec::new()), None);
    }
}
