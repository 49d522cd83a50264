//! OSM shortest-path HTTP microservice.
//!
//! Thin-handler pattern: handlers parse and validate the request, call into
//! `osmpath-lib`, and format the response. Each request is stateless; the
//! road graph is built fresh from Overpass data and discarded with the
//! response.
//!
//! # Endpoints
//!
//! - `POST /api/v1/path` - Compute a path with one algorithm
//! - `POST /api/v1/compare` - Run all four algorithms and rank them
//! - `GET /health/live` - Liveness probe
//!
//! # Configuration
//!
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `OSMPATH_OVERPASS_URL` - Override for the Overpass interpreter endpoint

mod logging;
mod problem;
mod request;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use osmpath_lib::{
    compare_routes, plan_route, AlgorithmOutcome, ComparisonSummary, Coordinate, OverpassClient,
    RouteQuery,
};

use logging::{init_logging, LoggingConfig};
use problem::{from_lib_error, ProblemDetails};
use request::{PathRequest, Validate};

/// Shared handler state; cheaply cloneable.
#[derive(Clone)]
struct AppState {
    client: Arc<OverpassClient>,
}

/// Single-path response returned to the caller.
#[derive(Debug, Serialize)]
struct PathResponse {
    /// Algorithm that produced the path.
    algorithm: String,
    /// Total path length in meters.
    length_m: f64,
    /// Ordered `[lat, lng]` pairs from start to end.
    path: Vec<[f64; 2]>,
}

/// Per-algorithm outcome as exposed on the wire.
#[derive(Debug, Serialize)]
struct OutcomeResponse {
    algorithm: String,
    success: bool,
    elapsed_ms: f64,
    nodes_explored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path_length_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    node_count: Option<usize>,
    path: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<AlgorithmOutcome> for OutcomeResponse {
    fn from(outcome: AlgorithmOutcome) -> Self {
        Self {
            algorithm: outcome.algorithm.to_string(),
            success: outcome.success,
            elapsed_ms: outcome.elapsed_ms,
            nodes_explored: outcome.nodes_explored,
            path_length_m: outcome.path_length_m,
            node_count: outcome.node_count,
            path: outcome.path.iter().map(coordinate_pair).collect(),
            error: outcome.error,
        }
    }
}

/// Comparison response returned to the caller.
#[derive(Debug, Serialize)]
struct CompareResponse {
    /// Graph node the requested start was snapped to, as `[lat, lng]`.
    start_node: [f64; 2],
    /// Graph node the requested end was snapped to, as `[lat, lng]`.
    end_node: [f64; 2],
    results: Vec<OutcomeResponse>,
    summary: ComparisonSummary,
}

/// HTTP response - either success or RFC 9457 error.
enum Response<T: Serialize> {
    Success(T),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env();
    init_logging(&logging_config);

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    // The blocking HTTP client is built and used off the async runtime.
    let client = tokio::task::spawn_blocking(OverpassClient::new).await??;
    let state = AppState {
        client: Arc::new(client),
    };

    let app = Router::new()
        .route("/api/v1/path", post(path_handler))
        .route("/api/v1/compare", post(compare_handler))
        .route("/health/live", get(health_live))
        .layer(TraceLayer::new_for_http())
        // Browser frontends call this service directly.
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Handle POST /api/v1/path requests.
async fn path_handler(
    State(state): State<AppState>,
    Json(request): Json<PathRequest>,
) -> Response<PathResponse> {
    let request_id = generate_request_id();

    info!(
        request_id = %request_id,
        algorithm = %request.algorithm,
        "handling path request"
    );

    if let Err(problem) = request.validate(&request_id) {
        return Response::Error(*problem);
    }

    let query = request.to_query();
    let plan = match run_blocking(&state, query, &request_id, |client, query| {
        plan_route(client, &query)
    })
    .await
    {
        Ok(plan) => plan,
        Err(problem) => {
            error!(request_id = %request_id, problem = %problem, "path request failed");
            return Response::Error(problem);
        }
    };

    info!(
        request_id = %request_id,
        nodes = plan.path.len(),
        length_m = plan.length_m,
        "path computed successfully"
    );

    Response::Success(PathResponse {
        algorithm: plan.algorithm.to_string(),
        length_m: plan.length_m,
        path: plan.path.iter().map(coordinate_pair).collect(),
    })
}

/// Handle POST /api/v1/compare requests.
async fn compare_handler(
    State(state): State<AppState>,
    Json(request): Json<PathRequest>,
) -> Response<CompareResponse> {
    let request_id = generate_request_id();

    info!(request_id = %request_id, "handling comparison request");

    if let Err(problem) = request.validate(&request_id) {
        return Response::Error(*problem);
    }

    let query = request.to_query();
    let comparison = match run_blocking(&state, query, &request_id, |client, query| {
        compare_routes(client, &query)
    })
    .await
    {
        Ok(comparison) => comparison,
        Err(problem) => {
            error!(request_id = %request_id, problem = %problem, "comparison request failed");
            return Response::Error(problem);
        }
    };

    info!(
        request_id = %request_id,
        successful = comparison.summary.successful_algorithms,
        "comparison computed successfully"
    );

    Response::Success(CompareResponse {
        start_node: coordinate_pair(&comparison.start_node),
        end_node: coordinate_pair(&comparison.end_node),
        results: comparison.outcomes.into_iter().map(Into::into).collect(),
        summary: comparison.summary,
    })
}

/// Liveness probe handler.
async fn health_live() -> impl IntoResponse {
    #[derive(Serialize)]
    struct HealthStatus {
        status: &'static str,
        service: &'static str,
        version: &'static str,
    }

    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok",
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Run a blocking library call off the async runtime and map failures to
/// Problem Details carrying the request id.
async fn run_blocking<T, F>(
    state: &AppState,
    query: RouteQuery,
    request_id: &str,
    call: F,
) -> Result<T, ProblemDetails>
where
    T: Send + 'static,
    F: FnOnce(&OverpassClient, RouteQuery) -> osmpath_lib::Result<T> + Send + 'static,
{
    let client = Arc::clone(&state.client);
    match tokio::task::spawn_blocking(move || call(&client, query)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(from_lib_error(&error, request_id)),
        Err(join_error) => Err(ProblemDetails::internal_error(
            join_error.to_string(),
            request_id,
        )),
    }
}

fn coordinate_pair(coordinate: &Coordinate) -> [f64; 2] {
    [coordinate.lat, coordinate.lon]
}

/// Generate a unique request ID for tracing.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    format!("req-{:x}", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use osmpath_lib::{BoundingBox, SearchAlgorithm};

    #[tokio::test]
    async fn run_blocking_attaches_the_request_id_to_failures() {
        // The endpoint is never contacted; the injected call fails first.
        // Like `main`, the blocking HTTP client is built off the async runtime.
        let client =
            tokio::task::spawn_blocking(|| OverpassClient::with_endpoint("http://localhost:1"))
                .await
                .expect("spawn_blocking joins")
                .expect("client builds");
        let state = AppState {
            client: Arc::new(client),
        };
        let query = RouteQuery {
            start: Coordinate::new(0.0, 0.0),
            end: Coordinate::new(0.001, 0.0),
            bbox: BoundingBox {
                north: 0.01,
                south: -0.01,
                east: 0.01,
                west: -0.01,
            },
            algorithm: SearchAlgorithm::Dijkstra,
        };

        let problem = run_blocking(&state, query, "req-42", |_, _| {
            Err::<(), _>(osmpath_lib::Error::RouteNotFound)
        })
        .await
        .expect_err("call fails");

        assert_eq!(problem.status, 404);
        assert_eq!(problem.instance.as_deref(), Some("req-42"));
    }

    #[test]
    fn request_ids_carry_the_expected_prefix() {
        let id = generate_request_id();
        assert!(id.starts_with("req-"));
    }

    #[test]
    fn outcome_response_flattens_coordinates() {
        let outcome = AlgorithmOutcome {
            algorithm: SearchAlgorithm::Bfs,
            success: true,
            elapsed_ms: 0.25,
            nodes_explored: 3,
            path_length_m: Some(20.0),
            node_count: Some(2),
            path: vec![Coordinate::new(21.0, 105.8), Coordinate::new(21.001, 105.8)],
            error: None,
        };
        let response = OutcomeResponse::from(outcome);
        assert_eq!(response.algorithm, "bfs");
        assert_eq!(response.path, vec![[21.0, 105.8], [21.001, 105.8]]);
    }

    #[test]
    fn path_response_serializes_lat_lng_pairs() {
        let response = PathResponse {
            algorithm: "dijkstra".to_string(),
            length_m: 20.0,
            path: vec![[21.0, 105.8]],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"path\":[[21.0,105.8]]"));
        assert!(json.contains("\"algorithm\":\"dijkstra\""));
    }
}
