use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{Response as HttpResponse, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use pestmix_catalog::Dataset;
use pestmix_engine::Recommender;
use pestmix_protocol::{
    serialize_json, CropsResponse, ErrorEnvelope, HealthReport, MechanismsResponse,
    PestsQuery, PestsResponse, ProductsResponse, RecommendRequest, RecommendResponse,
    API_SCHEMA_VERSION,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub(crate) type SharedDataset = Arc<Dataset>;

pub(crate) fn router(dataset: SharedDataset, allow_any_origin: bool) -> Router {
    let app = Router::new()
        .route("/crops", get(http_crops))
        .route("/pests", get(http_pests))
        .route("/mechanisms", get(http_mechanisms))
        .route("/products", get(http_products))
        .route("/recommend", post(http_recommend))
        .route("/health", get(http_health))
        .with_state(dataset);

    if allow_any_origin {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

pub(crate) fn health_report(dataset: &Dataset) -> HealthReport {
    HealthReport {
        schema_version: API_SCHEMA_VERSION,
        status: "ok".to_string(),
        products: dataset.products.len(),
        crops: dataset.products.crops().len(),
        mechanisms: dataset.mechanisms.len(),
        forbidden_pairs: dataset.mechanisms.forbidden().len(),
    }
}

pub(crate) fn error_envelope(code: &str, message: String) -> ErrorEnvelope {
    let envelope = ErrorEnvelope::new(code, message);
    match code {
        "invalid_request" => envelope.with_hint(
            "Send a JSON object with crop, pests_or_diseases, used_mechanisms and owned_products.",
        ),
        _ => envelope,
    }
}

pub(crate) fn build_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response, StatusCode> {
    let bytes = serialize_json(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .into_bytes();

    HttpResponse::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn http_crops(State(dataset): State<SharedDataset>) -> Result<Response, StatusCode> {
    let response = CropsResponse {
        crops: dataset.products.crops(),
    };
    build_response(StatusCode::OK, &response)
}

async fn http_pests(
    State(dataset): State<SharedDataset>,
    query: Option<Query<PestsQuery>>,
) -> Result<Response, StatusCode> {
    let pests = match query {
        Some(Query(query)) => dataset.products.pests_for(&query.crop),
        None => Vec::new(),
    };
    build_response(StatusCode::OK, &PestsResponse { pests })
}

async fn http_mechanisms(State(dataset): State<SharedDataset>) -> Result<Response, StatusCode> {
    let response = MechanismsResponse {
        mechanisms: dataset.products.mechanisms(),
    };
    build_response(StatusCode::OK, &response)
}

async fn http_products(State(dataset): State<SharedDataset>) -> Result<Response, StatusCode> {
    let response = ProductsResponse {
        products: dataset.products.trade_names(),
    };
    build_response(StatusCode::OK, &response)
}

async fn http_recommend(
    State(dataset): State<SharedDataset>,
    body: Bytes,
) -> Result<Response, StatusCode> {
    let request: RecommendRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let envelope = error_envelope("invalid_request", format!("Invalid JSON request: {err}"));
            return build_response(StatusCode::BAD_REQUEST, &envelope);
        }
    };

    let query = request.to_query();
    let response = tokio::task::spawn_blocking(move || {
        let entries = Recommender::new(&dataset).recommend(&query);
        RecommendResponse::from(entries.as_slice())
    })
    .await
    .map_err(|err| {
        log::error!("Recommendation task failed: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    build_response(StatusCode::OK, &response)
}

async fn http_health(State(dataset): State<SharedDataset>) -> Result<Response, StatusCode> {
    build_response(StatusCode::OK, &health_report(&dataset))
}
