//! REST API for the packaging service.
//!
//! Provides HTTP endpoints for the order-builder page and other clients.
//! Uses Axum as the web framework and supports CORS.

use std::sync::{Arc, OnceLock};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::{
    Router,
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::baseline::CurrentPackaging;
use crate::catalog::{LookupError, ReferenceData};
use crate::config::ApiConfig;
use crate::evaluation::{
    AnnualProjection, Evaluation, EvaluationConfig, MaterialComparison, SizingMode, evaluate,
};
use crate::model::{Material, PackagingBox, Product};
use crate::recommender::{Recommendation, recommend_material};
use crate::sizing::{SizingConfig, optimal_single_box};
use crate::types::validation;

#[derive(Clone)]
struct ApiState {
    catalog: Arc<ReferenceData>,
    sizing: Arc<SizingConfig>,
    evaluation: EvaluationConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/ on 2025-10-29.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>eco-pack API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Embedded Web Assets (HTML, CSS, JS)
#[derive(RustEmbed)]
#[folder = "web/"]
struct WebAssets;

/// Request structure for the single-box endpoint.
#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"length": 10.0, "width": 10.0, "height": 10.0, "buffer": 1.0}))]
pub struct BoxRequest {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    #[schema(nullable = true)]
    pub buffer: Option<f64>,
}

impl BoxRequest {
    fn into_validated(self, sizing: &SizingConfig) -> Result<ValidatedBoxRequest, String> {
        validation::validate_dimensions_3d((self.length, self.width, self.height))?;
        let buffer = self.buffer.unwrap_or(sizing.single_buffer_cm);
        validation::validate_non_negative(buffer, "Buffer")?;
        Ok(ValidatedBoxRequest {
            length: self.length,
            width: self.width,
            height: self.height,
            buffer,
        })
    }
}

#[derive(Debug)]
struct ValidatedBoxRequest {
    length: f64,
    width: f64,
    height: f64,
    buffer: f64,
}

/// Request structure for the recommendation endpoint.
#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"fragility": 3.0, "cost_tolerance": 1.2}))]
pub struct RecommendRequest {
    pub fragility: f64,
    #[serde(default)]
    #[schema(nullable = true)]
    pub cost_tolerance: Option<f64>,
}

impl RecommendRequest {
    fn into_validated(self, config: &EvaluationConfig) -> Result<(f64, f64), String> {
        if !self.fragility.is_finite() {
            return Err(format!("Fragility must be finite, got: {}", self.fragility));
        }
        let tolerance = validate_tolerance(self.cost_tolerance, config)?;
        Ok((self.fragility, tolerance))
    }
}

/// Request structure for the evaluation endpoint.
#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"product_ids": ["P001", "P003"], "cost_tolerance": 1.2}))]
pub struct EvaluateRequest {
    pub product_ids: Vec<String>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub cost_tolerance: Option<f64>,
}

#[derive(Debug)]
struct ValidatedEvaluateRequest {
    product_ids: Vec<String>,
    cost_tolerance: f64,
}

impl EvaluateRequest {
    fn into_validated(self, config: &EvaluationConfig) -> Result<ValidatedEvaluateRequest, String> {
        let cost_tolerance = validate_tolerance(self.cost_tolerance, config)?;
        Ok(ValidatedEvaluateRequest {
            product_ids: self.product_ids,
            cost_tolerance,
        })
    }
}

fn validate_tolerance(requested: Option<f64>, config: &EvaluationConfig) -> Result<f64, String> {
    let tolerance = requested.unwrap_or(config.default_cost_tolerance);
    validation::validate_range(
        tolerance,
        EvaluationConfig::MIN_COST_TOLERANCE,
        EvaluationConfig::MAX_COST_TOLERANCE,
        "Cost tolerance",
    )?;
    Ok(tolerance)
}

/// Response of the recommendation endpoint.
///
/// `material` and `score` are null when no material is strong enough.
#[derive(Serialize, ToSchema)]
pub struct RecommendResponse {
    pub fragility: f64,
    pub cost_tolerance: f64,
    pub material: Option<Material>,
    pub score: Option<f64>,
}

impl RecommendResponse {
    fn new(fragility: f64, cost_tolerance: f64, recommendation: Option<Recommendation>) -> Self {
        let (material, score) = match recommendation {
            Some(rec) => (Some(rec.material), Some(rec.sustainability_score)),
            None => (None, None),
        };
        Self {
            fragility,
            cost_tolerance,
            material,
            score,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid input data",
        details,
    )
}

fn lookup_error(err: LookupError) -> Response {
    error_response(StatusCode::NOT_FOUND, "Unknown identifier", err.to_string())
}

fn unwrap_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(err) => Err(json_deserialize_error(err)),
    }
}

fn run_product(state: &ApiState, id: &str) -> Result<Product, Response> {
    state
        .catalog
        .lookup_product(id)
        .cloned()
        .map_err(lookup_error)
}

fn run_box(state: &ApiState, request: BoxRequest) -> Result<PackagingBox, Response> {
    let request = request
        .into_validated(&state.sizing)
        .map_err(validation_error)?;
    Ok(optimal_single_box(
        request.length,
        request.width,
        request.height,
        request.buffer,
    ))
}

fn run_recommend(state: &ApiState, request: RecommendRequest) -> Result<RecommendResponse, Response> {
    let (fragility, tolerance) = request
        .into_validated(&state.evaluation)
        .map_err(validation_error)?;
    let recommendation = recommend_material(&state.catalog, fragility, tolerance);
    Ok(RecommendResponse::new(fragility, tolerance, recommendation))
}

fn run_evaluate(state: &ApiState, request: EvaluateRequest) -> Result<Evaluation, Response> {
    let request = request
        .into_validated(&state.evaluation)
        .map_err(validation_error)?;
    evaluate(
        &state.catalog,
        &request.product_ids,
        request.cost_tolerance,
        &state.sizing,
        &state.evaluation,
    )
    .map_err(lookup_error)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handle_products,
        handle_product,
        handle_materials,
        handle_box,
        handle_recommend,
        handle_evaluate
    ),
    components(
        schemas(
            Product,
            Material,
            PackagingBox,
            CurrentPackaging,
            Recommendation,
            MaterialComparison,
            AnnualProjection,
            SizingMode,
            Evaluation,
            BoxRequest,
            RecommendRequest,
            RecommendResponse,
            EvaluateRequest,
            ErrorResponse
        )
    ),
    tags(
        (name = "catalog", description = "Reference products and materials"),
        (name = "packaging", description = "Box sizing and material recommendation")
    )
)]
struct ApiDoc;

/// Starts the API server.
///
/// Configures CORS for cross-origin requests from the frontend.
/// Blocks until the server is terminated.
pub async fn start_api_server(
    config: ApiConfig,
    catalog: ReferenceData,
    sizing: SizingConfig,
    evaluation: EvaluationConfig,
) {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState {
        catalog: Arc::new(catalog),
        sizing: Arc::new(sizing),
        evaluation,
    };

    let app = Router::new()
        // API endpoints
        .route("/products", get(handle_products))
        .route("/products/{id}", get(handle_product))
        .route("/materials", get(handle_materials))
        .route("/box", post(handle_box))
        .route("/recommend", post(handle_recommend))
        .route("/evaluate", post(handle_evaluate))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        // Web-UI (embedded)
        .route("/", get(serve_index))
        .route("/{*path}", get(serve_static))
        .layer(cors)
        .with_state(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            panic!("❌ Could not bind API server to {}: {}", addr, err);
        }
    };

    let display_host = config.display_host().to_string();
    println!(
        "🚀 Server running on http://{}:{}",
        display_host,
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        println!("💡 Local access: http://localhost:{}", config.port());
    }
    println!("📦 API Endpoints:");
    println!("   - GET  /products");
    println!("   - GET  /products/{{id}}");
    println!("   - GET  /materials");
    println!("   - POST /box");
    println!("   - POST /recommend");
    println!("   - POST /evaluate");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");
    println!("🌐 Web-UI: http://{}:{}", display_host, config.port());

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("❌ API server terminated with an error: {err}");
    }
}

/// Handler for GET /products.
#[utoipa::path(
    get,
    path = "/products",
    responses((status = 200, description = "All products in table order", body = [Product])),
    tag = "catalog"
)]
async fn handle_products(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.catalog.products().to_vec())
}

/// Handler for GET /products/{id}.
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = NOT_FOUND, description = "Unknown product id", body = ErrorResponse)
    ),
    tag = "catalog"
)]
async fn handle_product(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match run_product(&state, &id) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(response) => response,
    }
}

/// Handler for GET /materials.
#[utoipa::path(
    get,
    path = "/materials",
    responses((status = 200, description = "All materials in table order", body = [Material])),
    tag = "catalog"
)]
async fn handle_materials(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.catalog.materials().to_vec())
}

/// Handler for POST /box.
///
/// Computes the padded box for a single item.
#[utoipa::path(
    post,
    path = "/box",
    request_body = BoxRequest,
    responses(
        (status = 200, description = "Optimal single-item box", body = PackagingBox),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid dimensions", body = ErrorResponse)
    ),
    tag = "packaging"
)]
async fn handle_box(
    State(state): State<ApiState>,
    payload: Result<Json<BoxRequest>, JsonRejection>,
) -> Response {
    let result = unwrap_payload(payload).and_then(|request| run_box(&state, request));
    match result {
        Ok(packaging) => (StatusCode::OK, Json(packaging)).into_response(),
        Err(response) => response,
    }
}

/// Handler for POST /recommend.
///
/// A missing recommendation is a regular answer with null fields, not an error.
#[utoipa::path(
    post,
    path = "/recommend",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Recommended material or null", body = RecommendResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid fragility or tolerance", body = ErrorResponse)
    ),
    tag = "packaging"
)]
async fn handle_recommend(
    State(state): State<ApiState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Response {
    let result = unwrap_payload(payload).and_then(|request| run_recommend(&state, request));
    match result {
        Ok(response) => {
            match &response.material {
                Some(material) => println!(
                    "♻️ Recommendation for fragility {:.2}: {}",
                    response.fragility, material.name
                ),
                None => println!(
                    "⚠️ No suitable material for fragility {:.2}",
                    response.fragility
                ),
            }
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(response) => response,
    }
}

/// Handler for POST /evaluate.
///
/// Sizes the selection, estimates today's packaging and recommends a material.
#[utoipa::path(
    post,
    path = "/evaluate",
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "Evaluation of the selection", body = Evaluation),
        (status = NOT_FOUND, description = "Unknown product id", body = ErrorResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "packaging"
)]
async fn handle_evaluate(
    State(state): State<ApiState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Response {
    let request = match unwrap_payload(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    println!(
        "📥 New evaluation request: {} product ids",
        request.product_ids.len()
    );

    match run_evaluate(&state, request) {
        Ok(evaluation) => {
            println!(
                "📦 Result: {} items, volume reduction {:.2}%, material {}",
                evaluation.item_count(),
                evaluation.volume_reduction_percent,
                evaluation
                    .recommendation
                    .as_ref()
                    .map(|rec| rec.material.name.as_str())
                    .unwrap_or("none")
            );
            (StatusCode::OK, Json(evaluation)).into_response()
        }
        Err(response) => response,
    }
}

/// Serves the index.html main page
async fn serve_index() -> Response {
    match WebAssets::get("index.html") {
        Some(content) => Html(content.data).into_response(),
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Serves static assets (JS, CSS, etc.)
async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    match WebAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
