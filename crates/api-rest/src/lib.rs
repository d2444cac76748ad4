//! # API REST
//!
//! REST API implementation for the consultation service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, API key header)
//!
//! Uses `api-shared` for wire types and `consult-core` for everything else.

#![warn(rust_2018_idioms)]

use api_shared::{
    validate_api_key, AssessReq, AssessmentRes, AuthError, ConsultationRes, CredentialsReq,
    DiagnoseReq, DiagnosisRes, HealthRes, HealthService, ListConsultationsRes, LoginRes,
    RegisterRes, SaveConsultationReq, SaveConsultationRes,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use consult_core::{ConsultError, ConsultService, CoreConfig, SymptomReport, Username, Uuid};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Header carrying the API key for consultation endpoints.
pub const API_KEY_HEADER: &str = "x-api-key";

type ApiError = (StatusCode, &'static str);

/// Application state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    /// Key required on consultation endpoints. `None` rejects every such request.
    pub api_key: Option<String>,
}

impl AppState {
    fn service(&self) -> ConsultService {
        ConsultService::new(self.cfg.clone())
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        diagnose,
        assess,
        register,
        login,
        save_consultation,
        list_consultations,
        get_consultation,
    ),
    components(schemas(
        HealthRes,
        DiagnoseReq,
        DiagnosisRes,
        AssessReq,
        AssessmentRes,
        api_shared::DifferentialRes,
        CredentialsReq,
        LoginRes,
        RegisterRes,
        SaveConsultationReq,
        SaveConsultationRes,
        ConsultationRes,
        ListConsultationsRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/diagnose", post(diagnose))
        .route("/assess", post(assess))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route(
            "/consultations",
            post(save_consultation).get(list_consultations),
        )
        .route("/consultations/:id", get(get_consultation))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/diagnose",
    request_body = DiagnoseReq,
    responses(
        (status = 200, description = "Diagnosis for the answers", body = DiagnosisRes)
    )
)]
/// Run the rule engine on a set of answers. Pure; nothing is stored.
async fn diagnose(State(state): State<AppState>, Json(req): Json<DiagnoseReq>) -> Json<DiagnosisRes> {
    Json(state.service().evaluate(&req.answers).into())
}

#[utoipa::path(
    post,
    path = "/assess",
    request_body = AssessReq,
    responses(
        (status = 200, description = "Ranked symptom assessment", body = AssessmentRes)
    )
)]
async fn assess(Json(req): Json<AssessReq>) -> Json<AssessmentRes> {
    let report = SymptomReport::from(req);
    Json(consult_core::assess(&report).into())
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CredentialsReq,
    responses(
        (status = 201, description = "User registered", body = RegisterRes),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username already registered"),
        (status = 500, description = "Internal server error")
    )
)]
async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsReq>,
) -> Result<(StatusCode, Json<RegisterRes>), ApiError> {
    let username = Username::new(&req.username)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid username"))?;

    match state.service().credentials().register(&username, &req.password) {
        Ok(()) => Ok((
            StatusCode::CREATED,
            Json(RegisterRes {
                username: username.to_string(),
            }),
        )),
        Err(ConsultError::DuplicateUser(_)) => {
            Err((StatusCode::CONFLICT, "Username already registered"))
        }
        Err(e) if e.is_validation() => Err((StatusCode::BAD_REQUEST, "Invalid password")),
        Err(e) => {
            tracing::error!("Register user error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsReq,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginRes),
        (status = 401, description = "Invalid username or password"),
        (status = 500, description = "Internal server error")
    )
)]
async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsReq>,
) -> Result<Json<LoginRes>, ApiError> {
    match state
        .service()
        .credentials()
        .verify(&req.username, &req.password)
    {
        Ok(true) => Ok(Json(LoginRes { ok: true })),
        Ok(false) => Err((StatusCode::UNAUTHORIZED, "Invalid username or password")),
        Err(e) => {
            tracing::error!("Login error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/consultations",
    request_body = SaveConsultationReq,
    params(("x-api-key" = String, Header, description = "API key")),
    responses(
        (status = 201, description = "Consultation diagnosed and saved", body = SaveConsultationRes),
        (status = 400, description = "Missing patient details or invalid username"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
async fn save_consultation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SaveConsultationReq>,
) -> Result<(StatusCode, Json<SaveConsultationRes>), ApiError> {
    check_api_key(&state, &headers)?;
    let username = Username::new(&req.username)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid username"))?;

    let service = state.service();
    let eval = service.evaluate(&req.answers);
    match service.save(&username, &req.answers, &eval.result) {
        Ok(record) => Ok((
            StatusCode::CREATED,
            Json(SaveConsultationRes {
                consultation: record.into(),
                result: eval.into(),
            }),
        )),
        Err(e) if e.is_validation() => {
            Err((StatusCode::BAD_REQUEST, "Patient name and age are required"))
        }
        Err(e) => {
            tracing::error!("Save consultation error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct HistoryQuery {
    /// Clinician whose history to list; the admin user sees everything.
    username: String,
}

#[utoipa::path(
    get,
    path = "/consultations",
    params(
        HistoryQuery,
        ("x-api-key" = String, Header, description = "API key")
    ),
    responses(
        (status = 200, description = "Consultations visible to the user", body = ListConsultationsRes),
        (status = 400, description = "Invalid username"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
async fn list_consultations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ListConsultationsRes>, ApiError> {
    check_api_key(&state, &headers)?;
    let username = Username::new(&query.username)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid username"))?;

    match state.service().history(&username) {
        Ok(records) => Ok(Json(ListConsultationsRes {
            consultations: records.into_iter().map(Into::into).collect(),
        })),
        Err(e) => {
            tracing::error!("List consultations error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/consultations/{id}",
    params(
        ("id" = String, Path, description = "Consultation id (UUID)"),
        HistoryQuery,
        ("x-api-key" = String, Header, description = "API key")
    ),
    responses(
        (status = 200, description = "The consultation", body = ConsultationRes),
        (status = 400, description = "Invalid id or username"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Consultation belongs to another user"),
        (status = 404, description = "Consultation not found"),
        (status = 500, description = "Internal server error")
    )
)]
async fn get_consultation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ConsultationRes>, ApiError> {
    check_api_key(&state, &headers)?;
    let id =
        Uuid::parse_str(&id).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid consultation id"))?;
    let username = Username::new(&query.username)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid username"))?;

    match state.service().consultation(&username, id) {
        Ok(record) => Ok(Json(record.into())),
        Err(ConsultError::ConsultationNotFound(_)) => {
            Err((StatusCode::NOT_FOUND, "Consultation not found"))
        }
        Err(ConsultError::NotConsultationOwner(_)) => {
            Err((StatusCode::FORBIDDEN, "Not allowed to view this consultation"))
        }
        Err(e) => {
            tracing::error!("Get consultation error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

fn check_api_key(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or((StatusCode::UNAUTHORIZED, "Missing API key"))?;

    validate_api_key(provided, state.api_key.as_deref()).map_err(|e| match e {
        AuthError::NotConfigured => {
            tracing::error!("API_KEY is not configured; rejecting request");
            (StatusCode::INTERNAL_SERVER_ERROR, "API key not configured")
        }
        AuthError::InvalidKey => (StatusCode::UNAUTHORIZED, "Invalid API key"),
    })
}
