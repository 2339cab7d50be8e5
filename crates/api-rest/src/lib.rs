//! # API REST
//!
//! REST API implementation for MCH.
//!
//! Handles:
//! - HTTP endpoints with axum, all under `/api/v1` except `/health`
//! - Bearer-token authentication and role checks
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (the response envelope, JSON errors, CORS)
//!
//! Uses `api-shared` for DTOs and token handling, and `mch-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod extract;
mod handlers;

use api_shared::dto::{
    CreateClinicReq, CreateMedicalRecordReq, LoginReq, LoginRes, PredictReq, RegisterReq,
    UpdateMedicalRecordReq, VitalsReq,
};
use api_shared::{ApiResponse, AuthConfig, HealthRes, HealthService};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use mch_core::models::{Clinic, Doctor, MedicalRecord, Mother, PublicUser, RecordWithMother};
use mch_core::repositories::FileStores;
use mch_core::services::{
    AuthService, AverageBp, ClinicService, Dashboard, DashboardService, MedicalRecordService,
    MotherService, PredictionDetail, PredictionOutcome, Profile, Registration,
};
use mch_core::{CoreConfig, RiskLabel, Role};
use mch_predictor::{ComputedFeatures, RiskPredictor};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub use error::{ApiError, ApiJson, JsonOrDefault};

/// Application state shared by every handler.
///
/// Services are built once from the repositories and the injected predictor; cloning the
/// state only clones `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthConfig>,
    pub users: AuthService,
    pub mothers: MotherService,
    pub clinics: ClinicService,
    pub dashboard: DashboardService,
    pub records: MedicalRecordService,
}

impl AppState {
    pub fn new(cfg: &CoreConfig, auth: AuthConfig, predictor: Arc<dyn RiskPredictor>) -> Self {
        let stores = FileStores::open(cfg);
        Self {
            auth: Arc::new(auth),
            users: AuthService::new(stores.clone()),
            mothers: MotherService::new(stores.mothers.clone()),
            clinics: ClinicService::new(stores.clinics.clone()),
            dashboard: DashboardService::new(
                stores.mothers.clone(),
                stores.medical_records.clone(),
            ),
            records: MedicalRecordService::new(stores.mothers, stores.medical_records, predictor),
        }
    }
}

/// Successful handler output: a status and the enveloped payload.
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn reply<T>(status: StatusCode, message: &str, data: T) -> ApiResult<T> {
    Ok((status, Json(ApiResponse::ok(status.as_u16(), message, data))))
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::create_clinic,
        handlers::mothers::list_mothers,
        handlers::mothers::mother_profile,
        handlers::mothers::dashboard,
        handlers::records::create_record,
        handlers::records::list_all_records,
        handlers::records::list_records_for_mother,
        handlers::records::update_record,
        handlers::records::delete_record,
        handlers::records::predict,
        handlers::records::predict_for_mother,
    ),
    components(schemas(
        HealthRes,
        RegisterReq,
        LoginReq,
        LoginRes,
        CreateClinicReq,
        VitalsReq,
        CreateMedicalRecordReq,
        UpdateMedicalRecordReq,
        PredictReq,
        PublicUser,
        Profile,
        Registration,
        Mother,
        Doctor,
        Clinic,
        MedicalRecord,
        RecordWithMother,
        AverageBp,
        Dashboard,
        PredictionDetail,
        PredictionOutcome,
        ComputedFeatures,
        RiskLabel,
        Role,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Build the full application: API routes, Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/clinics/create", post(handlers::auth::create_clinic))
        .route("/mothers/get-all", get(handlers::mothers::list_mothers))
        .route(
            "/mothers/get-profile/:user_id",
            get(handlers::mothers::mother_profile),
        )
        .route("/doctors/dashboard", get(handlers::mothers::dashboard))
        .route("/medical-records", post(handlers::records::create_record))
        .route("/medical-records/all", get(handlers::records::list_all_records))
        .route("/medical-records/predict", post(handlers::records::predict))
        .route(
            "/medical-records/mother/:mother_id",
            get(handlers::records::list_records_for_mother),
        )
        .route(
            "/medical-records/mother/:mother_id/predict",
            post(handlers::records::predict_for_mother),
        )
        .route(
            "/medical-records/:id",
            put(handlers::records::update_record).delete(handlers::records::delete_record),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
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
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}
