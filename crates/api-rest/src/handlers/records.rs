use super::parse_id;
use crate::extract::AuthUser;
use crate::{reply, ApiJson, ApiResult, AppState, JsonOrDefault};
use api_shared::dto::{CreateMedicalRecordReq, PredictReq, UpdateMedicalRecordReq};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use mch_core::models::{MedicalRecord, RecordWithMother};
use mch_core::services::{PredictionOutcome, SubjectRef, VitalsInput};

#[utoipa::path(
    post,
    path = "/api/v1/medical-records",
    request_body = CreateMedicalRecordReq,
    responses(
        (status = 201, description = "Record stored", body = MedicalRecord),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Mother not found")
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
#[axum::debug_handler]
pub async fn create_record(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiJson(req): ApiJson<CreateMedicalRecordReq>,
) -> ApiResult<MedicalRecord> {
    let (mother_id, record) = req.into_parts()?;
    let created = state.records.create(&mother_id, record)?;
    reply(StatusCode::CREATED, "Medical record created successfully", created)
}

#[utoipa::path(
    get,
    path = "/api/v1/medical-records/all",
    responses(
        (status = 200, description = "Every record with its mother, newest first", body = [RecordWithMother])
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
#[axum::debug_handler]
pub async fn list_all_records(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Vec<RecordWithMother>> {
    let records = state.records.list_all_with_mother()?;
    reply(
        StatusCode::OK,
        "Medical records with mother fetched successfully",
        records,
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/medical-records/mother/{mother_id}",
    params(("mother_id" = String, Path, description = "Mother profile id")),
    responses(
        (status = 200, description = "The mother's records, newest first", body = [MedicalRecord]),
        (status = 400, description = "Malformed id")
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
#[axum::debug_handler]
pub async fn list_records_for_mother(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(mother_id): Path<String>,
) -> ApiResult<Vec<MedicalRecord>> {
    let records = state.records.list_by_mother(&parse_id(&mother_id)?)?;
    reply(StatusCode::OK, "Medical records fetched successfully", records)
}

#[utoipa::path(
    put,
    path = "/api/v1/medical-records/{id}",
    params(("id" = String, Path, description = "Record id")),
    request_body = UpdateMedicalRecordReq,
    responses(
        (status = 200, description = "Updated record; omitted fields are unchanged", body = MedicalRecord),
        (status = 404, description = "Record not found")
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
#[axum::debug_handler]
pub async fn update_record(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateMedicalRecordReq>,
) -> ApiResult<MedicalRecord> {
    let updated = state.records.update(&parse_id(&id)?, req.into())?;
    reply(StatusCode::OK, "Medical record updated successfully", updated)
}

#[utoipa::path(
    delete,
    path = "/api/v1/medical-records/{id}",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record deleted; data is the deleted id", body = String),
        (status = 404, description = "Record not found")
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
#[axum::debug_handler]
pub async fn delete_record(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<String> {
    let id = parse_id(&id)?;
    state.records.delete(&id)?;
    reply(
        StatusCode::OK,
        "Medical record deleted successfully",
        id.to_string(),
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/medical-records/predict",
    request_body = PredictReq,
    responses(
        (status = 201, description = "Prediction made and record stored", body = PredictionOutcome),
        (status = 200, description = "Prediction made; nothing stored", body = PredictionOutcome),
        (status = 400, description = "No mother named, or invalid input"),
        (status = 404, description = "Mother not found"),
        (status = 502, description = "Prediction service unavailable or rejected the request")
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
/// Predict risk for the mother named in the body (`motherNic` or `motherId`).
#[axum::debug_handler]
pub async fn predict(
    State(state): State<AppState>,
    _caller: AuthUser,
    ApiJson(req): ApiJson<PredictReq>,
) -> ApiResult<PredictionOutcome> {
    let subject = req.subject()?;
    run_prediction(&state, subject, req.into_vitals()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/medical-records/mother/{mother_id}/predict",
    params(("mother_id" = String, Path, description = "Mother profile id")),
    request_body = PredictReq,
    responses(
        (status = 201, description = "Prediction made and record stored", body = PredictionOutcome),
        (status = 200, description = "Prediction made; nothing stored", body = PredictionOutcome),
        (status = 404, description = "Mother not found"),
        (status = 502, description = "Prediction service unavailable or rejected the request")
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
/// Predict risk for the mother in the path. Any mother named in the body is ignored, and the
/// body itself may be omitted.
#[axum::debug_handler]
pub async fn predict_for_mother(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(mother_id): Path<String>,
    JsonOrDefault(req): JsonOrDefault<PredictReq>,
) -> ApiResult<PredictionOutcome> {
    let subject = SubjectRef::Id(parse_id(&mother_id)?);
    run_prediction(&state, subject, req.into_vitals()).await
}

async fn run_prediction(
    state: &AppState,
    subject: SubjectRef,
    vitals: VitalsInput,
) -> ApiResult<PredictionOutcome> {
    let outcome = state.records.create_and_predict(&subject, vitals).await?;
    if outcome.record.is_some() {
        reply(
            StatusCode::CREATED,
            "Medical record created with prediction",
            outcome,
        )
    } else {
        reply(StatusCode::OK, "Prediction completed", outcome)
    }
}
