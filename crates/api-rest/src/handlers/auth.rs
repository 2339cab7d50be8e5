use super::blocking;
use crate::extract::AuthUser;
use crate::{reply, ApiJson, ApiResult, AppState};
use api_shared::dto::{CreateClinicReq, LoginReq, LoginRes, RegisterReq};
use axum::extract::State;
use axum::http::StatusCode;
use mch_core::models::Clinic;
use mch_core::services::Registration;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User and role profile created", body = Registration),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email or national identity number already registered")
    ),
    tag = "auth"
)]
/// Register a user together with the profile for their role.
///
/// Mothers need `nicNumber`, doctors `licenseNumber`, clinic users `clinicName` and `location`.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterReq>,
) -> ApiResult<Registration> {
    let users = state.users.clone();
    let registration = blocking(move || users.register(req.into())).await?;
    reply(
        StatusCode::CREATED,
        "User registered successfully",
        registration,
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Signed bearer token", body = LoginRes),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginReq>,
) -> ApiResult<LoginRes> {
    let users = state.users.clone();
    let user = blocking(move || users.login(&req.username, &req.password)).await?;
    let token = state.auth.issue(&user)?;
    reply(
        StatusCode::OK,
        "Login successful",
        LoginRes {
            token,
            user_role: user.role,
        },
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/clinics/create",
    request_body = CreateClinicReq,
    responses(
        (status = 201, description = "Clinic profile created for the caller", body = Clinic),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "clinics"
)]
#[axum::debug_handler]
pub async fn create_clinic(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(req): ApiJson<CreateClinicReq>,
) -> ApiResult<Clinic> {
    let user_id = caller.user_id()?;
    let clinic = state.clinics.create(&user_id, req.into())?;
    reply(StatusCode::CREATED, "Clinic created successfully", clinic)
}
