use super::parse_id;
use crate::extract::AuthUser;
use crate::{reply, ApiResult, AppState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use mch_core::models::Mother;
use mch_core::services::Dashboard;
use mch_core::Role;

#[utoipa::path(
    get,
    path = "/api/v1/mothers/get-all",
    responses(
        (status = 200, description = "All mother profiles, newest first", body = [Mother]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "mothers"
)]
#[axum::debug_handler]
pub async fn list_mothers(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Vec<Mother>> {
    reply(
        StatusCode::OK,
        "Mothers list fetched successfully",
        state.mothers.list(),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/mothers/get-profile/{user_id}",
    params(("user_id" = String, Path, description = "Id of the user owning the profile")),
    responses(
        (status = 200, description = "The mother profile", body = Mother),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No mother profile for this user")
    ),
    security(("bearer" = [])),
    tag = "mothers"
)]
#[axum::debug_handler]
pub async fn mother_profile(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<Mother> {
    let mother = state.mothers.by_user_id(&parse_id(&user_id)?)?;
    reply(StatusCode::OK, "Mother profile fetched successfully", mother)
}

#[utoipa::path(
    get,
    path = "/api/v1/doctors/dashboard",
    responses(
        (status = 200, description = "Dashboard aggregates", body = Dashboard),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not a doctor or clinic user")
    ),
    security(("bearer" = [])),
    tag = "doctors"
)]
#[axum::debug_handler]
pub async fn dashboard(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Dashboard> {
    caller.require_role(&[Role::Doctor, Role::ClinicUser])?;
    let dashboard = state.dashboard.dashboard()?;
    reply(StatusCode::OK, "Dashboard data fetched successfully", dashboard)
}
