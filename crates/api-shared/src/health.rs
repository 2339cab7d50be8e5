use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service shared by the REST API and the CLI.
pub struct HealthService;

impl HealthService {
    /// Static health check; no instance needed.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "MCH is alive".into(),
        }
    }
}
