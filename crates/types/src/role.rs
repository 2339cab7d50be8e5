use serde::{Deserialize, Serialize};

/// Account role, fixed at registration.
///
/// The role decides which profile is created alongside the user account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Mother,
    Doctor,
    ClinicUser,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Mother => "MOTHER",
            Role::Doctor => "DOCTOR",
            Role::ClinicUser => "CLINIC_USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
