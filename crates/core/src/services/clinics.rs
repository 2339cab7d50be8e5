use crate::models::Clinic;
use crate::repositories::ClinicRepository;
use crate::{CoreError, CoreResult, NonEmptyText, ShardableUuid};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Details for a new clinic profile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewClinic {
    pub name: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub clinic_code: Option<String>,
}

impl NewClinic {
    /// Validate and build the stored form. Name and location are required.
    pub(crate) fn into_clinic(
        self,
        user_id: &ShardableUuid,
        now: DateTime<Utc>,
    ) -> CoreResult<Clinic> {
        let name = NonEmptyText::optional(self.name)
            .ok_or_else(|| CoreError::InvalidInput("clinic name is required".into()))?;
        let location = NonEmptyText::optional(self.location)
            .ok_or_else(|| CoreError::InvalidInput("clinic location is required".into()))?;

        Ok(Clinic {
            id: ShardableUuid::new(),
            user_id: user_id.clone(),
            name: name.into_inner(),
            location: location.into_inner(),
            phone: NonEmptyText::optional(self.phone).map(NonEmptyText::into_inner),
            address: NonEmptyText::optional(self.address).map(NonEmptyText::into_inner),
            clinic_code: NonEmptyText::optional(self.clinic_code).map(NonEmptyText::into_inner),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ClinicService {
    clinics: Arc<ClinicRepository>,
}

impl ClinicService {
    pub fn new(clinics: Arc<ClinicRepository>) -> Self {
        Self { clinics }
    }

    /// Create a clinic profile owned by `user_id`.
    pub fn create(&self, user_id: &ShardableUuid, details: NewClinic) -> CoreResult<Clinic> {
        tracing::info!(%user_id, "creating clinic profile");
        let clinic = details.into_clinic(user_id, Utc::now())?;
        self.clinics.insert(&clinic)?;
        Ok(clinic)
    }
}
