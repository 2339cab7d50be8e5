//! Stored entities.
//!
//! Every entity is persisted as camelCase JSON, which is also its REST representation.
//! Identifiers are canonical [`ShardableUuid`]s.

use crate::{EmailAddress, NationalId, RiskLabel, Role, ShardableUuid};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An account. Only ever leaves core as a [`PublicUser`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: ShardableUuid,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user without credentials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[schema(value_type = String)]
    pub id: ShardableUuid,
    #[schema(value_type = String)]
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Mother {
    #[schema(value_type = String)]
    pub id: ShardableUuid,
    #[schema(value_type = String)]
    pub user_id: ShardableUuid,
    /// National identity card number; unique across mothers.
    #[schema(value_type = String, example = "920123456V")]
    pub nic_number: NationalId,
    #[schema(value_type = Option<String>, format = Date)]
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[schema(value_type = String)]
    pub id: ShardableUuid,
    #[schema(value_type = String)]
    pub user_id: ShardableUuid,
    pub license_number: String,
    pub specialty: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    #[schema(value_type = String)]
    pub id: ShardableUuid,
    #[schema(value_type = String)]
    pub user_id: ShardableUuid,
    pub name: String,
    pub location: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub clinic_code: Option<String>,
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

/// One set of vitals taken for a mother.
///
/// Vitals are stored exactly as supplied; predictor defaults never leak in here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    #[schema(value_type = String)]
    pub id: ShardableUuid,
    #[schema(value_type = String)]
    pub mother_id: ShardableUuid,
    #[schema(example = "120/80")]
    pub blood_pressure: Option<String>,
    /// Centimetres.
    pub height: Option<f64>,
    /// Kilograms.
    pub weight: Option<f64>,
    /// mg/dL.
    pub sugar_level: Option<f64>,
    /// Weeks.
    pub gestational_age: Option<u32>,
    pub notes: Option<String>,
    pub risk: Option<RiskLabel>,
    #[schema(value_type = String, format = DateTime)]
    pub recorded_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a [`MedicalRecord`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewMedicalRecord {
    pub blood_pressure: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub sugar_level: Option<f64>,
    pub gestational_age: Option<u32>,
    pub notes: Option<String>,
    pub risk: Option<RiskLabel>,
}

/// Partial update: `None` leaves the stored value alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MedicalRecordPatch {
    pub blood_pressure: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub sugar_level: Option<f64>,
    pub gestational_age: Option<u32>,
    pub notes: Option<String>,
    pub risk: Option<RiskLabel>,
}

impl MedicalRecordPatch {
    /// Apply the supplied fields to `record` and bump `updated_at`.
    pub fn apply(self, record: &mut MedicalRecord, now: DateTime<Utc>) {
        if let Some(bp) = self.blood_pressure {
            record.blood_pressure = Some(bp);
        }
        if let Some(height) = self.height {
            record.height = Some(height);
        }
        if let Some(weight) = self.weight {
            record.weight = Some(weight);
        }
        if let Some(sugar) = self.sugar_level {
            record.sugar_level = Some(sugar);
        }
        if let Some(weeks) = self.gestational_age {
            record.gestational_age = Some(weeks);
        }
        if let Some(notes) = self.notes {
            record.notes = Some(notes);
        }
        if let Some(risk) = self.risk {
            record.risk = Some(risk);
        }
        record.updated_at = now;
    }
}

/// A medical record together with the mother it belongs to.
///
/// `mother` is `None` when the owning profile no longer exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordWithMother {
    #[serde(flatten)]
    pub record: MedicalRecord,
    pub mother: Option<Mother>,
}
