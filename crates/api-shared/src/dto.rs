//! REST request and response bodies.
//!
//! Field names are camelCase on the wire. Historical aliases (`isSaving`, `bpStr`,
//! `clinic_code`, `username`) are still accepted.

use crate::lenient;
use chrono::NaiveDate;
use mch_core::models::{MedicalRecordPatch, NewMedicalRecord};
use mch_core::services::{NewClinic, ProfileDetails, RegisterUser, SubjectRef, VitalsInput};
use mch_core::{normalize_risk_label, CoreError, CoreResult, RiskLabel, Role, ShardableUuid};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Mothers: date of birth, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient::opt_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub dob: Option<NaiveDate>,
    /// Mothers: national identity card number (required).
    #[serde(default)]
    pub nic_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Doctors: medical licence number (required).
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    /// Clinic users: clinic name (required).
    #[serde(default)]
    pub clinic_name: Option<String>,
    /// Clinic users: clinic location (required).
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "clinic_code")]
    pub clinic_code: Option<String>,
}

impl From<RegisterReq> for RegisterUser {
    fn from(req: RegisterReq) -> Self {
        RegisterUser {
            email: req.email,
            password: req.password,
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
            details: ProfileDetails {
                dob: req.dob,
                nic_number: req.nic_number,
                phone: req.phone,
                address: req.address,
                license_number: req.license_number,
                specialty: req.specialty,
                clinic_name: req.clinic_name,
                location: req.location,
                clinic_code: req.clinic_code,
            },
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct LoginReq {
    /// The account's email address.
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRes {
    pub token: String,
    pub user_role: Role,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClinicReq {
    pub name: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "clinic_code")]
    pub clinic_code: Option<String>,
}

impl From<CreateClinicReq> for NewClinic {
    fn from(req: CreateClinicReq) -> Self {
        NewClinic {
            name: req.name,
            location: req.location,
            phone: req.phone,
            address: req.address,
            clinic_code: req.clinic_code,
        }
    }
}

/// Vitals shared by record creation, update and prediction.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VitalsReq {
    /// `"SYS/DIA"`, e.g. `"120/80"`.
    #[serde(default, alias = "bpStr")]
    pub blood_pressure: Option<String>,
    /// Used with `diastolic` when `bloodPressure` is absent.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub systolic: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub diastolic: Option<u32>,
    /// Centimetres.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub height: Option<f64>,
    /// Kilograms.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub weight: Option<f64>,
    /// mg/dL.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub sugar_level: Option<f64>,
    /// Weeks.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub gestational_age: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl VitalsReq {
    fn notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }

    fn into_vitals(self, age: Option<u32>, persist: bool) -> VitalsInput {
        VitalsInput {
            age,
            height: self.height,
            weight: self.weight,
            notes: self.notes(),
            blood_pressure: self.blood_pressure,
            systolic: self.systolic,
            diastolic: self.diastolic,
            sugar_level: self.sugar_level,
            gestational_age: self.gestational_age,
            persist,
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicalRecordReq {
    pub mother_id: String,
    #[serde(flatten)]
    pub vitals: VitalsReq,
    /// Optional label; anything outside LOW/MEDIUM/HIGH is stored as UNKNOWN.
    #[serde(default)]
    pub risk: Option<String>,
}

impl CreateMedicalRecordReq {
    pub fn into_parts(self) -> CoreResult<(ShardableUuid, NewMedicalRecord)> {
        let mother_id = ShardableUuid::parse(self.mother_id.trim())?;
        let risk = self.risk.map(|r| normalize_risk_label(Some(&r)));
        Ok((mother_id, self.vitals.into_vitals(None, false).to_new_record(risk)))
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicalRecordReq {
    #[serde(flatten)]
    pub vitals: VitalsReq,
    #[serde(default)]
    pub risk: Option<String>,
}

impl From<UpdateMedicalRecordReq> for MedicalRecordPatch {
    fn from(req: UpdateMedicalRecordReq) -> Self {
        let risk: Option<RiskLabel> = req.risk.map(|r| normalize_risk_label(Some(&r)));
        let new = req.vitals.into_vitals(None, false).to_new_record(risk);
        MedicalRecordPatch {
            blood_pressure: new.blood_pressure,
            height: new.height,
            weight: new.weight,
            sugar_level: new.sugar_level,
            gestational_age: new.gestational_age,
            notes: new.notes,
            risk: new.risk,
        }
    }
}

/// Body of the predict endpoints.
///
/// When the mother is not in the path she is named by `motherNic` (alias `motherKey`,
/// `nicNumber`) or `motherId`.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictReq {
    #[serde(default, alias = "motherKey", alias = "nicNumber")]
    pub mother_nic: Option<String>,
    #[serde(default)]
    pub mother_id: Option<String>,
    /// Overrides the age derived from the mother's date of birth.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub age: Option<u32>,
    #[serde(flatten)]
    pub vitals: VitalsReq,
    /// Store a record as well. Defaults to `false`.
    #[serde(default, alias = "isSaving", deserialize_with = "lenient::opt_bool")]
    pub persist: Option<bool>,
}

impl PredictReq {
    /// The mother named in the body. A NIC takes precedence over an id.
    pub fn subject(&self) -> CoreResult<SubjectRef> {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(nic) = present(&self.mother_nic) {
            return Ok(SubjectRef::NationalId(nic));
        }
        match present(&self.mother_id) {
            Some(id) => Ok(SubjectRef::Id(ShardableUuid::parse(&id)?)),
            None => Err(CoreError::InvalidInput(
                "motherNic or motherId is required".into(),
            )),
        }
    }

    pub fn into_vitals(self) -> VitalsInput {
        let persist = self.persist.unwrap_or(false);
        self.vitals.into_vitals(self.age, persist)
    }
}
