//! Business operations layered over the repositories.
//!
//! Services are built once at the composition root and shared behind `Arc`s; none of them
//! hold per-request state.

mod auth;
mod clinics;
mod dashboard;
mod medical_records;
mod mothers;

pub use auth::{AuthService, Profile, ProfileDetails, RegisterUser, Registration};
pub use clinics::{ClinicService, NewClinic};
pub use dashboard::{AverageBp, Dashboard, DashboardService};
pub use medical_records::{
    age_on, build_feature_vector, MedicalRecordService, PredictionDetail, PredictionOutcome,
    SubjectRef, VitalsInput,
};
pub use mothers::MotherService;

use crate::models::{MedicalRecord, Mother, RecordWithMother};
use crate::ShardableUuid;
use std::collections::HashMap;

/// Pair each record with its mother, keeping record order.
fn join_with_mothers(records: Vec<MedicalRecord>, mothers: &[Mother]) -> Vec<RecordWithMother> {
    let by_id: HashMap<&ShardableUuid, &Mother> = mothers.iter().map(|m| (&m.id, m)).collect();
    records
        .into_iter()
        .map(|record| {
            let mother = by_id.get(&record.mother_id).map(|m| (*m).clone());
            RecordWithMother { record, mother }
        })
        .collect()
}
