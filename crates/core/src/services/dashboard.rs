//! Clinician dashboard aggregation.

use super::join_with_mothers;
use crate::bp::parse_bp;
use crate::models::{MedicalRecord, Mother, RecordWithMother};
use crate::repositories::{MedicalRecordRepository, MotherRepository, RecordStore};
use crate::{CoreResult, RiskLabel};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct AverageBp {
    pub systolic: f64,
    pub diastolic: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_mothers_count: usize,
    /// `HIGH` risk records, newest first.
    pub highest_risk_records: Vec<RecordWithMother>,
    /// Mean over records whose blood pressure parses; `null` when none do.
    pub avg_bp: Option<AverageBp>,
    /// Mean over records with a sugar level; `null` when none have one.
    pub avg_sugar: Option<f64>,
    /// Every record, newest first.
    pub medical_records_with_mother: Vec<RecordWithMother>,
}

impl Dashboard {
    /// Aggregate `records` (any order) against the known `mothers`.
    pub fn summarise(mothers: Vec<Mother>, mut records: Vec<MedicalRecord>) -> Self {
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        let readings: Vec<(u32, u32)> = records
            .iter()
            .filter_map(|r| r.blood_pressure.as_deref().and_then(parse_bp))
            .collect();
        let avg_bp = (!readings.is_empty()).then(|| {
            let n = readings.len() as f64;
            AverageBp {
                systolic: readings.iter().map(|(s, _)| f64::from(*s)).sum::<f64>() / n,
                diastolic: readings.iter().map(|(_, d)| f64::from(*d)).sum::<f64>() / n,
            }
        });

        let sugars: Vec<f64> = records.iter().filter_map(|r| r.sugar_level).collect();
        let avg_sugar =
            (!sugars.is_empty()).then(|| sugars.iter().sum::<f64>() / sugars.len() as f64);

        let high_risk: Vec<MedicalRecord> = records
            .iter()
            .filter(|r| r.risk == Some(RiskLabel::High))
            .cloned()
            .collect();

        Self {
            total_mothers_count: mothers.len(),
            highest_risk_records: join_with_mothers(high_risk, &mothers),
            avg_bp,
            avg_sugar,
            medical_records_with_mother: join_with_mothers(records, &mothers),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DashboardService {
    mothers: Arc<MotherRepository>,
    records: Arc<MedicalRecordRepository>,
}

impl DashboardService {
    pub fn new(mothers: Arc<MotherRepository>, records: Arc<MedicalRecordRepository>) -> Self {
        Self { mothers, records }
    }

    pub fn dashboard(&self) -> CoreResult<Dashboard> {
        tracing::info!("building dashboard");
        Ok(Dashboard::summarise(
            self.mothers.list(),
            self.records.list_all()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NationalId, ShardableUuid};
    use chrono::{Duration, Utc};

    fn mother() -> Mother {
        let now = Utc::now();
        Mother {
            id: ShardableUuid::new(),
            user_id: ShardableUuid::new(),
            nic_number: NationalId::parse("920123456V").unwrap(),
            dob: None,
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn record(
        mother: &Mother,
        minutes_ago: i64,
        bp: Option<&str>,
        sugar: Option<f64>,
        risk: Option<RiskLabel>,
    ) -> MedicalRecord {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        MedicalRecord {
            id: ShardableUuid::new(),
            mother_id: mother.id.clone(),
            blood_pressure: bp.map(str::to_string),
            height: None,
            weight: None,
            sugar_level: sugar,
            gestational_age: None,
            notes: None,
            risk,
            recorded_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn empty_store_has_null_averages() {
        let dashboard = Dashboard::summarise(vec![], vec![]);
        assert_eq!(dashboard.total_mothers_count, 0);
        assert_eq!(dashboard.avg_bp, None);
        assert_eq!(dashboard.avg_sugar, None);

        let json = serde_json::to_value(&dashboard).unwrap();
        assert!(json["avgBp"].is_null());
        assert!(json["avgSugar"].is_null());
        assert_eq!(json["highestRiskRecords"], serde_json::json!([]));
    }

    #[test]
    fn averages_skip_unparsable_readings() {
        let m = mother();
        let records = vec![
            record(&m, 3, Some("120/80"), Some(100.0), Some(RiskLabel::Low)),
            record(&m, 2, Some("140 / 90"), None, Some(RiskLabel::High)),
            record(&m, 1, Some("garbage"), Some(80.0), None),
        ];

        let dashboard = Dashboard::summarise(vec![m], records);

        assert_eq!(
            dashboard.avg_bp,
            Some(AverageBp {
                systolic: 130.0,
                diastolic: 85.0
            })
        );
        assert_eq!(dashboard.avg_sugar, Some(90.0));
    }

    #[test]
    fn high_risk_records_are_newest_first_with_mother() {
        let m = mother();
        let older = record(&m, 10, None, None, Some(RiskLabel::High));
        let newer = record(&m, 1, None, None, Some(RiskLabel::High));
        let low = record(&m, 5, None, None, Some(RiskLabel::Low));
        let orphan = record(&mother(), 0, None, None, Some(RiskLabel::Medium));

        let dashboard = Dashboard::summarise(
            vec![m.clone()],
            vec![older.clone(), low, newer.clone(), orphan],
        );

        assert_eq!(dashboard.total_mothers_count, 1);
        let high: Vec<_> = dashboard
            .highest_risk_records
            .iter()
            .map(|r| r.record.id.clone())
            .collect();
        assert_eq!(high, vec![newer.id, older.id]);
        assert_eq!(dashboard.highest_risk_records[0].mother, Some(m));

        assert_eq!(dashboard.medical_records_with_mother.len(), 4);
        assert_eq!(dashboard.medical_records_with_mother[0].mother, None);
    }
}
