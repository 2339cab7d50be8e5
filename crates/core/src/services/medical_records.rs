//! Medical records and the record-and-predict workflow.
//!
//! The workflow resolves the mother, builds a [`FeatureVector`] (substituting defaults for
//! missing vitals), asks the [`RiskPredictor`] for a label, normalises it and optionally stores
//! a record. Collaborator calls happen strictly one after another; the first failure ends the
//! request and nothing is retried.

use super::join_with_mothers;
use crate::bp::compose_bp;
use crate::constants::{
    DEFAULT_BP_STR, DEFAULT_HEIGHT_CM, DEFAULT_SUGAR_MG_DL, DEFAULT_WEIGHT_KG, FALLBACK_AGE,
};
use crate::models::{
    MedicalRecord, MedicalRecordPatch, Mother, NewMedicalRecord, RecordWithMother,
};
use crate::repositories::{MotherDirectory, RecordStore};
use crate::{normalize_risk_label, CoreError, CoreResult, RiskLabel, ShardableUuid};
use chrono::{Datelike, NaiveDate, Utc};
use mch_predictor::{ComputedFeatures, FeatureVector, RiskPredictor};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use utoipa::ToSchema;

/// How the caller identifies the mother.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubjectRef {
    Id(ShardableUuid),
    /// National identity number, matched case-insensitively.
    NationalId(String),
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectRef::Id(id) => write!(f, "{id}"),
            SubjectRef::NationalId(nic) => write!(f, "{}", nic.trim()),
        }
    }
}

/// Vitals as the caller supplied them. Nothing here is defaulted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VitalsInput {
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub blood_pressure: Option<String>,
    pub systolic: Option<u32>,
    pub diastolic: Option<u32>,
    pub sugar_level: Option<f64>,
    pub gestational_age: Option<u32>,
    pub notes: Option<String>,
    /// Store a record alongside the prediction.
    pub persist: bool,
}

impl VitalsInput {
    /// The blood-pressure reading the caller supplied, if any. See [`compose_bp`].
    pub fn supplied_bp(&self) -> Option<String> {
        compose_bp(self.blood_pressure.as_deref(), self.systolic, self.diastolic)
    }

    /// The record to store for these vitals.
    pub fn to_new_record(&self, risk: Option<RiskLabel>) -> NewMedicalRecord {
        NewMedicalRecord {
            blood_pressure: self.supplied_bp(),
            height: self.height,
            weight: self.weight,
            sugar_level: self.sugar_level,
            gestational_age: self.gestational_age,
            notes: self.notes.clone(),
            risk,
        }
    }
}

/// Prediction as returned to callers, with the label normalised.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDetail {
    pub risk_label: RiskLabel,
    pub predicted_proba: BTreeMap<String, f64>,
    pub feature_vector: ComputedFeatures,
    pub flags: Vec<String>,
    pub override_applied: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutcome {
    /// The stored record; `null` unless persisting was requested.
    pub record: Option<MedicalRecord>,
    pub prediction: PredictionDetail,
}

/// Whole years between `dob` and `today`.
///
/// One year less when today's month/day is before the birthday. A date of birth in the future
/// yields 0.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Build the predictor input, substituting defaults for anything missing.
///
/// Age precedence: caller-supplied, then derived from `dob`, then [`FALLBACK_AGE`].
pub fn build_feature_vector(
    vitals: &VitalsInput,
    dob: Option<NaiveDate>,
    today: NaiveDate,
) -> FeatureVector {
    FeatureVector {
        age: vitals
            .age
            .or_else(|| dob.map(|d| age_on(d, today)))
            .unwrap_or(FALLBACK_AGE),
        height_cm: vitals.height.unwrap_or(DEFAULT_HEIGHT_CM),
        weight_kg: vitals.weight.unwrap_or(DEFAULT_WEIGHT_KG),
        bp_str: vitals
            .supplied_bp()
            .unwrap_or_else(|| DEFAULT_BP_STR.to_string()),
        sugar_mg_dl: vitals.sugar_level.unwrap_or(DEFAULT_SUGAR_MG_DL),
    }
}

#[derive(Clone)]
pub struct MedicalRecordService {
    mothers: Arc<dyn MotherDirectory>,
    records: Arc<dyn RecordStore>,
    predictor: Arc<dyn RiskPredictor>,
}

impl MedicalRecordService {
    pub fn new(
        mothers: Arc<dyn MotherDirectory>,
        records: Arc<dyn RecordStore>,
        predictor: Arc<dyn RiskPredictor>,
    ) -> Self {
        Self {
            mothers,
            records,
            predictor,
        }
    }

    fn resolve(&self, subject: &SubjectRef) -> CoreResult<Mother> {
        let found = match subject {
            SubjectRef::Id(id) => self.mothers.find_by_id(id)?,
            SubjectRef::NationalId(nic) => self.mothers.find_by_nic(nic)?,
        };
        found.ok_or_else(|| CoreError::SubjectNotFound(subject.to_string()))
    }

    /// Store a record for an existing mother.
    pub fn create(
        &self,
        mother_id: &ShardableUuid,
        record: NewMedicalRecord,
    ) -> CoreResult<MedicalRecord> {
        tracing::info!(%mother_id, "creating medical record");
        let mother = self.resolve(&SubjectRef::Id(mother_id.clone()))?;
        self.records.create(&mother.id, record)
    }

    pub fn list_by_mother(&self, mother_id: &ShardableUuid) -> CoreResult<Vec<MedicalRecord>> {
        self.records.list_by_mother(mother_id)
    }

    pub fn update(
        &self,
        id: &ShardableUuid,
        patch: MedicalRecordPatch,
    ) -> CoreResult<MedicalRecord> {
        tracing::info!(record_id = %id, "updating medical record");
        self.records.update(id, patch)
    }

    pub fn delete(&self, id: &ShardableUuid) -> CoreResult<()> {
        tracing::info!(record_id = %id, "deleting medical record");
        self.records.delete(id)
    }

    /// Every record, newest first, each joined with its mother.
    pub fn list_all_with_mother(&self) -> CoreResult<Vec<RecordWithMother>> {
        let records = self.records.list_all()?;
        let ids: HashSet<&ShardableUuid> = records.iter().map(|r| &r.mother_id).collect();
        let mut mothers = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(mother) = self.mothers.find_by_id(id)? {
                mothers.push(mother);
            }
        }
        Ok(join_with_mothers(records, &mothers))
    }

    /// Run the record-and-predict workflow for `subject`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::SubjectNotFound`] before the predictor is contacted
    /// - [`CoreError::Predictor`] unchanged from the client; nothing is stored
    /// - [`CoreError::PersistenceFailure`] if the record cannot be stored; the prediction is
    ///   discarded
    pub async fn create_and_predict(
        &self,
        subject: &SubjectRef,
        vitals: VitalsInput,
    ) -> CoreResult<PredictionOutcome> {
        self.create_and_predict_on(subject, vitals, Utc::now().date_naive())
            .await
    }

    async fn create_and_predict_on(
        &self,
        subject: &SubjectRef,
        vitals: VitalsInput,
        today: NaiveDate,
    ) -> CoreResult<PredictionOutcome> {
        let mother = self.resolve(subject)?;
        let features = build_feature_vector(&vitals, mother.dob, today);
        tracing::info!(
            mother_id = %mother.id,
            persist = vitals.persist,
            "requesting risk prediction"
        );

        let data = self.predictor.predict(&features).await?;
        let risk_label = normalize_risk_label(data.predicted_label.as_deref());

        let record = if vitals.persist {
            let stored = self
                .records
                .create(&mother.id, vitals.to_new_record(Some(risk_label)))
                .map_err(|e| CoreError::PersistenceFailure {
                    source: Box::new(e),
                })?;
            Some(stored)
        } else {
            None
        };

        Ok(PredictionOutcome {
            record,
            prediction: PredictionDetail {
                risk_label,
                predicted_proba: data.predicted_proba,
                feature_vector: data.feature_vector,
                flags: data.flags,
                override_applied: data.override_applied,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NationalId;
    use async_trait::async_trait;
    use mch_predictor::{PredictionData, PredictorError, PredictorResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const NIC: &str = "920123456V";

    fn mother(dob: Option<NaiveDate>) -> Mother {
        let now = Utc::now();
        Mother {
            id: ShardableUuid::new(),
            user_id: ShardableUuid::new(),
            nic_number: NationalId::parse(NIC).unwrap(),
            dob,
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    struct FakeDirectory {
        mother: Option<Mother>,
    }

    impl MotherDirectory for FakeDirectory {
        fn find_by_id(&self, id: &ShardableUuid) -> CoreResult<Option<Mother>> {
            Ok(self.mother.clone().filter(|m| &m.id == id))
        }

        fn find_by_nic(&self, nic: &str) -> CoreResult<Option<Mother>> {
            let nic = nic.trim().to_uppercase();
            Ok(self.mother.clone().filter(|m| m.nic_number.as_str() == nic))
        }
    }

    #[derive(Default)]
    struct CountingStore {
        creates: AtomicUsize,
        fail: bool,
        created: Mutex<Vec<MedicalRecord>>,
    }

    impl RecordStore for CountingStore {
        fn create(
            &self,
            mother_id: &ShardableUuid,
            record: NewMedicalRecord,
        ) -> CoreResult<MedicalRecord> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CoreError::FileWrite(std::io::Error::other("disk full")));
            }
            let now = Utc::now();
            let stored = MedicalRecord {
                id: ShardableUuid::new(),
                mother_id: mother_id.clone(),
                blood_pressure: record.blood_pressure,
                height: record.height,
                weight: record.weight,
                sugar_level: record.sugar_level,
                gestational_age: record.gestational_age,
                notes: record.notes,
                risk: record.risk,
                recorded_at: now,
                updated_at: now,
            };
            self.created.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        fn list_by_mother(&self, mother_id: &ShardableUuid) -> CoreResult<Vec<MedicalRecord>> {
            Ok(self
                .created
                .lock()
                .unwrap()
                .iter()
                .filter(|r| &r.mother_id == mother_id)
                .cloned()
                .collect())
        }

        fn list_all(&self) -> CoreResult<Vec<MedicalRecord>> {
            Ok(self.created.lock().unwrap().clone())
        }

        fn update(&self, id: &ShardableUuid, _: MedicalRecordPatch) -> CoreResult<MedicalRecord> {
            Err(CoreError::RecordNotFound(id.to_string()))
        }

        fn delete(&self, id: &ShardableUuid) -> CoreResult<()> {
            Err(CoreError::RecordNotFound(id.to_string()))
        }
    }

    enum Reply {
        Label(&'static str, Vec<&'static str>),
        Unavailable,
    }

    struct ScriptedPredictor {
        reply: Reply,
        calls: AtomicUsize,
        seen: Mutex<Vec<FeatureVector>>,
    }

    impl ScriptedPredictor {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last_features(&self) -> FeatureVector {
            self.seen.lock().unwrap().last().cloned().expect("predictor was not called")
        }
    }

    #[async_trait]
    impl RiskPredictor for ScriptedPredictor {
        async fn predict(&self, features: &FeatureVector) -> PredictorResult<PredictionData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(features.clone());
            match &self.reply {
                Reply::Label(label, flags) => Ok(PredictionData {
                    predicted_label: Some((*label).to_string()),
                    predicted_proba: BTreeMap::from([
                        ("High".to_string(), 0.1),
                        ("Low".to_string(), 0.8),
                        ("Medium".to_string(), 0.1),
                    ]),
                    feature_vector: ComputedFeatures {
                        bmi: Some(23.9),
                        ..Default::default()
                    },
                    flags: flags.iter().map(|f| f.to_string()).collect(),
                    override_applied: false,
                }),
                Reply::Unavailable => Err(PredictorError::Unavailable(
                    "timeout of 4000ms exceeded".into(),
                )),
            }
        }
    }

    struct Harness {
        service: MedicalRecordService,
        store: Arc<CountingStore>,
        predictor: Arc<ScriptedPredictor>,
        mother_id: Option<ShardableUuid>,
    }

    fn harness(mother: Option<Mother>, store: CountingStore, reply: Reply) -> Harness {
        let mother_id = mother.as_ref().map(|m| m.id.clone());
        let store = Arc::new(store);
        let predictor = Arc::new(ScriptedPredictor::new(reply));
        let service = MedicalRecordService::new(
            Arc::new(FakeDirectory { mother }),
            store.clone(),
            predictor.clone(),
        );
        Harness {
            service,
            store,
            predictor,
            mother_id,
        }
    }

    fn by_nic() -> SubjectRef {
        SubjectRef::NationalId(NIC.to_string())
    }

    fn scenario_vitals() -> VitalsInput {
        VitalsInput {
            height: Some(165.0),
            weight: Some(65.0),
            blood_pressure: Some("120/80".into()),
            sugar_level: Some(90.0),
            persist: true,
            ..Default::default()
        }
    }

    #[test]
    fn age_counts_completed_years() {
        let dob = NaiveDate::from_ymd_opt(1995, 6, 15).unwrap();
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()), 29);
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), 30);
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()), 30);
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()), 0);
    }

    #[test]
    fn feature_vector_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let features = build_feature_vector(&VitalsInput::default(), None, today);
        assert_eq!(
            features,
            FeatureVector {
                age: 25,
                height_cm: 160.0,
                weight_kg: 60.0,
                bp_str: "110/70".into(),
                sugar_mg_dl: 90.0,
            }
        );
    }

    #[test]
    fn feature_vector_age_precedence() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let dob = NaiveDate::from_ymd_opt(1993, 3, 2);

        let derived = build_feature_vector(&VitalsInput::default(), dob, today);
        assert_eq!(derived.age, 31);

        let supplied = VitalsInput {
            age: Some(40),
            ..Default::default()
        };
        assert_eq!(build_feature_vector(&supplied, dob, today).age, 40);
    }

    #[test]
    fn feature_vector_blood_pressure_sources() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let blank = VitalsInput {
            blood_pressure: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(build_feature_vector(&blank, None, today).bp_str, "110/70");

        let pair = VitalsInput {
            systolic: Some(135),
            diastolic: Some(88),
            ..Default::default()
        };
        assert_eq!(build_feature_vector(&pair, None, today).bp_str, "135/88");

        let unvalidated = VitalsInput {
            blood_pressure: Some("high-ish".into()),
            ..Default::default()
        };
        assert_eq!(build_feature_vector(&unvalidated, None, today).bp_str, "high-ish");

        let padded = VitalsInput {
            blood_pressure: Some(" 120/80 ".into()),
            ..Default::default()
        };
        assert_eq!(build_feature_vector(&padded, None, today).bp_str, " 120/80 ");
        assert_eq!(
            padded.to_new_record(None).blood_pressure.as_deref(),
            Some(" 120/80 ")
        );
    }

    #[tokio::test]
    async fn low_label_is_persisted_and_returned() {
        let h = harness(Some(mother(None)), CountingStore::default(), Reply::Label("Low", vec![]));

        let outcome = h
            .service
            .create_and_predict(&by_nic(), scenario_vitals())
            .await
            .unwrap();

        assert_eq!(outcome.prediction.risk_label, RiskLabel::Low);
        let record = outcome.record.expect("record should be persisted");
        assert_eq!(record.risk, Some(RiskLabel::Low));
        assert_eq!(Some(record.mother_id.clone()), h.mother_id);
        assert_eq!(record.blood_pressure.as_deref(), Some("120/80"));
        assert_eq!(record.height, Some(165.0));
        assert_eq!(h.store.creates.load(Ordering::SeqCst), 1);

        let sent = h.predictor.last_features();
        assert_eq!(sent.height_cm, 165.0);
        assert_eq!(sent.weight_kg, 65.0);
        assert_eq!(sent.bp_str, "120/80");
        assert_eq!(sent.sugar_mg_dl, 90.0);
        assert_eq!(sent.age, 25);
    }

    #[tokio::test]
    async fn high_label_echoes_flags() {
        let h = harness(
            Some(mother(None)),
            CountingStore::default(),
            Reply::Label("High", vec!["high_bp", "obesity"]),
        );

        let outcome = h
            .service
            .create_and_predict(&by_nic(), scenario_vitals())
            .await
            .unwrap();

        assert_eq!(outcome.prediction.flags, vec!["high_bp", "obesity"]);
        assert_eq!(outcome.prediction.risk_label, RiskLabel::High);
        assert_eq!(outcome.record.unwrap().risk, Some(RiskLabel::High));
        assert_eq!(outcome.prediction.feature_vector.bmi, Some(23.9));
    }

    #[tokio::test]
    async fn labels_outside_the_set_become_unknown() {
        for label in ["Unknown", "critical", ""] {
            let h = harness(
                Some(mother(None)),
                CountingStore::default(),
                Reply::Label(label, vec![]),
            );
            let outcome = h
                .service
                .create_and_predict(&by_nic(), scenario_vitals())
                .await
                .unwrap();
            assert_eq!(outcome.prediction.risk_label, RiskLabel::Unknown, "label {label:?}");
            assert_eq!(outcome.record.unwrap().risk, Some(RiskLabel::Unknown));
        }
    }

    #[tokio::test]
    async fn unknown_subject_never_reaches_predictor() {
        let h = harness(None, CountingStore::default(), Reply::Label("Low", vec![]));

        let err = h
            .service
            .create_and_predict(&by_nic(), scenario_vitals())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::SubjectNotFound(ref key) if key == NIC));
        assert_eq!(err.to_string(), "Mother not found: 920123456V");
        assert_eq!(h.predictor.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resolves_by_id_too() {
        let m = mother(None);
        let id = m.id.clone();
        let h = harness(Some(m), CountingStore::default(), Reply::Label("Medium", vec![]));

        let outcome = h
            .service
            .create_and_predict(&SubjectRef::Id(id), VitalsInput::default())
            .await
            .unwrap();
        assert_eq!(outcome.prediction.risk_label, RiskLabel::Medium);

        let missing = h
            .service
            .create_and_predict(&SubjectRef::Id(ShardableUuid::new()), VitalsInput::default())
            .await;
        assert!(matches!(missing, Err(CoreError::SubjectNotFound(_))));
        assert_eq!(h.predictor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_persist_means_no_store_call() {
        let h = harness(Some(mother(None)), CountingStore::default(), Reply::Label("Low", vec![]));
        let vitals = VitalsInput {
            persist: false,
            ..scenario_vitals()
        };

        let outcome = h.service.create_and_predict(&by_nic(), vitals).await.unwrap();

        assert_eq!(outcome.record, None);
        assert_eq!(outcome.prediction.risk_label, RiskLabel::Low);
        assert_eq!(h.store.creates.load(Ordering::SeqCst), 0);
        assert!(serde_json::to_value(&outcome).unwrap()["record"].is_null());
    }

    #[tokio::test]
    async fn predictor_failure_propagates_without_storing() {
        let h = harness(Some(mother(None)), CountingStore::default(), Reply::Unavailable);

        let err = h
            .service
            .create_and_predict(&by_nic(), scenario_vitals())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Predictor(PredictorError::Unavailable(_))));
        assert_eq!(err.to_string(), "timeout of 4000ms exceeded");
        assert_eq!(h.store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_failure_discards_prediction() {
        let store = CountingStore {
            fail: true,
            ..Default::default()
        };
        let h = harness(Some(mother(None)), store, Reply::Label("High", vec![]));

        let err = h
            .service
            .create_and_predict(&by_nic(), scenario_vitals())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::PersistenceFailure { .. }));
        assert_eq!(h.predictor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stored_vitals_are_never_defaulted() {
        let h = harness(Some(mother(None)), CountingStore::default(), Reply::Label("Low", vec![]));
        let vitals = VitalsInput {
            systolic: Some(128),
            diastolic: Some(82),
            persist: true,
            ..Default::default()
        };

        let record = h
            .service
            .create_and_predict(&by_nic(), vitals)
            .await
            .unwrap()
            .record
            .unwrap();

        assert_eq!(record.blood_pressure.as_deref(), Some("128/82"));
        assert_eq!(record.height, None);
        assert_eq!(record.weight, None);
        assert_eq!(record.sugar_level, None);
        assert_eq!(h.predictor.last_features().height_cm, 160.0);
    }

    #[test]
    fn create_requires_existing_mother() {
        let m = mother(None);
        let id = m.id.clone();
        let h = harness(Some(m), CountingStore::default(), Reply::Label("Low", vec![]));

        let err = h
            .service
            .create(&ShardableUuid::new(), NewMedicalRecord::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::SubjectNotFound(_)));
        assert_eq!(h.store.creates.load(Ordering::SeqCst), 0);

        h.service.create(&id, NewMedicalRecord::default()).unwrap();
        assert_eq!(h.service.list_by_mother(&id).unwrap().len(), 1);

        let joined = h.service.list_all_with_mother().unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].mother.as_ref().map(|m| m.id.clone()), Some(id));
    }
}
