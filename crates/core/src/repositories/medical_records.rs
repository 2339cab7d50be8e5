use super::RecordStore;
use crate::config::CoreConfig;
use crate::constants::MEDICAL_RECORD_JSON_FILENAME;
use crate::models::{MedicalRecord, MedicalRecordPatch, NewMedicalRecord};
use crate::store::JsonCollection;
use crate::{CoreError, CoreResult, ShardableUuid};
use chrono::Utc;

/// Medical records, one `medical_record.json` per record.
#[derive(Debug)]
pub struct MedicalRecordRepository {
    records: JsonCollection<MedicalRecord>,
}

impl MedicalRecordRepository {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            records: JsonCollection::new(cfg.medical_records_dir(), MEDICAL_RECORD_JSON_FILENAME),
        }
    }

    fn newest_first(mut records: Vec<MedicalRecord>) -> Vec<MedicalRecord> {
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        records
    }
}

impl RecordStore for MedicalRecordRepository {
    fn create(
        &self,
        mother_id: &ShardableUuid,
        record: NewMedicalRecord,
    ) -> CoreResult<MedicalRecord> {
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

        let _guard = self.records.lock();
        self.records.put(&stored.id, &stored)?;
        Ok(stored)
    }

    fn list_by_mother(&self, mother_id: &ShardableUuid) -> CoreResult<Vec<MedicalRecord>> {
        let mine = self
            .records
            .list()
            .into_iter()
            .filter(|r| &r.mother_id == mother_id)
            .collect();
        Ok(Self::newest_first(mine))
    }

    fn list_all(&self) -> CoreResult<Vec<MedicalRecord>> {
        Ok(Self::newest_first(self.records.list()))
    }

    fn update(&self, id: &ShardableUuid, patch: MedicalRecordPatch) -> CoreResult<MedicalRecord> {
        let _guard = self.records.lock();
        let mut record = self
            .records
            .get(id)?
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;
        patch.apply(&mut record, Utc::now());
        self.records.put(id, &record)?;
        Ok(record)
    }

    fn delete(&self, id: &ShardableUuid) -> CoreResult<()> {
        let _guard = self.records.lock();
        if self.records.remove(id)? {
            Ok(())
        } else {
            Err(CoreError::RecordNotFound(id.to_string()))
        }
    }
}
