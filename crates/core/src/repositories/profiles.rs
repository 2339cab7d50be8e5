//! Role profiles: mothers, doctors and clinics.
//!
//! Each profile belongs to exactly one user; a user never holds two profiles of the same kind.

use super::MotherDirectory;
use crate::config::CoreConfig;
use crate::constants::{CLINIC_JSON_FILENAME, DOCTOR_JSON_FILENAME, MOTHER_JSON_FILENAME};
use crate::models::{Clinic, Doctor, Mother};
use crate::store::JsonCollection;
use crate::{CoreError, CoreResult, ShardableUuid};

#[derive(Debug)]
pub struct MotherRepository {
    mothers: JsonCollection<Mother>,
}

impl MotherRepository {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            mothers: JsonCollection::new(cfg.mothers_dir(), MOTHER_JSON_FILENAME),
        }
    }

    /// Store a new mother profile.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NationalIdInUse`] if another mother already holds the NIC
    /// - [`CoreError::InvalidInput`] if the user already has a mother profile
    pub fn insert(&self, mother: &Mother) -> CoreResult<()> {
        let _guard = self.mothers.lock();
        for existing in self.mothers.list() {
            if existing.nic_number == mother.nic_number {
                return Err(CoreError::NationalIdInUse);
            }
            if existing.user_id == mother.user_id {
                return Err(CoreError::InvalidInput(
                    "user already has a mother profile".into(),
                ));
            }
        }
        self.mothers.put(&mother.id, mother)
    }

    pub fn list(&self) -> Vec<Mother> {
        self.mothers.list()
    }

    pub fn find_by_user_id(&self, user_id: &ShardableUuid) -> Option<Mother> {
        self.mothers.find(|m| &m.user_id == user_id)
    }
}

impl MotherDirectory for MotherRepository {
    fn find_by_id(&self, id: &ShardableUuid) -> CoreResult<Option<Mother>> {
        self.mothers.get(id)
    }

    fn find_by_nic(&self, nic: &str) -> CoreResult<Option<Mother>> {
        let wanted = nic.trim().to_uppercase();
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self.mothers.find(|m| m.nic_number.as_str() == wanted))
    }
}

#[derive(Debug)]
pub struct DoctorRepository {
    doctors: JsonCollection<Doctor>,
}

impl DoctorRepository {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            doctors: JsonCollection::new(cfg.doctors_dir(), DOCTOR_JSON_FILENAME),
        }
    }

    pub fn insert(&self, doctor: &Doctor) -> CoreResult<()> {
        let _guard = self.doctors.lock();
        if self.doctors.find(|d| d.user_id == doctor.user_id).is_some() {
            return Err(CoreError::InvalidInput(
                "user already has a doctor profile".into(),
            ));
        }
        self.doctors.put(&doctor.id, doctor)
    }
}

#[derive(Debug)]
pub struct ClinicRepository {
    clinics: JsonCollection<Clinic>,
}

impl ClinicRepository {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            clinics: JsonCollection::new(cfg.clinics_dir(), CLINIC_JSON_FILENAME),
        }
    }

    pub fn insert(&self, clinic: &Clinic) -> CoreResult<()> {
        let _guard = self.clinics.lock();
        if self.clinics.find(|c| c.user_id == clinic.user_id).is_some() {
            return Err(CoreError::InvalidInput(
                "user already has a clinic profile".into(),
            ));
        }
        self.clinics.put(&clinic.id, clinic)
    }
}
