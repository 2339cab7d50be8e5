//! Constants used throughout the MCH core crate.
//!
//! Collection directory names and document filenames live here so the on-disk layout is
//! defined in exactly one place.

/// Default directory for data storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "mch_data";

pub const USERS_DIR_NAME: &str = "users";
pub const USER_JSON_FILENAME: &str = "user.json";

pub const MOTHERS_DIR_NAME: &str = "mothers";
pub const MOTHER_JSON_FILENAME: &str = "mother.json";

pub const DOCTORS_DIR_NAME: &str = "doctors";
pub const DOCTOR_JSON_FILENAME: &str = "doctor.json";

pub const CLINICS_DIR_NAME: &str = "clinics";
pub const CLINIC_JSON_FILENAME: &str = "clinic.json";

pub const MEDICAL_RECORDS_DIR_NAME: &str = "medical_records";
pub const MEDICAL_RECORD_JSON_FILENAME: &str = "medical_record.json";

/// Age sent to the predictor when neither the caller nor the mother's profile supplies one.
pub const FALLBACK_AGE: u32 = 25;
/// Height (cm) sent to the predictor when the caller omits it.
pub const DEFAULT_HEIGHT_CM: f64 = 160.0;
/// Weight (kg) sent to the predictor when the caller omits it.
pub const DEFAULT_WEIGHT_KG: f64 = 60.0;
/// Blood sugar (mg/dL) sent to the predictor when the caller omits it.
pub const DEFAULT_SUGAR_MG_DL: f64 = 90.0;
/// Blood pressure sent to the predictor when the caller supplies no reading.
pub const DEFAULT_BP_STR: &str = "110/70";

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 8;
