//! Registration and login.
//!
//! Passwords are stored as Argon2 PHC strings and never leave this module in clear text.
//! Token issuance is an API concern; [`AuthService::login`] only authenticates.

use super::clinics::NewClinic;
use crate::constants::MIN_PASSWORD_LEN;
use crate::models::{Clinic, Doctor, Mother, PublicUser, User};
use crate::repositories::{FileStores, MotherDirectory};
use crate::{CoreError, CoreResult, EmailAddress, NationalId, NonEmptyText, Role, ShardableUuid};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Role-specific registration fields. Only those relevant to the chosen role are read.
#[derive(Clone, Debug, Default)]
pub struct ProfileDetails {
    pub dob: Option<NaiveDate>,
    pub nic_number: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub clinic_name: Option<String>,
    pub location: Option<String>,
    pub clinic_code: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub details: ProfileDetails,
}

/// The profile created alongside a user.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Profile {
    Mother(Mother),
    Doctor(Doctor),
    Clinic(Clinic),
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user: PublicUser,
    pub profile: Profile,
}

/// A profile that has passed validation but is not yet stored.
enum PendingProfile {
    Mother {
        nic_number: NationalId,
        dob: Option<NaiveDate>,
        phone: Option<String>,
        address: Option<String>,
    },
    Doctor {
        license_number: String,
        specialty: Option<String>,
    },
    Clinic(NewClinic),
}

impl PendingProfile {
    fn validate(role: Role, details: ProfileDetails) -> CoreResult<Self> {
        let text = |v: Option<String>| NonEmptyText::optional(v).map(NonEmptyText::into_inner);

        match role {
            Role::Mother => {
                let nic = text(details.nic_number).ok_or_else(|| {
                    CoreError::InvalidInput("nicNumber is required for mothers".into())
                })?;
                Ok(Self::Mother {
                    nic_number: NationalId::parse(nic)?,
                    dob: details.dob,
                    phone: text(details.phone),
                    address: text(details.address),
                })
            }
            Role::Doctor => Ok(Self::Doctor {
                license_number: text(details.license_number).ok_or_else(|| {
                    CoreError::InvalidInput("licenseNumber is required for doctors".into())
                })?,
                specialty: text(details.specialty),
            }),
            Role::ClinicUser => {
                let clinic = NewClinic {
                    name: details.clinic_name,
                    location: details.location,
                    phone: details.phone,
                    address: details.address,
                    clinic_code: details.clinic_code,
                };
                // Checked here as well: no user is written for an invalid clinic.
                clinic.clone().into_clinic(&ShardableUuid::new(), Utc::now())?;
                Ok(Self::Clinic(clinic))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthService {
    stores: FileStores,
}

impl AuthService {
    pub fn new(stores: FileStores) -> Self {
        Self { stores }
    }

    /// Register a user and the profile matching their role.
    ///
    /// Every input is validated before anything is written. If the profile cannot be stored
    /// the freshly created user is removed again.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidInput`] / [`CoreError::Text`] for malformed input
    /// - [`CoreError::EmailInUse`] or [`CoreError::NationalIdInUse`] for duplicates
    /// - [`CoreError::CleanupAfterRegistrationFailed`] if the rollback itself fails
    pub fn register(&self, request: RegisterUser) -> CoreResult<Registration> {
        let email = EmailAddress::parse(&request.email)?;
        tracing::info!(%email, role = %request.role, "registering user");

        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CoreError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let pending = PendingProfile::validate(request.role, request.details)?;
        if self.stores.users.find_by_email(&email).is_some() {
            return Err(CoreError::EmailInUse);
        }
        if let PendingProfile::Mother { nic_number, .. } = &pending {
            if self.stores.mothers.find_by_nic(nic_number.as_str())?.is_some() {
                return Err(CoreError::NationalIdInUse);
            }
        }

        let now = Utc::now();
        let user = User {
            id: ShardableUuid::new(),
            email,
            first_name: clean_name(request.first_name),
            last_name: clean_name(request.last_name),
            password_hash: hash_password(&request.password)?,
            role: request.role,
            created_at: now,
            updated_at: now,
        };
        self.stores.users.insert(&user)?;

        match self.create_profile(&user, pending, now) {
            Ok(profile) => Ok(Registration {
                user: PublicUser::from(&user),
                profile,
            }),
            Err(registration_error) => match self.stores.users.remove(&user.id) {
                Ok(_) => Err(registration_error),
                Err(cleanup_error) => Err(CoreError::CleanupAfterRegistrationFailed {
                    user_id: user.id.to_string(),
                    registration_error: Box::new(registration_error),
                    cleanup_error: Box::new(cleanup_error),
                }),
            },
        }
    }

    fn create_profile(
        &self,
        user: &User,
        pending: PendingProfile,
        now: DateTime<Utc>,
    ) -> CoreResult<Profile> {
        match pending {
            PendingProfile::Mother {
                nic_number,
                dob,
                phone,
                address,
            } => {
                let mother = Mother {
                    id: ShardableUuid::new(),
                    user_id: user.id.clone(),
                    nic_number,
                    dob,
                    phone,
                    address,
                    created_at: now,
                    updated_at: now,
                };
                self.stores.mothers.insert(&mother)?;
                Ok(Profile::Mother(mother))
            }
            PendingProfile::Doctor {
                license_number,
                specialty,
            } => {
                let doctor = Doctor {
                    id: ShardableUuid::new(),
                    user_id: user.id.clone(),
                    license_number,
                    specialty,
                    created_at: now,
                    updated_at: now,
                };
                self.stores.doctors.insert(&doctor)?;
                Ok(Profile::Doctor(doctor))
            }
            PendingProfile::Clinic(details) => {
                let clinic = details.into_clinic(&user.id, now)?;
                self.stores.clinics.insert(&clinic)?;
                Ok(Profile::Clinic(clinic))
            }
        }
    }

    /// Authenticate by email and password.
    ///
    /// Unknown addresses and wrong passwords fail identically with
    /// [`CoreError::InvalidCredentials`].
    pub fn login(&self, email: &str, password: &str) -> CoreResult<User> {
        let email = EmailAddress::parse(email).map_err(|_| CoreError::InvalidCredentials)?;
        let user = self
            .stores
            .users
            .find_by_email(&email)
            .ok_or(CoreError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(%email, "password mismatch");
            return Err(CoreError::InvalidCredentials);
        }
        tracing::info!(%email, "login succeeded");
        Ok(user)
    }

    /// Look up a user by id.
    pub fn user(&self, id: &ShardableUuid) -> CoreResult<User> {
        self.stores
            .users
            .get(id)?
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()))
    }
}

fn clean_name(name: Option<String>) -> String {
    name.map(|n| n.trim().to_string()).unwrap_or_default()
}

fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> CoreResult<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| CoreError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreConfig;
    use tempfile::TempDir;

    fn service(temp_dir: &TempDir) -> AuthService {
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf()).unwrap();
        AuthService::new(FileStores::open(&cfg))
    }

    fn mother_request(email: &str, nic: &str) -> RegisterUser {
        RegisterUser {
            email: email.into(),
            password: "correct horse".into(),
            role: Role::Mother,
            first_name: Some("Nimali".into()),
            last_name: Some("Perera".into()),
            details: ProfileDetails {
                nic_number: Some(nic.into()),
                dob: NaiveDate::from_ymd_opt(1992, 4, 12),
                ..Default::default()
            },
        }
    }

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let a = hash_password("s3cret-pass").unwrap();
        let b = hash_password("s3cret-pass").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &a).unwrap());
        assert!(!verify_password("wrong-pass", &a).unwrap());
    }

    #[test]
    fn register_mother_creates_user_and_profile() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let auth = service(&temp_dir);

        let registration = auth
            .register(mother_request("nimali@example.com", "920123456V"))
            .unwrap();

        assert_eq!(registration.user.role, Role::Mother);
        match registration.profile {
            Profile::Mother(mother) => {
                assert_eq!(mother.user_id, registration.user.id);
                assert_eq!(mother.nic_number.as_str(), "920123456V");
            }
            other => panic!("expected mother profile, got {other:?}"),
        }

        let json = serde_json::to_value(&registration.user).unwrap();
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn register_rejects_short_password_and_duplicates() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let auth = service(&temp_dir);

        let mut short = mother_request("a@example.com", "920123456V");
        short.password = "short".into();
        assert!(matches!(auth.register(short), Err(CoreError::InvalidInput(_))));

        auth.register(mother_request("a@example.com", "920123456V"))
            .unwrap();
        assert!(matches!(
            auth.register(mother_request("A@example.com", "199212345678")),
            Err(CoreError::EmailInUse)
        ));
        assert!(matches!(
            auth.register(mother_request("b@example.com", "920123456v")),
            Err(CoreError::NationalIdInUse)
        ));
    }

    #[test]
    fn invalid_profile_leaves_no_user_behind() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let auth = service(&temp_dir);

        let mut doctor = mother_request("doc@example.com", "920123456V");
        doctor.role = Role::Doctor;
        assert!(matches!(auth.register(doctor), Err(CoreError::InvalidInput(_))));
        assert!(matches!(
            auth.login("doc@example.com", "correct horse"),
            Err(CoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn register_clinic_user_creates_active_clinic() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let auth = service(&temp_dir);

        let registration = auth
            .register(RegisterUser {
                email: "clinic@example.com".into(),
                password: "clinic-pass".into(),
                role: Role::ClinicUser,
                first_name: None,
                last_name: None,
                details: ProfileDetails {
                    clinic_name: Some("Matara MOH".into()),
                    location: Some("Matara".into()),
                    ..Default::default()
                },
            })
            .unwrap();

        assert!(matches!(registration.profile, Profile::Clinic(ref c) if c.is_active));
        assert_eq!(registration.user.first_name, "");
    }

    #[test]
    fn login_checks_password() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let auth = service(&temp_dir);
        auth.register(mother_request("nimali@example.com", "920123456V"))
            .unwrap();

        let user = auth.login(" Nimali@Example.com ", "correct horse").unwrap();
        assert_eq!(user.email.as_str(), "nimali@example.com");
        assert_eq!(auth.user(&user.id).unwrap(), user);

        for (email, password) in [
            ("nimali@example.com", "wrong horse"),
            ("nobody@example.com", "correct horse"),
            ("not-an-email", "correct horse"),
        ] {
            let err = auth.login(email, password).unwrap_err();
            assert!(matches!(err, CoreError::InvalidCredentials));
            assert_eq!(err.to_string(), "Invalid email or password");
        }
    }
}
