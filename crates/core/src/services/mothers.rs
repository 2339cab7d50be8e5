use crate::models::Mother;
use crate::repositories::{MotherDirectory, MotherRepository};
use crate::{CoreError, CoreResult, ShardableUuid};
use std::sync::Arc;

/// Read access to mother profiles.
#[derive(Clone, Debug)]
pub struct MotherService {
    mothers: Arc<MotherRepository>,
}

impl MotherService {
    pub fn new(mothers: Arc<MotherRepository>) -> Self {
        Self { mothers }
    }

    pub fn list(&self) -> Vec<Mother> {
        tracing::info!("listing mothers");
        let mut mothers = self.mothers.list();
        mothers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mothers
    }

    /// The mother profile owned by `user_id`.
    pub fn by_user_id(&self, user_id: &ShardableUuid) -> CoreResult<Mother> {
        self.mothers
            .find_by_user_id(user_id)
            .ok_or_else(|| CoreError::SubjectNotFound(format!("user {user_id}")))
    }

    pub fn by_nic(&self, nic: &str) -> CoreResult<Mother> {
        self.mothers
            .find_by_nic(nic)?
            .ok_or_else(|| CoreError::SubjectNotFound(nic.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoreConfig, NationalId};
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn lookups_report_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf()).unwrap();
        let repo = Arc::new(MotherRepository::new(&cfg));
        let service = MotherService::new(repo.clone());

        let now = Utc::now();
        let mother = Mother {
            id: ShardableUuid::new(),
            user_id: ShardableUuid::new(),
            nic_number: NationalId::parse("920123456V").unwrap(),
            dob: None,
            phone: Some("0771234567".into()),
            address: None,
            created_at: now,
            updated_at: now,
        };
        repo.insert(&mother).unwrap();

        assert_eq!(service.list(), vec![mother.clone()]);
        assert_eq!(service.by_user_id(&mother.user_id).unwrap(), mother);
        assert_eq!(service.by_nic("920123456v").unwrap(), mother);

        let err = service.by_user_id(&ShardableUuid::new()).unwrap_err();
        assert!(err.is_not_found());
        let err = service.by_nic("111111111V").unwrap_err();
        assert_eq!(err.to_string(), "Mother not found: 111111111V");
    }
}
