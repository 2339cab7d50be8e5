use crate::config::CoreConfig;
use crate::constants::USER_JSON_FILENAME;
use crate::models::User;
use crate::store::JsonCollection;
use crate::{CoreError, CoreResult, EmailAddress, ShardableUuid};

/// Accounts, one `user.json` per user. Email addresses are unique.
#[derive(Debug)]
pub struct UserRepository {
    users: JsonCollection<User>,
}

impl UserRepository {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            users: JsonCollection::new(cfg.users_dir(), USER_JSON_FILENAME),
        }
    }

    /// Store a new user, failing with [`CoreError::EmailInUse`] if the address is taken.
    pub fn insert(&self, user: &User) -> CoreResult<()> {
        let _guard = self.users.lock();
        if self.users.find(|u| u.email == user.email).is_some() {
            return Err(CoreError::EmailInUse);
        }
        self.users.put(&user.id, user)
    }

    pub fn get(&self, id: &ShardableUuid) -> CoreResult<Option<User>> {
        self.users.get(id)
    }

    pub fn find_by_email(&self, email: &EmailAddress) -> Option<User> {
        self.users.find(|u| &u.email == email)
    }

    pub fn remove(&self, id: &ShardableUuid) -> CoreResult<bool> {
        let _guard = self.users.lock();
        self.users.remove(id)
    }
}
