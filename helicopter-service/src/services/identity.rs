use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{NewUser, User};
use crate::services::ServiceError;

/// Lookup and creation of identities.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
    /// Fails with `EmailAlreadyRegistered` when the email is taken.
    async fn insert(&self, new_user: NewUser) -> Result<User, ServiceError>;
}

/// In-memory identity store for tests.
pub struct MockIdentityStore {
    pub users: Mutex<Vec<User>>,
    pub fail: Mutex<bool>,
}

impl Default for MockIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    /// Make every subsequent call fail as if the store were unreachable.
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut fail) = self.fail.lock() {
            *fail = failing;
        }
    }

    fn check(&self) -> Result<(), ServiceError> {
        let failing = *self
            .fail
            .lock()
            .map_err(|e| anyhow::anyhow!("Mock identity mutex poisoned: {}", e))?;
        if failing {
            return Err(ServiceError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn users(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, ServiceError> {
        self.users.lock().map_err(|e| {
            ServiceError::Internal(anyhow::anyhow!("Mock identity mutex poisoned: {}", e))
        })
    }
}

#[async_trait]
impl IdentityStore for MockIdentityStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        self.check()?;
        Ok(self.users()?.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        self.check()?;
        Ok(self.users()?.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, ServiceError> {
        self.check()?;
        let mut users = self.users()?;
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(ServiceError::EmailAlreadyRegistered);
        }

        let user = User {
            id: users.len() as i64 + 1,
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            created_utc: chrono::Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}
