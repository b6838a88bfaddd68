use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserChanges};

/// Repository trait for User persistence
///
/// Email uniqueness is the store's job: implementations report a clash as
/// [`UserError::EmailTaken`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, input: NewUser) -> UserResult<User>;

    /// All users, ordered by id ascending
    async fn list(&self) -> UserResult<Vec<User>>;

    async fn get_by_id(&self, id: i64) -> UserResult<Option<User>>;

    /// `None` when no user has this id
    async fn update_by_id(&self, id: i64, changes: UserChanges) -> UserResult<Option<User>>;

    /// `false` when nothing matched
    async fn delete_by_id(&self, id: i64) -> UserResult<bool>;

    async fn ping(&self) -> UserResult<()>;
}

#[derive(Debug)]
struct Users {
    next_id: i64,
    by_id: BTreeMap<i64, User>,
}

impl Default for Users {
    fn default() -> Self {
        Self {
            next_id: 1,
            by_id: BTreeMap::new(),
        }
    }
}

impl Users {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.by_id
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Users>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, input: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.email_taken(&input.email, None) {
            return Err(UserError::EmailTaken(format!(
                "Key (email)=({}) already exists.",
                input.email
            )));
        }

        let user = User {
            id: users.next_id,
            name: input.name,
            email: input.email,
        };
        users.next_id += 1;
        users.by_id.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.by_id.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.by_id.get(&id).cloned())
    }

    async fn update_by_id(&self, id: i64, changes: UserChanges) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        if !users.by_id.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &changes.email {
            if users.email_taken(email, Some(id)) {
                return Err(UserError::EmailTaken(format!(
                    "Key (email)=({}) already exists.",
                    email
                )));
            }
        }

        let Some(user) = users.by_id.get_mut(&id) else {
            return Ok(None);
        };
        user.apply(changes);

        tracing::info!(user_id = id, "Updated user");
        Ok(Some(user.clone()))
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<bool> {
        let mut users = self.users.write().await;
        let removed = users.by_id.remove(&id).is_some();

        if removed {
            tracing::info!(user_id = id, "Deleted user");
        }
        Ok(removed)
    }

    async fn ping(&self) -> UserResult<()> {
        Ok(())
    }
}
