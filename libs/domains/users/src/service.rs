use std::sync::Arc;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserPayload};
use crate::repository::UserRepository;
use crate::validation;

/// User service: validation and not-found handling over a repository
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, payload))]
    pub async fn create_user(&self, payload: UserPayload) -> UserResult<User> {
        let input = validation::new_user(payload)?;
        self.repository.insert(input).await
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip(self, payload))]
    pub async fn update_user(&self, id: i64, payload: UserPayload) -> UserResult<User> {
        let changes = validation::user_changes(payload)?;

        self.repository
            .update_by_id(id, changes)
            .await?
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        if self.repository.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(UserError::NotFound)
        }
    }

    pub async fn ping(&self) -> UserResult<()> {
        self.repository.ping().await
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::repository::MockUserRepository;
    use crate::validation::NAME_AND_EMAIL_REQUIRED;
    use mockall::predicate::eq;
    use serde_json::json;

    fn payload(body: serde_json::Value) -> UserPayload {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_create_passes_normalized_input() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .with(eq(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            }))
            .times(1)
            .returning(|input| {
                Ok(User {
                    id: 1,
                    name: input.name,
                    email: input.email,
                })
            });
        let service = UserService::new(repo);

        let user = service
            .create_user(payload(json!({ "name": "Alice ", "email": "ALICE@example.com" })))
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_invalid_create_never_reaches_repository() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert().never();
        let service = UserService::new(repo);

        let err = service
            .create_user(payload(json!({ "name": "Alice" })))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Validation(msg) if msg == NAME_AND_EMAIL_REQUIRED));
    }

    #[tokio::test]
    async fn test_conflict_is_propagated() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .returning(|_| Err(UserError::EmailTaken("users_email_key".into())));
        let service = UserService::new(repo);

        let err = service
            .create_user(payload(json!({ "name": "A", "email": "a@b.c" })))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailTaken(_)));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        repo.expect_update_by_id().returning(|_, _| Ok(None));
        repo.expect_delete_by_id().returning(|_| Ok(false));
        let service = UserService::new(repo);

        assert!(matches!(service.get_user(3).await, Err(UserError::NotFound)));
        assert!(matches!(
            service
                .update_user(3, payload(json!({ "name": "B" })))
                .await,
            Err(UserError::NotFound)
        ));
        assert!(matches!(service.delete_user(3).await, Err(UserError::NotFound)));
    }
}
