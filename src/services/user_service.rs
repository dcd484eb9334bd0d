use crate::models::{
    CreateUserPayload, NewUser, PageRequest, Paginated, User, UserChanges, UserFilter,
};
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::password;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("User not found")]
    UserNotFound,
    #[error("Email already exists")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl UserServiceError {
    fn from_repository(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => UserServiceError::UserNotFound,
            RepositoryError::AlreadyExists => UserServiceError::EmailTaken,
            e => UserServiceError::RepositoryError(e),
        }
    }
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Newest first.
    pub async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>, UserServiceError> {
        Ok(self.repository.list(filter, page).await?)
    }

    /// Rejects an email that is already registered. The check and the insert
    /// are not atomic; the UNIQUE index catches what slips between them.
    pub async fn create_user(&self, payload: CreateUserPayload) -> Result<User, UserServiceError> {
        if self.repository.find_by_email(&payload.email).await?.is_some() {
            return Err(UserServiceError::EmailTaken);
        }

        let password_hash = self.hash_password(&payload.password)?;

        let user = self
            .repository
            .create(NewUser {
                name: payload.name,
                email: payload.email,
                password_hash,
                role: payload.role.unwrap_or_default(),
                is_active: payload.is_active.unwrap_or(true),
            })
            .await
            .map_err(UserServiceError::from_repository)?;

        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<User, UserServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }

    /// Merges `changes` into an already loaded user and persists it.
    ///
    /// The email uniqueness check only runs when the email actually changes.
    pub async fn update_user(
        &self,
        mut user: User,
        mut changes: UserChanges,
    ) -> Result<User, UserServiceError> {
        if let Some(email) = changes.email.as_deref() {
            if email != user.email && self.repository.find_by_email(email).await?.is_some() {
                return Err(UserServiceError::EmailTaken);
            }
        }

        if let Some(password) = changes.password.take() {
            changes.password = Some(self.hash_password(&password)?);
        }

        user.merge(changes);
        let user = self
            .repository
            .update(user)
            .await
            .map_err(UserServiceError::from_repository)?;

        tracing::info!(user_id = user.id, "User updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        self.repository
            .delete(id)
            .await
            .map_err(UserServiceError::from_repository)?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    pub async fn toggle_active(&self, id: i64) -> Result<User, UserServiceError> {
        let mut user = self.get_user(id).await?;
        user.is_active = !user.is_active;

        let user = self
            .repository
            .update(user)
            .await
            .map_err(UserServiceError::from_repository)?;

        tracing::info!(user_id = user.id, is_active = user.is_active, "User active flag toggled");
        Ok(user)
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        password::hash_password(password).map_err(|e| UserServiceError::HashingError(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        password::verify_password(password, password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::repositories::user_repository::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn stored_user(id: i64, email: &str) -> User {
        User {
            id,
            name: "Stored".to_string(),
            email: email.to_string(),
            password: "$argon2id$stored".to_string(),
            role: UserRole::User,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_payload(email: &str) -> CreateUserPayload {
        CreateUserPayload {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            role: None,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .with(eq("alice@example.com"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        mock_repo
            .expect_create()
            .withf(|new_user| {
                new_user.email == "alice@example.com"
                    && new_user.password_hash != "secret1"
                    && new_user.role == UserRole::User
                    && new_user.is_active
            })
            .times(1)
            .returning(|new_user| {
                let mut user = stored_user(1, &new_user.email);
                user.name = new_user.name;
                user.password = new_user.password_hash;
                Box::pin(async move { Ok(user) })
            });

        let service = UserService::new(Arc::new(mock_repo));

        let user = service
            .create_user(create_payload("alice@example.com"))
            .await
            .expect("Expected Ok result");
        assert_eq!(user.email, "alice@example.com");
        assert!(service.verify_password("secret1", &user.password));
    }

    #[tokio::test]
    async fn test_create_user_email_taken() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(|email| {
                let user = stored_user(9, email);
                Box::pin(async move { Ok(Some(user)) })
            });
        mock_repo.expect_create().never();

        let service = UserService::new(Arc::new(mock_repo));

        let result = service.create_user(create_payload("taken@example.com")).await;
        assert!(matches!(result, Err(UserServiceError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_create_user_race_maps_unique_violation() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo
            .expect_create()
            .returning(|_| Box::pin(async move { Err(RepositoryError::AlreadyExists) }));

        let service = UserService::new(Arc::new(mock_repo));

        let result = service.create_user(create_payload("race@example.com")).await;
        assert!(matches!(result, Err(UserServiceError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_update_same_email_skips_uniqueness_check() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo.expect_find_by_email().never();
        mock_repo
            .expect_update()
            .times(1)
            .returning(|user| Box::pin(async move { Ok(user) }));

        let service = UserService::new(Arc::new(mock_repo));

        let changes = UserChanges {
            email: Some("same@example.com".to_string()),
            ..Default::default()
        };
        let user = service
            .update_user(stored_user(1, "same@example.com"), changes)
            .await
            .expect("Expected Ok result");
        assert_eq!(user.email, "same@example.com");
    }

    #[tokio::test]
    async fn test_update_to_foreign_email_conflicts() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .with(eq("other@example.com"))
            .times(1)
            .returning(|email| {
                let user = stored_user(2, email);
                Box::pin(async move { Ok(Some(user)) })
            });
        mock_repo.expect_update().never();

        let service = UserService::new(Arc::new(mock_repo));

        let changes = UserChanges {
            email: Some("other@example.com".to_string()),
            ..Default::default()
        };
        let result = service
            .update_user(stored_user(1, "me@example.com"), changes)
            .await;
        assert!(matches!(result, Err(UserServiceError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_update_hashes_new_password() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_update()
            .withf(|user| user.password.starts_with("$argon2") && user.name == "Stored")
            .times(1)
            .returning(|user| Box::pin(async move { Ok(user) }));

        let service = UserService::new(Arc::new(mock_repo));

        let changes = UserChanges {
            password: Some("newsecret".to_string()),
            ..Default::default()
        };
        let user = service
            .update_user(stored_user(1, "me@example.com"), changes)
            .await
            .expect("Expected Ok result");
        assert!(service.verify_password("newsecret", &user.password));
    }

    #[tokio::test]
    async fn test_toggle_active_missing_user() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_id()
            .with(eq(42))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));
        mock_repo.expect_update().never();

        let service = UserService::new(Arc::new(mock_repo));

        let result = service.toggle_active(42).await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_delete()
            .with(eq(5))
            .times(1)
            .returning(|_| Box::pin(async move { Err(RepositoryError::NotFound) }));

        let service = UserService::new(Arc::new(mock_repo));

        let result = service.delete_user(5).await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }
}
