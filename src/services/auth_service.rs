use crate::models::user::User;
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::password;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Returns the user only if the email exists, the password matches the
    /// stored hash and the account is active. Callers cannot tell the three
    /// failure cases apart.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthServiceError> {
        let Some(user) = self.user_repository.find_by_email(email).await? else {
            tracing::warn!("Login rejected: unknown email");
            return Ok(None);
        };

        if !password::verify_password(password, &user.password) {
            tracing::warn!(user_id = user.id, "Login rejected: wrong password");
            return Ok(None);
        }

        if !user.is_active {
            tracing::warn!(user_id = user.id, "Login rejected: account inactive");
            return Ok(None);
        }

        tracing::info!(user_id = user.id, "Login succeeded");
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::repositories::user_repository::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn user_with_password(password: &str, is_active: bool) -> User {
        User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: password::hash_password(password).unwrap(),
            role: UserRole::User,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service_returning(user: Option<User>) -> AuthService {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .with(eq("alice@example.com"))
            .times(1)
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(user) })
            });

        AuthService::new(Arc::new(mock_repo))
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = service_returning(Some(user_with_password("secret1", true)));

        let result = service
            .authenticate("alice@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(result.map(|u| u.id), Some(1));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let service = service_returning(None);

        let result = service
            .authenticate("alice@example.com", "secret1")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = service_returning(Some(user_with_password("secret1", true)));

        let result = service
            .authenticate("alice@example.com", "wrong-password")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_inactive_account() {
        let service = service_returning(Some(user_with_password("secret1", false)));

        let result = service
            .authenticate("alice@example.com", "secret1")
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
