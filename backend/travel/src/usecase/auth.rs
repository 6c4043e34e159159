use uuid::Uuid;

use crate::domain::rating::AverageUpdate;
use crate::domain::user::User;
use crate::usecase::catalog::not_found;
use crate::usecase::contracts::UserRepository;
use crate::usecase::error::UsecaseError;
use crate::usecase::jwt::JwtService;
use crate::usecase::password::{hash_password, is_acceptable, verify_password};
use crate::usecase::reviews::report_missing_targets;

#[derive(Debug)]
pub struct LoginResult {
    pub user: User,
    pub access_token: String,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct AuthUseCase<U>
where
    U: UserRepository,
{
    user_repository: U,
    jwt_service: JwtService,
}

impl<U> AuthUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repository: U, jwt_service: JwtService) -> Self {
        Self {
            user_repository,
            jwt_service,
        }
    }

    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<User, UsecaseError> {
        self.create_user(name, email, password, false).await
    }

    /// Admins may create other admins.
    #[tracing::instrument(skip(self, password), fields(email = %email, is_admin = is_admin))]
    pub async fn create_user(
        &self,
        name: String,
        email: String,
        password: String,
        is_admin: bool,
    ) -> Result<User, UsecaseError> {
        tracing::debug!("creating user");

        if !is_acceptable(&password) {
            return Err(UsecaseError::Validation(
                "Password must be between 8 and 255 characters".to_string(),
            ));
        }

        let email = normalize_email(&email);
        if self.user_repository.find_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "email already registered");
            return Err(UsecaseError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash_password(&password)?;
        let user = User::new(name.trim().to_string(), email, password_hash, is_admin);
        self.user_repository.create(&user).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    #[tracing::instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: String, password: String) -> Result<LoginResult, UsecaseError> {
        tracing::debug!("login attempt");

        let email = normalize_email(&email);
        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            metrics::counter!("logins_total", "outcome" => "unknown_email").increment(1);
            return Err(UsecaseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "wrong password");
            metrics::counter!("logins_total", "outcome" => "wrong_password").increment(1);
            return Err(UsecaseError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let access_token = self
            .jwt_service
            .generate_token(user.id, user.email.clone(), user.is_admin)?;

        metrics::counter!("logins_total", "outcome" => "success").increment(1);
        tracing::info!(user_id = %user.id, "user logged in");
        Ok(LoginResult { user, access_token })
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<User, UsecaseError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("User".to_string()))
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn update_name(&self, user_id: Uuid, name: String) -> Result<User, UsecaseError> {
        let mut user = self.get_profile(user_id).await?;
        user.update_name(name.trim().to_string());
        self.user_repository.update(&user).await?;

        tracing::info!(user_id = %user_id, "name updated");
        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn update_email(&self, user_id: Uuid, email: String) -> Result<User, UsecaseError> {
        let mut user = self.get_profile(user_id).await?;
        let email = normalize_email(&email);

        if email == user.email {
            return Ok(user);
        }
        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(UsecaseError::Conflict("Email is already registered".to_string()));
        }

        user.update_email(email);
        self.user_repository.update(&user).await?;

        tracing::info!(user_id = %user_id, "email updated");
        Ok(user)
    }

    #[tracing::instrument(skip(self, old_password, new_password), fields(user_id = %user_id))]
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: String,
        new_password: String,
    ) -> Result<(), UsecaseError> {
        tracing::debug!("changing password");

        let mut user = self.get_profile(user_id).await?;

        if !verify_password(&old_password, &user.password_hash)? {
            tracing::warn!(user_id = %user_id, "old password mismatch");
            return Err(UsecaseError::Unauthorized("Current password is incorrect".to_string()));
        }
        if !is_acceptable(&new_password) {
            return Err(UsecaseError::Validation(
                "Password must be between 8 and 255 characters".to_string(),
            ));
        }

        user.update_password(hash_password(&new_password)?);
        self.user_repository.update(&user).await?;

        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, UsecaseError> {
        let users = self.user_repository.find_all().await?;
        tracing::debug!(count = users.len(), "users listed");
        Ok(users)
    }

    /// Deletes the account and its reviews. Returns the averages recomputed
    /// for the entities the user had reviewed.
    #[tracing::instrument(skip(self), fields(user_id = %user_id, acting_admin = %acting_admin))]
    pub async fn delete_user(
        &self,
        acting_admin: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<AverageUpdate>, UsecaseError> {
        if acting_admin == user_id {
            return Err(UsecaseError::Validation("Admins cannot delete themselves".to_string()));
        }

        let updates = self
            .user_repository
            .delete(user_id)
            .await
            .map_err(not_found("User"))?;
        report_missing_targets(&updates);

        tracing::info!(user_id = %user_id, recomputed = updates.len(), "user deleted");
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::review::{Rating, ReviewTarget};
    use crate::repository::errors::RepositoryError;
    use crate::usecase::contracts::MockUserRepository;

    fn jwt() -> JwtService {
        JwtService::new("test_secret".to_string(), 60)
    }

    fn stored_user(password: &str) -> User {
        User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            hash_password(password).unwrap(),
            false,
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "ada@example.com")
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .withf(|user| user.email == "ada@example.com" && !user.is_admin)
            .times(1)
            .returning(|_| Ok(()));

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let user = usecase
            .register(
                "Ada".to_string(),
                "  Ada@Example.com ".to_string(),
                "password123".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(user.email, "ada@example.com");
        assert_ne!(user.password_hash, "password123");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("password123"))));
        mock_repo.expect_create().never();

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .register("Ada".to_string(), "ada@example.com".to_string(), "password123".to_string())
            .await;

        assert!(matches!(result, Err(UsecaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let mock_repo = MockUserRepository::new();

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .register("Ada".to_string(), "ada@example.com".to_string(), "short".to_string())
            .await;

        assert!(matches!(result, Err(UsecaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_issues_token_with_admin_flag() {
        let mut mock_repo = MockUserRepository::new();
        let mut user = stored_user("password123");
        user.is_admin = true;
        let user_id = user.id;

        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .login("ada@example.com".to_string(), "password123".to_string())
            .await
            .unwrap();

        let claims = jwt().validate_token(&result.access_token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.is_admin);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user("password123");

        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .login("ada@example.com".to_string(), "wrong_password".to_string())
            .await;

        assert!(matches!(result, Err(UsecaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_email().returning(|_| Ok(None));

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .login("nobody@example.com".to_string(), "password123".to_string())
            .await;

        assert!(result.unwrap_err().to_string().contains("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_change_password_requires_old_password() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user("password123");
        let user_id = user.id;

        mock_repo
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo.expect_update().never();

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .change_password(user_id, "not_it".to_string(), "new_password".to_string())
            .await;

        assert!(matches!(result, Err(UsecaseError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user("password123");
        let user_id = user.id;

        mock_repo
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo
            .expect_update()
            .withf(|user| verify_password("new_password", &user.password_hash).unwrap())
            .times(1)
            .returning(|_| Ok(()));

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase
            .change_password(user_id, "password123".to_string(), "new_password".to_string())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_email_taken() {
        let mut mock_repo = MockUserRepository::new();
        let user = stored_user("password123");
        let user_id = user.id;
        let other = User::new(
            "Bob".to_string(),
            "bob@example.com".to_string(),
            "hash".to_string(),
            false,
        );

        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(other.clone())));
        mock_repo.expect_update().never();

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase.update_email(user_id, "bob@example.com".to_string()).await;

        assert!(matches!(result, Err(UsecaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_delete()
            .returning(|_| Err(RepositoryError::NotFound));

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase.delete_user(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user_returns_recomputed_averages() {
        let mut mock_repo = MockUserRepository::new();
        let user_id = Uuid::new_v4();
        let destination = ReviewTarget::Destination(Uuid::new_v4());
        let activity = ReviewTarget::Activity(Uuid::new_v4());

        // the other user's 1 is all that is left on the destination
        mock_repo
            .expect_delete()
            .with(eq(user_id))
            .times(1)
            .returning(move |_| {
                Ok(vec![
                    AverageUpdate::updated(destination, &[Some(Rating::new(1).unwrap())]),
                    AverageUpdate::updated(activity, &[]),
                ])
            });

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let updates = usecase.delete_user(Uuid::new_v4(), user_id).await.unwrap();

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].target, destination);
        assert_eq!(updates[0].average(), Some(1.0));
        assert_eq!(updates[1].target, activity);
        assert_eq!(updates[1].average(), None);
    }

    #[tokio::test]
    async fn test_delete_user_tolerates_missing_review_target() {
        let mut mock_repo = MockUserRepository::new();
        let gone = ReviewTarget::Accommodation(Uuid::new_v4());
        mock_repo
            .expect_delete()
            .returning(move |_| Ok(vec![AverageUpdate::missing(gone)]));

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let updates = usecase.delete_user(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();

        assert_eq!(updates, vec![AverageUpdate::missing(gone)]);
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let mock_repo = MockUserRepository::new();
        let admin_id = Uuid::new_v4();

        let usecase = AuthUseCase::new(mock_repo, jwt());
        let result = usecase.delete_user(admin_id, admin_id).await;

        assert!(matches!(result, Err(UsecaseError::Validation(_))));
    }
}
