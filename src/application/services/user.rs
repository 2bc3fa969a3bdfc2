//! User management and authentication

use std::sync::Arc;

use tracing::info;

use crate::domain::user::{NewUser, User, UserFilter};
use crate::domain::{DomainError, DomainResult, Store};
use crate::infrastructure::crypto::{create_token, hash_password, verify_password, JwtConfig};
use crate::shared::{Page, PageRequest};

/// Returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct UserService {
    store: Arc<dyn Store>,
    jwt_config: JwtConfig,
}

fn hash(password: &str) -> DomainResult<String> {
    hash_password(password)
        .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, jwt_config: JwtConfig) -> Self {
        Self { store, jwt_config }
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.store.users().find_by_email(email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(user.id, &user.email, &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        info!(user_id = user.id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a user. An inactive account with the same email is
    /// reactivated with the new name and password.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> DomainResult<User> {
        let uow = self.store.begin().await?;
        let password_hash = hash(password)?;

        let user = match uow.users().find_by_email(email).await? {
            Some(existing) if existing.is_active => {
                return Err(DomainError::Conflict(format!(
                    "User with email = {} already exists",
                    email
                )));
            }
            Some(mut inactive) => {
                inactive.name = name.to_string();
                inactive.password_hash = password_hash;
                inactive.is_active = true;
                let user = uow.users().update(inactive).await?;
                info!(user_id = user.id, "User reactivated");
                user
            }
            None => {
                let user = uow
                    .users()
                    .insert(NewUser {
                        name: name.to_string(),
                        email: email.to_string(),
                        password_hash,
                    })
                    .await?;
                info!(user_id = user.id, email = %user.email, "New user registered");
                user
            }
        };

        uow.commit().await?;
        Ok(user)
    }

    /// Create the configured admin account when no user exists yet.
    pub async fn ensure_default_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        if self.store.users().count().await? > 0 {
            return Ok(None);
        }
        let user = self.register(name, email, password).await?;
        info!(email = %user.email, "Default admin account created");
        Ok(Some(user))
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list(&self, filter: &UserFilter, page: PageRequest) -> DomainResult<Page<User>> {
        self.store.users().list(filter, page).await
    }

    /// Active user by id. Soft-deleted users are reported as not found.
    pub async fn get(&self, id: i64) -> DomainResult<User> {
        match self.store.users().find_by_id(id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(DomainError::not_found("User", "id", id)),
        }
    }

    // ── Mutations ───────────────────────────────────────────────

    pub async fn update(&self, id: i64, changes: UserUpdate) -> DomainResult<User> {
        let uow = self.store.begin().await?;
        let mut user = match uow.users().find_by_id(id).await? {
            Some(user) if user.is_active => user,
            _ => return Err(DomainError::not_found("User", "id", id)),
        };

        if let Some(email) = changes.email {
            if email != user.email {
                if uow.users().find_by_email(&email).await?.is_some() {
                    return Err(DomainError::Conflict(format!(
                        "User with email = {} already exists",
                        email
                    )));
                }
                user.email = email;
            }
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(password) = changes.password {
            user.password_hash = hash(&password)?;
        }

        let user = uow.users().update(user).await?;
        uow.commit().await?;
        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Soft delete: the account is deactivated, not removed.
    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        let uow = self.store.begin().await?;
        let mut user = match uow.users().find_by_id(id).await? {
            Some(user) if user.is_active => user,
            _ => return Err(DomainError::not_found("User", "id", id)),
        };
        user.is_active = false;
        uow.users().update(user).await?;
        uow.commit().await?;
        info!(user_id = id, "User deactivated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryStore::new()), JwtConfig::new("test", 1))
    }

    #[tokio::test]
    async fn register_then_login() {
        let svc = service();
        let user = svc.register("Admin", "admin@example.com", "secret123").await.unwrap();
        assert!(user.is_active);

        let auth = svc.login("admin@example.com", "secret123").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.user.id, user.id);

        let err = svc.login("admin@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn duplicate_active_email_conflicts() {
        let svc = service();
        svc.register("A", "a@example.com", "secret123").await.unwrap();
        let err = svc.register("B", "a@example.com", "secret123").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleted_user_is_hidden_and_can_register_again() {
        let svc = service();
        let user = svc.register("A", "a@example.com", "secret123").await.unwrap();
        svc.delete(user.id).await.unwrap();

        assert!(matches!(
            svc.get(user.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            svc.login("a@example.com", "secret123").await.unwrap_err(),
            DomainError::Unauthorized(_)
        ));

        let again = svc.register("A2", "a@example.com", "newsecret").await.unwrap();
        assert_eq!(again.id, user.id);
        assert_eq!(again.name, "A2");
        assert!(svc.login("a@example.com", "newsecret").await.is_ok());
    }

    #[tokio::test]
    async fn default_admin_only_when_empty() {
        let svc = service();
        let created = svc
            .ensure_default_admin("Admin", "admin@example.com", "admin123")
            .await
            .unwrap();
        assert!(created.is_some());
        let second = svc
            .ensure_default_admin("Admin", "other@example.com", "admin123")
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn update_rejects_taken_email() {
        let svc = service();
        svc.register("A", "a@example.com", "secret123").await.unwrap();
        let b = svc.register("B", "b@example.com", "secret123").await.unwrap();
        let err = svc
            .update(
                b.id,
                UserUpdate {
                    email: Some("a@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let renamed = svc
            .update(
                b.id,
                UserUpdate {
                    name: Some("Bee".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Bee");
    }
}
