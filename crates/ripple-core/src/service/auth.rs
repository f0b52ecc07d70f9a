//! Registration and login.

use std::sync::Arc;

use crate::domain::{SessionIdentity, User};
use crate::error::DomainError;
use crate::ports::{PasswordService, UserRepository};

/// Auth service - validates credentials and establishes session identities.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Register a new user. Uniqueness is checked up front; the storage
    /// unique constraints remain the backstop for concurrent registrations.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "All fields are required".to_string(),
            ));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::DuplicateUsername);
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::DuplicateEmail);
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(username.to_owned(), email.to_owned(), password_hash);
        Ok(self.users.insert(user).await?)
    }

    /// Authenticate a user. Unknown username and wrong password produce the
    /// same error so callers cannot enumerate accounts.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionIdentity, DomainError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            return Err(DomainError::InvalidCredentials);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        Ok(SessionIdentity::new(user.id, user.username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testutil::{InMemoryUsers, PlainPasswords};

    fn service() -> (AuthService, Arc<InMemoryUsers>) {
        let users = Arc::new(InMemoryUsers::default());
        let service = AuthService::new(users.clone(), Arc::new(PlainPasswords));
        (service, users)
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let (auth, _) = service();

        auth.register("alice", "alice@x.com", "pw123").await.unwrap();
        let identity = auth.login("alice", "pw123").await.unwrap();

        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn register_rejects_empty_fields() {
        let (auth, users) = service();

        for (u, e, p) in [("", "a@x.com", "pw"), ("a", "", "pw"), ("a", "a@x.com", "")] {
            let err = auth.register(u, e, p).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
        assert_eq!(users.len(), 0);
    }

    #[tokio::test]
    async fn register_does_not_store_plaintext() {
        let (auth, _) = service();

        let user = auth.register("bob", "bob@x.com", "hunter2").await.unwrap();

        assert_ne!(user.password_hash, "hunter2");
    }

    #[tokio::test]
    async fn duplicate_username_rejected_without_new_row() {
        let (auth, users) = service();
        auth.register("alice", "alice@x.com", "pw").await.unwrap();

        let err = auth.register("alice", "other@x.com", "pw").await.unwrap_err();

        assert!(matches!(err, DomainError::DuplicateUsername));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_rejected_without_new_row() {
        let (auth, users) = service();
        auth.register("alice", "alice@x.com", "pw").await.unwrap();

        let err = auth.register("bob", "alice@x.com", "pw").await.unwrap_err();

        assert!(matches!(err, DomainError::DuplicateEmail));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn bad_credentials_are_indistinguishable() {
        let (auth, _) = service();
        auth.register("alice", "alice@x.com", "pw123").await.unwrap();

        let unknown_user = auth.login("mallory", "pw123").await.unwrap_err();
        let wrong_password = auth.login("alice", "nope").await.unwrap_err();

        assert!(matches!(unknown_user, DomainError::InvalidCredentials));
        assert!(matches!(wrong_password, DomainError::InvalidCredentials));
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    }
}
