//! Authentication collaborator contract.
//!
//! The concrete provider (hosted auth service) lives outside this
//! workspace; the core only needs sign-in, current-user/role lookup, and
//! sign-out. The upload pipeline uses it to stamp `uploaded_by` on photo
//! metadata.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Staff role, as assigned by the auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Inspector,
    Viewer,
}

/// Identity of the signed-in staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct UserIdentity {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Auth backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;

    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserIdentity>;

    async fn sign_out(&self);
}

/// Provider backed by a single fixed identity, for tests and headless runs.
pub struct FixedAuth {
    identity: UserIdentity,
    signed_in: Mutex<bool>,
}

impl FixedAuth {
    /// Create a provider that is already signed in as `identity`.
    pub fn signed_in(identity: UserIdentity) -> Self {
        FixedAuth {
            identity,
            signed_in: Mutex::new(true),
        }
    }

    /// Create a signed-out provider for `identity`.
    pub fn signed_out(identity: UserIdentity) -> Self {
        FixedAuth {
            identity,
            signed_in: Mutex::new(false),
        }
    }
}

#[async_trait]
impl AuthProvider for FixedAuth {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<UserIdentity, AuthError> {
        if email != self.identity.email {
            return Err(AuthError::InvalidCredentials);
        }
        *self.signed_in.lock().expect("auth state lock") = true;
        Ok(self.identity.clone())
    }

    fn current_user(&self) -> Option<UserIdentity> {
        if *self.signed_in.lock().expect("auth state lock") {
            Some(self.identity.clone())
        } else {
            None
        }
    }

    async fn sign_out(&self) {
        *self.signed_in.lock().expect("auth state lock") = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspector() -> UserIdentity {
        UserIdentity {
            email: "inspector@example.gov".to_string(),
            role: Role::Inspector,
        }
    }

    #[tokio::test]
    async fn test_fixed_auth_lifecycle() {
        let auth = FixedAuth::signed_out(inspector());
        assert!(auth.current_user().is_none());

        let user = auth
            .sign_in("inspector@example.gov", "secret")
            .await
            .unwrap();
        assert_eq!(user.role, Role::Inspector);
        assert_eq!(auth.current_user(), Some(inspector()));

        auth.sign_out().await;
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_fixed_auth_rejects_unknown_email() {
        let auth = FixedAuth::signed_out(inspector());
        let result = auth.sign_in("other@example.gov", "secret").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
