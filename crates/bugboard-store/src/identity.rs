//! Identity provider seam.
//!
//! The store only ever sees a [`User`]; how that user was authenticated is
//! the provider's business. [`MockIdentityProvider`] reproduces the demo
//! sign-in of the browser front end: accounts are matched by email and the
//! password is not checked.

use crate::user::{Role, User};

/// Prefix of generated user IDs.
pub const USER_ID_PREFIX: &str = "USR-";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("email already registered: {0}")]
    DuplicateEmail(String),
}

/// Issues identities from credentials.
pub trait IdentityProvider {
    /// The user for these credentials, if any.
    fn login(&self, email: &str, password: &str) -> Option<User>;

    /// Create an account and return the new identity.
    fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, IdentityError>;

    /// Lookup one user by ID.
    fn user(&self, id: &str) -> Option<&User>;

    /// All known users, in registration order.
    fn users(&self) -> &[User];
}

/// In-memory accounts with email-only sign-in.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    users: Vec<User>,
}

impl MockIdentityProvider {
    pub fn from_users(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Provider pre-loaded with one admin, one developer and one tester.
    pub fn with_demo_users() -> Self {
        Self::from_users(crate::seed::demo_users())
    }

    /// Case-insensitive email lookup.
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
    }

    fn next_user_id(&self) -> String {
        let mut seq = self.users.len() + 1;
        loop {
            let candidate = format!("{USER_ID_PREFIX}{seq}");
            if self.user(&candidate).is_none() {
                return candidate;
            }
            seq += 1;
        }
    }
}

impl IdentityProvider for MockIdentityProvider {
    fn login(&self, email: &str, _password: &str) -> Option<User> {
        let user = self.find_by_email(email).cloned();
        match &user {
            Some(found) => tracing::info!(user = %found.id, role = %found.role, "signed in"),
            None => tracing::debug!(email, "unknown account"),
        }
        user
    }

    fn register(
        &mut self,
        name: &str,
        email: &str,
        _password: &str,
        role: Role,
    ) -> Result<User, IdentityError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(IdentityError::InvalidInput("name is required".to_string()));
        }
        if email.is_empty() {
            return Err(IdentityError::InvalidInput("email is required".to_string()));
        }
        if self.find_by_email(email).is_some() {
            return Err(IdentityError::DuplicateEmail(email.to_string()));
        }

        let user = User::new(self.next_user_id(), name, email, role);
        tracing::info!(user = %user.id, %role, "user registered");
        self.users.push(user.clone());
        Ok(user)
    }

    fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    fn users(&self) -> &[User] {
        &self.users
    }
}
