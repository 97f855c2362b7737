//! Signed-in identity.

use crate::AuthError;
use serde::{Deserialize, Serialize};
use washly_commerce::checkout::CustomerRef;
use washly_commerce::ids::UserId;

/// The user the auth collaborator reports as signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Identity {
    /// Create a new identity.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Identity for an email-only sign-in: the id is derived from the
    /// lowercased address and the name from its local part.
    pub fn from_email(email: &str) -> Result<Self, AuthError> {
        let email = email.trim().to_lowercase();
        let (local, _) = email
            .split_once('@')
            .ok_or_else(|| AuthError::InvalidIdentity(format!("{:?} is not an email", email)))?;
        let identity = Self::new(format!("user:{}", email), local, email.clone());
        identity.validate()?;
        Ok(identity)
    }

    /// Get display name, falling back to the email.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }

    /// Reject identities without an id or with a malformed email.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.id.as_str().trim().is_empty() {
            return Err(AuthError::InvalidIdentity("missing id".to_string()));
        }
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(AuthError::InvalidIdentity(format!(
                "{:?} is not an email",
                self.email
            ))),
        }
    }
}

impl From<&Identity> for CustomerRef {
    fn from(identity: &Identity) -> Self {
        CustomerRef {
            id: identity.id.clone(),
            name: identity.display_name().to_string(),
            email: identity.email.clone(),
            phone: identity.phone.clone(),
        }
    }
}
