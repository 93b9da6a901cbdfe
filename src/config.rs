//! Configuration for PDF encryption.

use crate::encryption::PERMISSIONS;

/// Password configuration for one encryption call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptionConfig {
    /// Password required to open the document.
    pub user_password: String,

    /// Password for full access. Falls back to the user password when unset.
    pub owner_password: Option<String>,
}

impl EncryptionConfig {
    /// Create a new configuration with the given user password.
    pub fn new(user_password: impl Into<String>) -> Self {
        Self {
            user_password: user_password.into(),
            owner_password: None,
        }
    }

    /// Set a distinct owner password.
    pub fn with_owner_password(mut self, owner_password: impl Into<String>) -> Self {
        self.owner_password = Some(owner_password.into());
        self
    }

    /// Set or clear the owner password.
    pub fn with_optional_owner_password(mut self, owner_password: Option<String>) -> Self {
        self.owner_password = owner_password;
        self
    }

    /// The owner password actually used for the O value.
    pub fn owner_password(&self) -> &str {
        self.owner_password
            .as_deref()
            .unwrap_or(&self.user_password)
    }

    /// Permission bits written to /P.
    pub fn permissions(&self) -> i32 {
        PERMISSIONS
    }
}
