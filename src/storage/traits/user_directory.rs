//! User directory trait.

use crate::Result;
use crate::models::{User, UserId};

/// Looks up users and their display preferences.
pub trait UserDirectory: Send + Sync {
    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails. A missing user is
    /// `Ok(None)`.
    fn user_by_id(&self, id: UserId) -> Result<Option<User>>;
}
