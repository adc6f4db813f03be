//! Creator records and the lookup capability used to resolve them.
//!
//! User management lives outside this crate. Posts only need an id and a
//! display name, and repositories only need `get_user`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a user in the external user store.
pub type UserId = i64;

/// Minimal creator record as seen by the blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Resolves a stored creator id to a user record.
pub trait UserLookup {
    /// Returns `None` when no user exists for `id`.
    fn get_user(&self, id: UserId) -> Option<User>;
}

impl UserLookup for HashMap<UserId, User> {
    fn get_user(&self, id: UserId) -> Option<User> {
        self.get(&id).cloned()
    }
}

impl<T: UserLookup + ?Sized> UserLookup for &T {
    fn get_user(&self, id: UserId) -> Option<User> {
        (**self).get_user(id)
    }
}
