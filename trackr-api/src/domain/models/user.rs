use serde::{Deserialize, Serialize};
use timesheet::Role;

use super::UserId;

/// A user profile as stored by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub is_admin: bool,
}

impl User {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            is_admin: false,
        }
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

/// The authenticated caller of a service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub email: String,
    pub is_admin: bool,
}

impl Actor {
    /// The role this actor plays on a timesheet owned by `owner`.
    ///
    /// Owners always act as employees on their own sheets, even when they are
    /// admins. Returns `None` when the actor has no business with the sheet.
    pub fn role_for(&self, owner: &UserId) -> Option<Role> {
        if &self.user_id == owner {
            Some(Role::Employee)
        } else if self.is_admin {
            Some(Role::Admin)
        } else {
            None
        }
    }
}

impl From<User> for Actor {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_relative_to_owner() {
        let admin: Actor = User::new("a1", "boss@example.com").with_admin(true).into();
        let employee: Actor = User::new("e1", "dev@example.com").into();

        assert_eq!(admin.role_for(&UserId::new("a1")), Some(Role::Employee));
        assert_eq!(admin.role_for(&UserId::new("e1")), Some(Role::Admin));
        assert_eq!(employee.role_for(&UserId::new("e1")), Some(Role::Employee));
        assert_eq!(employee.role_for(&UserId::new("a1")), None);
    }
}
