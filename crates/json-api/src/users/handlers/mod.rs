//! User Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use catalog_app::domain::users::records::UserRecord;

pub(crate) mod profile;
pub(crate) mod refresh;
pub(crate) mod register;
pub(crate) mod token;

/// User Response. Never includes the password.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        UserResponse {
            id: user.id.into_i64(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jiff::Timestamp;

    use catalog_app::domain::users::records::{UserId, UserRecord};

    pub(crate) fn make_user(id: i64, username: &str) -> UserRecord {
        UserRecord {
            id: UserId::from_i64(id),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
