//! User Records

use jiff::Timestamp;

use crate::ids::TypedId;

/// User ID
pub type UserId = TypedId<UserRecord>;

/// User Record. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What is needed to check a login attempt.
#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub id: UserId,
    pub password_hash: String,
    pub is_active: bool,
}
