use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::features::listings::schemas::ListingOut;
use crate::features::reservations::schemas::ReservationOut;
use crate::features::users::models::User;
use crate::utilities::visibility::owner_gated;

// -- =====================
// -- IN
// -- =====================
#[derive(Deserialize, Validate, Debug)]
#[serde(deny_unknown_fields)]
pub struct RegisterIn {
    pub name: String,
    pub email: String,
    #[validate(length(min = 8, message = "Password must contain at least 8 characters."))]
    pub password: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct LoginIn {
    pub email: String,
    pub password: String,
}

/// Partial account update. Changing the email requires the current
/// password; changing the password requires the old one.
#[derive(Deserialize, Validate, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UserUpdateIn {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub old_password: Option<String>,
    #[validate(length(min = 8, message = "Password must contain at least 8 characters."))]
    pub new_password: Option<String>,
}

// -- =====================
// -- OUT
// -- =====================
#[derive(Serialize, Debug)]
pub struct TokenOut {
    pub token: String,
}

#[derive(Serialize, Debug)]
pub struct UserOut {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub email: Option<String>,
}

impl UserOut {
    /// The password hash is dropped unconditionally; the email only
    /// survives when the subject reads their own record.
    pub fn redacted(user: User, requester: Option<Uuid>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            avatar: user.avatar,
            bio: user.bio,
            email: owner_gated(user.id, requester, user.email),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ProfileOut {
    #[serde(flatten)]
    pub user: UserOut,
    pub places: Vec<ListingOut>,
    pub reservations: Option<Vec<ReservationOut>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(id: Uuid) -> User {
        User {
            id,
            email: "guest@example.com".to_string(),
            password: "$2b$12$hash".to_string(),
            name: "Guest".to_string(),
            avatar: None,
            bio: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn subject_sees_own_email() {
        let id = Uuid::new_v4();
        let out = UserOut::redacted(sample_user(id), Some(id));
        assert_eq!(out.email.as_deref(), Some("guest@example.com"));
    }

    #[test]
    fn other_requester_sees_no_email() {
        let out = UserOut::redacted(sample_user(Uuid::new_v4()), Some(Uuid::new_v4()));
        assert_eq!(out.email, None);
    }

    #[test]
    fn anonymous_requester_sees_no_email() {
        let out = UserOut::redacted(sample_user(Uuid::new_v4()), None);
        assert_eq!(out.email, None);
    }

    #[test]
    fn password_is_never_serialized() {
        let id = Uuid::new_v4();
        let out = UserOut::redacted(sample_user(id), Some(id));
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("password").is_none());
    }
}
