use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An authentication identity. `password_hash` is absent for identities
/// provisioned by invitation, which cannot sign in with a password.
#[derive(Debug, Clone, FromRow)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
}

/// The public shape of an identity; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

impl From<AuthUser> for User {
    fn from(row: AuthUser) -> Self {
        User {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthSession {
    pub token: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_drops_password_hash() {
        let identity = AuthUser {
            id: Uuid::new_v4(),
            email: "jane@example.com".into(),
            password_hash: Some("$2b$04$hash".into()),
            full_name: Some("Jane".into()),
        };
        let user = User::from(identity.clone());
        assert_eq!(user.id, identity.id);
        assert_eq!(user.full_name.as_deref(), Some("Jane"));
        assert!(!serde_json::to_string(&user).unwrap().contains("hash"));
    }
}
