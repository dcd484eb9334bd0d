use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 2] = [UserRole::User, UserRole::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string. Never leaves the process.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Overwrite only the fields present in `changes`.
    ///
    /// `changes.password` must already be hashed by the caller.
    pub fn merge(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(password) = changes.password {
            self.password = password;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
    }
}

/// Row to insert. The password is stored as given, so hash it first.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
}

// Validated request payloads

#[derive(Debug, Clone, PartialEq)]
pub struct CreateUserPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    /// Substring matched against name or email.
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Reduced projection returned by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            is_active: user.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "$argon2id$hash".to_string(),
            role: UserRole::User,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn merge_keeps_omitted_fields() {
        let mut user = sample_user();
        user.merge(UserChanges {
            name: Some("Alicia".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name, "Alicia");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.password, "$argon2id$hash");
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);
    }

    #[test]
    fn merge_applies_every_provided_field() {
        let mut user = sample_user();
        user.merge(UserChanges {
            name: Some("Bob".to_string()),
            email: Some("bob@example.com".to_string()),
            password: Some("$argon2id$other".to_string()),
            role: Some(UserRole::Admin),
            is_active: Some(false),
        });

        assert_eq!(user.name, "Bob");
        assert_eq!(user.email, "bob@example.com");
        assert_eq!(user.password, "$argon2id$other");
        assert_eq!(user.role, UserRole::Admin);
        assert!(!user.is_active);
    }

    #[test]
    fn password_is_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["is_active"], true);
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn profile_uses_camel_case_active_flag() {
        let json = serde_json::to_value(UserProfile::from(&sample_user())).unwrap();
        assert_eq!(json["isActive"], true);
        assert!(json.get("password").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn role_parse_round_trips_known_values() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("user"), Some(UserRole::User));
        assert_eq!(UserRole::parse("root"), None);
    }
}
