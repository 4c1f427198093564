use crate::models::employee::Role;
use serde::{Serialize, Serializer};

/// Login identity; the password hash never leaves the db layer.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Admin,
    Staff,
}

impl ProfileRole {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ProfileRole::Admin => "admin",
            ProfileRole::Staff => "staff",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(ProfileRole::Admin),
            "staff" => Some(ProfileRole::Staff),
            _ => None,
        }
    }
}

/// Application-level account linked to an auth identity.
#[derive(Debug, Clone, Serialize)]
pub struct AppUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub employee_id: Option<i64>,
}

/// Role requested for a new account: an administrator or one of the
/// field roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Field(Role),
}

impl UserRole {
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("admin") {
            return Some(UserRole::Admin);
        }
        Role::from_code(s).map(UserRole::Field)
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Field(r) => r.to_db_str(),
        }
    }

    pub fn profile_role(&self) -> ProfileRole {
        match self {
            UserRole::Admin => ProfileRole::Admin,
            UserRole::Field(_) => ProfileRole::Staff,
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_db_str())
    }
}
