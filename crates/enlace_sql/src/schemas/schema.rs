use chrono::NaiveDateTime;
use enlace_types::FormField;
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Full user record, including the password hash. Never serialized to clients.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub username: String,
    pub role: String,
    pub active: bool,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        UserSummary {
            id: user.id,
            created_at: user.created_at,
            username: user.username,
            role: user.role,
            active: user.active,
        }
    }
}

/// One role/section pair. `section_key` is `None` for a role with no grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RoleGrant {
    pub role: String,
    pub is_admin: bool,
    pub section_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Community {
    pub id: i64,
    pub name: String,
    pub municipality: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Beneficiary {
    pub id: i64,
    pub community_id: i64,
    pub full_name: String,
    pub gender: String,
    pub age: Option<i32>,
    pub program: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Volunteer {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub community_id: Option<i64>,
    pub hours: f64,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub contact_email: Option<String>,
    pub community_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FormTemplate {
    pub uid: String,
    pub name: String,
    pub section_key: String,
    pub fields: Json<Vec<FormField>>,
    pub created_at: NaiveDateTime,
    pub archived_at: Option<NaiveDateTime>,
}

impl FormTemplate {
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}
