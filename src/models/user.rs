use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The part of a user that is safe to hand back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Passwords are taken as typed, so only an empty one counts as missing.
fn required_password(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl RegisterRequest {
    /// `None` when any field is missing or blank.
    pub fn into_registration(self) -> Option<Registration> {
        Some(Registration {
            name: required(self.name)?.trim().to_string(),
            email: required(self.email)?.trim().to_string(),
            password: required_password(self.password)?,
        })
    }
}

impl LoginRequest {
    pub fn into_credentials(self) -> Option<Credentials> {
        Some(Credentials {
            email: required(self.email)?.trim().to_string(),
            password: required_password(self.password)?,
        })
    }
}
