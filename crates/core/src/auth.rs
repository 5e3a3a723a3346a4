//! Authentication payloads exchanged with the backend

use crate::records::Hospital;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The authenticated user record returned by login and profile calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Name to greet the user with, falling back to the email address
    pub fn display_name(&self) -> &str {
        if !self.first_name.is_empty() {
            &self.first_name
        } else if !self.full_name.is_empty() {
            &self.full_name
        } else {
            &self.email
        }
    }
}

/// How the user identifies themselves at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    Username(String),
}

impl LoginIdentifier {
    /// Anything containing `@` is treated as an email address
    pub fn parse(raw: &str) -> Self {
        if raw.contains('@') {
            Self::Email(raw.to_string())
        } else {
            Self::Username(raw.to_string())
        }
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
}

impl LoginRequest {
    pub fn new(identifier: LoginIdentifier, password: impl Into<String>) -> Self {
        let (email, username) = match identifier {
            LoginIdentifier::Email(email) => (Some(email), None),
            LoginIdentifier::Username(username) => (None, Some(username)),
        };
        Self {
            email,
            username,
            password: password.into(),
        }
    }
}

/// Successful login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Successful refresh response; only the access token is replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Response of `GET /auth/profile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
}

/// Successful hospital portal login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalLoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
    #[serde(default)]
    pub hospital: Option<Hospital>,
}

/// Response of `GET /hospital-auth/hospital-profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalProfileResponse {
    pub hospital: Hospital,
    #[serde(default)]
    pub user: Option<User>,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
}

impl RegisterData {
    /// Registration with only the required fields set
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: role.into(),
            phone: None,
            date_of_birth: None,
            gender: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
        }
    }
}
