use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{LoginRequest, RegisterRequest};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+$").expect("email pattern is valid"));
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").expect("name pattern is valid"));

pub const MIN_PASSWORD_LEN: usize = 6;

/// Field name to the message shown under that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub BTreeMap<String, String>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let message = errs.first()?.message.as_ref()?.to_string();
                Some((field.to_string(), message))
            })
            .collect();
        FormErrors(fields)
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(field_error("required", "Email is required"));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(field_error("pattern", "Invalid email address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(field_error("required", "Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(field_error(
            "min_length",
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(field_error("required", "Name is required"));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(field_error("pattern", "Invalid name"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Inline field errors, empty when the form may be submitted.
    pub fn errors(&self) -> FormErrors {
        self.validate().map_or_else(FormErrors::from, |()| FormErrors::default())
    }

    pub(crate) fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: Some(self.email.clone()),
            password: Some(self.password.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

impl RegisterForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn errors(&self) -> FormErrors {
        self.validate().map_or_else(FormErrors::from, |()| FormErrors::default())
    }

    pub(crate) fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            password: Some(self.password.clone()),
        }
    }
}
