//! Form parsing and required-field rules for the two credential payloads.

use crate::{
    api::ApiError,
    models::{CredentialPayload, FormMode, LoginParams, RegistrationParams, UserType},
};
use std::collections::HashMap;

/// A field that must be filled before the form can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire and HTML form name
    pub name: &'static str,
    pub label: &'static str,
    pub required_message: &'static str,
}

const fn field(
    name: &'static str,
    label: &'static str,
    required_message: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required_message,
    }
}

pub const LOGIN_FIELDS: &[FieldSpec] = &[
    field("username", "Username", "Please enter your username!"),
    field("password", "Password", "Please enter your password!"),
];

pub const REGISTRATION_FIELDS: &[FieldSpec] = &[
    field("institute", "Institute", "Please enter your institute!"),
    field("branch", "Branch", "Please enter your branch!"),
    field("username", "Username", "Please choose a username!"),
    field("email", "Email", "Please enter your email!"),
    field("studentName", "Full Name", "Please enter your full name!"),
    field("phone", "Phone", "Please enter your phone number!"),
    field("rollNumber", "Roll / ID Number", "Please enter your roll or ID number!"),
    field("userType", "User Type", "Please select a user type!"),
    field("password", "Password", "Please choose a password!"),
    field("confirmPassword", "Confirm Password", "Please confirm your password!"),
];

/// Build the payload for `mode` out of raw form fields.
///
/// Fields belonging to the other mode are ignored. Values are taken as typed,
/// except that surrounding whitespace is trimmed from everything but passwords.
pub fn parse_form(mode: FormMode, fields: &HashMap<String, String>) -> CredentialPayload {
    let text = |name: &str| {
        fields
            .get(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };
    let secret = |name: &str| fields.get(name).cloned().unwrap_or_default();

    match mode {
        FormMode::Login => CredentialPayload::Login(LoginParams {
            username: text("username"),
            password: secret("password"),
        }),
        FormMode::Registration => CredentialPayload::Registration(RegistrationParams {
            institute: text("institute"),
            branch: text("branch"),
            username: text("username"),
            email: text("email"),
            student_name: text("studentName"),
            phone: text("phone"),
            roll_number: text("rollNumber"),
            user_type: UserType::parse(&text("userType")),
            password: secret("password"),
            confirm_password: secret("confirmPassword"),
        }),
    }
}

/// Names of required fields left empty, in form order.
pub fn missing_fields(payload: &CredentialPayload) -> Vec<&'static str> {
    let present: Vec<(&'static str, bool)> = match payload {
        CredentialPayload::Login(p) => vec![
            ("username", !p.username.trim().is_empty()),
            ("password", !p.password.trim().is_empty()),
        ],
        CredentialPayload::Registration(p) => vec![
            ("institute", !p.institute.trim().is_empty()),
            ("branch", !p.branch.trim().is_empty()),
            ("username", !p.username.trim().is_empty()),
            ("email", !p.email.trim().is_empty()),
            ("studentName", !p.student_name.trim().is_empty()),
            ("phone", !p.phone.trim().is_empty()),
            ("rollNumber", !p.roll_number.trim().is_empty()),
            ("userType", p.user_type.is_some()),
            ("password", !p.password.trim().is_empty()),
            ("confirmPassword", !p.confirm_password.trim().is_empty()),
        ],
    };

    present
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect()
}

/// JSON body for the authentication call: the payload fields plus `type`.
pub fn request_body(payload: &CredentialPayload) -> Result<serde_json::Value, ApiError> {
    let mut body = serde_json::to_value(payload)?;
    let serde_json::Value::Object(map) = &mut body else {
        return Err(ApiError::InvalidRequest(serde::ser::Error::custom(
            "credential payload did not encode as an object",
        )));
    };
    map.insert(
        "type".to_string(),
        serde_json::Value::String(payload.mode().as_str().to_string()),
    );
    Ok(body)
}

/// Values safe to echo back into the form on re-render. Passwords are dropped.
pub fn echo_values(payload: &CredentialPayload) -> HashMap<&'static str, String> {
    let mut values = HashMap::new();
    match payload {
        CredentialPayload::Login(p) => {
            values.insert("username", p.username.clone());
        }
        CredentialPayload::Registration(p) => {
            values.insert("institute", p.institute.clone());
            values.insert("branch", p.branch.clone());
            values.insert("username", p.username.clone());
            values.insert("email", p.email.clone());
            values.insert("studentName", p.student_name.clone());
            values.insert("phone", p.phone.clone());
            values.insert("rollNumber", p.roll_number.clone());
            if let Some(user_type) = p.user_type {
                values.insert("userType", user_type.as_str().to_string());
            }
        }
    }
    values
}
