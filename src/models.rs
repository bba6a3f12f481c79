use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two form variants is active on the login page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Login,
    Registration,
}

impl FormMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormMode::Login => "login",
            FormMode::Registration => "registration",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "login" => Some(FormMode::Login),
            "registration" => Some(FormMode::Registration),
            _ => None,
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Ok,
    Error,
}

/// Outcome of the last submission, tagged with the mode it was made under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub status: SubmissionStatus,
    pub mode: FormMode,
}

impl SubmissionResult {
    pub fn is_error(&self) -> bool {
        self.status == SubmissionStatus::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Student,
    Teacher,
    Staff,
    Admin,
}

impl UserType {
    pub const ALL: [UserType; 4] = [
        UserType::Student,
        UserType::Teacher,
        UserType::Staff,
        UserType::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "STUDENT",
            UserType::Teacher => "TEACHER",
            UserType::Staff => "STAFF",
            UserType::Admin => "ADMIN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Student => "Student",
            UserType::Teacher => "Teacher",
            UserType::Staff => "Staff",
            UserType::Admin => "Admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationParams {
    pub institute: String,
    pub branch: String,
    pub username: String,
    pub email: String,
    pub student_name: String,
    pub phone: String,
    pub roll_number: String,
    /// Empty until the visitor picks one of the options
    pub user_type: Option<UserType>,
    pub password: String,
    pub confirm_password: String,
}

/// Field values entered for the active mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CredentialPayload {
    Login(LoginParams),
    Registration(RegistrationParams),
}

impl CredentialPayload {
    pub fn mode(&self) -> FormMode {
        match self {
            CredentialPayload::Login(_) => FormMode::Login,
            CredentialPayload::Registration(_) => FormMode::Registration,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            CredentialPayload::Login(p) => &p.username,
            CredentialPayload::Registration(p) => &p.username,
        }
    }
}

/// Answer of the remote authentication call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub current_authority: Option<String>,
}

impl LoginResult {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}

/// User record handed out by the remote current-user endpoint.
///
/// Only the fields the pages display are typed; everything else is kept in
/// `extra` so the record survives a trip through the session untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionUser {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.userid.as_deref())
            .unwrap_or("user")
    }
}
