//! Data models for the dashboard

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Complaint lifecycle state. Unknown values from the backend are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComplaintStatus {
    Pending,
    Resolved,
    Other(String),
}

impl From<String> for ComplaintStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => ComplaintStatus::Pending,
            "resolved" => ComplaintStatus::Resolved,
            _ => ComplaintStatus::Other(value),
        }
    }
}

impl From<ComplaintStatus> for String {
    fn from(status: ComplaintStatus) -> Self {
        match status {
            ComplaintStatus::Pending => "pending".to_string(),
            ComplaintStatus::Resolved => "resolved".to_string(),
            ComplaintStatus::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    /// Classify a raw priority label; anything unrecognised is `Normal`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("urgent") => Priority::Urgent,
            Some("high") => Priority::High,
            Some("low") => Priority::Low,
            _ => Priority::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    New,
    Recent,
    Older,
}

impl AgeCategory {
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("new") => AgeCategory::New,
            Some("recent") => AgeCategory::Recent,
            _ => AgeCategory::Older,
        }
    }
}

// =============================================================================
// Statistics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total_users: i64,
    pub total_complaints: i64,
    pub pending_complaints: i64,
    pub resolved_complaints: i64,
    pub last_updated: DateTime<Utc>,
}

// =============================================================================
// Complaint
// =============================================================================

/// A row of `admin_complaints_view`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub id: Uuid,
    pub subject: String,
    pub message: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub priority: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub admin_reply: Option<String>,
    #[serde(default)]
    pub replied_by_name: Option<String>,
    #[serde(default)]
    pub age_category: Option<String>,
}

impl ComplaintRecord {
    pub fn priority(&self) -> Priority {
        Priority::from_label(self.priority.as_deref())
    }

    pub fn age_category(&self) -> AgeCategory {
        AgeCategory::from_label(self.age_category.as_deref())
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ComplaintStatus::Resolved
    }
}

/// Partial update sent to the `complaints` table when resolving.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveComplaint {
    pub status: ComplaintStatus,
    pub replied_at: DateTime<Utc>,
    pub replied_by: Uuid,
    pub admin_reply: String,
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Password Reset
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordResetRequest {
    pub target_user_id: Uuid,
    pub new_password: String,
    pub admin_id: Uuid,
}

/// Result body of `reset_user_password`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordResetOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// Admin Identity
// =============================================================================

/// The acting admin. The access token is an opaque credential the backend
/// checks on every call; it is never logged or serialized.
pub struct AdminIdentity {
    pub id: Uuid,
    access_token: SecretString,
}

impl AdminIdentity {
    pub fn new(id: Uuid, access_token: impl Into<String>) -> Self {
        Self {
            id,
            access_token: SecretString::from(access_token.into()),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }
}

impl std::fmt::Debug for AdminIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminIdentity")
            .field("id", &self.id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// User returned by the auth endpoint when verifying an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Alerts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Success,
    Error,
}

/// Blocking confirmation shown to the admin until dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Console Requests
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SelectResetTarget {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordInput {
    pub password: String,
}

// =============================================================================
// API Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
