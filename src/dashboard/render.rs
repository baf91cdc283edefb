//! Derived view of the dashboard state

use super::state::DashboardState;
use crate::models::*;
use crate::validation::can_submit_password_reset;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use uuid::Uuid;

/// Longest message body shown in the complaint list
pub const MESSAGE_PREVIEW_CHARS: usize = 150;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub loading: bool,
    pub statistics: Option<StatisticsSnapshot>,
    pub recent_complaints: Vec<ComplaintItemView>,
    /// Present when there are no recent complaints
    pub empty_state: Option<EmptyStateView>,
    pub user_management: Option<UserManagementView>,
    pub password_reset: Option<PasswordResetView>,
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplaintItemView {
    pub id: Uuid,
    pub subject: String,
    pub preview: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: ComplaintStatus,
    pub severity: Priority,
    pub age: AgeCategory,
    pub created_at: DateTime<Utc>,
    pub admin_reply: Option<String>,
    pub replied_by_name: Option<String>,
    pub can_resolve: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    OpenUserManagement,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmptyStateView {
    pub message: &'static str,
    pub action: QuickAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserManagementView {
    pub total: usize,
    pub users: Vec<UserRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRowView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub institution: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub email_confirmed: bool,
}

/// The password itself is never echoed back, only its length.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetView {
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub password_length: usize,
    pub resetting: bool,
    pub submit_enabled: bool,
}

/// Shorten `message` to at most `max_chars` characters followed by an
/// ellipsis. Shorter messages are returned as is.
pub fn truncate_message(message: &str, max_chars: usize) -> Cow<'_, str> {
    match message.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &message[..cut], ELLIPSIS)),
        None => Cow::Borrowed(message),
    }
}

fn complaint_item(complaint: &ComplaintRecord) -> ComplaintItemView {
    ComplaintItemView {
        id: complaint.id,
        subject: complaint.subject.clone(),
        preview: truncate_message(&complaint.message, MESSAGE_PREVIEW_CHARS).into_owned(),
        email: complaint.email.clone(),
        phone: complaint.phone.clone(),
        status: complaint.status.clone(),
        severity: complaint.priority(),
        age: complaint.age_category(),
        created_at: complaint.created_at,
        admin_reply: complaint.admin_reply.clone(),
        replied_by_name: complaint.replied_by_name.clone(),
        can_resolve: !complaint.is_resolved(),
    }
}

fn user_row(user: &UserRecord) -> UserRowView {
    UserRowView {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        institution: user.institution.clone(),
        phone: user.phone.clone(),
        created_at: user.created_at,
        last_sign_in_at: user.last_sign_in_at,
        email_confirmed: user.email_confirmed_at.is_some(),
    }
}

/// Render the current state into what the console shows
pub fn render(state: &DashboardState) -> DashboardView {
    let selection = &state.selection;

    let empty_state = state.recent_complaints.is_empty().then_some(EmptyStateView {
        message: "No recent messages",
        action: QuickAction::OpenUserManagement,
    });

    let user_management = selection.user_management_open.then(|| UserManagementView {
        total: state.users.len(),
        users: state.users.iter().map(user_row).collect(),
    });

    let password_reset = selection.password_reset_open.then(|| {
        let user = selection.selected_user.as_ref();
        PasswordResetView {
            user_id: user.map(|u| u.id),
            user_email: user.map(|u| u.email.clone()),
            user_name: user.map(|u| u.name.clone()),
            password_length: selection.password_input.trim().chars().count(),
            resetting: selection.resetting,
            submit_enabled: can_submit_password_reset(selection),
        }
    });

    DashboardView {
        loading: state.loading,
        statistics: state.statistics.clone(),
        recent_complaints: state.recent_complaints.iter().map(complaint_item).collect(),
        empty_state,
        user_management,
        password_reset,
        alert: state.alert.clone(),
    }
}
