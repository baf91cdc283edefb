//! Local view state owned by the dashboard controller

use crate::models::{Alert, ComplaintRecord, StatisticsSnapshot, UserRecord};

/// Everything the dashboard has fetched or the admin has typed.
///
/// Statistics, complaints and users are fetched independently; nothing ties
/// them to a common point in time.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub statistics: Option<StatisticsSnapshot>,
    pub recent_complaints: Vec<ComplaintRecord>,
    pub users: Vec<UserRecord>,
    /// True until the first statistics fetch completes
    pub loading: bool,
    pub selection: Selection,
    pub alert: Option<Alert>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            statistics: None,
            recent_complaints: Vec::new(),
            users: Vec::new(),
            loading: true,
            selection: Selection::default(),
            alert: None,
        }
    }
}

/// Transient overlay state. Reset whenever an overlay is closed so a stale
/// target never leaks into the next password reset.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub user_management_open: bool,
    pub password_reset_open: bool,
    pub selected_user: Option<UserRecord>,
    pub password_input: String,
    pub resetting: bool,
}

impl Selection {
    pub fn clear(&mut self) {
        *self = Selection::default();
    }

    /// Close the password reset overlay, keeping the user list open.
    pub fn close_password_reset(&mut self) {
        self.password_reset_open = false;
        self.selected_user = None;
        self.password_input.clear();
        self.resetting = false;
    }
}
