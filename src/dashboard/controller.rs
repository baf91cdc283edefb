//! Dashboard view controller
//!
//! Owns the fetched state and the refresh cadence, and dispatches the admin
//! actions (resolving complaints, resetting passwords). Read failures are
//! logged and leave the last known state in place; mutation failures surface
//! as an [`Alert`].

use super::refresh::RefreshTask;
use super::render::{render, DashboardView};
use super::state::DashboardState;
use crate::backend::Backend;
use crate::models::*;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Reply stored on a complaint resolved from the dashboard
pub const RESOLVED_REPLY: &str =
    "Your message has been reviewed and marked as resolved by the support team.";

/// Shown when the backend rejects a reset without saying why
pub const RESET_FALLBACK_MESSAGE: &str = "Failed to reset password";

/// Shown when the reset request never got an answer
pub const RESET_TRANSPORT_MESSAGE: &str = "An error occurred while resetting the password";

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub refresh_interval: Duration,
    pub recent_complaints_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            recent_complaints_limit: 5,
        }
    }
}

pub struct DashboardController<B: Backend> {
    backend: Arc<B>,
    admin_id: Uuid,
    options: DashboardOptions,
    state: RwLock<DashboardState>,
    /// Set on unmount; responses arriving afterwards are dropped
    detached: AtomicBool,
    refresh: Mutex<Option<RefreshTask>>,
}

impl<B: Backend> DashboardController<B> {
    pub fn new(backend: Arc<B>, admin_id: Uuid, options: DashboardOptions) -> Self {
        Self {
            backend,
            admin_id,
            options,
            state: RwLock::new(DashboardState::default()),
            detached: AtomicBool::new(false),
            refresh: Mutex::new(None),
        }
    }

    fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Fetch everything once and start the periodic refresh of statistics and
    /// recent complaints.
    pub async fn mount(self: &Arc<Self>) {
        self.detached.store(false, Ordering::SeqCst);

        // The task is owned by the controller, so it only holds a weak handle.
        let controller = Arc::downgrade(self);
        let task = RefreshTask::spawn(self.options.refresh_interval, move || {
            let controller = controller.upgrade();
            async move {
                let Some(controller) = controller else {
                    tracing::debug!("Dashboard dropped, skipping refresh");
                    return;
                };
                tokio::join!(
                    controller.load_statistics(),
                    controller.load_recent_complaints()
                );
            }
        });

        let previous = self
            .refresh
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(task);
        if let Some(previous) = previous {
            previous.cancel().await;
        }

        tracing::info!(
            "Dashboard mounted for admin {} (refresh every {:?})",
            self.admin_id,
            self.options.refresh_interval
        );

        tokio::join!(
            self.load_statistics(),
            self.load_recent_complaints(),
            self.load_all_users()
        );
    }

    /// Stop the refresh timer. Requests still in flight complete, but their
    /// results are discarded.
    pub async fn unmount(&self) {
        self.detached.store(true, Ordering::SeqCst);
        let task = self
            .refresh
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = task {
            task.cancel().await;
        }
        tracing::info!("Dashboard unmounted");
    }

    // =========================================================================
    // Fetches
    // =========================================================================

    pub async fn load_statistics(&self) {
        let result = self.backend.current_statistics().await;
        if self.is_detached() {
            tracing::debug!("Discarding statistics for unmounted dashboard");
            return;
        }

        let mut state = self.state.write().await;
        match result {
            Ok(snapshots) => match snapshots.into_iter().next() {
                Some(snapshot) => state.statistics = Some(snapshot),
                None => tracing::debug!("Backend returned no statistics snapshot"),
            },
            Err(e) => tracing::warn!("Failed to load statistics: {}", e),
        }

        if state.loading {
            state.loading = false;
        }
    }

    pub async fn load_recent_complaints(&self) {
        let result = self
            .backend
            .recent_complaints(self.options.recent_complaints_limit)
            .await;
        if self.is_detached() {
            tracing::debug!("Discarding complaints for unmounted dashboard");
            return;
        }

        match result {
            Ok(complaints) => self.state.write().await.recent_complaints = complaints,
            Err(e) => tracing::warn!("Failed to load recent complaints: {}", e),
        }
    }

    pub async fn load_all_users(&self) {
        let result = self.backend.all_users_for_admin(self.admin_id).await;
        if self.is_detached() {
            tracing::debug!("Discarding user list for unmounted dashboard");
            return;
        }

        match result {
            Ok(users) => self.state.write().await.users = users,
            Err(e) => tracing::warn!("Failed to load users: {}", e),
        }
    }

    // =========================================================================
    // Admin Actions
    // =========================================================================

    pub async fn mark_complaint_resolved(&self, id: Uuid) {
        let update = ResolveComplaint {
            status: ComplaintStatus::Resolved,
            replied_at: Utc::now(),
            replied_by: self.admin_id,
            admin_reply: RESOLVED_REPLY.to_string(),
        };

        match self.backend.resolve_complaint(id, update).await {
            Ok(()) => {
                tracing::info!("Admin {} resolved complaint {}", self.admin_id, id);
                self.load_recent_complaints().await;
                self.raise(Alert::success("Success", "Complaint marked as resolved"))
                    .await;
            }
            Err(e) => {
                tracing::error!("Failed to resolve complaint {}: {}", id, e);
                self.raise(Alert::error("Error", "Failed to update complaint"))
                    .await;
            }
        }
    }

    /// Submit the password reset overlay. Does nothing without a selected
    /// user or with a blank password.
    pub async fn handle_password_reset(&self) {
        let request = {
            let mut state = self.state.write().await;
            let selection = &mut state.selection;
            let Some(target) = selection.selected_user.as_ref() else {
                return;
            };
            let password = selection.password_input.trim();
            if password.is_empty() || selection.resetting {
                return;
            }

            let request = PasswordResetRequest {
                target_user_id: target.id,
                new_password: password.to_string(),
                admin_id: self.admin_id,
            };
            selection.resetting = true;
            request
        };
        let target_user_id = request.target_user_id;

        let result = self.backend.reset_user_password(request).await;

        let mut state = self.state.write().await;
        // The overlay may have moved on to another user while this was in flight.
        let current_target = state.selection.selected_user.as_ref().map(|u| u.id);
        let still_targeted = current_target == Some(target_user_id);
        if still_targeted || current_target.is_none() {
            state.selection.resetting = false;
        }

        if self.is_detached() {
            tracing::debug!("Discarding password reset result for unmounted dashboard");
            return;
        }

        match result {
            Ok(outcome) if outcome.success => {
                tracing::info!(
                    "Admin {} reset the password of user {}",
                    self.admin_id,
                    target_user_id
                );
                if still_targeted {
                    state.selection.clear();
                }
                state.alert = Some(Alert::success("Success", "Password has been reset"));
            }
            Ok(outcome) => {
                let message = outcome
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| RESET_FALLBACK_MESSAGE.to_string());
                tracing::warn!(
                    "Password reset for user {} rejected: {}",
                    target_user_id,
                    message
                );
                state.alert = Some(Alert::error("Error", message));
            }
            Err(e) => {
                tracing::error!("Password reset for user {} failed: {}", target_user_id, e);
                state.alert = Some(Alert::error("Error", RESET_TRANSPORT_MESSAGE));
            }
        }
    }

    // =========================================================================
    // Overlays
    // =========================================================================

    /// Open the user list, refreshing it from the backend.
    pub async fn open_user_management(&self) {
        self.state.write().await.selection.user_management_open = true;
        self.load_all_users().await;
    }

    pub async fn close_user_management(&self) {
        self.state.write().await.selection.clear();
    }

    /// Open the reset overlay for a user from the held list. Returns false if
    /// the user is not in the list.
    pub async fn begin_password_reset(&self, user_id: Uuid) -> bool {
        let mut state = self.state.write().await;
        let Some(user) = state.users.iter().find(|u| u.id == user_id).cloned() else {
            return false;
        };

        let selection = &mut state.selection;
        selection.selected_user = Some(user);
        selection.password_input.clear();
        selection.resetting = false;
        selection.password_reset_open = true;
        true
    }

    pub async fn set_password_input(&self, password: impl Into<String>) {
        self.state.write().await.selection.password_input = password.into();
    }

    pub async fn close_password_reset(&self) {
        self.state.write().await.selection.close_password_reset();
    }

    // =========================================================================
    // Alerts & Rendering
    // =========================================================================

    async fn raise(&self, alert: Alert) {
        if !self.is_detached() {
            self.state.write().await.alert = Some(alert);
        }
    }

    pub async fn dismiss_alert(&self) {
        self.state.write().await.alert = None;
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> DashboardView {
        render(&*self.state.read().await)
    }
}
