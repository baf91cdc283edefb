//! In-memory backend used by the dashboard and console tests

use super::{Backend, BackendError};
use crate::models::*;
use chrono::Utc;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// A call recorded by [`MockBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Statistics,
    Complaints { limit: usize },
    Users { admin_id: Uuid },
    Resolve { id: Uuid, update: ResolveComplaint },
    ResetPassword(PasswordResetRequest),
    AuthenticatedUser,
}

/// Scripted backend. `None` in a reply slot makes that call fail.
pub struct MockBackend {
    pub token_owner: Uuid,
    pub statistics: Mutex<Option<Vec<StatisticsSnapshot>>>,
    pub complaints: Mutex<Option<Vec<ComplaintRecord>>>,
    pub users: Mutex<Option<Vec<UserRecord>>>,
    pub resolve_fails: Mutex<bool>,
    pub reset_outcome: Mutex<Option<PasswordResetOutcome>>,
    pub delay: Mutex<Duration>,
    pub calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    pub fn new(token_owner: Uuid) -> Self {
        Self {
            token_owner,
            statistics: Mutex::new(Some(vec![])),
            complaints: Mutex::new(Some(vec![])),
            users: Mutex::new(Some(vec![])),
            resolve_fails: Mutex::new(false),
            reset_outcome: Mutex::new(Some(PasswordResetOutcome {
                success: true,
                error: None,
            })),
            delay: Mutex::new(Duration::ZERO),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn failure() -> BackendError {
        BackendError::Status {
            status: 500,
            body: "mock failure".to_string(),
        }
    }
}

impl Backend for MockBackend {
    async fn current_statistics(&self) -> Result<Vec<StatisticsSnapshot>, BackendError> {
        self.record(Call::Statistics);
        self.pause().await;
        self.statistics.lock().unwrap().clone().ok_or_else(Self::failure)
    }

    async fn recent_complaints(&self, limit: usize) -> Result<Vec<ComplaintRecord>, BackendError> {
        self.record(Call::Complaints { limit });
        self.pause().await;
        let complaints = self.complaints.lock().unwrap().clone();
        complaints
            .map(|c| c.into_iter().take(limit).collect())
            .ok_or_else(Self::failure)
    }

    async fn all_users_for_admin(&self, admin_id: Uuid) -> Result<Vec<UserRecord>, BackendError> {
        self.record(Call::Users { admin_id });
        self.pause().await;
        self.users.lock().unwrap().clone().ok_or_else(Self::failure)
    }

    async fn resolve_complaint(&self, id: Uuid, update: ResolveComplaint) -> Result<(), BackendError> {
        self.record(Call::Resolve {
            id,
            update: update.clone(),
        });
        if *self.resolve_fails.lock().unwrap() {
            return Err(Self::failure());
        }
        if let Some(complaints) = self.complaints.lock().unwrap().as_mut() {
            for complaint in complaints.iter_mut().filter(|c| c.id == id) {
                complaint.status = update.status.clone();
                complaint.admin_reply = Some(update.admin_reply.clone());
            }
        }
        Ok(())
    }

    async fn reset_user_password(
        &self,
        request: PasswordResetRequest,
    ) -> Result<PasswordResetOutcome, BackendError> {
        self.record(Call::ResetPassword(request));
        self.pause().await;
        self.reset_outcome.lock().unwrap().clone().ok_or_else(Self::failure)
    }

    async fn authenticated_user(&self) -> Result<AuthenticatedUser, BackendError> {
        self.record(Call::AuthenticatedUser);
        Ok(AuthenticatedUser {
            id: self.token_owner,
            email: Some("admin@example.com".to_string()),
        })
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn snapshot(total_users: i64) -> StatisticsSnapshot {
    StatisticsSnapshot {
        total_users,
        total_complaints: 10,
        pending_complaints: 4,
        resolved_complaints: 6,
        last_updated: Utc::now(),
    }
}

pub fn complaint(subject: &str, message: &str) -> ComplaintRecord {
    ComplaintRecord {
        id: Uuid::new_v4(),
        subject: subject.to_string(),
        message: message.to_string(),
        email: "reporter@example.com".to_string(),
        phone: None,
        status: ComplaintStatus::Pending,
        priority: None,
        created_at: Utc::now(),
        admin_reply: None,
        replied_by_name: None,
        age_category: Some("new".to_string()),
    }
}

pub fn user(email: &str) -> UserRecord {
    UserRecord {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: "Test User".to_string(),
        institution: None,
        phone: None,
        created_at: Utc::now(),
        last_sign_in_at: None,
        email_confirmed_at: Some(Utc::now()),
    }
}
