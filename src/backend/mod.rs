//! Remote backend access
//!
//! All storage, aggregation, authentication and password hashing happen in the
//! hosted backend. The dashboard only talks to it through [`Backend`].

pub mod rest;

#[cfg(test)]
pub mod mock;

use crate::models::*;
use std::future::Future;
use uuid::Uuid;

pub use rest::RestBackend;

/// Operations the dashboard needs from the hosted backend
pub trait Backend: Send + Sync + 'static {
    /// `get_current_statistics()`: at most one snapshot
    fn current_statistics(
        &self,
    ) -> impl Future<Output = Result<Vec<StatisticsSnapshot>, BackendError>> + Send;

    /// Newest rows of `admin_complaints_view`, in the backend's default order
    fn recent_complaints(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ComplaintRecord>, BackendError>> + Send;

    /// `get_all_users_for_admin(admin_id)`
    fn all_users_for_admin(
        &self,
        admin_id: Uuid,
    ) -> impl Future<Output = Result<Vec<UserRecord>, BackendError>> + Send;

    /// Partial update of a single row of `complaints`, filtered by id
    fn resolve_complaint(
        &self,
        id: Uuid,
        update: ResolveComplaint,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// `reset_user_password(target_user_id, new_password, admin_id)`
    fn reset_user_password(
        &self,
        request: PasswordResetRequest,
    ) -> impl Future<Output = Result<PasswordResetOutcome, BackendError>> + Send;

    /// Resolve the user behind the configured access token
    fn authenticated_user(
        &self,
    ) -> impl Future<Output = Result<AuthenticatedUser, BackendError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Access token belongs to user {actual}, not admin {expected}")]
    IdentityMismatch { expected: Uuid, actual: Uuid },
}

/// Check that the access token really belongs to the configured admin.
pub async fn verify_admin<B: Backend>(backend: &B, admin_id: Uuid) -> Result<(), BackendError> {
    let user = backend.authenticated_user().await?;
    if user.id != admin_id {
        tracing::error!(
            "Admin identity mismatch: configured {}, token belongs to {}",
            admin_id,
            user.id
        );
        return Err(BackendError::IdentityMismatch {
            expected: admin_id,
            actual: user.id,
        });
    }

    tracing::info!(
        "Verified admin identity {} ({})",
        user.id,
        user.email.as_deref().unwrap_or("no email")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::mock::MockBackend;
    use super::*;

    #[tokio::test]
    async fn test_verify_admin_accepts_matching_identity() {
        let admin_id = Uuid::new_v4();
        let backend = MockBackend::new(admin_id);
        assert!(verify_admin(&backend, admin_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_admin_rejects_other_user() {
        let backend = MockBackend::new(Uuid::new_v4());
        let configured = Uuid::new_v4();
        assert!(matches!(
            verify_admin(&backend, configured).await,
            Err(BackendError::IdentityMismatch { expected, .. }) if expected == configured
        ));
    }
}
