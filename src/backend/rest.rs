//! HTTP client for the hosted backend's REST/RPC interface

use super::{Backend, BackendError};
use crate::models::*;
use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

/// Longest error body kept in a [`BackendError::Status`]
const MAX_ERROR_BODY: usize = 500;

/// Backend client speaking the PostgREST-style `rest/v1` and `auth/v1` APIs
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    identity: AdminIdentity,
}

/// RPCs may answer with a single object or a one-row set
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrFirst<T> {
    One(T),
    Many(Vec<T>),
}

impl RestBackend {
    /// Create a new client for `base_url`, authenticating as `identity`
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        identity: AdminIdentity,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            identity,
        })
    }

    fn rest_url(&self, resource: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, resource)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, self.identity.bearer())
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<Vec<u8>, BackendError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body)
                    .chars()
                    .take(MAX_ERROR_BODY)
                    .collect(),
            });
        }

        Ok(body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let body = self.send_raw(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl Backend for RestBackend {
    async fn current_statistics(&self) -> Result<Vec<StatisticsSnapshot>, BackendError> {
        let request = self
            .client
            .post(self.rpc_url("get_current_statistics"))
            .json(&json!({}));
        self.send_json(request).await
    }

    async fn recent_complaints(&self, limit: usize) -> Result<Vec<ComplaintRecord>, BackendError> {
        let limit = limit.to_string();
        let request = self
            .client
            .get(self.rest_url("admin_complaints_view"))
            .query(&[("select", "*"), ("limit", limit.as_str())]);
        self.send_json(request).await
    }

    async fn all_users_for_admin(&self, admin_id: Uuid) -> Result<Vec<UserRecord>, BackendError> {
        let request = self
            .client
            .post(self.rpc_url("get_all_users_for_admin"))
            .json(&json!({ "admin_id": admin_id }));
        self.send_json(request).await
    }

    async fn resolve_complaint(&self, id: Uuid, update: ResolveComplaint) -> Result<(), BackendError> {
        let filter = format!("eq.{}", id);
        let request = self
            .client
            .patch(self.rest_url("complaints"))
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=minimal")
            .json(&update);
        self.send_raw(request).await?;
        Ok(())
    }

    async fn reset_user_password(
        &self,
        request: PasswordResetRequest,
    ) -> Result<PasswordResetOutcome, BackendError> {
        let request = self
            .client
            .post(self.rpc_url("reset_user_password"))
            .json(&request);

        match self.send_json::<OneOrFirst<PasswordResetOutcome>>(request).await? {
            OneOrFirst::One(outcome) => Ok(outcome),
            OneOrFirst::Many(rows) => Ok(rows.into_iter().next().unwrap_or(PasswordResetOutcome {
                success: false,
                error: None,
            })),
        }
    }

    async fn authenticated_user(&self) -> Result<AuthenticatedUser, BackendError> {
        let request = self.client.get(format!("{}/auth/v1/user", self.base_url));
        self.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wiremock::matchers::{body_json, header as header_is, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ANON_KEY: &str = "anon-key";

    fn backend_for(server: &MockServer, admin_id: Uuid) -> RestBackend {
        RestBackend::new(
            server.uri(),
            ANON_KEY,
            AdminIdentity::new(admin_id, "admin-token"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_statistics_rpc_sends_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_current_statistics"))
            .and(header_is("apikey", ANON_KEY))
            .and(header_is("authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "total_users": 12,
                "total_complaints": 7,
                "pending_complaints": 3,
                "resolved_complaints": 4,
                "last_updated": "2024-03-01T10:00:00Z"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend_for(&server, Uuid::new_v4());
        let stats = backend.current_statistics().await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].pending_complaints, 3);
    }

    #[tokio::test]
    async fn test_recent_complaints_applies_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/admin_complaints_view"))
            .and(query_param("select", "*"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "5a4c1a4e-3c1f-4bde-9a55-0f3c2b8d7e61",
                "subject": "Cannot upload",
                "message": "The upload button does nothing",
                "email": "user@example.com",
                "phone": null,
                "status": "pending",
                "priority": "high",
                "created_at": "2024-03-01T10:00:00Z",
                "age_category": "new"
            }])))
            .mount(&server)
            .await;

        let backend = backend_for(&server, Uuid::new_v4());
        let complaints = backend.recent_complaints(5).await.unwrap();
        assert_eq!(complaints.len(), 1);
        assert_eq!(complaints[0].priority(), Priority::High);
    }

    #[tokio::test]
    async fn test_users_rpc_passes_admin_id() {
        let server = MockServer::start().await;
        let admin_id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_all_users_for_admin"))
            .and(body_json(json!({ "admin_id": admin_id })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend_for(&server, admin_id);
        assert!(backend.all_users_for_admin(admin_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_complaint_filters_by_id() {
        let server = MockServer::start().await;
        let complaint_id = Uuid::new_v4();
        let admin_id = Uuid::new_v4();
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/complaints"))
            .and(query_param("id", format!("eq.{}", complaint_id)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend_for(&server, admin_id);
        let update = ResolveComplaint {
            status: ComplaintStatus::Resolved,
            replied_at: Utc::now(),
            replied_by: admin_id,
            admin_reply: "done".to_string(),
        };
        backend.resolve_complaint(complaint_id, update).await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_password_accepts_single_row_set() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/reset_user_password"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "success": false, "error": "Not allowed" }])),
            )
            .mount(&server)
            .await;

        let backend = backend_for(&server, Uuid::new_v4());
        let outcome = backend
            .reset_user_password(PasswordResetRequest {
                target_user_id: Uuid::new_v4(),
                new_password: "new-password".to_string(),
                admin_id: Uuid::new_v4(),
            })
            .await
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Not allowed"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid JWT"))
            .mount(&server)
            .await;

        let backend = backend_for(&server, Uuid::new_v4());
        assert!(matches!(
            backend.authenticated_user().await,
            Err(BackendError::Status { status: 401, ref body }) if body == "invalid JWT"
        ));
    }
}
