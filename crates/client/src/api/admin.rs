//! Platform administration endpoints

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::request::ApiRequest;
use medportal_core::{Hospital, ListParams, Page, User};
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct AdminApi<'a> {
    client: &'a PortalClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) const fn new(client: &'a PortalClient) -> Self {
        Self { client }
    }

    /// Platform-wide counters; the set of fields grows with the backend
    pub async fn dashboard(&self) -> Result<Value, ClientError> {
        self.client.send(ApiRequest::get("/admin/dashboard")).await
    }

    pub async fn users(&self, params: &ListParams) -> Result<Page<User>, ClientError> {
        let request = ApiRequest::get("/admin/users").query(params)?;
        self.client.send(request).await
    }

    pub async fn toggle_user_status(&self, user_id: i64) -> Result<Value, ClientError> {
        self.client
            .send(ApiRequest::put(format!(
                "/admin/users/{user_id}/toggle-status"
            )))
            .await
    }

    pub async fn hospitals(&self, params: &ListParams) -> Result<Page<Hospital>, ClientError> {
        let request = ApiRequest::get("/admin/hospitals").query(params)?;
        self.client.send(request).await
    }
}
