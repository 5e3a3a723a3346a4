//! Authentication API client methods

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::request::ApiRequest;
use medportal_core::{
    LoginIdentifier, LoginRequest, LoginResponse, ProfileResponse, RefreshResponse, RegisterData,
    User,
};

#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a PortalClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(client: &'a PortalClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login`, sent without credentials
    pub async fn login(
        &self,
        identifier: LoginIdentifier,
        password: &str,
    ) -> Result<LoginResponse, ClientError> {
        let request = ApiRequest::post("/auth/login")
            .public()
            .json(&LoginRequest::new(identifier, password))?;
        self.client.send(request).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, data: &RegisterData) -> Result<(), ClientError> {
        let request = ApiRequest::post("/auth/register").public().json(data)?;
        self.client.send_empty(request).await
    }

    /// `GET /auth/profile`
    pub async fn profile(&self) -> Result<User, ClientError> {
        let response: ProfileResponse = self.client.send(ApiRequest::get("/auth/profile")).await?;
        Ok(response.user)
    }

    /// `POST /auth/refresh` through the pipeline, authenticated by the
    /// current access token
    ///
    /// The stored token is not updated; the pipeline's own refresh uses the
    /// refresh token directly.
    pub async fn refresh(&self) -> Result<RefreshResponse, ClientError> {
        self.client.send(ApiRequest::post("/auth/refresh")).await
    }
}
