//! Authenticated request pipeline
//!
//! Every feature call goes through [`PortalClient::send`]. Outbound, the
//! credential policy decides which bearer token is attached. Inbound, a 401
//! triggers one refresh-and-retry, and 403/5xx responses raise a
//! notification before the error is returned to the caller.

use crate::config::ClientConfig;
use crate::credentials::CredentialPolicy;
use crate::error::ClientError;
use crate::notify::{
    FORBIDDEN_MESSAGE, LOGIN_PATH, LogNavigator, LogNotifier, Navigator, Notifier,
    SERVER_ERROR_MESSAGE,
};
use crate::request::{ApiRequest, Attempt, RequestAuth};
use crate::state::SessionSignal;
use crate::storage::{Storages, keys};
use medportal_core::RefreshResponse;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// MedPortal API client
#[derive(Clone)]
pub struct PortalClient {
    http: Client,
    config: ClientConfig,
    storages: Storages,
    policy: Arc<CredentialPolicy>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    session: SessionSignal,
}

impl std::fmt::Debug for PortalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalClient")
            .field("base_url", &self.config.base_url)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PortalClient {
    /// Client with in-memory storage and logging-only feedback
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> PortalClientBuilder {
        PortalClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn storages(&self) -> &Storages {
        &self.storages
    }

    pub fn policy(&self) -> &CredentialPolicy {
        &self.policy
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn session(&self) -> &SessionSignal {
        &self.session
    }

    /// Send a request and decode the JSON response body
    ///
    /// A 401 on a session request is answered with a single refresh of the
    /// access token followed by one replay of the same request. The replay's
    /// outcome is final, whatever it is.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let response = match self.exchange(&request, &Attempt::Initial).await {
            Err(ClientError::AuthenticationFailed(reason))
                if request.auth == RequestAuth::Session =>
            {
                debug!(path = %request.path, %reason, "access token rejected, refreshing");
                let access_token = self.refresh_session().await?;
                self.exchange(&request, &Attempt::Retried { access_token })
                    .await?
            }
            other => other?,
        };
        decode(response).await
    }

    /// Send a request whose response body is irrelevant
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.send::<serde_json::Value>(request).await.map(drop)
    }

    /// One round trip: attach credentials, send, classify the status
    async fn exchange(
        &self,
        request: &ApiRequest,
        attempt: &Attempt,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self.build(request, attempt).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        self.report(status);
        debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            retried = !attempt.may_refresh(),
            %body,
            "request failed"
        );
        Err(ClientError::from_status(status, &body))
    }

    fn build(&self, request: &ApiRequest, attempt: &Attempt) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(request.method.clone(), self.config.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        match (request.auth, attempt) {
            (RequestAuth::Public, _) => builder,
            (RequestAuth::Session, Attempt::Retried { access_token }) => {
                builder.bearer_auth(access_token)
            }
            (RequestAuth::Session, Attempt::Initial) => {
                match self.policy.resolve(&self.storages) {
                    Some(credential) => {
                        debug!(provider = credential.provider, "attaching bearer token");
                        builder.bearer_auth(credential.token)
                    }
                    None => builder,
                }
            }
        }
    }

    /// Central user feedback; never alters what the caller receives
    fn report(&self, status: StatusCode) {
        if status.is_server_error() {
            self.notifier.error(SERVER_ERROR_MESSAGE);
        } else if status == StatusCode::FORBIDDEN {
            self.notifier.error(FORBIDDEN_MESSAGE);
        }
    }

    /// Mint a new access token or tear the session down
    async fn refresh_session(&self) -> Result<String, ClientError> {
        match self.request_new_access_token().await {
            Ok(token) => {
                info!("access token refreshed");
                Ok(token)
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, ending session");
                self.expire_session();
                Err(ClientError::SessionExpired(err.to_string()))
            }
        }
    }

    async fn request_new_access_token(&self) -> Result<String, ClientError> {
        let (area, refresh_token) = self
            .storages
            .find(keys::REFRESH_TOKEN)
            .ok_or_else(|| ClientError::AuthenticationFailed("No refresh token".to_string()))?;

        let response = self
            .http
            .post(self.config.url("/auth/refresh"))
            .bearer_auth(&refresh_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, &body));
        }

        let RefreshResponse { access_token } = decode(response).await?;

        // Store next to the refresh token as it is found now.
        let target = self
            .storages
            .find(keys::REFRESH_TOKEN)
            .map_or(area, |(current, _)| current);
        self.storages
            .set(target, keys::ACCESS_TOKEN, &access_token)?;
        debug!(area = %target, "stored refreshed access token");

        Ok(access_token)
    }

    fn expire_session(&self) {
        // Failures are logged inside; the user is redirected regardless.
        let _ = self.storages.clear_everywhere(&keys::SESSION_ENTRIES);
        self.session.clear();
        self.navigator.redirect(LOGIN_PATH);
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Builder for PortalClient
#[derive(Default)]
pub struct PortalClientBuilder {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    storages: Option<Storages>,
    policy: Option<CredentialPolicy>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
    session: Option<SessionSignal>,
}

impl PortalClientBuilder {
    /// Start from a full configuration; individual setters still override it
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn storages(mut self, storages: Storages) -> Self {
        self.storages = Some(storages);
        self
    }

    pub fn policy(mut self, policy: CredentialPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Share session state with another client instance
    pub fn session(mut self, session: SessionSignal) -> Self {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> Result<PortalClient, ClientError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        if config.base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is required".into()));
        }
        if let Some(timeout) = self.timeout {
            config.timeout = Some(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        let mut client_builder = ClientBuilder::new().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        let http = client_builder.build()?;

        Ok(PortalClient {
            http,
            config,
            storages: self.storages.unwrap_or_else(Storages::in_memory),
            policy: Arc::new(self.policy.unwrap_or_default()),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
            navigator: self.navigator.unwrap_or_else(|| Arc::new(LogNavigator)),
            session: self.session.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_normalizes_base_url() {
        let client = PortalClient::new("http://localhost:5000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn builder_rejects_empty_base_url() {
        let result = PortalClient::builder().base_url("").build();
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn builder_defaults_to_observed_credential_order() {
        let client = PortalClient::new("http://localhost:5000/api").unwrap();
        let names: Vec<_> = client.policy().providers().iter().map(|p| p.name).collect();
        assert_eq!(names, ["patient", "hospital", "patient-session"]);
    }
}
