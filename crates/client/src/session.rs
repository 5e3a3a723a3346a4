//! Session store: who is logged in and where their credentials live
//!
//! The store owns the lifecycle `Uninitialized -> Anonymous | Authenticated`.
//! Its state is published on a watch channel (see [`SessionStore::subscribe`])
//! so UI code can re-render on change. The pipeline shares the same channel
//! and moves the session to `Anonymous` when a refresh fails.

use crate::client::PortalClient;
use crate::error::{AuthError, ClientError};
use crate::state::{SessionPhase, SessionState, SessionSignal};
use crate::storage::{StorageArea, Storages, keys};
use medportal_core::{LoginIdentifier, LoginResponse, RegisterData, User};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";

#[derive(Debug, Clone)]
pub struct SessionStore {
    client: PortalClient,
}

impl SessionStore {
    pub fn new(client: PortalClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &PortalClient {
        &self.client
    }

    fn storages(&self) -> &Storages {
        self.client.storages()
    }

    fn signal(&self) -> &SessionSignal {
        self.client.session()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.signal().subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.signal().current()
    }

    pub fn user(&self) -> Option<User> {
        self.state().user
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    /// Restore a previous session at start-up
    ///
    /// Only a stored access token counts. If one exists, the profile
    /// endpoint decides whether it is still good; any failure wipes the
    /// stored credentials.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> SessionState {
        let token_area = [StorageArea::Durable, StorageArea::Session]
            .into_iter()
            .find(|area| self.storages().get(*area, keys::ACCESS_TOKEN).is_some());

        let Some(area) = token_area else {
            debug!("no stored access token");
            self.signal().clear();
            return self.state();
        };

        match self.client.auth().profile().await {
            Ok(user) => {
                info!(user_id = user.id, %area, "restored session");
                self.signal().authenticate(user);
            }
            Err(err) => {
                warn!(error = %err, "stored session is no longer valid");
                let _ = self.storages().clear_everywhere(&keys::SESSION_ENTRIES);
                self.signal().clear();
            }
        }
        self.state()
    }

    /// Log in and report the outcome through the notifier
    pub async fn login(&self, identifier: &str, password: &str, remember: bool) -> bool {
        match self.try_login(identifier, password, remember).await {
            Ok(user) => {
                self.client
                    .notifier()
                    .success(&format!("Welcome back, {}!", user.display_name()));
                true
            }
            Err(err) => {
                self.client
                    .notifier()
                    .error(&err.user_message(LOGIN_FALLBACK));
                false
            }
        }
    }

    /// Log in, returning the typed outcome without notifying
    ///
    /// On success exactly one storage area holds the new session: the one
    /// picked by `remember`. The other area's entries are removed. On
    /// failure nothing is changed.
    #[instrument(skip(self, password))]
    pub async fn try_login(
        &self,
        identifier: &str,
        password: &str,
        remember: bool,
    ) -> Result<User, AuthError> {
        let response = self
            .client
            .auth()
            .login(LoginIdentifier::parse(identifier), password)
            .await?;

        if response.access_token.is_empty() || response.refresh_token.is_empty() {
            return Err(AuthError::MalformedResponse(
                "login response is missing tokens".into(),
            ));
        }

        let area = StorageArea::for_remember(remember);
        self.persist(area, &response).map_err(AuthError::Transport)?;

        info!(user_id = response.user.id, %area, "logged in");
        self.signal().authenticate(response.user.clone());
        Ok(response.user)
    }

    /// Write the new session into `area` and clear the other one
    ///
    /// If any write fails both areas are put back the way they were.
    fn persist(&self, area: StorageArea, response: &LoginResponse) -> Result<(), ClientError> {
        let user = serde_json::to_string(&response.user)?;
        let snapshot = self.snapshot();

        let storages = self.storages();
        let written = storages
            .set(area, keys::ACCESS_TOKEN, &response.access_token)
            .and_then(|()| storages.set(area, keys::REFRESH_TOKEN, &response.refresh_token))
            .and_then(|()| storages.set(area, keys::USER, &user))
            .and_then(|()| {
                let stale = storages.area(area.other());
                keys::SESSION_ENTRIES
                    .into_iter()
                    .try_for_each(|key| stale.remove(key))
            });

        if let Err(err) = written {
            warn!(%area, error = %err, "failed to store session, restoring previous entries");
            self.restore(snapshot);
            return Err(err.into());
        }
        Ok(())
    }

    fn snapshot(&self) -> Vec<(StorageArea, &'static str, Option<String>)> {
        [StorageArea::Durable, StorageArea::Session]
            .into_iter()
            .flat_map(|area| {
                keys::SESSION_ENTRIES
                    .into_iter()
                    .map(move |key| (area, key, self.storages().area(area).get(key)))
            })
            .collect()
    }

    fn restore(&self, snapshot: Vec<(StorageArea, &'static str, Option<String>)>) {
        for (area, key, previous) in snapshot {
            let store = self.storages().area(area);
            let result = match previous {
                Some(value) => store.set(key, &value),
                None => store.remove(key),
            };
            if let Err(err) = result {
                warn!(%area, key, error = %err, "failed to restore storage key");
            }
        }
    }

    /// Create an account; the caller still has to log in afterwards
    pub async fn register(&self, data: &RegisterData) -> bool {
        match self.try_register(data).await {
            Ok(()) => {
                self.client
                    .notifier()
                    .success("Registration successful! Please login.");
                true
            }
            Err(err) => {
                self.client
                    .notifier()
                    .error(&err.user_message(REGISTER_FALLBACK));
                false
            }
        }
    }

    #[instrument(skip(self, data), fields(email = %data.email, role = %data.role))]
    pub async fn try_register(&self, data: &RegisterData) -> Result<(), AuthError> {
        self.client.auth().register(data).await?;
        info!("registered");
        Ok(())
    }

    /// Forget the session locally; no server call is made
    pub fn logout(&self) {
        if let Err(err) = self.storages().clear_everywhere(&keys::SESSION_ENTRIES) {
            warn!(error = %err, "could not clear every stored credential");
        }
        self.signal().clear();
        self.client.notifier().success("Logged out successfully");
    }

    pub fn phase(&self) -> SessionPhase {
        self.state().phase
    }
}
