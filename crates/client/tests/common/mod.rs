//! Shared fixtures for the client integration tests

#![allow(dead_code)]

use medportal_client::{
    CredentialPolicy, KeyValueStore, MemoryStore, Navigator, Notifier, PortalClient,
    SessionStore, StorageArea, Storages,
};
use medportal_core::{CoreError, CoreResult};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Error(m) => Some(m),
                Notice::Success(_) => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Success(m) => Some(m),
                Notice::Error(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Error(message.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

pub struct Harness {
    pub server: MockServer,
    pub client: PortalClient,
    pub storages: Storages,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::with_policy(CredentialPolicy::default()).await
    }

    pub async fn with_policy(policy: CredentialPolicy) -> Self {
        Self::build(policy, Storages::in_memory()).await
    }

    pub async fn with_storages(storages: Storages) -> Self {
        Self::build(CredentialPolicy::default(), storages).await
    }

    async fn build(policy: CredentialPolicy, storages: Storages) -> Self {
        init_test_logging();
        let server = MockServer::start().await;
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());

        let client = PortalClient::builder()
            .base_url(format!("{}/api", server.uri()))
            .storages(storages.clone())
            .policy(policy)
            .notifier(notifier.clone())
            .navigator(navigator.clone())
            .build()
            .unwrap();

        Self {
            server,
            client,
            storages,
            notifier,
            navigator,
        }
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(self.client.clone())
    }

    pub fn store(&self, area: StorageArea, key: &str, value: &str) {
        self.storages.set(area, key, value).unwrap();
    }

    pub fn stored(&self, area: StorageArea, key: &str) -> Option<String> {
        self.storages.get(area, key)
    }

    /// Authorization headers of every request the mock server saw, in order
    pub async fn authorization_headers(&self) -> Vec<Option<String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                request
                    .headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}

/// In-memory store whose writes to one key always fail
pub struct FailingStore {
    inner: MemoryStore,
    failing_key: &'static str,
}

impl FailingStore {
    pub fn failing_on(failing_key: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_key,
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        if key == self.failing_key {
            return Err(CoreError::io_error("disk full"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.inner.remove(key)
    }
}

/// Route client logs through the test harness; set `RUST_LOG` to see them
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn user_json(id: i64) -> Value {
    json!({
        "id": id,
        "email": "user@x.com",
        "first_name": "Asha",
        "last_name": "Verma",
        "full_name": "Asha Verma",
        "role": "patient",
        "is_active": true
    })
}
