//! MedPortal API client
//!
//! [`PortalClient`] is the request pipeline: it attaches the stored bearer
//! token, refreshes it once on a 401, and reports permission and server
//! errors. [`SessionStore`] sits on top and owns login, logout and start-up
//! restoration of the session.

pub mod api;
pub mod chat;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod notify;
pub mod request;
pub mod session;
pub mod state;
pub mod storage;

pub use chat::ChatConversation;
pub use client::{PortalClient, PortalClientBuilder};
pub use config::ClientConfig;
pub use credentials::{CredentialPolicy, CredentialProvider};
pub use error::{AuthError, ClientError};
pub use notify::{LOGIN_PATH, Navigator, Notifier};
pub use request::{ApiRequest, Attempt, RequestAuth};
pub use session::SessionStore;
pub use state::{SessionPhase, SessionState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageArea, Storages};
