//! Reactive session state shared by the session store and the pipeline

use medportal_core::User;
use std::sync::Arc;
use tokio::sync::watch;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// `initialize` has not finished yet
    Uninitialized,
    Anonymous,
    Authenticated,
}

/// Snapshot observed by UI code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    pub is_loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            user: None,
            is_loading: true,
        }
    }
}

/// Write side of the session state; cheap to clone
#[derive(Debug, Clone)]
pub struct SessionSignal {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub(crate) fn authenticate(&self, user: User) {
        self.tx.send_modify(|state| {
            state.phase = SessionPhase::Authenticated;
            state.user = Some(user);
            state.is_loading = false;
        });
    }

    /// Drop the user and settle in `Anonymous`
    pub(crate) fn clear(&self) {
        self.tx.send_modify(|state| {
            state.phase = SessionPhase::Anonymous;
            state.user = None;
            state.is_loading = false;
        });
    }
}
