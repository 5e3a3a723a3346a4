//! User-facing feedback hooks
//!
//! The pipeline and the session store report through these traits instead of
//! talking to a UI directly; front ends plug in their own toast or console
//! implementation.

use tracing::{info, warn};

/// Path the client is sent to when its session cannot be recovered
pub const LOGIN_PATH: &str = "/login";

pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action.";

/// Toast-style notifications
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Navigation after an unrecoverable authentication failure
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Notifier that only writes log events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!(notification = "success", "{message}");
    }

    fn error(&self, message: &str) {
        warn!(notification = "error", "{message}");
    }
}

/// Navigator that only logs the requested redirect
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, path: &str) {
        info!(path, "redirect requested");
    }
}
