//! Terminal implementations of the client feedback hooks

use medportal_client::{LOGIN_PATH, Navigator, Notifier};
use tracing::debug;

/// Prints notifications to stderr so stdout carries only command output
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        eprintln!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// A terminal cannot navigate; tell the user what to run instead
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn redirect(&self, path: &str) {
        debug!(path, "redirect requested");
        if path == LOGIN_PATH {
            eprintln!("Your session has expired. Run `medportal login` to sign in again.");
        }
    }
}
