//! Console notification service.
//!
//! Prints notifications to stderr so they stand apart from the status lines
//! on stdout. Permission handling is the library's [`LogNotifier`]: the
//! prompt resolves to the configured answer and is remembered.

use speedtrail::config::NotificationSettings;
use speedtrail::tracker::{BoxFuture, LogNotifier, NotificationService, Permission};

/// Notification service for an interactive terminal.
pub struct ConsoleNotifier {
    inner: LogNotifier,
}

impl ConsoleNotifier {
    pub fn from_settings(settings: &NotificationSettings) -> Self {
        Self {
            inner: LogNotifier::new(settings.permission, settings.prompt_response),
        }
    }
}

impl NotificationService for ConsoleNotifier {
    fn permission(&self) -> Permission {
        self.inner.permission()
    }

    fn request_permission(&self) -> BoxFuture<'_, Permission> {
        let prompted = self.inner.permission() == Permission::Undetermined;
        let answer = self.inner.request_permission();
        Box::pin(async move {
            let permission = answer.await;
            if prompted {
                eprintln!("Notification permission requested: {}", permission);
            }
            permission
        })
    }

    fn show(&self, message: &str) {
        self.inner.show(message);
        eprintln!("{}", message);
    }
}
