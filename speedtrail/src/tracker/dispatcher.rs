//! Alert Dispatcher - forwards alerts to the notification service.
//!
//! Notifications are advisory. Whatever happens to a notification (denied
//! permission, a pending permission request that resolves late, teardown)
//! never feeds back into sample processing.
//!
//! # Permission handling
//!
//! | Permission     | Behavior                                               |
//! |----------------|--------------------------------------------------------|
//! | `Granted`      | Show immediately                                       |
//! | `Undetermined` | Request in a deferred task, show if it resolves granted |
//! | `Denied`       | Drop silently                                          |

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::alert::AlertEvent;

/// Boxed future returned by [`NotificationService::request_permission`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Notification permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    Granted,
    Denied,
    /// Neither granted nor denied; the user has not been asked yet.
    #[default]
    Undetermined,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
            Self::Undetermined => write!(f, "prompt"),
        }
    }
}

/// Platform notification service.
pub trait NotificationService: Send + Sync {
    /// Current permission state.
    fn permission(&self) -> Permission;

    /// Ask the user for permission. Resolves to `Granted` or `Denied`.
    fn request_permission(&self) -> BoxFuture<'_, Permission>;

    /// Show a notification. Only valid once permission is granted.
    fn show(&self, message: &str);
}

/// Sends alerts to a [`NotificationService`], asking for permission first
/// when needed.
#[derive(Clone)]
pub struct AlertDispatcher {
    notifier: Arc<dyn NotificationService>,
    cancellation: CancellationToken,
}

impl AlertDispatcher {
    /// Create a dispatcher.
    ///
    /// Once `cancellation` fires, deferred permission continuations no longer
    /// show anything.
    pub fn new(notifier: Arc<dyn NotificationService>, cancellation: CancellationToken) -> Self {
        Self {
            notifier,
            cancellation,
        }
    }

    /// Dispatch one alert without waiting.
    ///
    /// Returns the handle of the deferred permission request, if one was
    /// spawned. Must be called from within a Tokio runtime.
    pub fn dispatch(&self, alert: AlertEvent) -> Option<JoinHandle<()>> {
        if self.cancellation.is_cancelled() {
            return None;
        }

        match self.notifier.permission() {
            Permission::Granted => {
                self.notifier.show(&alert.message);
                None
            }
            Permission::Denied => {
                tracing::debug!(kind = %alert.kind, "Notification permission denied, alert dropped");
                None
            }
            Permission::Undetermined => {
                let notifier = Arc::clone(&self.notifier);
                let cancellation = self.cancellation.clone();

                Some(tokio::spawn(async move {
                    let permission = notifier.request_permission().await;
                    if permission == Permission::Granted && !cancellation.is_cancelled() {
                        notifier.show(&alert.message);
                    } else {
                        tracing::debug!(
                            kind = %alert.kind,
                            %permission,
                            "Alert dropped after permission request"
                        );
                    }
                }))
            }
        }
    }
}

/// Notification service that emits each notification as a `tracing` event.
///
/// Starts in the configured permission state. A permission request resolves
/// to `prompt_response` and is remembered, like a browser prompt.
#[derive(Debug)]
pub struct LogNotifier {
    permission: Mutex<Permission>,
    prompt_response: Permission,
}

impl LogNotifier {
    pub fn new(permission: Permission, prompt_response: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
            prompt_response,
        }
    }

    /// A notifier that is already allowed to show notifications.
    pub fn granted() -> Self {
        Self::new(Permission::Granted, Permission::Granted)
    }
}

impl NotificationService for LogNotifier {
    fn permission(&self) -> Permission {
        *self.permission.lock()
    }

    fn request_permission(&self) -> BoxFuture<'_, Permission> {
        let mut permission = self.permission.lock();
        if *permission == Permission::Undetermined {
            *permission = self.prompt_response;
        }
        Box::pin(std::future::ready(*permission))
    }

    fn show(&self, message: &str) {
        tracing::info!(target: "speedtrail::notification", "{}", message);
    }
}
