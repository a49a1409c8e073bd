/// Account lifecycle events and the notification seam
///
/// The account service emits a domain event after a successful signup or
/// account deletion. Delivery (welcome and cancellation email) is an
/// independent collaborator behind the [`Notifier`] trait: best-effort,
/// fire-and-forget, with its own failure isolation. The service never awaits
/// or inspects the outcome, so a broken notifier cannot fail or delay an
/// account mutation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A domain event emitted by the account service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountEvent {
    /// An account was created
    Created { email: String, name: String },

    /// An account was deleted
    Deleted { email: String, name: String },
}

impl AccountEvent {
    /// Address the notification should go to
    pub fn recipient(&self) -> &str {
        match self {
            AccountEvent::Created { email, .. } | AccountEvent::Deleted { email, .. } => email,
        }
    }

    /// Subject line for the notification email
    pub fn subject(&self) -> &'static str {
        match self {
            AccountEvent::Created { .. } => "Thanks for joining in!",
            AccountEvent::Deleted { .. } => "Sorry to see you go!",
        }
    }

    /// Body text for the notification email
    pub fn body(&self) -> String {
        match self {
            AccountEvent::Created { name, .. } => {
                format!("Welcome to Taskhub, {}!", name)
            }
            AccountEvent::Deleted { name, .. } => {
                format!("Goodbye {}. I hope to see you back sometime soon.", name)
            }
        }
    }
}

/// Consumer of account lifecycle events
///
/// Implementations own their error handling; `notify` returns nothing and the
/// service treats delivery as best-effort.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: AccountEvent);
}

/// A notifier that just logs the would-be email
///
/// The default collaborator for environments without a mail service wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: AccountEvent) {
        tracing::info!(
            recipient = %event.recipient(),
            subject = %event.subject(),
            "account notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_rendering() {
        let event = AccountEvent::Created {
            email: "ann@example.com".to_string(),
            name: "Ann".to_string(),
        };

        assert_eq!(event.recipient(), "ann@example.com");
        assert_eq!(event.subject(), "Thanks for joining in!");
        assert!(event.body().contains("Ann"));
    }

    #[test]
    fn test_event_serialization_tags_kind() {
        let event = AccountEvent::Deleted {
            email: "ann@example.com".to_string(),
            name: "Ann".to_string(),
        };

        let value = serde_json::to_value(&event).expect("should serialize");
        assert_eq!(value["kind"], "deleted");
        assert_eq!(value["email"], "ann@example.com");
    }
}
