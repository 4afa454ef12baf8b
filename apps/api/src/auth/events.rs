use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::auth::User;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn { user: User },
    SignedOut { user_id: Uuid },
}

/// Auth-state change notifications. Subscribers receive every event
/// published after they subscribe.
#[derive(Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: AuthEvent) {
        // No subscribers is not an error.
        if self.tx.send(event).is_err() {
            debug!("Auth event dropped: no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
