use std::sync::{Arc, Mutex};

use rand::Rng;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::events::{AuthEvent, AuthEvents};
use crate::errors::AppError;
use crate::models::auth::User;
use crate::models::profile::{NewProfile, Profile};
use crate::session::directory::ProfileDirectory;

const DEFAULT_FULL_NAME: &str = "Anonymous User";

/// Everything a request knows about its caller.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub user: User,
    /// `None` when hydration failed; profile-dependent operations then
    /// treat the caller as signed out.
    pub profile: Option<Profile>,
    pub is_company_admin: bool,
}

impl SessionState {
    pub fn require_profile(&self) -> Result<&Profile, AppError> {
        self.profile.as_ref().ok_or(AppError::Unauthorized)
    }
}

/// `Anonymous` followed by a random number below 10000. Not collision-checked.
pub fn generate_anonymous_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("Anonymous{}", rng.gen_range(0..10_000))
}

/// Application-wide session context.
///
/// `start` subscribes to auth events and hydrates profiles as users sign in;
/// `shutdown` unsubscribes. Requests call `resolve` directly.
pub struct SessionContext {
    directory: Arc<dyn ProfileDirectory>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionContext {
    pub fn new(directory: Arc<dyn ProfileDirectory>) -> Self {
        Self {
            directory,
            listener: Mutex::new(None),
        }
    }

    pub fn start(&self, events: &AuthEvents) {
        let mut rx = events.subscribe();
        let directory = Arc::clone(&self.directory);

        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(AuthEvent::SignedIn { user }) => {
                        let state = hydrate(directory.as_ref(), user).await;
                        debug!(
                            "Hydrated session for {} (profile: {}, company admin: {})",
                            state.user.id,
                            state.profile.is_some(),
                            state.is_company_admin
                        );
                    }
                    Ok(AuthEvent::SignedOut { user_id }) => {
                        debug!("Session ended for {user_id}");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Session listener lagged, skipped {skipped} auth events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let mut slot = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
        info!("Session context started");
    }

    pub fn shutdown(&self) {
        let mut slot = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
            info!("Session context stopped");
        }
    }

    pub async fn resolve(&self, user: User) -> SessionState {
        hydrate(self.directory.as_ref(), user).await
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Resolves the caller's profile (creating it on first sign-in) and the
/// company-admin flag. Lookup failures are logged and swallowed.
pub async fn hydrate(directory: &dyn ProfileDirectory, user: User) -> SessionState {
    let profile = match find_or_create_profile(directory, &user).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("Error fetching/creating profile for {}: {e}", user.id);
            None
        }
    };

    let is_company_admin = match directory.is_company_admin(user.id).await {
        Ok(flag) => flag,
        Err(e) => {
            warn!("Error checking company admin status for {}: {e}", user.id);
            false
        }
    };

    SessionState {
        user,
        profile,
        is_company_admin,
    }
}

async fn find_or_create_profile(
    directory: &dyn ProfileDirectory,
    user: &User,
) -> Result<Profile, AppError> {
    if let Some(profile) = directory.find_profile(user.id).await? {
        return Ok(profile);
    }

    let anonymous_name = generate_anonymous_name(&mut rand::thread_rng());
    info!("Creating profile for {} as {anonymous_name}", user.id);

    directory
        .insert_profile(NewProfile {
            id: user.id,
            email: user.email.clone(),
            full_name: user
                .full_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FULL_NAME.to_string()),
            anonymous_name: Some(anonymous_name),
        })
        .await
}
