//! View state and the user actions that drive it.

use std::sync::Arc;

use shared::{
    domain::{parse_tags, Category, Entry, NewEntry, Session, UserId},
    protocol::Ordering,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{error::GatewayError, BackendGateway};

pub const SIGN_IN_REQUIRED: &str = "Please log in";

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("must be signed in to post")]
    NotSignedIn,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticating,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub message: String,
    pub description: String,
    pub category: Category,
    /// Comma-separated, as typed.
    pub tags: String,
}

impl EntryDraft {
    pub fn to_new_entry(&self, owner_id: UserId) -> NewEntry {
        NewEntry {
            message: self.message.clone(),
            description: self.description.clone(),
            category: self.category,
            tags: parse_tags(&self.tags),
            owner_id,
        }
    }

    /// Clears the text fields after a successful post; the category sticks.
    fn clear_text(&mut self) {
        self.message.clear();
        self.description.clear();
        self.tags.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    entries: Vec<Entry>,
    session: Option<Session>,
    signing_in: bool,
    submitting: bool,
    pub credentials: CredentialsForm,
    pub draft: EntryDraft,
    pub notice: Option<Notice>,
}

impl ViewState {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Replaces the list wholesale with what the store returned.
    pub fn set_entries(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signing_in(&self) -> bool {
        self.signing_in
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn session_status(&self) -> SessionStatus {
        if self.signing_in {
            SessionStatus::Authenticating
        } else if self.session.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    pub fn form_status(&self) -> FormStatus {
        if self.submitting {
            FormStatus::Submitting
        } else {
            FormStatus::Idle
        }
    }
}

type Observer = Box<dyn Fn(&ViewState) + Send + Sync>;

pub struct ViewController {
    gateway: Arc<dyn BackendGateway>,
    state: ViewState,
    observer: Option<Observer>,
}

impl ViewController {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            gateway,
            state: ViewState::default(),
            observer: None,
        }
    }

    /// Called whenever a busy flag flips, so a view can show progress while a
    /// round trip is in flight.
    pub fn with_observer(
        mut self,
        observer: impl Fn(&ViewState) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer(&self.state);
        }
    }

    /// Initial load: entries first, then the session. Failures are already
    /// logged by each step.
    pub async fn start(&mut self) {
        let _ = self.load_entries().await;
        let _ = self.refresh_session().await;
    }

    pub async fn load_entries(&mut self) -> Result<(), ActionError> {
        match self.gateway.list_entries(&Ordering::NEWEST_FIRST).await {
            Ok(entries) => {
                self.state.set_entries(entries);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Error loading commits");
                Err(err.into())
            }
        }
    }

    pub async fn refresh_session(&mut self) -> Result<(), ActionError> {
        match self.gateway.current_session().await {
            Ok(session) => {
                self.state.session = session;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch current user");
                self.state.session = None;
                Err(err.into())
            }
        }
    }

    pub async fn submit_entry(&mut self) -> Result<(), ActionError> {
        let Some(owner_id) = self.state.session.as_ref().map(|s| s.user_id) else {
            self.state.notice = Some(Notice::Error(SIGN_IN_REQUIRED.to_string()));
            return Err(ActionError::NotSignedIn);
        };

        let entry = self.state.draft.to_new_entry(owner_id);
        self.state.submitting = true;
        self.notify();
        let result = self.gateway.insert_entry(&entry).await;
        self.state.submitting = false;
        self.notify();

        match result {
            Ok(()) => {
                self.state.draft.clear_text();
                self.state.notice = Some(Notice::Info("Commit posted".to_string()));
                let _ = self.load_entries().await;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Failed to add commit");
                self.state.notice = Some(Notice::Error(format!("Failed to add commit: {err}")));
                Err(err.into())
            }
        }
    }

    pub async fn sign_in(&mut self) -> Result<(), ActionError> {
        let email = self.state.credentials.email.trim().to_string();
        let password = self.state.credentials.password.clone();

        self.state.signing_in = true;
        self.notify();
        let result = self.gateway.sign_in(&email, &password).await;
        self.state.signing_in = false;
        self.notify();

        match result {
            Ok(_) => {
                self.state.credentials.password.clear();
                if let Err(err) = self.refresh_session().await {
                    self.state.notice = Some(Notice::Error(format!("Login failed: {err}")));
                    return Err(err);
                }
                if let Some(session) = &self.state.session {
                    let who = session
                        .email
                        .clone()
                        .unwrap_or_else(|| session.user_id.to_string());
                    self.state.notice = Some(Notice::Info(format!("Signed in as {who}")));
                }
                Ok(())
            }
            Err(err) => {
                info!(error = %err, "sign-in rejected");
                self.state.session = None;
                self.state.notice = Some(Notice::Error(format!("Login failed: {err}")));
                Err(err.into())
            }
        }
    }

    /// Always ends signed out locally, whatever the backend says.
    pub async fn sign_out(&mut self) {
        if let Err(err) = self.gateway.sign_out().await {
            warn!(error = %err, "sign-out call failed; clearing local session anyway");
        }
        self.state.session = None;
        self.state.notice = Some(Notice::Info("Signed out".to_string()));
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
