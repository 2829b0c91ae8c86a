//! # People Client
//!
//! [`PeopleClient`] is the entry point for every frontend. It owns:
//!
//! - the explicit [`ClientState`] container (cached collection, search term,
//!   dialog states),
//! - the [`ApiClient`] every command goes through,
//! - the shared [`Notifications`] stack.
//!
//! ## Snapshot Semantics
//!
//! The cached list is never patched or diffed. Every successful mutation is
//! followed by a full reload and the snapshot is replaced wholesale. Reloads
//! triggered by the poller and by user actions may overlap; whichever
//! completes last is what stays on screen.
//!
//! ## Locking
//!
//! State sits behind a `std::sync::Mutex` that is only held for short,
//! synchronous reads and writes, never across an `.await`. The client can be
//! shared through an `Arc` between a UI task and the poller.

use crate::api::{ApiClient, LoadingTracker};
use crate::commands::{self, CmdResult};
use crate::config::ClientConfig;
use crate::error::{PessoasError, Result};
use crate::form::{ConfirmDialog, Key, PersonModal};
use crate::model::{Person, PersonInput};
use crate::notify::Notifications;
use crate::transport::http::HttpTransport;
use crate::transport::Transport;
use crate::view::{self, PeopleView};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub people: Vec<Person>,
    pub search_term: String,
    pub modal: PersonModal,
    pub confirm: ConfirmDialog,
}

/// What a form submission did.
#[derive(Debug)]
pub enum SubmitOutcome {
    Created(CmdResult),
    Updated(CmdResult),
}

pub struct PeopleClient<T: Transport> {
    api: ApiClient<T>,
    state: Mutex<ClientState>,
}

impl PeopleClient<HttpTransport> {
    /// Production client over HTTP.
    pub fn connect(config: &ClientConfig) -> Self {
        let transport = HttpTransport::new(&config.base_url, config.timeout());
        Self::new(
            transport,
            &config.resource,
            Notifications::new(config.toast_ttl()),
        )
    }
}

impl<T: Transport> PeopleClient<T> {
    pub fn new(transport: T, resource: &str, notifications: Notifications) -> Self {
        Self {
            api: ApiClient::new(transport, resource, notifications),
            state: Mutex::new(ClientState::default()),
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn notifications(&self) -> &Notifications {
        self.api.notifications()
    }

    pub fn loading(&self) -> &LoadingTracker {
        self.api.loading()
    }

    /// Copy of the current state.
    pub fn state(&self) -> ClientState {
        self.lock().clone()
    }

    pub fn people(&self) -> Vec<Person> {
        self.lock().people.clone()
    }

    // --- data operations ---

    /// Fetches the full collection and replaces the snapshot.
    pub async fn reload(&self) -> Result<usize> {
        let people = commands::list::fetch(&self.api).await?;
        let count = people.len();
        self.lock().people = people;
        debug!(count, "collection reloaded");
        Ok(count)
    }

    pub async fn get(&self, id: u64) -> Result<Person> {
        let result = commands::get::run(&self.api, id).await?;
        result
            .person
            .ok_or_else(|| PessoasError::api(404, None))
    }

    pub async fn create(&self, input: &PersonInput) -> Result<CmdResult> {
        let result = commands::create::run(&self.api, input).await?;
        self.apply(&result);
        Ok(result)
    }

    pub async fn update(&self, id: u64, input: &PersonInput) -> Result<CmdResult> {
        let result = commands::update::run(&self.api, id, input).await?;
        self.apply(&result);
        Ok(result)
    }

    pub async fn delete(&self, id: u64) -> Result<CmdResult> {
        let result = commands::delete::run(&self.api, id).await?;
        self.apply(&result);
        Ok(result)
    }

    pub async fn export(&self) -> Result<CmdResult> {
        let result = commands::export::run(&self.api).await?;
        self.apply(&result);
        Ok(result)
    }

    fn apply(&self, result: &CmdResult) {
        if let Some(people) = &result.people {
            self.lock().people = people.clone();
        }
        for message in &result.messages {
            self.notifications().push(message.kind, message.content.clone());
        }
    }

    // --- rendering ---

    pub fn set_search(&self, term: &str) {
        self.lock().search_term = term.to_string();
    }

    pub fn search_term(&self) -> String {
        self.lock().search_term.clone()
    }

    /// Filtered cards plus the unfiltered total.
    pub fn view(&self) -> PeopleView {
        let state = self.lock();
        let visible = commands::search::filter(&state.people, &state.search_term);
        view::render(&visible, state.people.len())
    }

    // --- person form ---

    pub fn modal(&self) -> PersonModal {
        self.lock().modal.clone()
    }

    pub fn open_create(&self) {
        self.lock().modal.open_create();
    }

    /// Opens the form pre-filled from the cached record. Does nothing and
    /// returns false when `id` is no longer in the snapshot.
    pub fn open_edit(&self, id: u64) -> bool {
        let mut state = self.lock();
        let Some(person) = state.people.iter().find(|p| p.id == id).cloned() else {
            debug!(id, "edit requested for a record that is no longer loaded");
            return false;
        };
        state.modal.open_edit(&person);
        true
    }

    pub fn close_modal(&self) {
        self.lock().modal.close();
    }

    /// Validates and submits the form.
    ///
    /// Invalid input is reported, focus moves to the offending field and no
    /// request is made. On success the modal closes; on an API failure it
    /// stays open so the user can retry.
    pub async fn submit(&self, name: &str, age: &str) -> Result<SubmitOutcome> {
        let editing = {
            let mut state = self.lock();
            state.modal.set_input(name, age);
            state.modal.editing_id()
        };

        let input = match crate::form::validate(name, age) {
            Ok(input) => input,
            Err(invalid) => {
                self.lock().modal.set_focus(invalid.field);
                self.notifications().error(invalid.message.clone());
                return Err(invalid.into());
            }
        };

        let outcome = match editing {
            Some(id) => SubmitOutcome::Updated(self.update(id, &input).await?),
            None => SubmitOutcome::Created(self.create(&input).await?),
        };
        self.close_modal();
        Ok(outcome)
    }

    // --- delete confirmation ---

    pub fn confirm_dialog(&self) -> ConfirmDialog {
        self.lock().confirm.clone()
    }

    /// Opens the confirmation for a cached record. Returns false when the
    /// record is no longer loaded.
    pub fn request_delete(&self, id: u64) -> bool {
        let mut state = self.lock();
        let Some(nome) = state
            .people
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.nome.clone())
        else {
            return false;
        };
        state.confirm = ConfirmDialog::open(id, &nome);
        true
    }

    /// Performs the pending delete, if any. The dialog closes right away,
    /// whatever the outcome.
    pub async fn confirm_delete(&self) -> Result<Option<CmdResult>> {
        let pending = std::mem::take(&mut self.lock().confirm).pending_id();
        match pending {
            Some(id) => self.delete(id).await.map(Some),
            None => Ok(None),
        }
    }

    pub fn cancel_delete(&self) {
        self.lock().confirm = ConfirmDialog::Closed;
    }

    pub fn handle_key(&self, key: Key) {
        let mut state = self.lock();
        match key {
            Key::Escape => {
                state.modal.close();
                state.confirm = ConfirmDialog::Closed;
            }
            Key::NewPerson => state.modal.open_create(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
