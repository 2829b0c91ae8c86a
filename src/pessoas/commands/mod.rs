//! # Command Layer
//!
//! One module per user action. Each command talks to the server through an
//! [`ApiClient`](crate::api::ApiClient) and returns a [`CmdResult`] the caller
//! can present however it likes.
//!
//! Mutating commands follow one rule: **mutate, then reload the full list**.
//! The reload result travels back in [`CmdResult::people`] so the caller can
//! replace its snapshot wholesale. A failed reload does not undo a successful
//! mutation; it is surfaced by the API layer and `people` is left empty.

use crate::api::ApiClient;
use crate::model::Person;
use crate::notify::ToastKind;
use crate::transport::Transport;

pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod list;
pub mod search;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub kind: ToastKind,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Record returned by the server for single-record operations.
    pub person: Option<Person>,
    /// Fresh full snapshot, when one was (re)loaded.
    pub people: Option<Vec<Person>>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_person(mut self, person: Person) -> Self {
        self.person = Some(person);
        self
    }

    pub fn with_people(mut self, people: Vec<Person>) -> Self {
        self.people = Some(people);
        self
    }
}

/// Reloads the collection after a mutation. Errors were already reported by
/// the API layer, so they only cost the snapshot.
pub(crate) async fn reload_after_mutation<T: Transport>(
    api: &ApiClient<T>,
    result: CmdResult,
) -> CmdResult {
    match list::fetch(api).await {
        Ok(people) => result.with_people(people),
        Err(_) => result,
    }
}
