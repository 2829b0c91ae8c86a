//! # Dialog State
//!
//! Two independent dialogs drive every edit:
//!
//! ```text
//! PersonModal:   Closed ──open_create──▶ OpenForCreate ──close──▶ Closed
//!                Closed ──open_edit(p)─▶ OpenForEdit(id) ─close─▶ Closed
//!
//! ConfirmDialog: Closed ──open(id, nome)──▶ Open ──confirm/cancel──▶ Closed
//! ```
//!
//! Submitting the person form is validated locally first; invalid input never
//! reaches the network. Whether a submit creates or updates is decided by the
//! modal state alone.

use crate::model::{Person, PersonInput, MAX_AGE, MIN_AGE};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub const NAME_REQUIRED: &str = "Nome é obrigatório";
pub const AGE_OUT_OF_RANGE: &str = "Idade deve ser um número entre 0 e 150";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Age,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => f.write_str("nome"),
            Field::Age => f.write_str("idade"),
        }
    }
}

/// A local precondition failure. `field` is where focus should go.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    fn new(field: Field, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Validates raw form input. Name is trimmed; age must be a base-10 integer
/// within the accepted range.
pub fn validate(name: &str, age: &str) -> Result<PersonInput, ValidationError> {
    let nome = name.trim();
    if nome.is_empty() {
        return Err(ValidationError::new(Field::Name, NAME_REQUIRED));
    }

    let idade = age
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|a| (i64::from(MIN_AGE)..=i64::from(MAX_AGE)).contains(a))
        .ok_or_else(|| ValidationError::new(Field::Age, AGE_OUT_OF_RANGE))?;

    Ok(PersonInput::new(nome, idade as u32))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    OpenForCreate,
    OpenForEdit(u64),
}

/// The create/edit form: state plus the field values it was opened with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonModal {
    state: ModalState,
    name: String,
    age: String,
    focus: Option<Field>,
}

impl PersonModal {
    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    /// Id being edited, if any. Decides create vs update on submit.
    pub fn editing_id(&self) -> Option<u64> {
        match self.state {
            ModalState::OpenForEdit(id) => Some(id),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> &str {
        &self.age
    }

    pub fn focus(&self) -> Option<Field> {
        self.focus
    }

    pub fn title(&self) -> &'static str {
        match self.state {
            ModalState::OpenForEdit(_) => "Editar Pessoa",
            _ => "Nova Pessoa",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.state {
            ModalState::OpenForEdit(_) => "Atualizar",
            _ => "Criar",
        }
    }

    pub fn open_create(&mut self) {
        self.state = ModalState::OpenForCreate;
        self.name.clear();
        self.age.clear();
        self.focus = Some(Field::Name);
    }

    pub fn open_edit(&mut self, person: &Person) {
        self.state = ModalState::OpenForEdit(person.id);
        self.name = person.nome.clone();
        self.age = person.idade.to_string();
        self.focus = Some(Field::Name);
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Records what the user typed and where focus landed after a failed check.
    pub fn set_input(&mut self, name: &str, age: &str) {
        self.name = name.to_string();
        self.age = age.to_string();
    }

    pub fn set_focus(&mut self, field: Field) {
        self.focus = Some(field);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfirmDialog {
    #[default]
    Closed,
    Open { id: u64, nome: String },
}

impl ConfirmDialog {
    pub fn open(id: u64, nome: &str) -> Self {
        ConfirmDialog::Open {
            id,
            nome: nome.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ConfirmDialog::Open { .. })
    }

    pub fn pending_id(&self) -> Option<u64> {
        match self {
            ConfirmDialog::Open { id, .. } => Some(*id),
            ConfirmDialog::Closed => None,
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            ConfirmDialog::Open { nome, .. } => {
                Some(format!("Tem certeza que deseja excluir \"{}\"?", nome))
            }
            ConfirmDialog::Closed => None,
        }
    }
}

/// Global shortcuts for frontends that keep dialogs on screen, fed to
/// [`PeopleClient::handle_key`](crate::client::PeopleClient::handle_key).
/// The CLI asks one question per command and has no use for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Closes both dialogs and discards a pending delete.
    Escape,
    /// Ctrl+N: open the create form.
    NewPerson,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_ages() {
        assert_eq!(validate("Ana", "0").unwrap(), PersonInput::new("Ana", 0));
        assert_eq!(validate("Ana", "150").unwrap(), PersonInput::new("Ana", 150));
        assert_eq!(validate("  Ana  ", " 42 ").unwrap().nome, "Ana");
    }

    #[test]
    fn rejects_out_of_range_ages() {
        for age in ["-1", "151", "", "abc", "12.5", "99999999999999999999"] {
            let err = validate("Ana", age).unwrap_err();
            assert_eq!(err.field, Field::Age, "age {:?}", age);
            assert_eq!(err.message, AGE_OUT_OF_RANGE);
        }
    }

    #[test]
    fn rejects_blank_names_before_age() {
        let err = validate("   ", "abc").unwrap_err();
        assert_eq!(err.field, Field::Name);
        assert_eq!(err.to_string(), NAME_REQUIRED);
    }

    #[test]
    fn modal_create_and_edit() {
        let mut modal = PersonModal::default();
        assert!(!modal.is_open());

        modal.open_create();
        assert_eq!(modal.state(), ModalState::OpenForCreate);
        assert_eq!(modal.title(), "Nova Pessoa");
        assert_eq!(modal.submit_label(), "Criar");
        assert_eq!(modal.editing_id(), None);
        assert_eq!(modal.focus(), Some(Field::Name));

        modal.open_edit(&Person::new(5, "Ana", 30));
        assert_eq!(modal.editing_id(), Some(5));
        assert_eq!(modal.title(), "Editar Pessoa");
        assert_eq!(modal.submit_label(), "Atualizar");
        assert_eq!(modal.name(), "Ana");
        assert_eq!(modal.age(), "30");

        modal.close();
        assert_eq!(modal, PersonModal::default());
    }

    #[test]
    fn confirm_dialog_message() {
        let dialog = ConfirmDialog::open(3, "Ana");
        assert!(dialog.is_open());
        assert_eq!(dialog.pending_id(), Some(3));
        assert_eq!(
            dialog.message().unwrap(),
            "Tem certeza que deseja excluir \"Ana\"?"
        );
        assert_eq!(ConfirmDialog::Closed.message(), None);
    }
}
