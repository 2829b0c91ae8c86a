//! Client-side search over the loaded snapshot.
//!
//! A record matches when its name contains the term case-insensitively, or
//! when the decimal form of its age contains the term as typed. A blank term
//! matches everything.

use crate::commands::CmdResult;
use crate::model::Person;

pub fn matches(person: &Person, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    person.nome.to_lowercase().contains(&term.to_lowercase())
        || person.idade.to_string().contains(term)
}

/// Keeps list order. Blank terms return the input unchanged.
pub fn filter(people: &[Person], term: &str) -> Vec<Person> {
    if term.trim().is_empty() {
        return people.to_vec();
    }
    people
        .iter()
        .filter(|p| matches(p, term))
        .cloned()
        .collect()
}

/// Filters an already loaded list. No request is made.
pub fn run(people: &[Person], term: &str) -> CmdResult {
    CmdResult::default().with_people(filter(people, term))
}
