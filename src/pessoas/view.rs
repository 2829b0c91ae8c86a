//! Pure view model for the people list.
//!
//! `render` never touches a terminal or a DOM. Frontends turn a [`PeopleView`]
//! into output; the CLI does it through templates in `cli/render.rs`.

use crate::model::Person;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonCard {
    pub id: u64,
    /// Name made safe for display.
    pub nome: String,
    pub idade: u32,
    pub age_label: String,
}

impl PersonCard {
    pub fn from_person(person: &Person) -> Self {
        Self {
            id: person.id,
            nome: sanitize_display(&person.nome),
            idade: person.idade,
            age_label: format!("{} anos", person.idade),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeopleView {
    pub cards: Vec<PersonCard>,
    /// True when there is nothing to show: the placeholder replaces the list.
    pub empty: bool,
    /// Size of the last loaded collection, regardless of any filter.
    pub total: usize,
}

/// Builds the view for `visible` records. `total` is the unfiltered count.
pub fn render(visible: &[Person], total: usize) -> PeopleView {
    PeopleView {
        cards: visible.iter().map(PersonCard::from_person).collect(),
        empty: visible.is_empty(),
        total,
    }
}

/// Replaces control characters (ESC included) so a name can never inject
/// terminal escape sequences.
pub fn sanitize_display(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}

/// Escapes text for inclusion in HTML markup.
///
/// Only frontends that emit markup need this. Cards already carry
/// control-character-free text, which is all a terminal requires, so the CLI
/// prints them as they are.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_shows_placeholder() {
        let view = render(&[], 0);
        assert!(view.empty);
        assert!(view.cards.is_empty());
        assert_eq!(view.total, 0);
    }

    #[test]
    fn one_card_per_person_in_order() {
        let people = vec![Person::new(2, "Bia", 20), Person::new(1, "Ana", 30)];
        let view = render(&people, people.len());
        assert!(!view.empty);
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].id, 2);
        assert_eq!(view.cards[1].age_label, "30 anos");
    }

    #[test]
    fn total_is_independent_of_visible_cards() {
        let view = render(&[Person::new(1, "Ana", 30)], 5);
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.total, 5);

        let filtered_out = render(&[], 5);
        assert!(filtered_out.empty);
        assert_eq!(filtered_out.total, 5);
    }

    #[test]
    fn names_are_sanitized() {
        let card = PersonCard::from_person(&Person::new(1, "Ana\u{1b}[31m\n", 3));
        assert!(!card.nome.contains('\u{1b}'));
        assert!(!card.nome.contains('\n'));
        assert!(card.nome.starts_with("Ana"));
    }

    #[test]
    fn html_escaping() {
        assert_eq!(
            escape_html(r#"<b>"Ana" & 'Bia'</b>"#),
            "&lt;b&gt;&quot;Ana&quot; &amp; &#39;Bia&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("João"), "João");
    }
}
