//! # Rendering
//!
//! Turns library values ([`PeopleView`], [`PersonCard`], toasts) into styled
//! terminal text.
//!
//! Column layout (alignment, truncation, padding) stays in Rust because it
//! needs Unicode-aware widths. Templates only pick semantic styles. Every
//! `render_*` function takes `use_color: Option<bool>`: `None` detects the
//! terminal, `Some(_)` forces a mode (`--no-color`, tests).

use super::styles::{names, register_style_filter, PESSOAS_THEME};
use super::templates::{
    CONFIG_TEMPLATE, LIST_TEMPLATE, MESSAGES_TEMPLATE, PERSON_TEMPLATE, WATCH_HEADER_TEMPLATE,
};
use console::Term;
use minijinja::Environment;
use pessoas::notify::{Toast, ToastKind};
use pessoas::view::{PeopleView, PersonCard};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Names longer than this are cut with an ellipsis.
pub const NAME_WIDTH: usize = 40;

pub const EMPTY_COLLECTION: &str = "Nenhuma pessoa cadastrada.";
pub const NO_MATCHES: &str = "Nenhuma pessoa encontrada.";
pub const LOADING_LABEL: &str = "atualizando…";

#[derive(Serialize)]
struct PersonLine {
    id: String,
    nome: String,
    padding: String,
    age_label: String,
}

#[derive(Serialize)]
struct ListData {
    lines: Vec<PersonLine>,
    empty: bool,
    empty_message: &'static str,
    summary: String,
}

#[derive(Serialize)]
struct PersonData<'a> {
    person: &'a PersonCard,
}

#[derive(Serialize)]
struct MessageData {
    content: String,
    style: &'static str,
}

#[derive(Serialize)]
struct MessagesData {
    messages: Vec<MessageData>,
}

#[derive(Serialize)]
struct ConfigEntry {
    key: String,
    value: String,
}

#[derive(Serialize)]
struct ConfigData {
    entries: Vec<ConfigEntry>,
}

#[derive(Serialize)]
struct WatchHeaderData {
    title: &'static str,
    loading: Option<&'static str>,
    hint: String,
}

fn render_template<T: Serialize>(
    name: &'static str,
    source: &'static str,
    data: &T,
    use_color: Option<bool>,
) -> Result<String, minijinja::Error> {
    let use_color = use_color.unwrap_or_else(|| Term::stdout().features().colors_supported());
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    register_style_filter(&mut env, PESSOAS_THEME.clone(), use_color);
    env.add_template(name, source)?;
    env.get_template(name)?.render(data)
}

/// Renders the people list, or its empty-state placeholder, followed by a
/// count line. The count always refers to the whole loaded collection.
pub fn render_people(view: &PeopleView, use_color: Option<bool>) -> String {
    let id_width = view
        .cards
        .iter()
        .map(|c| c.id.to_string().len())
        .max()
        .unwrap_or(1);
    let name_width = view
        .cards
        .iter()
        .map(|c| c.nome.width())
        .max()
        .unwrap_or(0)
        .min(NAME_WIDTH);

    let lines = view
        .cards
        .iter()
        .map(|card| {
            let nome = truncate_to_width(&card.nome, name_width);
            let padding = " ".repeat(name_width.saturating_sub(nome.width()));
            PersonLine {
                id: format!("{:>width$}", card.id, width = id_width),
                nome,
                padding,
                age_label: card.age_label.clone(),
            }
        })
        .collect();

    let data = ListData {
        lines,
        empty: view.empty,
        empty_message: if view.total == 0 {
            EMPTY_COLLECTION
        } else {
            NO_MATCHES
        },
        summary: summary_line(view.cards.len(), view.total),
    };

    render_template("list.tmp", LIST_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

fn summary_line(visible: usize, total: usize) -> String {
    if visible == total {
        format!("Total: {}", count_people(total))
    } else {
        format!("Mostrando {} de {}", visible, count_people(total))
    }
}

fn count_people(n: usize) -> String {
    if n == 1 {
        "1 pessoa".to_string()
    } else {
        format!("{} pessoas", n)
    }
}

pub fn render_person(card: &PersonCard, use_color: Option<bool>) -> String {
    render_template(
        "person.tmp",
        PERSON_TEMPLATE,
        &PersonData { person: card },
        use_color,
    )
    .unwrap_or_else(|_| format!("{} {} {}\n", card.id, card.nome, card.age_label))
}

/// Renders toasts, one per line, in the order they were raised.
pub fn render_toasts(toasts: &[Toast], use_color: Option<bool>) -> String {
    if toasts.is_empty() {
        return String::new();
    }

    let messages = toasts
        .iter()
        .map(|toast| MessageData {
            content: toast.message.clone(),
            style: match toast.kind {
                ToastKind::Success => names::SUCCESS,
                ToastKind::Error => names::ERROR,
                ToastKind::Info => names::INFO,
            },
        })
        .collect();

    render_template(
        "messages.tmp",
        MESSAGES_TEMPLATE,
        &MessagesData { messages },
        use_color,
    )
    .unwrap_or_else(|_| toasts.iter().map(|t| format!("{}\n", t.message)).collect())
}

pub fn render_config(entries: &[(&str, String)], use_color: Option<bool>) -> String {
    let data = ConfigData {
        entries: entries
            .iter()
            .map(|(key, value)| ConfigEntry {
                key: key.to_string(),
                value: value.clone(),
            })
            .collect(),
    };
    render_template("config.tmp", CONFIG_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

/// Title line for `watch`. `loading` adds the busy label while any request
/// is in flight.
pub fn render_watch_header(interval_secs: u64, loading: bool, use_color: Option<bool>) -> String {
    let data = WatchHeaderData {
        title: "Pessoas",
        loading: loading.then_some(LOADING_LABEL),
        hint: format!("(atualiza a cada {}s, Ctrl+C para sair)", interval_secs),
    };
    render_template("watch_header.tmp", WATCH_HEADER_TEMPLATE, &data, use_color)
        .unwrap_or_else(|e| format!("Render error: {}\n", e))
}

/// One full `watch` screen: header, list, then any live toasts.
pub fn render_watch_frame(
    view: &PeopleView,
    toasts: &[Toast],
    interval_secs: u64,
    loading: bool,
    use_color: Option<bool>,
) -> String {
    let mut frame = render_watch_header(interval_secs, loading, use_color);
    frame.push_str(&render_people(view, use_color));
    if !toasts.is_empty() {
        frame.push('\n');
        frame.push_str(&render_toasts(toasts, use_color));
    }
    frame
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
