//! Styles for the pessoas CLI.
//!
//! Templates never name colors. They name *semantic* styles (`person-name`,
//! `age`, `success`...) through the `style` filter, and this module maps each
//! name to a `console::Style`. Changing the look of the CLI means editing the
//! theme below, not the templates.
//!
//! When color is off (piped output, `--no-color`), the filter still checks the
//! style name and prefixes unknown names with [`MISSING_STYLE_INDICATOR`], so a
//! typo in a template shows up in plain-text tests too.

use console::Style;
use minijinja::{Environment, Value};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const MISSING_STYLE_INDICATOR: &str = "(!?)";

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const MUTED: &str = "muted";
    pub const TITLE: &str = "title";
    pub const ERROR: &str = "error";
    pub const SUCCESS: &str = "success";
    pub const INFO: &str = "info";
    pub const PERSON_ID: &str = "person-id";
    pub const PERSON_NAME: &str = "person-name";
    pub const AGE: &str = "age";
    pub const COUNT: &str = "count";
    pub const EMPTY: &str = "empty";
    pub const CONFIG_KEY: &str = "config-key";
}

/// A named set of styles.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    styles: HashMap<&'static str, Style>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &'static str, style: Style) -> Self {
        self.styles.insert(name, style);
        self
    }

    pub fn apply(&self, name: &str, text: &str, use_color: bool) -> String {
        match self.styles.get(name) {
            Some(style) if use_color => style.apply_to(text).force_styling(true).to_string(),
            Some(_) => text.to_string(),
            None => format!("{} {}", MISSING_STYLE_INDICATOR, text),
        }
    }
}

pub static PESSOAS_THEME: Lazy<Theme> = Lazy::new(build_theme);

fn build_theme() -> Theme {
    let muted = Style::new().color256(rgb_to_ansi256((140, 140, 140)));
    let accent = Style::new().color256(rgb_to_ansi256((0, 135, 175)));

    Theme::new()
        .add(names::MUTED, muted.clone())
        .add(names::TITLE, Style::new().bold())
        .add(names::ERROR, Style::new().red().bold())
        .add(names::SUCCESS, Style::new().green())
        .add(names::INFO, muted.clone())
        .add(names::PERSON_ID, accent.clone())
        .add(names::PERSON_NAME, Style::new())
        .add(names::AGE, muted.clone().italic())
        .add(names::COUNT, accent.bold())
        .add(names::EMPTY, muted.italic())
        .add(names::CONFIG_KEY, Style::new().cyan())
}

/// Registers the `style` filter on a template environment.
pub fn register_style_filter(env: &mut Environment<'static>, theme: Theme, use_color: bool) {
    env.add_filter("style", move |value: Value, name: String| -> String {
        theme.apply(&name, &value.to_string(), use_color)
    });
}

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mode_leaves_text_alone() {
        let out = PESSOAS_THEME.apply(names::SUCCESS, "ok", false);
        assert_eq!(out, "ok");
    }

    #[test]
    fn color_mode_emits_ansi() {
        let out = PESSOAS_THEME.apply(names::ERROR, "boom", true);
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("boom"));
    }

    #[test]
    fn unknown_style_is_flagged() {
        let out = PESSOAS_THEME.apply("no-such-style", "x", false);
        assert_eq!(out, "(!?) x");
    }

    #[test]
    fn every_name_is_registered() {
        for name in [
            names::MUTED,
            names::TITLE,
            names::ERROR,
            names::SUCCESS,
            names::INFO,
            names::PERSON_ID,
            names::PERSON_NAME,
            names::AGE,
            names::COUNT,
            names::EMPTY,
            names::CONFIG_KEY,
        ] {
            let out = PESSOAS_THEME.apply(name, "x", false);
            assert_eq!(out, "x", "{}", name);
        }
    }

    #[test]
    fn ansi256_greys_and_colors() {
        assert_eq!(rgb_to_ansi256((0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256((255, 255, 255)), 231);
        assert_eq!(rgb_to_ansi256((255, 0, 0)), 196);
    }
}
