//! # CLI Templates
//!
//! Terminal output goes through minijinja templates kept as standalone files
//! under `templates/`, so they can be edited and diffed without touching Rust.
//! They are embedded here as string constants.
//!
//! Templates emit explicit line breaks and strip the whitespace around tags
//! (`{%-`, `-%}`), which keeps blank lines predictable inside loops. Layout
//! math (column widths, truncation) happens in Rust; templates only choose
//! semantic styles.

pub const LIST_TEMPLATE: &str = include_str!("templates/list.tmp");
pub const PERSON_TEMPLATE: &str = include_str!("templates/person.tmp");
pub const MESSAGES_TEMPLATE: &str = include_str!("templates/messages.tmp");
pub const CONFIG_TEMPLATE: &str = include_str!("templates/config.tmp");
pub const WATCH_HEADER_TEMPLATE: &str = include_str!("templates/watch_header.tmp");
