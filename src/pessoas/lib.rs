//! # Pessoas Architecture
//!
//! Pessoas is a **UI-agnostic client** for a `pessoas` (people) REST resource:
//! list, search, create, edit, delete and export records with a name and an
//! age. The terminal binary is one frontend; nothing in the library assumes it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders templates, owns exit codes     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (client.rs)                                         │
//! │  - State container: snapshot, search term, dialogs          │
//! │  - Command handlers: mutate, reload, repaint                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per action, returns CmdResult                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - JSON headers, loading count, notify-then-raise errors    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport Layer (transport/)                               │
//! │  - HttpTransport (reqwest), MemoryTransport (testing)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `client.rs` inward, code never writes to stdout/stderr, never exits
//! the process and never assumes a terminal. User feedback goes into the
//! [`notify::Notifications`] stack and rendering goes through the pure
//! [`view::render`].
//!
//! ## Consistency Model
//!
//! The client holds a snapshot of the whole collection and replaces it after
//! every successful mutation. Other clients' changes show up through the
//! [`poller`] or a manual reload. Overlapping reloads are benign: the last one
//! to complete wins.
//!
//! ## Module Overview
//!
//! - [`client`]: `PeopleClient`, the entry point for frontends
//! - [`commands`]: list/get/create/update/delete/export/search
//! - [`api`]: request wrapper and loading tracker
//! - [`transport`]: wire abstraction and implementations
//! - [`form`]: validation and dialog state machines
//! - [`view`]: pure view model
//! - [`notify`]: toast stack
//! - [`debounce`], [`poller`]: timing helpers on tokio
//! - [`config`], [`model`], [`error`]

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod error;
pub mod form;
pub mod model;
pub mod notify;
pub mod poller;
pub mod transport;
pub mod view;
