mod commands;
mod render;
mod setup;
mod styles;
mod templates;
mod watch;

pub use commands::run;
