//! # CLI Layer
//!
//! This module is **one possible frontend** for pessoas, not the application
//! itself. It is the only place that:
//! - Knows about terminal I/O (stdout, stderr, stdin prompts)
//! - Parses arguments
//! - Installs the tracing subscriber
//! - Formats output for humans
//!
//! Every handler follows the same shape: drive the [`PeopleClient`], then
//! print the view and the toasts it raised. Errors bubble up to `main.rs`,
//! which prints them and exits non-zero. Error toasts for a failed command
//! are not printed again, since the returned error already carries them.
//!
//! ## Structure
//!
//! - `run()`: dispatch (called by `main.rs`)
//! - `init_context()`: config resolution and client construction
//! - `handle_*()`: one per command; `watch` hands off to [`super::watch`]

use super::render::{render_config, render_people, render_person, render_toasts};
use super::setup::{print_grouped_help, print_help_for_command, print_subcommand_help, Cli, Commands};
use super::watch;
use clap::Parser;
use directories::ProjectDirs;
use pessoas::client::PeopleClient;
use pessoas::config::ClientConfig;
use pessoas::error::{PessoasError, Result};
use pessoas::form;
use pessoas::notify::ToastKind;
use pessoas::transport::http::HttpTransport;
use pessoas::view::PersonCard;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Overrides the platform config directory.
pub const CONFIG_DIR_ENV: &str = "PESSOAS_CONFIG_DIR";

const NOT_FOUND_MESSAGE: &str = "Pessoa não encontrada";
const DELETE_CANCELLED: &str = "Exclusão cancelada.";

struct AppContext {
    client: Arc<PeopleClient<HttpTransport>>,
    /// Effective config: file, then environment, then flags.
    config: ClientConfig,
    config_dir: PathBuf,
    use_color: Option<bool>,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.help {
        if cli.command.is_none() {
            print_grouped_help();
        } else {
            print_subcommand_help(&cli.command);
        }
        return Ok(());
    }

    if let Some(Commands::Help { command }) = &cli.command {
        match command {
            Some(name) => print_help_for_command(name),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    init_tracing(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { search }) => handle_list(&ctx, search).await,
        Some(Commands::Search { term }) => handle_list(&ctx, Some(term.join(" "))).await,
        Some(Commands::Get { id }) => handle_get(&ctx, id).await,
        Some(Commands::Watch { interval, search }) => handle_watch(&ctx, interval, search).await,
        Some(Commands::Create { nome, idade }) => handle_create(&ctx, &nome, &idade).await,
        Some(Commands::Update { id, nome, idade }) => {
            handle_update(&ctx, id, &nome, &idade).await
        }
        Some(Commands::Delete { id, yes }) => handle_delete(&ctx, id, yes).await,
        Some(Commands::Export) => handle_export(&ctx).await,
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Help { .. }) => Ok(()),
        None => handle_list(&ctx, None).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "pessoas=debug" } else { "pessoas=error" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "pessoas", "pessoas")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| PessoasError::Config("Could not determine config dir".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = resolve_config_dir()?;
    let mut config = ClientConfig::load(&config_dir)?.with_env_overrides();
    if let Some(url) = &cli.base_url {
        config.base_url = url.trim().to_string();
    }
    debug!(base_url = %config.base_url, dir = %config_dir.display(), "config resolved");

    let client = Arc::new(PeopleClient::connect(&config));
    let use_color = if cli.no_color { Some(false) } else { None };

    Ok(AppContext {
        client,
        config,
        config_dir,
        use_color,
    })
}

/// Prints the toasts raised so far and passes `result` through. When the
/// command failed, error toasts are dropped: `main` reports the error.
fn settle<T>(ctx: &AppContext, result: Result<T>) -> Result<T> {
    let mut toasts = ctx.client.notifications().drain();
    if result.is_err() {
        toasts.retain(|t| t.kind != ToastKind::Error);
    }
    print!("{}", render_toasts(&toasts, ctx.use_color));
    result
}

async fn handle_list(ctx: &AppContext, search: Option<String>) -> Result<()> {
    let loaded = ctx.client.reload().await;
    settle(ctx, loaded)?;
    if let Some(term) = search {
        ctx.client.set_search(&term);
    }
    print!("{}", render_people(&ctx.client.view(), ctx.use_color));
    Ok(())
}

async fn handle_get(ctx: &AppContext, id: u64) -> Result<()> {
    let found = ctx.client.get(id).await;
    let person = settle(ctx, found)?;
    print!(
        "{}",
        render_person(&PersonCard::from_person(&person), ctx.use_color)
    );
    Ok(())
}

async fn handle_create(ctx: &AppContext, nome: &str, idade: &str) -> Result<()> {
    ctx.client.open_create();
    let submitted = ctx.client.submit(nome, idade).await;
    settle(ctx, submitted).map(|_| ())
}

async fn handle_update(ctx: &AppContext, id: u64, nome: &str, idade: &str) -> Result<()> {
    // Reject bad input before touching the network.
    form::validate(nome, idade)?;

    let loaded = ctx.client.reload().await;
    settle(ctx, loaded)?;
    if !ctx.client.open_edit(id) {
        return Err(PessoasError::api(404, Some(NOT_FOUND_MESSAGE.to_string())));
    }

    let submitted = ctx.client.submit(nome, idade).await;
    settle(ctx, submitted).map(|_| ())
}

async fn handle_delete(ctx: &AppContext, id: u64, yes: bool) -> Result<()> {
    let loaded = ctx.client.reload().await;
    settle(ctx, loaded)?;
    if !ctx.client.request_delete(id) {
        return Err(PessoasError::api(404, Some(NOT_FOUND_MESSAGE.to_string())));
    }

    if !yes {
        let question = ctx.client.confirm_dialog().message().unwrap_or_default();
        if !confirm(&question).await? {
            ctx.client.cancel_delete();
            ctx.client.notifications().info(DELETE_CANCELLED);
            return settle(ctx, Ok(()));
        }
    }

    let deleted = ctx.client.confirm_delete().await;
    settle(ctx, deleted).map(|_| ())
}

/// Asks a yes/no question on stdin. Anything but an explicit yes is a no.
async fn confirm(question: &str) -> Result<bool> {
    print!("{} [s/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

async fn handle_export(ctx: &AppContext) -> Result<()> {
    let exported = ctx.client.export().await;
    settle(ctx, exported).map(|_| ())
}

/// Shows the list and keeps it fresh until Ctrl+C. Lines typed on stdin
/// become the search term, applied once typing settles.
async fn handle_watch(
    ctx: &AppContext,
    interval: Option<u64>,
    search: Option<String>,
) -> Result<()> {
    let every = interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| ctx.config.poll_interval());
    if let Some(term) = search {
        ctx.client.set_search(&term);
    }
    watch::run(
        Arc::clone(&ctx.client),
        every,
        ctx.config.debounce(),
        ctx.use_color,
    )
    .await
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    // Show and edit what is on disk; env and flag overrides are per-run.
    let mut stored = ClientConfig::load(&ctx.config_dir)?;

    match (key, value) {
        (None, _) => {
            print!("{}", render_config(&stored.list_all(), ctx.use_color));
        }
        (Some(key), None) => {
            let value = stored
                .get(&key)
                .ok_or_else(|| PessoasError::Config(format!("Unknown config key: {}", key)))?;
            println!("{}", value);
        }
        (Some(key), Some(value)) => {
            stored.set(&key, &value)?;
            stored.save(&ctx.config_dir)?;
            let current = stored.get(&key).unwrap_or(value);
            print!(
                "{}",
                render_config(&[(key.as_str(), current)], ctx.use_color)
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        for yes in ["s", "S", "sim", "y", "yes\n", "  Sim  "] {
            assert!(is_yes(yes), "{:?}", yes);
        }
        for no in ["", "\n", "n", "nao", "talvez"] {
            assert!(!is_yes(no), "{:?}", no);
        }
    }
}
