use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pessoas",
    bin_name = "pessoas",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Manage people records on a pessoas server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server base URL (overrides config and PESSOAS_BASE_URL)
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub base_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Browse,
    Edit,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Browse => "Browse:",
            CommandGroup::Edit => "Edit:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "list" | "search" | "get" | "watch" => Some(CommandGroup::Browse),
            "create" | "update" | "delete" | "export" => Some(CommandGroup::Edit),
            "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Browse, CommandGroup::Edit, CommandGroup::Misc]
    }
}

pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("pessoas {version}\n"));
    output.push_str("Manage people records on a pessoas server\n");
    output.push('\n');
    output.push_str("Usage: pessoas [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --base-url <URL>  Server base URL\n");
    output.push_str("      --no-color        Disable colored output\n");
    output.push_str("  -v, --verbose         Verbose output\n");
    output.push_str("  -h, --help            Print help\n");
    output.push_str("  -V, --version         Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a specific subcommand using clap's built-in rendering
pub fn print_subcommand_help(command: &Option<Commands>) {
    let name = match command {
        Some(Commands::List { .. }) => "list",
        Some(Commands::Search { .. }) => "search",
        Some(Commands::Get { .. }) => "get",
        Some(Commands::Watch { .. }) => "watch",
        Some(Commands::Create { .. }) => "create",
        Some(Commands::Update { .. }) => "update",
        Some(Commands::Delete { .. }) => "delete",
        Some(Commands::Export) => "export",
        Some(Commands::Config { .. }) => "config",
        Some(Commands::Help { .. }) => "help",
        None => {
            print_grouped_help();
            return;
        }
    };
    print_help_for_command(name);
}

pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();
    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List people
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Only show people whose name or age contains this term
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Search people by name or age
    #[command(display_order = 2)]
    Search {
        /// Search words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },

    /// Show one person
    #[command(display_order = 3)]
    Get { id: u64 },

    /// Keep the list on screen, refreshing periodically
    #[command(display_order = 4)]
    Watch {
        /// Seconds between refreshes (defaults to the configured interval)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        /// Only show people whose name or age contains this term
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a person
    #[command(alias = "n", display_order = 10)]
    Create {
        /// Name
        nome: String,
        /// Age (0-150)
        #[arg(allow_hyphen_values = true)]
        idade: String,
    },

    /// Update a person
    #[command(alias = "e", display_order = 11)]
    Update {
        id: u64,
        /// New name
        nome: String,
        /// New age (0-150)
        #[arg(allow_hyphen_values = true)]
        idade: String,
    },

    /// Delete a person
    #[command(alias = "rm", display_order = 12)]
    Delete {
        id: u64,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Ask the server to export all records to pessoas.csv
    #[command(display_order = 13)]
    Export,

    /// Get or set configuration
    #[command(display_order = 20)]
    Config {
        /// Configuration key (e.g., base-url)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for pessoas or a subcommand
    #[command(display_order = 21)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_negative_age() {
        let cli = Cli::try_parse_from(["pessoas", "create", "Ana", "-1"]).unwrap();
        match cli.command {
            Some(Commands::Create { nome, idade }) => {
                assert_eq!(nome, "Ana");
                assert_eq!(idade, "-1");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn search_words_are_collected() {
        let cli = Cli::try_parse_from(["pessoas", "search", "ana", "maria"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Search { term }) if term == ["ana", "maria"]));
    }

    #[test]
    fn global_flags_anywhere() {
        let cli =
            Cli::try_parse_from(["pessoas", "ls", "--base-url", "http://x/api", "--no-color"])
                .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://x/api"));
        assert!(cli.no_color);
        assert!(matches!(cli.command, Some(Commands::List { search: None })));
    }

    #[test]
    fn grouped_help_lists_every_command() {
        let help = get_grouped_help();
        for name in [
            "list", "search", "get", "watch", "create", "update", "delete", "export", "config",
        ] {
            assert!(help.contains(name), "missing {}", name);
        }
        assert!(help.contains("Browse:"));
    }
}
