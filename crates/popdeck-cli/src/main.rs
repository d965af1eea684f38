use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use popdeck_browser::DEFAULT_DEBUGGING_PORT;
use popdeck_cli::OutputFormat;
use popdeck_cli::commands::{self, ChromeOptions};
use popdeck_core::PanelId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "popdeck")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A terminal deck of page assistants for a running Chrome",
    long_about = "popdeck hosts six small page-assistant panels (profile saver, auto scroll, \
                  link navigator, Skool sidekick, response generator, link saver) that act on \
                  the active Chrome tab, copy to the clipboard and post to a webhook."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (webhook URL and other keys)
    #[arg(long, global = true, env = "POPDECK_STORE", value_name = "PATH")]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive panel deck
    Deck {
        /// Chrome remote debugging port
        #[arg(long, default_value_t = DEFAULT_DEBUGGING_PORT)]
        port: u16,

        /// Launch Chrome instead of attaching to one already running
        #[arg(long)]
        launch: bool,

        /// Path to the Chrome binary
        #[arg(long, value_name = "PATH", requires = "launch")]
        chrome_path: Option<PathBuf>,

        /// Page to open when launching
        #[arg(long, requires = "launch")]
        url: Option<String>,

        /// Named profile under ~/.popdeck/profiles
        #[arg(long, requires = "launch", conflicts_with = "temp")]
        profile: Option<String>,

        /// Use a throwaway profile (default when launching)
        #[arg(long, requires = "launch")]
        temp: bool,

        /// Panel to show first
        #[arg(long, value_name = "ID")]
        panel: Option<PanelId>,
    },

    /// Run one panel action against the active tab and print the result
    Action {
        /// Panel id, e.g. profile-saver
        #[arg(value_name = "PANEL")]
        panel: PanelId,

        /// Action id, e.g. scrape
        #[arg(value_name = "ACTION")]
        action: String,

        /// Chrome remote debugging port
        #[arg(long, default_value_t = DEFAULT_DEBUGGING_PORT)]
        port: u16,
    },

    /// Read and write stored settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List panels and their actions
    Panels {
        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for popdeck.\n\n\
        SUPPORTED SHELLS: bash, zsh, fish, powershell, elvish\n\n\
        INSTALLATION:\n  \
          bash: popdeck completion --shell bash >> ~/.bashrc\n  \
          zsh:  popdeck completion --shell zsh > \"${fpath[1]}/_popdeck\"\n  \
          fish: popdeck completion --shell fish > ~/.config/fish/completions/popdeck.fish")]
    Completion {
        /// Target shell
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the value stored under KEY
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Store VALUE under KEY
    Set {
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Remove KEY
    Unset {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the settings file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let store = match cli.store {
        Some(path) => path,
        None => commands::default_store_path()?,
    };

    match cli.command {
        Commands::Deck {
            port,
            launch,
            chrome_path,
            url,
            profile,
            temp,
            panel,
        } => {
            let chrome = launch.then_some(ChromeOptions {
                chrome_path,
                url,
                profile,
                temp,
            });
            commands::deck::execute(port, chrome, panel, &store)
        }
        Commands::Action {
            panel,
            action,
            port,
        } => commands::action::execute(panel, &action, port, &store),
        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => commands::config::get(&store, &key),
            ConfigCommands::Set { key, value } => commands::config::set(&store, &key, &value),
            ConfigCommands::Unset { key } => commands::config::unset(&store, &key),
            ConfigCommands::Path => commands::config::path(&store),
        },
        Commands::Panels { format } => commands::panels::execute(format),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("popdeck=debug,popdeck_cli=debug,popdeck_core=debug,popdeck_browser=debug")
    } else {
        EnvFilter::new("popdeck=info,popdeck_cli=info,popdeck_core=warn,popdeck_browser=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
