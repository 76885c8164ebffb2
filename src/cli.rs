//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  meee-chat serve                   Start the relay (needs MEEE_API_KEY)
  meee-chat                         Launch interactive TUI (relay must be running)
  meee-chat -p \"explain X\"          Single prompt, stream response to stdout
  meee-chat -p -                    Read prompt from stdin
  meee-chat test a4                 Probe a model through the relay
  meee-chat health                  Check the relay health endpoint
  meee-chat config                  Show config paths and status
  meee-chat completions bash        Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Terminal chat for the Meee API, with a key-holding relay",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Send a single prompt then exit (without opening the TUI)
    #[arg(
        short = 'p',
        long,
        help = "Provide a prompt to get an immediate AI response (use '-' to read from stdin)"
    )]
    pub prompt: Option<String>,

    /// Override model for single prompt mode
    #[arg(short = 'm', long, help = "Model ID (e.g. a4)")]
    pub model: Option<String>,

    /// Disable streaming in prompt mode (wait for full response before printing)
    #[arg(
        long,
        help = "In prompt mode, wait for the full response instead of streaming"
    )]
    pub no_stream: bool,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the relay that holds the API key and forwards chat requests
    Serve {
        /// Address to bind (overrides MEEE_RELAY_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides MEEE_RELAY_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// List available models grouped by provider
    Models {
        /// Filter models by id or provider
        #[arg(long)]
        query: Option<String>,
    },
    /// Send a test message to a model (or greet the default model)
    Test {
        /// Model ID to probe; without it the default model gets "Hola"
        model: Option<String>,
    },
    /// Query the relay health endpoint
    Health,
    /// Show config paths, relay URL and model
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    /// The relay logs requests, so it defaults to info.
    pub fn log_level(&self) -> &'static str {
        let base = if matches!(self.command, Some(Commands::Serve { .. })) {
            1
        } else {
            0
        };
        if self.quiet {
            "error"
        } else if self.verbose + base >= 2 {
            "debug"
        } else if self.verbose + base >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// True when the interactive TUI will run (logs must go to a file).
    pub fn is_tui(&self) -> bool {
        self.command.is_none() && self.prompt.is_none()
    }
}
