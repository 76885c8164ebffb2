//! # meee-chat
//!
//! Terminal chat for the Meee API. The API key lives only in the relay
//! (`meee-chat serve`); the chat client talks to the relay.
//!
//! ## Modes
//! - Interactive terminal UI (default)
//! - Single prompt mode with `-p` or `--prompt`
//! - Relay server with `serve`

mod cli;
mod core;
mod relay;
mod run;
#[cfg(test)]
mod test_support;
mod tui;

use clap::{CommandFactory, Parser};

use cli::{Args, Commands};

fn exit_with(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// Load client configuration (print user-friendly message; exit uses Display not Debug).
fn load_config() -> core::config::Config {
    core::config::load().unwrap_or_else(|e| exit_with(e))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run::load_env();

    let args = Args::parse();
    run::init_logger(&args);

    let result = match &args.command {
        Some(Commands::Serve { host, port }) => {
            let relay = core::config::load_relay().unwrap_or_else(|e| exit_with(e));
            run::run_relay(relay, host.clone(), *port).await
        }
        Some(Commands::Config) => {
            core::cli::run_config();
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Args::command();
            cli::generate(*shell, &mut cmd, core::app::NAME, &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Models { query }) => {
            core::cli::run_models(&load_config(), query.as_deref());
            Ok(())
        }
        Some(Commands::Test { model }) => core::cli::run_test(&load_config(), model.as_deref()).await,
        Some(Commands::Health) => core::cli::run_health(&load_config()).await,
        None => match &args.prompt {
            Some(prompt) => run::run_single_prompt(&args, prompt, &load_config()).await,
            None => return run::launch_tui(load_config()).await,
        },
    };

    if let Err(e) = result {
        exit_with(e);
    }
    Ok(())
}
