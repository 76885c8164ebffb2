//! Application run modes: logger init, single prompt, relay, TUI launch.

use std::io::{self, Write};
use std::sync::Arc;

use crate::cli::Args;
use crate::core;
use crate::core::assistant::{Assistant, TurnOutcome};
use crate::core::config::{Config, RelayConfig};

/// Initialize env_logger. In TUI mode, writes to file to avoid corrupting the display.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.is_tui() {
        if let Some(dir) = core::paths::cache_dir() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Some(path) = core::paths::log_file()
            && let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Load `.env` from the working directory, then from the config directory.
/// Variables already set are never overridden.
pub fn load_env() {
    dotenv::dotenv().ok();
    if let Some(path) = core::paths::config_dir().map(|d| d.join(".env"))
        && path.is_file()
    {
        dotenv::from_path(&path).ok();
    }
}

/// Run single prompt mode: one turn against the relay, reply printed to stdout.
pub async fn run_single_prompt(
    args: &Args,
    prompt_arg: &str,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = if prompt_arg == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        prompt_arg.to_string()
    };
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err("empty prompt".into());
    }

    let assistant = Assistant::new(config);
    if let Some(model) = args.model.as_deref() {
        assistant.set_model(model);
    }

    if args.no_stream {
        println!("{}", assistant.chat(prompt).await);
        return Ok(());
    }

    let on_chunk = |s: &str| {
        let _ = io::stdout().write_all(s.as_bytes());
        let _ = io::stdout().flush();
    };
    match assistant.chat_stream(prompt, Some(&on_chunk), None).await {
        TurnOutcome::Replied(_) => {
            println!();
            Ok(())
        }
        TurnOutcome::Fallback(_) => {
            println!();
            Err("request failed".into())
        }
        TurnOutcome::Cancelled => Ok(()),
    }
}

/// Run the relay until Ctrl+C. `--host`/`--port` override the environment.
pub async fn run_relay(
    mut relay: RelayConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        relay.host = host;
    }
    if let Some(port) = port {
        relay.port = port;
    }
    crate::relay::serve(relay).await?;
    Ok(())
}

/// Launch the TUI in a blocking thread. Returns on panic or IO error.
pub async fn launch_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(config);
    let join_result: Result<io::Result<()>, tokio::task::JoinError> =
        tokio::task::spawn_blocking(move || crate::tui::run(config)).await;

    match join_result {
        Ok(io_result) => io_result?,
        Err(join_err) => {
            if let Ok(panic) = join_err.try_into_panic() {
                let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{:?}", panic)
                };
                eprintln!("TUI panic: {}", msg);
            }
            return Err(
                Box::new(io::Error::other("TUI thread panicked")) as Box<dyn std::error::Error>
            );
        }
    }
    Ok(())
}
