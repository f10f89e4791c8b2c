use anyhow::Result;

use bgg_suggest::cli::Command;
use bgg_suggest::{handle_clear_cache, handle_completions, handle_suggest, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Suggest(args) => handle_suggest(args),
        Command::ClearCache => handle_clear_cache(),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
