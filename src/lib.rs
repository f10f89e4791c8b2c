pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod rate_limiter;
pub mod ranking;
pub mod rating;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cache::Cache;
use crate::cli::{Command, SuggestArgs};
use crate::config::AppConfig;
use crate::services::SuggestionService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_suggest(args: &SuggestArgs) -> Result<()> {
    let request = args.clone().into_request()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = SuggestionService::new(config);
        service.run(&request).await
    })
}

pub fn handle_clear_cache() -> Result<()> {
    let config = AppConfig::new();
    let cache = Cache::new(&config.cache_dir)?;
    cache.clear()
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
