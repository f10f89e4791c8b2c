use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::errors::SuggestError;
use crate::ranking::RankOptions;
use crate::rating::Targets;
use crate::services::SuggestionRequest;

const MAX_WEIGHT: f64 = 5.0;

#[derive(Parser, Debug)]
#[command(name = "bgg-suggest", author, version, about = "Board game suggestions for a group of BoardGameGeek users")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Rank the games owned by the collection owners for the given group
    Suggest(SuggestArgs),
    /// Remove every cached player and game
    ClearCache,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SuggestArgs {
    /// Preferred playing time in minutes (0 for no preference)
    #[arg(short, long, default_value_t = 0)]
    pub time: u32,

    /// Preferred weight from 0.0 to 5.0 (0 for no preference)
    #[arg(short, long, default_value_t = 0.0)]
    pub weight: f64,

    /// BoardGameGeek users in the group
    #[arg(short, long = "username", num_args = 1..)]
    pub usernames: Vec<String>,

    /// Players without a BoardGameGeek account
    #[arg(short, long, default_value_t = 0)]
    pub guests: usize,

    /// Users whose games can be played (defaults to the group)
    #[arg(short, long, num_args = 1..)]
    pub collection: Vec<String>,

    /// Show at most this many games (0 for all)
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,

    /// Download everything again instead of reading the cache
    #[arg(short, long)]
    pub force: bool,

    /// List expansions as separate games
    #[arg(short, long)]
    pub expansions: bool,

    /// Show how each score was computed
    #[arg(short, long)]
    pub debug: bool,
}

impl SuggestArgs {
    pub fn into_request(self) -> Result<SuggestionRequest, SuggestError> {
        if !(0.0..=MAX_WEIGHT).contains(&self.weight) {
            return Err(SuggestError::InvalidArgument(format!(
                "weight must be between 0.0 and {}, got {}",
                MAX_WEIGHT, self.weight
            )));
        }

        let usernames = clean_names(self.usernames);
        if usernames.is_empty() && self.guests == 0 {
            return Err(SuggestError::InvalidArgument(
                "at least one username or guest is required".to_string(),
            ));
        }

        let mut owners = clean_names(self.collection);
        if owners.is_empty() {
            owners = usernames.clone();
        }
        if owners.is_empty() {
            return Err(SuggestError::InvalidArgument(
                "at least one username or collection owner is required".to_string(),
            ));
        }

        Ok(SuggestionRequest {
            usernames,
            guests: self.guests,
            owners,
            targets: Targets {
                playing_time: (self.time > 0).then_some(self.time),
                weight: (self.weight > 0.0).then_some(self.weight),
            },
            rank: RankOptions {
                limit: (self.limit > 0).then_some(self.limit),
                separate_expansions: self.expansions,
            },
            use_cache: !self.force,
            show_details: self.debug,
        })
    }
}

fn clean_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_suggest(args: &[&str]) -> SuggestArgs {
        let cli = Cli::try_parse_from(["bgg-suggest", "suggest"].iter().chain(args.iter()).copied()).unwrap();
        match cli.command {
            Command::Suggest(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_suggest_flags() {
        let args = parse_suggest(&["-t", "90", "-w", "2.5", "-u", "alice", "bob", "-g", "2", "-l", "5", "-e"]);
        let request = args.into_request().unwrap();

        assert_eq!(request.usernames, vec!["alice", "bob"]);
        assert_eq!(request.owners, vec!["alice", "bob"]);
        assert_eq!(request.guests, 2);
        assert_eq!(request.targets.playing_time, Some(90));
        assert_eq!(request.targets.weight, Some(2.5));
        assert_eq!(request.rank.limit, Some(5));
        assert!(request.rank.separate_expansions);
        assert!(request.use_cache);
        assert!(!request.show_details);
    }

    #[test]
    fn test_zero_means_no_preference() {
        let request = parse_suggest(&["-u", "alice", "-f"]).into_request().unwrap();

        assert_eq!(request.targets, Targets::default());
        assert_eq!(request.rank.limit, None);
        assert!(!request.use_cache);
    }

    #[test]
    fn test_guests_only_group_needs_owner() {
        let err = parse_suggest(&["-g", "3"]).into_request().unwrap_err();
        assert!(matches!(err, SuggestError::InvalidArgument(_)));

        let request = parse_suggest(&["-g", "3", "-c", " alice ", ""]).into_request().unwrap();
        assert!(request.usernames.is_empty());
        assert_eq!(request.owners, vec!["alice"]);
    }

    #[test]
    fn test_weight_out_of_range() {
        let err = parse_suggest(&["-u", "alice", "-w", "5.5"]).into_request().unwrap_err();
        assert!(matches!(err, SuggestError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_group_rejected() {
        let err = parse_suggest(&[]).into_request().unwrap_err();
        assert!(matches!(err, SuggestError::InvalidArgument(_)));
    }

    #[test]
    fn test_other_subcommands() {
        let cli = Cli::try_parse_from(["bgg-suggest", "clear-cache"]).unwrap();
        assert_eq!(cli.command, Command::ClearCache);

        let cli = Cli::try_parse_from(["bgg-suggest", "completions", "bash"]).unwrap();
        assert_eq!(cli.command, Command::Completions { shell: Shell::Bash });
    }
}
