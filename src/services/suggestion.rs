use anyhow::Result;
use log::info;

use super::loader::CollectionLoader;
use super::report;
use crate::api::{BggClient, DataProvider};
use crate::cache::Cache;
use crate::config::AppConfig;
use crate::domain::GameCollection;
use crate::errors::SuggestError;
use crate::ranking::{self, DisplayUnit, RankOptions};
use crate::rating::{self, RatingOutcome, Targets};

/// Validated input of one suggestion run
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRequest {
    pub usernames: Vec<String>,
    pub guests: usize,
    /// Whose shelves the games come from
    pub owners: Vec<String>,
    pub targets: Targets,
    pub rank: RankOptions,
    pub use_cache: bool,
    pub show_details: bool,
}

pub struct Suggestion {
    pub games: GameCollection,
    pub outcome: RatingOutcome,
    pub units: Vec<DisplayUnit>,
}

pub struct SuggestionService {
    config: AppConfig,
}

impl SuggestionService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, request: &SuggestionRequest) -> Result<()> {
        info!("=== Starting Suggestion ===\n");

        let client = BggClient::new(self.config.fetcher.clone())?;
        let cache = Cache::new(&self.config.cache_dir)?;
        let mut loader = CollectionLoader::new(client, cache, request.use_cache);

        let suggestion = self.suggest(&mut loader, request).await?;
        print!(
            "{}",
            report::render(
                &suggestion.units,
                &suggestion.games,
                &suggestion.outcome.evaluation,
                request.show_details
            )
        );

        info!("=== Suggestion Complete ===");
        Ok(())
    }

    pub async fn suggest<P: DataProvider>(
        &self,
        loader: &mut CollectionLoader<P>,
        request: &SuggestionRequest,
    ) -> Result<Suggestion> {
        // Step 1: Game group
        info!("Step 1: Loading game group...");
        let mut group = loader.load_players(&request.usernames).await?;
        group.extend(CollectionLoader::<P>::guests(request.guests));
        info!("  → {} players in the group\n", group.len());

        // Step 2: Collection owners
        info!("Step 2: Loading collection owners...");
        let owners = loader.load_players(&request.owners).await?;

        // Step 3: Game metadata
        info!("Step 3: Loading games...");
        let games = loader.load_games(&owners).await?;
        info!("  → {} games known\n", games.len());

        // Step 4: Scoring
        info!("Step 4: Rating games...");
        let outcome = rating::rate(&games, &group, &owners, request.targets, &self.config.scoring)?;

        // Step 5: Ranking
        let units = ranking::rank(&games, &outcome, request.rank);
        if units.is_empty() {
            return Err(SuggestError::NoPlayableGames {
                group_size: outcome.group_size,
            }
            .into());
        }

        Ok(Suggestion {
            games,
            outcome,
            units,
        })
    }
}
