use anyhow::{Context, Result};
use log::{error, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use super::{first_text, parse_number, selector, text_of};
use crate::config::FetcherSettings;
use crate::domain::{Game, GameCollection, GameId, PlayerCountVotes, VoteCategory};
use crate::errors::SuggestError;

struct BoardgameSelectors {
    root: Selector,
    boardgame: Selector,
    name: Selector,
    min_players: Selector,
    max_players: Selector,
    playing_time: Selector,
    expansion: Selector,
    player_poll: Selector,
    poll_results: Selector,
    poll_result: Selector,
    average_weight: Selector,
    users_rated: Selector,
    average: Selector,
}

impl BoardgameSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            root: selector("boardgames")?,
            boardgame: selector("boardgame")?,
            name: selector("name")?,
            min_players: selector("minplayers")?,
            max_players: selector("maxplayers")?,
            playing_time: selector("playingtime")?,
            expansion: selector("boardgameexpansion")?,
            player_poll: selector(r#"poll[name="suggested_numplayers"]"#)?,
            poll_results: selector("results")?,
            poll_result: selector("result")?,
            average_weight: selector("statistics ratings averageweight")?,
            users_rated: selector("statistics ratings usersrated")?,
            average: selector("statistics ratings average")?,
        })
    }
}

/// Parser for `/xmlapi/boardgame/<ids>?stats=1` responses
pub struct BoardgameParser {
    selectors: BoardgameSelectors,
    player_count_regex: Regex,
    min_votes_for_suggestion: u32,
    min_votes_for_rating: u32,
}

impl BoardgameParser {
    pub fn new(settings: &FetcherSettings) -> Result<Self> {
        Ok(Self {
            selectors: BoardgameSelectors::new()?,
            player_count_regex: Self::compile_regex()?,
            min_votes_for_suggestion: settings.min_votes_for_suggestion,
            min_votes_for_rating: settings.min_votes_for_rating,
        })
    }

    /// Returns `None` when the response is not a boardgames document
    pub fn parse(&self, xml: &str) -> Option<GameCollection> {
        let document = Html::parse_document(xml);

        if document.select(&self.selectors.root).next().is_none() {
            error!("Response is not a boardgames document");
            return None;
        }

        let mut games = GameCollection::new();
        for element in document.select(&self.selectors.boardgame) {
            match self.parse_boardgame(element) {
                Ok(Some(game)) => games.add(game),
                Ok(None) => {}
                Err(e) => warn!("Skipping game: {}", e),
            }
        }

        Some(games)
    }

    // --- Construction Helpers ---

    fn compile_regex() -> Result<Regex> {
        Regex::new(r"^(\d+)(\+)?$").context("Failed to compile player count regex")
    }

    // --- Game Fields ---

    fn parse_boardgame(&self, element: ElementRef<'_>) -> Result<Option<Game>, SuggestError> {
        let Some(raw_id) = element.value().attr("objectid") else {
            warn!("A game does not have an id");
            return Ok(None);
        };
        let id: GameId = parse_number("objectid", raw_id)?;

        let Some(name) = self.primary_name(element) else {
            warn!("A game [{}] does not have a name", id);
            return Ok(None);
        };

        let mut game = Game::new(id, name);
        game.player_min = self.positive_number(element, &self.selectors.min_players, "minplayers", id);
        game.player_max = self.positive_number(element, &self.selectors.max_players, "maxplayers", id);
        game.playing_time = self.positive_number(element, &self.selectors.playing_time, "playingtime", id);

        game.expansion_of = self.inbound_expansions(element, id);
        game.is_expansion = !game.expansion_of.is_empty();

        if let (Some(poll), Some(player_max)) = (
            element.select(&self.selectors.player_poll).next(),
            game.player_max,
        ) {
            game.suggested_players = self.parse_suggested_players(poll, player_max, id);
        }

        game.average_weight = first_text(element, &self.selectors.average_weight)
            .and_then(|raw| Self::keep_or_warn(parse_number("averageweight", &raw), id));
        game.average_rating = self.average_rating(element, id);

        Ok(Some(game))
    }

    fn primary_name(&self, element: ElementRef<'_>) -> Option<String> {
        element
            .select(&self.selectors.name)
            .find(|name| name.value().attr("primary") == Some("true"))
            .map(text_of)
    }

    fn positive_number(
        &self,
        element: ElementRef<'_>,
        selector: &Selector,
        field: &'static str,
        id: GameId,
    ) -> Option<u32> {
        let raw = first_text(element, selector)?;
        let value: i64 = Self::keep_or_warn(parse_number(field, &raw), id)?;
        u32::try_from(value).ok().filter(|v| *v > 0)
    }

    fn inbound_expansions(&self, element: ElementRef<'_>, id: GameId) -> BTreeSet<GameId> {
        element
            .select(&self.selectors.expansion)
            .filter(|exp| exp.value().attr("inbound") == Some("true"))
            .filter_map(|exp| exp.value().attr("objectid"))
            .filter_map(|raw| Self::keep_or_warn(parse_number("expansion objectid", raw), id))
            .collect()
    }

    fn average_rating(&self, element: ElementRef<'_>, id: GameId) -> Option<f64> {
        let users_rated = first_text(element, &self.selectors.users_rated)?;
        let average = first_text(element, &self.selectors.average)?;

        let users_rated: u32 = Self::keep_or_warn(parse_number("usersrated", &users_rated), id)?;
        if users_rated < self.min_votes_for_rating {
            return None;
        }

        let average: f64 = Self::keep_or_warn(parse_number("average", &average), id)?;
        Some(average / 10.0)
    }

    // --- Suggested Players Poll ---

    fn parse_suggested_players(
        &self,
        poll: ElementRef<'_>,
        player_max: u32,
        id: GameId,
    ) -> Option<BTreeMap<u32, PlayerCountVotes>> {
        let mut suggested: BTreeMap<u32, PlayerCountVotes> = BTreeMap::new();

        for results in poll.select(&self.selectors.poll_results) {
            let Some(raw_counts) = results.value().attr("numplayers") else {
                continue;
            };
            let Some(counts) = Self::keep_or_warn(self.expand_player_counts(raw_counts, player_max), id)
                .flatten()
            else {
                continue;
            };

            for option in results.select(&self.selectors.poll_result) {
                let (Some(value), Some(numvotes)) =
                    (option.value().attr("value"), option.value().attr("numvotes"))
                else {
                    continue;
                };
                let Some(votes) = Self::keep_or_warn(parse_number::<u32>("numvotes", numvotes), id)
                else {
                    continue;
                };
                let Some(category) = Self::keep_or_warn(value.parse::<VoteCategory>(), id) else {
                    continue;
                };

                for count in counts.clone() {
                    *suggested
                        .entry(count)
                        .or_default()
                        .entry(category)
                        .or_insert(0) += votes;
                }
            }
        }

        suggested.retain(|_, votes| votes.values().sum::<u32>() >= self.min_votes_for_suggestion);
        (!suggested.is_empty()).then_some(suggested)
    }

    /// `"3"` is exactly three players, `"4+"` is every count above four up to `player_max`
    fn expand_player_counts(
        &self,
        raw: &str,
        player_max: u32,
    ) -> Result<Option<RangeInclusive<u32>>, SuggestError> {
        let captures = self
            .player_count_regex
            .captures(raw.trim())
            .ok_or_else(|| SuggestError::malformed("numplayers", raw))?;
        let count: u32 = parse_number("numplayers", &captures[1])?;

        if captures.get(2).is_none() {
            return Ok(Some(count..=count));
        }

        let first = count
            .checked_add(1)
            .ok_or_else(|| SuggestError::malformed("numplayers", raw))?;
        if player_max < first {
            return Ok(None);
        }
        Ok(Some(first..=player_max))
    }

    fn keep_or_warn<T>(result: Result<T, SuggestError>, id: GameId) -> Option<T> {
        result
            .map_err(|e| warn!("Game {}: {}", id, e))
            .ok()
    }
}
