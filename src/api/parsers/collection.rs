use anyhow::Result;
use log::{error, warn};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

use super::{first_text, parse_number, selector, text_of};
use crate::domain::{GameId, PlayerGameStat};
use crate::errors::SuggestError;

struct CollectionSelectors {
    items: Selector,
    item: Selector,
    errors: Selector,
    numplays: Selector,
    status: Selector,
    rating: Selector,
}

impl CollectionSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            items: selector("items")?,
            item: selector("item")?,
            errors: selector("errors error")?,
            numplays: selector("numplays")?,
            status: selector("status")?,
            rating: selector("stats rating")?,
        })
    }
}

/// Parse a `/xmlapi/collection` response into per-game statistics.
///
/// Returns `None` when BoardGameGeek answered with an error document
/// (unknown user, ...) or with something that is not a collection at all.
pub fn parse_collection(xml: &str) -> Result<Option<HashMap<GameId, PlayerGameStat>>> {
    let selectors = CollectionSelectors::new()?;
    let document = Html::parse_document(xml);

    let errors: Vec<String> = document.select(&selectors.errors).map(text_of).collect();
    if !errors.is_empty() {
        error!("Cannot fetch player data");
        for message in errors {
            error!("\t{}", message);
        }
        return Ok(None);
    }

    if document.select(&selectors.items).next().is_none() {
        error!("Response is not a collection");
        return Ok(None);
    }

    let mut games = HashMap::new();
    for item in document.select(&selectors.item) {
        match parse_item(item, &selectors) {
            Ok(Some(stat)) => {
                games.insert(stat.game_id, stat);
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping collection item: {}", e),
        }
    }

    Ok(Some(games))
}

fn parse_item(
    item: ElementRef<'_>,
    selectors: &CollectionSelectors,
) -> Result<Option<PlayerGameStat>, SuggestError> {
    let Some(raw_id) = item.value().attr("objectid") else {
        warn!("Missing objectid");
        return Ok(None);
    };
    let game_id: GameId = parse_number("objectid", raw_id)?;
    let mut stat = PlayerGameStat::new(game_id);

    let Some(numplays) = first_text(item, &selectors.numplays) else {
        warn!("Missing numplays for game with id {}", game_id);
        return Ok(None);
    };
    stat.play_count = parse_number("numplays", &numplays)?;

    let Some(status) = item.select(&selectors.status).next() else {
        warn!("Missing status for game with id {}", game_id);
        return Ok(None);
    };
    stat.owned = status.value().attr("own") == Some("1");
    stat.want_to_play = status.value().attr("wanttoplay") == Some("1");

    let rating = item
        .select(&selectors.rating)
        .next()
        .and_then(|r| r.value().attr("value"))
        .unwrap_or("N/A");
    if rating != "N/A" {
        let rating: f64 = parse_number("rating", rating)?;
        stat.rating = Some(rating / 10.0);
    }

    Ok(Some(stat))
}
