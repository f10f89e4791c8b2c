mod boardgame;
mod collection;

pub use boardgame::BoardgameParser;
pub use collection::parse_collection;

use anyhow::{Result, anyhow};
use scraper::{ElementRef, Selector};
use std::str::FromStr;

use crate::errors::SuggestError;

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {}", css, e))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(text_of)
}

fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, SuggestError> {
    raw.trim()
        .parse()
        .map_err(|_| SuggestError::malformed(field, raw))
}
