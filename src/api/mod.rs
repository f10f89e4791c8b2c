mod bgg_client;
pub mod parsers;
mod provider;

pub use bgg_client::BggClient;
pub use provider::DataProvider;
