mod collection;
pub mod models;
mod progress;

pub use collection::GameCollection;
pub use models::*;
pub use progress::FetchProgress;
