pub mod loader;
pub mod report;
pub mod suggestion;

pub use loader::CollectionLoader;
pub use suggestion::{Suggestion, SuggestionRequest, SuggestionService};
