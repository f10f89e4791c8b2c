mod collapse;
pub mod graph;
pub mod types;

pub use collapse::rank;
pub use graph::ExpansionGraph;
pub use types::{DisplayUnit, ExpansionScore, RankOptions};
