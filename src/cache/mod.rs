mod session;
mod structs;

pub use session::SessionCache;
pub use structs::{Cache, CachedEntry};
