pub mod query_cache;

mod macros;

pub use query_cache::CacheEvent;
pub use query_cache::CacheTag;
pub use query_cache::QueryCache;
