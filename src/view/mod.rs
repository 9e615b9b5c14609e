/// Presentation layer for the moderation list
///
/// [`RecommendationsList`] owns the query and in-flight state and produces a
/// [`ListView`] snapshot, which renders as text through `Display`.
pub mod list;
pub mod partition;
pub mod render;
pub mod tracker;

pub use list::{ActionOutcome, ListFeatures, QueryState, RecommendationsList};
pub use partition::Partition;
pub use render::{Badge, Control, ItemView, ListView, ReadyView, Tab};
pub use tracker::{ActionKind, ActionTracker, InFlight};
