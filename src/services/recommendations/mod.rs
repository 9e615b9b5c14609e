/// Data access for the `/recommendations` resource
///
/// The list view only talks to the [`RecommendationsApi`] trait, so it can be
/// driven by the HTTP client in production and by mocks in tests.
use crate::{
    error::AppResult,
    models::{Recommendation, RecommendationId},
};

pub mod http;

pub use http::HttpRecommendationsClient;

/// Remote operations on recommendations
///
/// Reads are cached under the `RECOMMENDATIONS` tag; every successful
/// mutation invalidates that tag so the next `list` goes to the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationsApi: Send + Sync {
    /// Fetch every recommendation, pending and approved
    async fn list(&self) -> AppResult<Vec<Recommendation>>;

    /// Fetch every recommendation from the backend even if a cached list is
    /// still fresh, and cache the result
    async fn refetch(&self) -> AppResult<Vec<Recommendation>>;

    /// Mark a pending recommendation as approved
    async fn approve(&self, id: &RecommendationId) -> AppResult<()>;

    /// Remove a recommendation
    async fn delete(&self, id: &RecommendationId) -> AppResult<()>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
