pub mod recommendation;

pub use recommendation::{
    Recommendation, RecommendationId, RecommendationImage, RecommendationListResponse,
};
