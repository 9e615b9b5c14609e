pub mod recommendations;
pub mod request_id;

pub use recommendations::{HttpRecommendationsClient, RecommendationsApi};
