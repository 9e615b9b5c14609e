use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Backend identifier of a recommendation (the `_id` field)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationId(pub String);

impl RecommendationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for RecommendationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecommendationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Image attached to a recommendation.
///
/// Older records store a bare URL, newer ones the storage object returned by
/// the image CDN. Both are read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationImage {
    Url(String),
    Stored {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        public_id: Option<String>,
    },
}

impl RecommendationImage {
    /// Displayable URL, if the image has one
    pub fn url(&self) -> Option<&str> {
        let url = match self {
            RecommendationImage::Url(url) => Some(url.as_str()),
            RecommendationImage::Stored { url, .. } => url.as_deref(),
        };
        url.filter(|url| !url.is_empty())
    }
}

/// A user-submitted testimonial awaiting or past moderation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "_id")]
    pub id: RecommendationId,
    pub full_name: String,
    pub profession: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<RecommendationImage>,
}

impl Recommendation {
    /// Unset approval counts as pending
    pub fn is_approved(&self) -> bool {
        self.approved.unwrap_or(false)
    }

    /// Rating worth showing; zero is treated like no rating
    pub fn rating(&self) -> Option<f32> {
        self.stars.filter(|stars| *stars != 0.0)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(RecommendationImage::url)
    }
}

/// Body of `GET /recommendations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationListResponse {
    pub data: Vec<Recommendation>,
}
