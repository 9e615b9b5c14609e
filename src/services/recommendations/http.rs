/// REST client for the recommendations backend
///
/// List results go through the query cache; approve and delete invalidate
/// the `RECOMMENDATIONS` tag once the backend has accepted them.
use crate::{
    cache::{CacheTag, QueryCache},
    cached,
    error::{AppError, AppResult},
    models::{Recommendation, RecommendationId, RecommendationListResponse},
    services::{
        recommendations::RecommendationsApi,
        request_id::{RequestId, REQUEST_ID_HEADER},
    },
};
use reqwest::{Client as HttpClient, Method, Response, Url};

const RESOURCE_SEGMENT: &str = "recommendations";

#[derive(Clone)]
pub struct HttpRecommendationsClient {
    http_client: HttpClient,
    base_url: Url,
    cache: QueryCache,
}

impl HttpRecommendationsClient {
    pub fn new(base_url: &str, cache: QueryCache) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::InvalidInput(format!("Invalid API base URL {}: {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidInput(format!(
                "API base URL cannot have paths appended: {}",
                base_url
            )));
        }

        Ok(Self {
            http_client: HttpClient::new(),
            base_url,
            cache,
        })
    }

    /// The query cache this client reads from and invalidates
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// `{base}/recommendations` followed by the given path segments
    fn resource_url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::Internal("API base URL cannot be a base".to_string()))?;
            path.pop_if_empty().push(RESOURCE_SEGMENT);
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn item_url(&self, id: &RecommendationId, action: &str) -> AppResult<Url> {
        if id.is_blank() {
            return Err(AppError::InvalidInput(
                "Recommendation id cannot be empty".to_string(),
            ));
        }
        self.resource_url(&[id.as_str(), action])
    }

    async fn send(&self, method: Method, url: Url) -> AppResult<Response> {
        let request_id = RequestId::new();
        let path = url.path().to_string();

        tracing::debug!(
            method = %method,
            path = %path,
            request_id = %request_id,
            "Sending request"
        );

        let response = self
            .http_client
            .request(method.clone(), url)
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                method = %method,
                path = %path,
                request_id = %request_id,
                status = %status,
                "Request rejected by backend"
            );
            return Err(AppError::Api { status, body });
        }

        tracing::debug!(
            method = %method,
            path = %path,
            request_id = %request_id,
            status = %status,
            "Request completed"
        );

        Ok(response)
    }

    /// `GET /recommendations`, bypassing the cache
    async fn fetch_list(&self) -> AppResult<Vec<Recommendation>> {
        let url = self.resource_url(&[])?;
        let response = self.send(Method::GET, url).await?;
        let body: RecommendationListResponse = response.json().await?;

        tracing::info!(
            results = body.data.len(),
            backend = self.name(),
            "Recommendations fetched"
        );

        Ok(body.data)
    }
}

#[async_trait::async_trait]
impl RecommendationsApi for HttpRecommendationsClient {
    async fn list(&self) -> AppResult<Vec<Recommendation>> {
        cached!(self.cache, CacheTag::Recommendations, self.fetch_list())
    }

    async fn refetch(&self) -> AppResult<Vec<Recommendation>> {
        let generation = self.cache.generation(&CacheTag::Recommendations).await;
        let items = self.fetch_list().await?;
        self.cache
            .store_if_current(&CacheTag::Recommendations, &items, generation)
            .await;
        Ok(items)
    }

    async fn approve(&self, id: &RecommendationId) -> AppResult<()> {
        let url = self.item_url(id, "approve")?;
        self.send(Method::PATCH, url).await?;
        self.cache.invalidate(&[CacheTag::Recommendations]).await;

        tracing::info!(id = %id, backend = self.name(), "Recommendation approved");
        Ok(())
    }

    async fn delete(&self, id: &RecommendationId) -> AppResult<()> {
        let url = self.item_url(id, "delete")?;
        self.send(Method::DELETE, url).await?;
        self.cache.invalidate(&[CacheTag::Recommendations]).await;

        tracing::info!(id = %id, backend = self.name(), "Recommendation deleted");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
