/// NewsAPI provider
///
/// Supplies article search (GET /everything) and the source catalog
/// (GET /top-headlines/sources). Responses are cached in Redis and counted
/// against the provider's daily request quota.
use chrono::Utc;
use redis::{AsyncCommands, Client as RedisClient};
use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{ApiArticlesResponse, ApiSourcesResponse, Article, Source},
    services::providers::NewsProvider,
};

const SEARCH_CACHE_TTL: u64 = 900; // 15 minutes, news goes stale fast
const SOURCES_CACHE_TTL: u64 = 86400; // 1 day
const DAILY_QUOTA: u32 = 1000;

pub struct NewsApiProvider {
    http_client: HttpClient,
    cache: Cache,
    redis_client: RedisClient,
    api_key: String,
    api_url: String,
}

impl NewsApiProvider {
    pub fn new(cache: Cache, redis_client: RedisClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            cache,
            redis_client,
            api_key,
            api_url,
        }
    }

    /// Converts a raw search response into domain articles
    ///
    /// The provider reports takedowns as placeholder entries titled
    /// "[Removed]"; those are dropped.
    fn convert_articles(&self, response: ApiArticlesResponse) -> AppResult<Vec<Article>> {
        if response.status != "ok" {
            return Err(AppError::ExternalApi(format!(
                "News API returned status {}",
                response.status
            )));
        }

        Ok(response
            .articles
            .into_iter()
            .filter(|a| a.title != "[Removed]")
            .map(Article::from)
            .collect())
    }

    /// Converts a raw source catalog response into domain sources
    fn convert_sources(&self, response: ApiSourcesResponse) -> AppResult<Vec<Source>> {
        if response.status != "ok" {
            return Err(AppError::ExternalApi(format!(
                "News API returned status {}",
                response.status
            )));
        }

        Ok(response.sources.into_iter().map(Source::from).collect())
    }

    /// Checks if we're within the provider's daily request quota
    async fn check_rate_limit(&self) -> AppResult<()> {
        let day_key = format!("api_usage:{}", Utc::now().format("%Y-%m-%d"));
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let count: u32 = conn.get(&day_key).await.unwrap_or(0);

        if count >= DAILY_QUOTA {
            tracing::error!(
                current = count,
                quota = DAILY_QUOTA,
                "Daily News API quota exceeded"
            );
            return Err(AppError::ExternalApi(
                "News API quota exceeded for today".to_string(),
            ));
        }

        if count as f32 / DAILY_QUOTA as f32 > 0.8 {
            tracing::warn!(
                current = count,
                quota = DAILY_QUOTA,
                remaining = DAILY_QUOTA - count,
                "News API quota at 80%"
            );
        }

        Ok(())
    }

    /// Increments the daily request counter
    async fn increment_api_usage(&self) -> AppResult<()> {
        let day_key = format!("api_usage:{}", Utc::now().format("%Y-%m-%d"));
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let _: () = conn.incr(&day_key, 1).await?;
        // Keep the counter a week for inspection
        let _: () = conn.expire(&day_key, 604800).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl NewsProvider for NewsApiProvider {
    async fn search_articles(&self, query: &str) -> AppResult<Vec<Article>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::ArticleSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                self.check_rate_limit().await?;

                let url = format!("{}/everything", self.api_url);

                let response = self
                    .http_client
                    .get(&url)
                    .header("X-Api-Key", &self.api_key)
                    .query(&[("q", query), ("sortBy", "publishedAt")])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(
                        query = %query,
                        status = %status,
                        body = %body,
                        "News API search request failed"
                    );
                    return Err(AppError::ExternalApi(format!(
                        "News API returned status {}: {}",
                        status, body
                    )));
                }

                let api_response: ApiArticlesResponse = response.json().await?;

                self.increment_api_usage().await?;

                let articles = self.convert_articles(api_response)?;

                tracing::info!(
                    query = %query,
                    results = articles.len(),
                    provider = self.name(),
                    "Article search completed"
                );

                Ok(articles)
            }
        )
    }

    async fn fetch_sources(&self) -> AppResult<Vec<Source>> {
        cached!(
            self.cache,
            CacheKey::Sources,
            SOURCES_CACHE_TTL,
            async move {
                self.check_rate_limit().await?;

                let url = format!("{}/top-headlines/sources", self.api_url);

                let response = self
                    .http_client
                    .get(&url)
                    .header("X-Api-Key", &self.api_key)
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(
                        status = %status,
                        body = %body,
                        "News API sources request failed"
                    );
                    return Err(AppError::ExternalApi(format!(
                        "News API returned status {}: {}",
                        status, body
                    )));
                }

                let api_response: ApiSourcesResponse = response.json().await?;

                self.increment_api_usage().await?;

                let sources = self.convert_sources(api_response)?;

                tracing::info!(
                    count = sources.len(),
                    provider = self.name(),
                    "Source catalog fetched"
                );

                Ok(sources)
            }
        )
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}
