/// TMDB API provider
///
/// Every list endpoint shares the same page envelope and query conventions
/// (`api_key`, one-based `page`), so the provider funnels everything through
/// one request helper and only varies the path and extra parameters.
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{MovieDetails, MovieSummary, Page},
    services::providers::{MetadataProvider, MovieFeed, TimeWindow},
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    /// Issues one GET against TMDB and deserializes the JSON body
    ///
    /// 404 maps to `NotFound` (unknown movie id); any other non-success
    /// status is an upstream failure.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.api_url, path);

        let mut query: Vec<(&str, String)> = vec![("api_key", self.api_key.clone())];
        query.extend(params.iter().cloned());

        let response = self.http_client.get(&url).query(&query).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!("TMDB has no {}", path))),
            status if status.is_success() => Ok(response.json().await?),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::ExternalApi(format!(
                    "TMDB API returned status {}: {}",
                    status, body
                )))
            }
        }
    }

    async fn fetch_page(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<Page<MovieSummary>> {
        self.get_json(path, params).await
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search(&self, query: &str, page: u32) -> AppResult<Page<MovieSummary>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let results = self
            .fetch_page(
                "search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;

        tracing::info!(
            query = %query,
            results = results.results.len(),
            provider = self.name(),
            "Movie search completed"
        );

        Ok(results)
    }

    async fn trending(&self, window: TimeWindow, page: u32) -> AppResult<Page<MovieSummary>> {
        let path = format!("trending/movie/{}", window.as_path());
        self.fetch_page(&path, &[("page", page.to_string())]).await
    }

    async fn feed(&self, feed: MovieFeed, page: u32) -> AppResult<Page<MovieSummary>> {
        let path = format!("movie/{}", feed.as_path());
        self.fetch_page(&path, &[("page", page.to_string())]).await
    }

    async fn by_genre(&self, genre_id: i64, page: u32) -> AppResult<Page<MovieSummary>> {
        self.fetch_page(
            "discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    async fn details(&self, tmdb_id: i64) -> AppResult<MovieDetails> {
        let path = format!("movie/{}", tmdb_id);
        let details: MovieDetails = self
            .get_json(&path, &[("append_to_response", "credits".to_string())])
            .await?;

        tracing::info!(
            tmdb_id,
            provider = self.name(),
            "Movie details fetched"
        );

        Ok(details)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
