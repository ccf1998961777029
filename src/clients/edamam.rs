//! Thin client for the Edamam recipe search API (v2).
//!
//! Responses are passed through as raw JSON; nothing is cached.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::RecipeApiConfig;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Invalid recipe API URL: {0}")]
    InvalidUrl(String),

    #[error("Recipe API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Recipe API error: {status} - {body}")]
    Upstream { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Value>,
}

#[derive(Clone)]
pub struct EdamamClient {
    client: Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl EdamamClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &RecipeApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
            app_key: config.app_key.clone(),
        }
    }

    fn url(&self, path: Option<&str>, query: Option<&str>) -> Result<Url, RecipeError> {
        let base = match path {
            Some(id) => format!("{}/{}", self.base_url, urlencoding::encode(id)),
            None => self.base_url.clone(),
        };

        let mut params = vec![("type", "public")];
        if let Some(q) = query {
            params.push(("q", q));
        }
        params.push(("app_id", self.app_id.as_str()));
        params.push(("app_key", self.app_key.as_str()));

        Url::parse_with_params(&base, &params).map_err(|e| RecipeError::InvalidUrl(e.to_string()))
    }

    /// Search public recipes; returns the upstream `hits` array.
    pub async fn search(&self, query: &str) -> Result<Vec<Value>, RecipeError> {
        let url = self.url(None, Some(query))?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RecipeError::Upstream { status, body });
        }

        let response: SearchResponse = response.json().await?;
        Ok(response.hits)
    }

    /// Fetch a single recipe by its upstream id, `None` when it does not exist.
    pub async fn get_recipe(&self, id: &str) -> Result<Option<Value>, RecipeError> {
        let url = self.url(Some(id), None)?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RecipeError::Upstream { status, body });
        }

        Ok(Some(response.json().await?))
    }
}
