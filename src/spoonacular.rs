use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

pub const MAX_RESULTS_PER_REQUEST: u32 = 50;

#[derive(Debug, Error)]
pub enum SpoonacularError {
    #[error(
        "SPOONACULAR_API_KEY not set. Please configure it in the .env file for the backend container."
    )]
    MissingApiKey,

    #[error("Unauthorized: invalid or expired Spoonacular API key.")]
    Unauthorized,

    #[error("Spoonacular request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("Spoonacular request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Spoonacular error {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("Invalid JSON from Spoonacular: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

impl SpoonacularError {
    /// True when the failure is about the API key rather than the upstream itself.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::Unauthorized)
    }

    // The request url carries the apiKey query parameter, so it must not end up in messages
    fn from_transport(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Request(err)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub number: u32,
    pub offset: u32,
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub intolerances: Option<String>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        SearchParams {
            query: query.into(),
            number: 10,
            offset: 0,
            diet: None,
            cuisine: None,
            intolerances: None,
        }
    }

    fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("query", self.query.clone()),
            (
                "number",
                self.number.clamp(1, MAX_RESULTS_PER_REQUEST).to_string(),
            ),
            ("offset", self.offset.to_string()),
            ("addRecipeInformation", "true".to_string()),
        ];

        let filters = [
            ("diet", &self.diet),
            ("cuisine", &self.cuisine),
            ("intolerances", &self.intolerances),
        ];
        for (name, value) in filters {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((name, v.to_string()));
            }
        }
        pairs
    }
}

/// Thin client over the Spoonacular REST API. Holds one pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct SpoonacularClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SpoonacularClient {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .context("Failed to build Spoonacular HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.spoonacular_api_key.clone(),
            &config.spoonacular_base_url,
            config.request_timeout,
            config.connect_timeout,
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search through `/recipes/complexSearch` with recipe information attached.
    pub async fn search_recipes(&self, params: &SearchParams) -> Result<Value, SpoonacularError> {
        self.get("/recipes/complexSearch", params.to_query_pairs())
            .await
    }

    pub async fn get_recipe_information(
        &self,
        recipe_id: u64,
        include_nutrition: bool,
    ) -> Result<Value, SpoonacularError> {
        let path = format!("/recipes/{recipe_id}/information");
        self.get(
            &path,
            vec![("includeNutrition", include_nutrition.to_string())],
        )
        .await
    }

    async fn get(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<Value, SpoonacularError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SpoonacularError::MissingApiKey)?;
        params.push(("apiKey", api_key.to_string()));

        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {url}");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(SpoonacularError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(SpoonacularError::from_transport)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            log::warn!("Spoonacular rejected the API key ({status})");
            return Err(SpoonacularError::Unauthorized);
        }
        if status.is_client_error() || status.is_server_error() {
            // Prefer the JSON rendering of the error body when there is one
            let detail = match serde_json::from_str::<Value>(&body) {
                Ok(json) => json.to_string(),
                Err(_) => body,
            };
            log::warn!("Spoonacular returned {status} for {path}");
            return Err(SpoonacularError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(SpoonacularError::InvalidJson)
    }
}
