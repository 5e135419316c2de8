use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_number")]
    pub number: u32,
    #[serde(default)]
    pub offset: u32,
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub intolerances: Option<String>,
}

fn default_number() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    #[serde(default)]
    pub include_nutrition: bool,
}
