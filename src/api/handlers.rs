use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::spoonacular::{MAX_RESULTS_PER_REQUEST, SearchParams, SpoonacularClient};

use super::error::ApiError;
use super::models::{HealthResponse, RecipeQuery, SearchQuery, ServiceStatus};

pub const SERVICE_NAME: &str = "Recipe Explorer API";

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn root_handler() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok",
        service: SERVICE_NAME,
    })
}

pub async fn search_handler(
    State(spoonacular): State<Arc<SpoonacularClient>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let start = Instant::now();
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if query.q.trim().is_empty() {
        return Err(ApiError::BadRequest("Query cannot be empty".to_string()));
    }
    if !(1..=MAX_RESULTS_PER_REQUEST).contains(&query.number) {
        return Err(ApiError::BadRequest(format!(
            "number must be between 1 and {MAX_RESULTS_PER_REQUEST}"
        )));
    }

    let params = SearchParams {
        query: query.q,
        number: query.number,
        offset: query.offset,
        diet: query.diet,
        cuisine: query.cuisine,
        intolerances: query.intolerances,
    };
    let data = spoonacular.search_recipes(&params).await?;

    log::info!(
        "search {:?} served in {}ms",
        params.query,
        start.elapsed().as_millis()
    );
    Ok(Json(data))
}

pub async fn recipe_handler(
    State(spoonacular): State<Arc<SpoonacularClient>>,
    recipe_id: Result<Path<u64>, PathRejection>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(recipe_id) = recipe_id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let data = spoonacular
        .get_recipe_information(recipe_id, query.include_nutrition)
        .await?;

    if is_missing_recipe(&data) {
        return Err(ApiError::NotFound("Recipe not found".to_string()));
    }
    Ok(Json(data))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

// A JSON body that is falsy, or an object without an id, means no such recipe.
// A body that is not JSON at all never gets here; the client reports it as InvalidJson.
fn is_missing_recipe(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => !map.contains_key("id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_missing_recipe() {
        assert!(is_missing_recipe(&Value::Null));
        assert!(is_missing_recipe(&json!({})));
        assert!(is_missing_recipe(&json!({"title": "no id"})));
        assert!(!is_missing_recipe(&json!({"id": 716429, "title": "Pasta"})));
    }

    #[test]
    fn test_falsy_scalars_are_missing() {
        assert!(is_missing_recipe(&json!(0)));
        assert!(is_missing_recipe(&json!(false)));
        assert!(is_missing_recipe(&json!("")));
        assert!(is_missing_recipe(&json!([])));
        assert!(!is_missing_recipe(&json!(7)));
        assert!(!is_missing_recipe(&json!(true)));
        assert!(!is_missing_recipe(&json!([{"id": 1}])));
    }
}
