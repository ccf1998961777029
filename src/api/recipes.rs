use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;
use std::sync::Arc;

use super::validation::validate_search_query;
use super::{ApiError, AppState, RecipeSearchQuery, RecipesResponse};

/// GET /recipes?q=
/// Proxies a public recipe search
pub async fn search_recipes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecipeSearchQuery>,
) -> Result<Json<RecipesResponse>, ApiError> {
    let query = validate_search_query(&params.q)?;

    let recipes = state.recipes().search(query).await?;
    tracing::debug!(query, hits = recipes.len(), "Recipe search");

    Ok(Json(RecipesResponse { recipes }))
}

/// GET /recipes/{id}
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let recipe = state
        .recipes()
        .get_recipe(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe", &id))?;

    Ok(Json(recipe))
}
