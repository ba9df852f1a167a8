use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::models::{Drink, Ingredient, LongDrink, ShortDrink};
use crate::error::BaristaError;
use crate::middleware::auth::require_permission;
use crate::router::BaristaState;

#[derive(Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}

/// A recipe arrives either as a single ingredient object or as an array;
/// a single object is normalized to a one-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    One(Ingredient),
    Many(Vec<Ingredient>),
}

impl RecipeInput {
    fn into_vec(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::One(ingredient) => vec![ingredient],
            RecipeInput::Many(ingredients) => ingredients,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DrinkPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

/// GET /drinks — public listing in the short representation.
pub async fn list_drinks(
    State(state): State<BaristaState>,
) -> Result<Json<DrinksResponse<ShortDrink>>, BaristaError> {
    let drinks = state.store.list().await?;
    Ok(Json(DrinksResponse {
        success: true,
        drinks: drinks.iter().map(Drink::short).collect(),
    }))
}

/// GET /drinks-detail — long representation, requires `get:drinks-detail`.
pub async fn list_drinks_detail(
    State(state): State<BaristaState>,
    headers: HeaderMap,
) -> Result<Json<DrinksResponse<LongDrink>>, BaristaError> {
    require_permission(&state.auth, &headers, "get:drinks-detail").await?;
    // Post-auth failures on this route surface as forbidden.
    let drinks = state
        .store
        .list()
        .await
        .map_err(|_| BaristaError::Forbidden)?;
    Ok(Json(DrinksResponse {
        success: true,
        drinks: drinks.iter().map(Drink::long).collect(),
    }))
}

/// POST /drinks — requires `post:drinks`.
pub async fn create_drink(
    State(state): State<BaristaState>,
    headers: HeaderMap,
    Json(payload): Json<DrinkPayload>,
) -> Result<Json<DrinksResponse<LongDrink>>, BaristaError> {
    require_permission(&state.auth, &headers, "post:drinks").await?;

    let title = payload
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BaristaError::Validation("title is required".to_string()))?;
    let recipe = payload
        .recipe
        .ok_or_else(|| BaristaError::Validation("recipe is required".to_string()))?
        .into_vec();
    if recipe.is_empty() {
        return Err(BaristaError::Validation("recipe must not be empty".to_string()));
    }

    let drink = state
        .store
        .insert(&title, &recipe)
        .await
        .map_err(|err| match err {
            BaristaError::Database(_) => BaristaError::Unprocessable,
            other => other,
        })?;
    info!(id = drink.id, title = %drink.title, "created drink");
    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// PATCH /drinks/{id} — requires `patch:drinks`; overwrites only the
/// provided fields.
pub async fn update_drink(
    State(state): State<BaristaState>,
    Path(drink_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<DrinkPayload>,
) -> Result<Json<DrinksResponse<LongDrink>>, BaristaError> {
    require_permission(&state.auth, &headers, "patch:drinks").await?;

    let new_title = payload.title.filter(|t| !t.is_empty());
    let new_recipe = payload.recipe.map(RecipeInput::into_vec);
    if new_recipe.as_ref().is_some_and(|r| r.is_empty()) {
        return Err(BaristaError::Validation("recipe must not be empty".to_string()));
    }

    let drink = state.store.update(drink_id, new_title, new_recipe).await?;
    info!(id = drink.id, "updated drink");
    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// DELETE /drinks/{id} — requires `delete:drinks`.
pub async fn delete_drink(
    State(state): State<BaristaState>,
    Path(drink_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>, BaristaError> {
    require_permission(&state.auth, &headers, "delete:drinks").await?;
    state.store.delete(drink_id).await?;
    info!(id = drink_id, "deleted drink");
    Ok(Json(DeleteResponse {
        success: true,
        delete: drink_id,
    }))
}
