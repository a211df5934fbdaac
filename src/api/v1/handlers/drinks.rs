/*
 * Responsibility
 * - /drinks CRUD handlers
 * - GET /drinks is public and returns the short recipe form; everything else
 *   sits behind the permission guard and receives AuthCtx
 * - Storage failures on mutations surface as 422, matching the API contract
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::v1::{
        dto::drinks::{
            CreateDrinkRequest, DeleteDrinkResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::AuthCtx,
    },
    error::AppError,
    repos::drink_repo,
    state::AppState,
};

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let rows = drink_repo::list(&state.db).await?;

    let mut drinks = Vec::with_capacity(rows.len());
    for row in rows {
        drinks.push(DrinkShort::from_row(row).map_err(|_| AppError::Internal)?);
    }

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

pub async fn list_drinks_detail(
    State(state): State<AppState>,
    ctx: AuthCtx,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    tracing::debug!(subject = ?ctx.subject(), "listing drinks with full recipes");

    let rows = drink_repo::list(&state.db).await?;

    let mut drinks = Vec::with_capacity(rows.len());
    for row in rows {
        drinks.push(DrinkLong::from_row(row).map_err(|_| AppError::Internal)?);
    }

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

pub async fn create_drink(
    State(state): State<AppState>,
    ctx: AuthCtx,
    Json(req): Json<CreateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("invalid_drink", msg))?;

    let recipe = serde_json::to_string(&req.recipe).map_err(|_| AppError::Unprocessable)?;

    let row = drink_repo::create(&state.db, &req.title, &recipe)
        .await
        .map_err(|_| AppError::Unprocessable)?;

    tracing::info!(subject = ?ctx.subject(), drink_id = row.drink_id, "drink created");

    let drink = DrinkShort::from_row(row).map_err(|_| AppError::Internal)?;
    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink],
    }))
}

pub async fn update_drink(
    State(state): State<AppState>,
    Path(drink_id): Path<i64>,
    ctx: AuthCtx,
    Json(req): Json<UpdateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("invalid_drink", msg))?;

    drink_repo::get(&state.db, drink_id)
        .await?
        .ok_or(AppError::not_found("drink"))?;

    let recipe = match &req.recipe {
        Some(parts) => Some(serde_json::to_string(parts).map_err(|_| AppError::Unprocessable)?),
        None => None,
    };

    let row = drink_repo::update(&state.db, drink_id, req.title.as_deref(), recipe.as_deref())
        .await
        .map_err(|_| AppError::Unprocessable)?
        .ok_or(AppError::not_found("drink"))?;

    tracing::info!(subject = ?ctx.subject(), drink_id, "drink updated");

    let drink = DrinkShort::from_row(row).map_err(|_| AppError::Internal)?;
    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![drink],
    }))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    Path(drink_id): Path<i64>,
    ctx: AuthCtx,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    drink_repo::get(&state.db, drink_id)
        .await?
        .ok_or(AppError::not_found("drink"))?;

    let deleted = drink_repo::delete(&state.db, drink_id)
        .await
        .map_err(|_| AppError::Unprocessable)?;
    if !deleted {
        return Err(AppError::not_found("drink"));
    }

    tracing::info!(subject = ?ctx.subject(), drink_id, "drink deleted");

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: drink_id,
    }))
}
