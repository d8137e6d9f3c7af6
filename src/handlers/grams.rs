// handlers/grams.rs - the gram resource routes
//
// GET    /  and /grams     index
// GET    /grams/new        new
// POST   /grams            create
// GET    /grams/:id        show
// GET    /grams/:id/edit   edit
// PATCH  /grams/:id        update (PUT is routed here too)
// DELETE /grams/:id        destroy

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::grams::{GramParams, Outcome};
use crate::middleware::Principal;
use crate::state::AppState;

/// Pagination parameters for the listing; unparseable values fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn index(
    State(state): State<AppState>,
    query: Option<Query<IndexQuery>>,
) -> Result<Outcome, ApiError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    Ok(state.controller.index(query.page, query.per_page).await?)
}

pub async fn new(State(state): State<AppState>, principal: Principal) -> Result<Outcome, ApiError> {
    Ok(state.controller.new_form(principal.user_id()).await?)
}

pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    params: GramParams,
) -> Result<Outcome, ApiError> {
    Ok(state.controller.create(principal.user_id(), params).await?)
}

pub async fn show(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Outcome, ApiError> {
    Ok(state.controller.show(principal.user_id(), &id).await?)
}

pub async fn edit(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Outcome, ApiError> {
    Ok(state.controller.edit(principal.user_id(), &id).await?)
}

pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    params: GramParams,
) -> Result<Outcome, ApiError> {
    Ok(state.controller.update(principal.user_id(), &id, params).await?)
}

pub async fn destroy(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> Result<Outcome, ApiError> {
    Ok(state.controller.destroy(principal.user_id(), &id).await?)
}
