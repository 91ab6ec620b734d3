//! JSON pass-through of the catalog API.

use crate::errors::Result;
use crate::extract::PathNumber;
use crate::resources::Resource;
use crate::server::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/personagens/{page}", get(characters))
        .route("/personagem/{id}", get(character))
        .route("/episodios/{page}", get(episodes))
        .route("/episodio/{id}", get(episode))
        .route("/localizacoes/{page}", get(locations))
        .route("/localizacao/{id}", get(location))
}

async fn characters(State(state): State<AppState>, page: PathNumber) -> Result<Json<Value>> {
    Ok(Json(state.api().list(Resource::Character, page).await?))
}

async fn character(State(state): State<AppState>, id: PathNumber) -> Result<Json<Value>> {
    Ok(Json(state.api().get(Resource::Character, id).await?))
}

async fn episodes(State(state): State<AppState>, page: PathNumber) -> Result<Json<Value>> {
    Ok(Json(state.api().list(Resource::Episode, page).await?))
}

async fn episode(State(state): State<AppState>, id: PathNumber) -> Result<Json<Value>> {
    Ok(Json(state.api().get(Resource::Episode, id).await?))
}

async fn locations(State(state): State<AppState>, page: PathNumber) -> Result<Json<Value>> {
    Ok(Json(state.api().list(Resource::Location, page).await?))
}

async fn location(State(state): State<AppState>, id: PathNumber) -> Result<Json<Value>> {
    Ok(Json(state.api().get(Resource::Location, id).await?))
}
