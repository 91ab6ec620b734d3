//! HTML pages rendered from catalog API data.

use crate::errors::{CatalogError, Result};
use crate::extract::PathNumber;
use crate::residents::fetch_residents;
use crate::resources::Resource;
use crate::server::AppState;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use minijinja::context;

static FAVICON: &[u8] = include_bytes!("../static/favicon.ico");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/favicon.ico", get(favicon))
        .route("/personagens", get(|| first_page("/personagens/1")))
        .route("/personagens/{page}", get(characters))
        .route("/personagem/{id}", get(character))
        .route("/episodes", get(|| first_page("/episodes/1")))
        .route("/episodes/{page}", get(episodes))
        .route("/episode/{id}", get(episode))
        .route("/locations", get(|| first_page("/locations/1")))
        .route("/locations/{page}", get(locations))
        .route("/location/{id}", get(location))
}

/// List routes without a page number always start over at page 1.
async fn first_page(target: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
}

async fn favicon() -> Response {
    ([(header::CONTENT_TYPE, "image/vnd.microsoft.icon")], FAVICON).into_response()
}

async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    state.render("home.html", context! {})
}

async fn characters(State(state): State<AppState>, page: PathNumber) -> Result<Html<String>> {
    let data = state.api().list(Resource::Character, &page).await?;
    state.render(
        "personagens.html",
        context! { data => data, prev => page.prev(), next => page.next(), page => page },
    )
}

async fn character(State(state): State<AppState>, id: PathNumber) -> Result<Html<String>> {
    let api = state.api();
    let character = api.get(Resource::Character, &id).await?;
    let origin = api.related(&character, "origin").await?;
    let location = api.related(&character, "location").await?;

    state.render(
        "personagem.html",
        context! { character => character, origin => origin, location => location },
    )
}

async fn episodes(State(state): State<AppState>, page: PathNumber) -> Result<Html<String>> {
    let data = state.api().list(Resource::Episode, &page).await?;
    state.render(
        "episodes.html",
        context! { data => data, prev => page.prev(), next => page.next(), page => page },
    )
}

async fn episode(State(state): State<AppState>, id: PathNumber) -> Result<Html<String>> {
    tracing::debug!(%id, "rendering episode");
    let episode = state.api().get(Resource::Episode, &id).await?;
    state.render("episode.html", context! { episode => episode })
}

async fn locations(State(state): State<AppState>, page: PathNumber) -> Result<Html<String>> {
    let data = state.api().list(Resource::Location, &page).await?;
    let locations = data
        .get("results")
        .cloned()
        .ok_or(CatalogError::MalformedRecord { field: "results" })?;

    state.render(
        "locations.html",
        context! {
            data => data,
            locations => locations,
            prev => page.prev(),
            next => page.next(),
            page => page,
        },
    )
}

async fn location(State(state): State<AppState>, id: PathNumber) -> Result<Html<String>> {
    let api = state.api();
    let location = api.get(Resource::Location, &id).await?;
    let residents =
        fetch_residents(api.client(), &location, state.resident_concurrency()).await?;

    state.render(
        "location.html",
        context! { location => location, residents => residents },
    )
}
