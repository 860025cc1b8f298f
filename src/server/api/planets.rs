use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAuth;
use crate::planets::{reconcile, service};
use crate::server::AppState;
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, NotFoundExt};
use crate::types::{PlanetFilter, PlanetInput, PlanetPatch};

const PLANET_NOT_FOUND: &str = "Planet not found";

pub async fn fetch_planets(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        user = %auth.user.username,
        source = %state.source.url(),
        "Fetching planets"
    );

    let candidates = state.source.fetch_planets().await?;
    let report = reconcile(state.store.as_ref(), candidates)?;

    Ok(Json(ApiResponse::success(report)))
}

pub async fn list_all_planets(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let planets = service::list(state.store.as_ref(), &PlanetFilter::default())?;

    Ok(Json(ApiResponse::success(planets)))
}

pub async fn list_planets(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(filter): Query<PlanetFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let planets = service::list(state.store.as_ref(), &filter)?;

    Ok(Json(ApiResponse::success(planets)))
}

pub async fn get_planet(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let planet = service::retrieve(state.store.as_ref(), &name).or_not_found(PLANET_NOT_FOUND)?;

    Ok(Json(ApiResponse::success(planet)))
}

pub async fn create_planet(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<PlanetInput>,
) -> Result<impl IntoResponse, ApiError> {
    let planet = service::create(state.store.as_ref(), &req)?;

    tracing::info!(user = %auth.user.username, "Created planet '{}'", planet.name);

    Ok((StatusCode::CREATED, Json(ApiResponse::success(planet))))
}

pub async fn update_planet(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    JsonBody(req): JsonBody<PlanetInput>,
) -> Result<impl IntoResponse, ApiError> {
    let planet =
        service::update(state.store.as_ref(), &name, &req).or_not_found(PLANET_NOT_FOUND)?;

    Ok(Json(ApiResponse::success(planet)))
}

pub async fn patch_planet(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    JsonBody(req): JsonBody<PlanetPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let planet =
        service::patch(state.store.as_ref(), &name, &req).or_not_found(PLANET_NOT_FOUND)?;

    Ok(Json(ApiResponse::success(planet)))
}

pub async fn delete_planet(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    service::delete(state.store.as_ref(), &name).or_not_found(PLANET_NOT_FOUND)?;

    Ok(StatusCode::NO_CONTENT)
}
