mod accounts;
mod planets;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::server::AppState;

pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Ingestion
        .route("/Fetchplanets/", get(planets::fetch_planets))
        // Planets
        .route("/AllPlanets/", get(planets::list_all_planets))
        .route("/planets/", get(planets::list_planets))
        .route("/planetview/{name}/", get(planets::get_planet))
        .route("/planets/create/", post(planets::create_planet))
        .route("/planets/update/{name}/", put(planets::update_planet))
        .route(
            "/planets/update-partial/{name}/",
            patch(planets::patch_planet),
        )
        .route("/planets/delete/{name}/", delete(planets::delete_planet))
        // Accounts
        .route("/register/", post(accounts::register))
        .route("/api-token-auth/", post(accounts::obtain_token))
}
