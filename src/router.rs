use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::auth::Authenticator;
use crate::db::DrinkStore;
use crate::handlers::drinks;

#[derive(Clone)]
pub struct BaristaState {
    pub store: DrinkStore,
    pub auth: Arc<Authenticator>,
}

impl BaristaState {
    pub fn new(store: DrinkStore, auth: Arc<Authenticator>) -> Self {
        Self { store, auth }
    }
}

pub fn barista_router(state: BaristaState) -> Router {
    Router::new()
        .route(
            "/drinks",
            get(drinks::list_drinks).post(drinks::create_drink),
        )
        .route("/drinks-detail", get(drinks::list_drinks_detail))
        .route(
            "/drinks/{drink_id}",
            patch(drinks::update_drink).delete(drinks::delete_drink),
        )
        .with_state(state)
}
