use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

mod access;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().merge(access::router())
}
