use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::session::SessionLayer;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionLayer,
    pub key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}
