#![forbid(unsafe_code)]

pub mod api;
pub mod app;
pub mod config;
pub mod session;
pub mod state;

pub use app::build_app;
pub use session::SessionLayer;
pub use state::AppState;
