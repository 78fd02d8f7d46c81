//! HTTP surface of the Sentinel City dashboard.

pub mod error;
pub mod narrative;
pub mod rest;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use narrative::{Narrative, Narrator};
pub use routes::build_router;
pub use state::AppState;
