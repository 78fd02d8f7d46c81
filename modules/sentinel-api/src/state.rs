use std::sync::Arc;

use sentinel_store::WardRepository;

use crate::narrative::Narrator;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WardRepository>,
    pub narrator: Arc<Narrator>,
}

impl AppState {
    pub fn new(store: Arc<dyn WardRepository>, narrator: Arc<Narrator>) -> Self {
        Self { store, narrator }
    }
}
