use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use sentinel_common::{DiseaseData, DiseaseEntry, SignalSet, User, UserData, UserRole, Ward};

use crate::document::WardState;
use crate::error::StoreResult;

/// Fields an administrator supplies when registering a ward.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWard {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Storage seam for the dashboard. Each mutating call is atomic with respect
/// to other calls on the same repository.
#[async_trait]
pub trait WardRepository: Send + Sync {
    async fn list_wards(&self) -> StoreResult<Vec<Ward>>;
    async fn get_ward(&self, id: &str) -> StoreResult<Option<Ward>>;
    async fn insert_ward(&self, ward: NewWard) -> StoreResult<Ward>;

    async fn get_signals(&self, ward_id: &str) -> StoreResult<Option<SignalSet>>;
    /// Replaces the ward's whole signal set. Fails with `NotFound` for unknown wards.
    /// The returned state is the one committed by this write.
    async fn put_signals(&self, ward_id: &str, signals: SignalSet) -> StoreResult<WardState>;
    async fn all_signals(&self) -> StoreResult<HashMap<String, SignalSet>>;

    /// Empty when the ward has no disease reports (or does not exist).
    async fn disease_data(&self, ward_id: &str) -> StoreResult<DiseaseData>;
    /// Returns the normalized disease name the entry was stored under and the
    /// ward's state as committed by this write.
    async fn upsert_disease_entry(
        &self,
        ward_id: &str,
        disease: &str,
        entry: DiseaseEntry,
    ) -> StoreResult<(String, WardState)>;
    async fn all_disease_data(&self) -> StoreResult<HashMap<String, DiseaseData>>;

    async fn login_user(&self, role: UserRole, name: Option<String>) -> StoreResult<User>;
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>>;
    async fn user_data(&self, user_id: &str) -> StoreResult<Option<UserData>>;
    async fn put_user_data(&self, user_id: &str, data: UserData) -> StoreResult<UserData>;

    async fn simulation_history(&self) -> StoreResult<Vec<Value>>;
}
