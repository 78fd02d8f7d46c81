use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sentinel_common::{
    normalize_disease_name, Alert, DiseaseData, DiseaseEntry, SignalSet, User, UserData, UserRole,
    Ward,
};
use sentinel_engine::generate_alert;

use crate::error::{StoreError, StoreResult};
use crate::ids::generate_id;
use crate::repository::NewWard;

/// Stored signal entry for a ward.
///
/// `alert` and `disease_data` are denormalized copies refreshed on every
/// write so other readers of the file see current values. Reads through the
/// API always recompute the alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRecord {
    #[serde(default)]
    pub signals: SignalSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_data: Option<DiseaseData>,
}

/// A ward's readings and the alert they produced, as of one committed write.
#[derive(Debug, Clone, PartialEq)]
pub struct WardState {
    pub signals: SignalSet,
    pub alert: Alert,
    pub disease_data: DiseaseData,
}

/// The whole persisted state. Unknown top-level keys are carried through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub wards: Vec<Ward>,
    #[serde(default)]
    pub signals: BTreeMap<String, SignalRecord>,
    #[serde(default)]
    pub disease_data: BTreeMap<String, DiseaseData>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub user_data: BTreeMap<String, UserData>,
    #[serde(default)]
    pub simulation_history: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn ward(&self, id: &str) -> Option<&Ward> {
        self.wards.iter().find(|w| w.id == id)
    }

    fn require_ward(&self, id: &str) -> StoreResult<()> {
        match self.ward(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::ward_not_found(id)),
        }
    }

    pub fn add_ward(&mut self, new: NewWard) -> Ward {
        let ward = Ward {
            id: generate_id(),
            name: new.name,
            lat: new.lat,
            lng: new.lng,
        };
        self.wards.push(ward.clone());
        ward
    }

    pub fn signals_for(&self, ward_id: &str) -> Option<&SignalSet> {
        self.signals.get(ward_id).map(|r| &r.signals)
    }

    pub fn disease_data_for(&self, ward_id: &str) -> DiseaseData {
        self.disease_data.get(ward_id).cloned().unwrap_or_default()
    }

    /// Replace the ward's signal set wholesale.
    pub fn set_signals(&mut self, ward_id: &str, signals: SignalSet) -> StoreResult<WardState> {
        self.require_ward(ward_id)?;
        let disease_data = self.disease_data_for(ward_id);
        let alert = generate_alert(&signals, &disease_data);
        self.signals.insert(
            ward_id.to_string(),
            SignalRecord {
                signals: signals.clone(),
                alert: Some(alert.clone()),
                disease_data: Some(disease_data.clone()),
            },
        );
        Ok(WardState {
            signals,
            alert,
            disease_data,
        })
    }

    /// Overwrite one disease's counters, leaving the ward's other diseases alone.
    ///
    /// Returns the normalized disease name and the ward's state after the write.
    pub fn upsert_disease(
        &mut self,
        ward_id: &str,
        disease: &str,
        entry: DiseaseEntry,
    ) -> StoreResult<(String, WardState)> {
        self.require_ward(ward_id)?;
        let name = normalize_disease_name(disease);

        let diseases = self.disease_data.entry(ward_id.to_string()).or_default();
        diseases.insert(name.clone(), entry);
        let disease_data = diseases.clone();

        let record = self.signals.entry(ward_id.to_string()).or_default();
        let alert = generate_alert(&record.signals, &disease_data);
        record.alert = Some(alert.clone());
        record.disease_data = Some(disease_data.clone());

        Ok((
            name,
            WardState {
                signals: record.signals.clone(),
                alert,
                disease_data,
            },
        ))
    }

    pub fn all_signals(&self) -> HashMap<String, SignalSet> {
        self.signals
            .iter()
            .map(|(id, record)| (id.clone(), record.signals.clone()))
            .collect()
    }

    /// Find a user by role + name and bump their login time, or register a new one.
    ///
    /// Without a name a fresh user is always created.
    pub fn login_user(&mut self, role: UserRole, name: Option<String>, now: DateTime<Utc>) -> User {
        if let Some(ref name) = name {
            if let Some(user) = self
                .users
                .iter_mut()
                .find(|u| u.role == role && &u.name == name)
            {
                user.last_login = now;
                return user.clone();
            }
        }

        let user = User {
            id: generate_id(),
            role,
            name: name.unwrap_or_else(|| format!("{}_{}", role, now.timestamp_millis())),
            created_at: now,
            last_login: now,
        };
        self.users.push(user.clone());
        user
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn set_user_data(&mut self, user_id: &str, data: UserData) -> StoreResult<UserData> {
        if self.user(user_id).is_none() {
            return Err(StoreError::user_not_found(user_id));
        }
        self.user_data.insert(user_id.to_string(), data.clone());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_common::AlertLevel;
    use serde_json::json;

    fn doc_with_ward() -> (Document, String) {
        let mut doc = Document::default();
        let ward = doc.add_ward(NewWard {
            name: "Riverside".to_string(),
            lat: 12.9,
            lng: 77.6,
        });
        (doc, ward.id)
    }

    fn entry(visits: f64, sales: f64) -> DiseaseEntry {
        DiseaseEntry {
            clinic_visits: visits,
            pharmacy_sales: sales,
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn empty_object_parses_as_empty_document() {
        let doc: Document = serde_json::from_str("{}").unwrap();
        assert!(doc.wards.is_empty());
        assert!(doc.simulation_history.is_empty());
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let doc: Document = serde_json::from_value(json!({
            "wards": [],
            "legacyNotes": ["keep me"],
        }))
        .unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["legacyNotes"][0], "keep me");
    }

    #[test]
    fn signals_require_existing_ward() {
        let mut doc = Document::default();
        let err = doc.set_signals("missing", SignalSet::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "ward", .. }));
    }

    #[test]
    fn disease_names_are_normalized_into_one_bucket() {
        let (mut doc, ward_id) = doc_with_ward();
        doc.upsert_disease(&ward_id, " Dengue ", entry(10.0, 0.0)).unwrap();
        let (name, _) = doc.upsert_disease(&ward_id, "DENGUE", entry(55.0, 0.0)).unwrap();
        assert_eq!(name, "dengue");

        let data = doc.disease_data_for(&ward_id);
        assert_eq!(data.len(), 1);
        assert_eq!(data["dengue"].clinic_visits, 55.0);
    }

    #[test]
    fn upsert_leaves_other_diseases_untouched() {
        let (mut doc, ward_id) = doc_with_ward();
        doc.upsert_disease(&ward_id, "flu", entry(20.0, 5.0)).unwrap();
        doc.upsert_disease(&ward_id, "nipah", entry(80.0, 0.0)).unwrap();

        let data = doc.disease_data_for(&ward_id);
        assert_eq!(data["flu"].clinic_visits, 20.0);
        assert_eq!(data["nipah"].clinic_visits, 80.0);
    }

    #[test]
    fn cached_alert_tracks_disease_updates() {
        let (mut doc, ward_id) = doc_with_ward();
        doc.set_signals(&ward_id, SignalSet::default()).unwrap();
        assert_eq!(
            doc.signals[&ward_id].alert.as_ref().unwrap().level,
            AlertLevel::Normal
        );

        let (_, state) = doc.upsert_disease(&ward_id, "Nipah", entry(90.0, 0.0)).unwrap();
        assert_eq!(state.alert.level, AlertLevel::High);
        let record = &doc.signals[&ward_id];
        assert_eq!(record.alert.as_ref(), Some(&state.alert));
        assert!(record.disease_data.as_ref().unwrap().contains_key("nipah"));
    }

    #[test]
    fn login_reuses_user_by_role_and_name() {
        let mut doc = Document::default();
        let t0 = Utc::now();
        let first = doc.login_user(UserRole::Pharmacist, Some("Asha".into()), t0);
        let later = t0 + chrono::Duration::minutes(5);
        let again = doc.login_user(UserRole::Pharmacist, Some("Asha".into()), later);

        assert_eq!(first.id, again.id);
        assert_eq!(again.last_login, later);
        assert_eq!(again.created_at, t0);

        let other_role = doc.login_user(UserRole::Citizen, Some("Asha".into()), later);
        assert_ne!(other_role.id, first.id);
        assert_eq!(doc.users.len(), 2);
    }

    #[test]
    fn anonymous_login_gets_generated_name() {
        let mut doc = Document::default();
        let now = Utc::now();
        let user = doc.login_user(UserRole::Hospital, None, now);
        assert_eq!(user.name, format!("hospital_{}", now.timestamp_millis()));
    }

    #[test]
    fn user_data_requires_user() {
        let mut doc = Document::default();
        assert!(doc.set_user_data("nobody", UserData::default()).is_err());
    }
}
