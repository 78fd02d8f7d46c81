use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::numeric::lenient_number;

// =============================================================================
// Wards and signals
// =============================================================================

/// A neighborhood tracked on the city map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ward {
    pub id: String,
    pub name: String,
    /// Older dashboards wrote unparseable coordinates as `null`; those read as 0.
    #[serde(default, deserialize_with = "lenient_number")]
    pub lat: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lng: f64,
}

/// The current environmental/clinical readings for one ward.
///
/// Each submission replaces the whole set; there is no history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSet {
    #[serde(default, deserialize_with = "lenient_number")]
    pub clinic_visits: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pharmacy_sales: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pollution: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temperature: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub mobility: f64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SignalSet {
    /// clinic visits + pharmacy sales, the respiratory-load proxy.
    pub fn respiratory_complaints(&self) -> f64 {
        self.clinic_visits + self.pharmacy_sales
    }
}

/// Per-disease counters reported for a ward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseEntry {
    #[serde(default, deserialize_with = "lenient_number")]
    pub clinic_visits: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pharmacy_sales: f64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Disease counters for one ward, keyed by normalized disease name.
pub type DiseaseData = BTreeMap<String, DiseaseEntry>;

/// Disease names are bucketed case- and whitespace-insensitively.
pub fn normalize_disease_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Alerts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Medium,
    High,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Normal => "normal",
            AlertLevel::Medium => "medium",
            AlertLevel::High => "high",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule-based risk verdict for a ward. Always derived, never authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub level: AlertLevel,
    pub reason: String,
    /// 0–100.
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsBaseline {
    pub respiratory_baseline: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardAnalytics {
    pub ward_id: String,
    pub ward_name: String,
    pub respiratory_complaints: f64,
    pub baseline_delta_pct: f64,
    pub situation_of_concern: bool,
    pub spread_risk_score: u8,
    pub vulnerability_index: u8,
}

/// City-wide anomaly and risk scoring, computed fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub baseline: AnalyticsBaseline,
    pub wards: Vec<WardAnalytics>,
}

// =============================================================================
// Policy simulation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyOutcome {
    pub policy: String,
    pub original_cases: f64,
    pub reduced_cases: f64,
    /// Percent of hospital capacity, capped at 100.
    pub hospital_load: f64,
    pub cost_saved: f64,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Citizen,
    Pharmacist,
    Hospital,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Citizen => "citizen",
            UserRole::Pharmacist => "pharmacist",
            UserRole::Hospital => "hospital",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "citizen" => Ok(UserRole::Citizen),
            "pharmacist" => Ok(UserRole::Pharmacist),
            "hospital" => Ok(UserRole::Hospital),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub role: UserRole,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

/// Self-reported readings a user attached to their profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub location: Option<serde_json::Value>,
    #[serde(default)]
    pub pollution: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub diseases: Vec<serde_json::Value>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
