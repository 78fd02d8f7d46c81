//! Rule-based ward alerts.
//!
//! Rules are checked in priority order and the first match wins:
//! 1. a named disease over its reporting threshold
//! 2. heavy pollution + clinic load + cold (inversion smog)
//! 3. an over-the-counter pharmacy surge
//! 4. nothing notable

use std::cmp::Ordering;

use sentinel_common::{Alert, AlertLevel, DiseaseData, SignalSet};

// A disease enters the candidate set above either of these.
const DISEASE_VISITS_THRESHOLD: f64 = 50.0;
const DISEASE_SALES_THRESHOLD: f64 = 60.0;
// Candidates above either of these are high risk, the rest medium.
const DISEASE_HIGH_VISITS: f64 = 70.0;
const DISEASE_HIGH_SALES: f64 = 80.0;

const DISEASE_HIGH_CONFIDENCE: u8 = 88;
const DISEASE_MEDIUM_CONFIDENCE: u8 = 65;

const INVERSION_POLLUTION: f64 = 80.0;
const INVERSION_CLINIC_VISITS: f64 = 70.0;
const INVERSION_TEMPERATURE: f64 = 20.0;
const INVERSION_CONFIDENCE: u8 = 85;

const PHARMACY_SURGE_SALES: f64 = 80.0;
const PHARMACY_SURGE_CONFIDENCE: u8 = 72;

const NORMAL_CONFIDENCE: u8 = 20;

struct DiseaseCandidate<'a> {
    name: &'a str,
    level: AlertLevel,
    total: f64,
}

impl DiseaseCandidate<'_> {
    /// Higher tier first, then larger visits + sales, then alphabetical.
    fn outranks(&self, other: &Self) -> Ordering {
        self.level
            .cmp(&other.level)
            .then_with(|| self.total.partial_cmp(&other.total).unwrap_or(Ordering::Equal))
            .then_with(|| other.name.cmp(self.name))
    }
}

/// Derive the alert for a ward from its current signals and disease counters.
///
/// Never fails: absent readings are already 0 by the time they reach here.
pub fn generate_alert(signals: &SignalSet, disease_data: &DiseaseData) -> Alert {
    if let Some(alert) = disease_alert(disease_data) {
        return alert;
    }

    if signals.pollution > INVERSION_POLLUTION
        && signals.clinic_visits > INVERSION_CLINIC_VISITS
        && signals.temperature < INVERSION_TEMPERATURE
    {
        return Alert {
            level: AlertLevel::High,
            reason: "Respiratory spike due to PM2.5 + cold inversion".to_string(),
            confidence: INVERSION_CONFIDENCE,
            disease: None,
        };
    }

    if signals.pharmacy_sales > PHARMACY_SURGE_SALES {
        return Alert {
            level: AlertLevel::Medium,
            reason: "OTC surge indicates viral outbreak".to_string(),
            confidence: PHARMACY_SURGE_CONFIDENCE,
            disease: None,
        };
    }

    Alert {
        level: AlertLevel::Normal,
        reason: "No significant anomalies detected".to_string(),
        confidence: NORMAL_CONFIDENCE,
        disease: None,
    }
}

fn disease_alert(disease_data: &DiseaseData) -> Option<Alert> {
    let winner = disease_data
        .iter()
        .filter_map(|(name, entry)| {
            let visits = entry.clinic_visits;
            let sales = entry.pharmacy_sales;
            if !(visits > DISEASE_VISITS_THRESHOLD || sales > DISEASE_SALES_THRESHOLD) {
                return None;
            }
            let level = if visits > DISEASE_HIGH_VISITS || sales > DISEASE_HIGH_SALES {
                AlertLevel::High
            } else {
                AlertLevel::Medium
            };
            Some(DiseaseCandidate {
                name,
                level,
                total: visits + sales,
            })
        })
        .max_by(|a, b| a.outranks(b))?;

    let confidence = match winner.level {
        AlertLevel::High => DISEASE_HIGH_CONFIDENCE,
        _ => DISEASE_MEDIUM_CONFIDENCE,
    };

    Some(Alert {
        level: winner.level,
        reason: format!(
            "{} is spreading fast in this area. Please be careful.",
            winner.name
        ),
        confidence,
        disease: Some(winner.name.to_string()),
    })
}
