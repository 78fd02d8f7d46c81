//! "What if" arithmetic for public-health interventions.

use chrono::Utc;
use sentinel_common::PolicyOutcome;
use thiserror::Error;

const DEFAULT_REDUCTION: f64 = 0.15;
const HOSPITALIZATION_RATE: f64 = 0.2;
const MAX_HOSPITAL_LOAD: f64 = 100.0;
const COST_PER_AVERTED_CASE: f64 = 500.0;

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("cases must be a non-negative number")]
    InvalidCases,
}

/// Fraction of cases a policy is expected to avert.
pub fn reduction_factor(policy: Option<&str>) -> f64 {
    match policy {
        Some("mobile_clinic") => 0.35,
        Some("mask_advisory") => 0.25,
        Some("traffic_restriction") => 0.20,
        _ => DEFAULT_REDUCTION,
    }
}

/// Project the effect of `policy` on a case count.
///
/// Unknown policy ids fall back to the default reduction but keep their label;
/// only a missing policy is reported as `"baseline"`.
pub fn simulate_policy(cases: f64, policy: Option<&str>) -> Result<PolicyOutcome, PolicyError> {
    if !cases.is_finite() || cases < 0.0 {
        return Err(PolicyError::InvalidCases);
    }

    let factor = reduction_factor(policy);
    let reduced_cases = (cases * (1.0 - factor)).round();
    let hospital_load = (reduced_cases * HOSPITALIZATION_RATE).round().min(MAX_HOSPITAL_LOAD);
    let cost_saved = ((cases - reduced_cases) * COST_PER_AVERTED_CASE).round();

    Ok(PolicyOutcome {
        policy: policy.unwrap_or("baseline").to_string(),
        original_cases: cases,
        reduced_cases,
        hospital_load,
        cost_saved,
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_clinic_on_a_thousand_cases() {
        let outcome = simulate_policy(1000.0, Some("mobile_clinic")).unwrap();
        assert_eq!(outcome.policy, "mobile_clinic");
        assert_eq!(outcome.original_cases, 1000.0);
        assert_eq!(outcome.reduced_cases, 650.0);
        assert_eq!(outcome.hospital_load, 100.0);
        assert_eq!(outcome.cost_saved, 175_000.0);
    }

    #[test]
    fn missing_policy_is_baseline() {
        let outcome = simulate_policy(200.0, None).unwrap();
        assert_eq!(outcome.policy, "baseline");
        assert_eq!(outcome.reduced_cases, 170.0);
        assert_eq!(outcome.hospital_load, 34.0);
        assert_eq!(outcome.cost_saved, 15_000.0);
    }

    #[test]
    fn unknown_policy_uses_default_factor() {
        let outcome = simulate_policy(100.0, Some("curfew")).unwrap();
        assert_eq!(outcome.policy, "curfew");
        assert_eq!(outcome.reduced_cases, 85.0);
    }

    #[test]
    fn known_factors() {
        assert_eq!(simulate_policy(100.0, Some("mask_advisory")).unwrap().reduced_cases, 75.0);
        assert_eq!(simulate_policy(100.0, Some("traffic_restriction")).unwrap().reduced_cases, 80.0);
    }

    #[test]
    fn hospital_load_below_cap() {
        let outcome = simulate_policy(50.0, Some("mask_advisory")).unwrap();
        // 50 * 0.75 = 37.5 -> 38; 38 * 0.2 = 7.6 -> 8
        assert_eq!(outcome.reduced_cases, 38.0);
        assert_eq!(outcome.hospital_load, 8.0);
        assert_eq!(outcome.cost_saved, 6_000.0);
    }

    #[test]
    fn zero_cases_is_valid() {
        let outcome = simulate_policy(0.0, Some("mobile_clinic")).unwrap();
        assert_eq!(outcome.reduced_cases, 0.0);
        assert_eq!(outcome.hospital_load, 0.0);
        assert_eq!(outcome.cost_saved, 0.0);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert_eq!(simulate_policy(-5.0, Some("mobile_clinic")), Err(PolicyError::InvalidCases));
        assert_eq!(simulate_policy(f64::NAN, None), Err(PolicyError::InvalidCases));
        assert_eq!(simulate_policy(f64::INFINITY, None), Err(PolicyError::InvalidCases));
    }

    #[test]
    fn huge_case_counts_keep_full_magnitude() {
        let outcome = simulate_policy(1e17, Some("mobile_clinic")).unwrap();
        assert_eq!(outcome.reduced_cases, 6.5e16);
        assert_eq!(outcome.hospital_load, 100.0);
        assert_eq!(outcome.cost_saved, 1.75e19);
    }
}
