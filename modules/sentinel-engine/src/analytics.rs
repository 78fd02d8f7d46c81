//! City-wide anomaly detection and relative risk scoring.
//!
//! Scores are normalized against the strongest ward in the current cohort, so
//! they compare wards within one snapshot rather than across time.

use std::collections::HashMap;

use sentinel_common::{AnalyticsBaseline, AnalyticsSnapshot, SignalSet, Ward, WardAnalytics};

/// Minimum rise over the city baseline that flags a ward (inclusive).
const CONCERN_DELTA_PCT: f64 = 5.0;

const SPREAD_COMPLAINTS_WEIGHT: f64 = 0.6;
const SPREAD_MOBILITY_WEIGHT: f64 = 0.4;

const VULNERABILITY_COMPLAINTS_WEIGHT: f64 = 0.4;
const VULNERABILITY_POLLUTION_WEIGHT: f64 = 0.6;

struct RawWardScore<'a> {
    ward: &'a Ward,
    respiratory_complaints: f64,
    baseline_delta_pct: f64,
    spread_raw: f64,
    vulnerability_raw: f64,
}

/// Score every ward against the city baseline. Output keeps input order.
pub fn compute_city_analytics(
    wards: &[Ward],
    signals_by_ward: &HashMap<String, SignalSet>,
) -> AnalyticsSnapshot {
    if wards.is_empty() {
        return AnalyticsSnapshot {
            baseline: AnalyticsBaseline {
                respiratory_baseline: 0.0,
            },
            wards: Vec::new(),
        };
    }

    let empty = SignalSet::default();
    let readings: Vec<(&Ward, &SignalSet)> = wards
        .iter()
        .map(|ward| (ward, signals_by_ward.get(&ward.id).unwrap_or(&empty)))
        .collect();

    let city_total: f64 = readings
        .iter()
        .map(|(_, signals)| signals.respiratory_complaints())
        .sum();
    let baseline = city_total / wards.len() as f64;

    let raw: Vec<RawWardScore> = readings
        .iter()
        .map(|(ward, signals)| {
            let complaints = signals.respiratory_complaints();
            let baseline_delta_pct = if baseline > 0.0 {
                (complaints - baseline) / baseline * 100.0
            } else {
                0.0
            };
            RawWardScore {
                ward,
                respiratory_complaints: complaints,
                baseline_delta_pct,
                spread_raw: complaints * SPREAD_COMPLAINTS_WEIGHT
                    + signals.mobility * SPREAD_MOBILITY_WEIGHT,
                vulnerability_raw: complaints * VULNERABILITY_COMPLAINTS_WEIGHT
                    + signals.pollution * VULNERABILITY_POLLUTION_WEIGHT,
            }
        })
        .collect();

    let max_spread = cohort_max(raw.iter().map(|r| r.spread_raw));
    let max_vulnerability = cohort_max(raw.iter().map(|r| r.vulnerability_raw));

    let wards = raw
        .into_iter()
        .map(|r| WardAnalytics {
            ward_id: r.ward.id.clone(),
            ward_name: r.ward.name.clone(),
            respiratory_complaints: r.respiratory_complaints,
            baseline_delta_pct: round_to_tenth(r.baseline_delta_pct),
            situation_of_concern: r.baseline_delta_pct >= CONCERN_DELTA_PCT,
            spread_risk_score: percent_of(r.spread_raw, max_spread),
            vulnerability_index: percent_of(r.vulnerability_raw, max_vulnerability),
        })
        .collect();

    AnalyticsSnapshot {
        baseline: AnalyticsBaseline {
            respiratory_baseline: round_to_tenth(baseline),
        },
        wards,
    }
}

/// Largest value in the cohort, or 1 when nothing is above zero.
fn cohort_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

fn percent_of(raw: f64, max: f64) -> u8 {
    (raw / max * 100.0).round().clamp(0.0, 100.0) as u8
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ward(id: &str) -> Ward {
        Ward {
            id: id.to_string(),
            name: format!("Ward {id}"),
            lat: 0.0,
            lng: 0.0,
        }
    }

    fn reading(clinic: f64, pharmacy: f64, pollution: f64, mobility: f64) -> SignalSet {
        SignalSet {
            clinic_visits: clinic,
            pharmacy_sales: pharmacy,
            pollution,
            temperature: 22.0,
            mobility,
            updated_at: None,
        }
    }

    #[test]
    fn empty_city_has_zero_baseline() {
        let snapshot = compute_city_analytics(&[], &HashMap::new());
        assert_eq!(snapshot.baseline.respiratory_baseline, 0.0);
        assert!(snapshot.wards.is_empty());
    }

    #[test]
    fn all_zero_signals_score_zero() {
        let wards = vec![ward("a"), ward("b")];
        let mut signals = HashMap::new();
        signals.insert("a".to_string(), reading(0.0, 0.0, 0.0, 0.0));

        let snapshot = compute_city_analytics(&wards, &signals);
        assert_eq!(snapshot.baseline.respiratory_baseline, 0.0);
        for w in &snapshot.wards {
            assert_eq!(w.baseline_delta_pct, 0.0);
            assert!(!w.situation_of_concern);
            assert_eq!(w.spread_risk_score, 0);
            assert_eq!(w.vulnerability_index, 0);
        }
    }

    #[test]
    fn baseline_and_deltas() {
        let wards = vec![ward("a"), ward("b"), ward("c")];
        let mut signals = HashMap::new();
        signals.insert("a".to_string(), reading(60.0, 40.0, 10.0, 50.0)); // 100
        signals.insert("b".to_string(), reading(30.0, 20.0, 90.0, 0.0)); // 50
        // c has no signals: 0

        let snapshot = compute_city_analytics(&wards, &signals);
        assert_eq!(snapshot.baseline.respiratory_baseline, 50.0);

        let a = &snapshot.wards[0];
        assert_eq!(a.ward_id, "a");
        assert_eq!(a.respiratory_complaints, 100.0);
        assert_eq!(a.baseline_delta_pct, 100.0);
        assert!(a.situation_of_concern);

        let b = &snapshot.wards[1];
        assert_eq!(b.baseline_delta_pct, 0.0);
        assert!(!b.situation_of_concern);

        let c = &snapshot.wards[2];
        assert_eq!(c.baseline_delta_pct, -100.0);
        assert_eq!(c.spread_risk_score, 0);
        assert_eq!(c.vulnerability_index, 0);
    }

    #[test]
    fn scores_normalize_to_cohort_max() {
        let wards = vec![ward("a"), ward("b")];
        let mut signals = HashMap::new();
        // spread: 100*0.6 + 50*0.4 = 80; vulnerability: 100*0.4 + 10*0.6 = 46
        signals.insert("a".to_string(), reading(60.0, 40.0, 10.0, 50.0));
        // spread: 50*0.6 + 5*0.4 = 32; vulnerability: 50*0.4 + 90*0.6 = 74
        signals.insert("b".to_string(), reading(30.0, 20.0, 90.0, 5.0));

        let snapshot = compute_city_analytics(&wards, &signals);
        assert_eq!(snapshot.wards[0].spread_risk_score, 100);
        assert_eq!(snapshot.wards[1].spread_risk_score, 40);
        assert_eq!(snapshot.wards[0].vulnerability_index, 62); // 46 / 74
        assert_eq!(snapshot.wards[1].vulnerability_index, 100);
    }

    #[test]
    fn exactly_five_percent_is_a_concern() {
        // baseline = (105 + 95) / 2 = 100; ward a is +5.0%
        let wards = vec![ward("a"), ward("b")];
        let mut signals = HashMap::new();
        signals.insert("a".to_string(), reading(105.0, 0.0, 0.0, 0.0));
        signals.insert("b".to_string(), reading(95.0, 0.0, 0.0, 0.0));

        let snapshot = compute_city_analytics(&wards, &signals);
        assert_eq!(snapshot.wards[0].baseline_delta_pct, 5.0);
        assert!(snapshot.wards[0].situation_of_concern);
        assert!(!snapshot.wards[1].situation_of_concern);
    }

    #[test]
    fn delta_is_rounded_for_output_only() {
        let wards = vec![ward("a"), ward("b")];
        let mut signals = HashMap::new();
        // baseline = (104.96 + 95.04) / 2 = 100; a = +4.96% -> rounds to 5.0 but is not >= 5
        signals.insert("a".to_string(), reading(104.96, 0.0, 0.0, 0.0));
        signals.insert("b".to_string(), reading(95.04, 0.0, 0.0, 0.0));

        let snapshot = compute_city_analytics(&wards, &signals);
        assert_eq!(snapshot.wards[0].baseline_delta_pct, 5.0);
        assert!(!snapshot.wards[0].situation_of_concern);
    }

    #[test]
    fn permuting_wards_permutes_output() {
        let mut signals = HashMap::new();
        signals.insert("a".to_string(), reading(60.0, 40.0, 10.0, 50.0));
        signals.insert("b".to_string(), reading(30.0, 20.0, 90.0, 0.0));
        signals.insert("c".to_string(), reading(5.0, 5.0, 40.0, 70.0));

        let forward = compute_city_analytics(&[ward("a"), ward("b"), ward("c")], &signals);
        let reversed = compute_city_analytics(&[ward("c"), ward("b"), ward("a")], &signals);

        assert_eq!(forward.baseline, reversed.baseline);
        let ids: Vec<&str> = reversed.wards.iter().map(|w| w.ward_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        for w in &forward.wards {
            let twin = reversed.wards.iter().find(|r| r.ward_id == w.ward_id).unwrap();
            assert_eq!(w, twin);
        }
    }
}
