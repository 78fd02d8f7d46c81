//! Deterministic scoring for ward alerts, city analytics and policy what-ifs.
//!
//! Everything here is pure and synchronous; callers load data from the store
//! and hand in copies.

pub mod alert;
pub mod analytics;
pub mod policy;

pub use alert::generate_alert;
pub use analytics::compute_city_analytics;
pub use policy::{simulate_policy, PolicyError};
