pub mod config;
pub mod numeric;
pub mod types;

pub use config::{Config, ConfigError};
pub use numeric::{coerce_number, lenient_number, parse_number};
pub use types::*;
