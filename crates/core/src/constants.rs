//! Constants used throughout the consult core crate.
//!
//! This module contains path and filename constants so that the CLI, the REST API and the
//! tests agree on where things live.

/// Default directory for consultation data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "consult_data";

/// Append-only JSON-lines file of saved consultations.
pub const CONSULTATIONS_FILENAME: &str = "consultations.jsonl";

/// YAML credential store.
pub const CREDENTIALS_FILENAME: &str = "users.yaml";

/// Username allowed to see every user's consultations when none is configured.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Accepted body temperature range in degrees Celsius.
pub const TEMPERATURE_RANGE_C: std::ops::RangeInclusive<f64> = 30.0..=45.0;

/// Accepted pulse range in beats per minute.
pub const PULSE_RANGE_BPM: std::ops::RangeInclusive<u32> = 30..=180;
