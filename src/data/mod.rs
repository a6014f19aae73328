//! Data structures for oven runs.
//!
//! This module contains the reflow profile recipe, the oven lifecycle
//! status, and the client-side temperature history.

pub mod history;
pub mod profile;
pub mod status;

pub use history::{TemperatureHistory, TemperatureSample};
pub use profile::Profile;
pub use status::OvenStatus;
