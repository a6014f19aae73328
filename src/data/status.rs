//! Oven lifecycle status.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Lifecycle phase of the oven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OvenStatus {
    /// No run in progress.
    #[default]
    Idle,
    /// Ramping up to the soak temperature.
    Heating,
    /// Holding at the soak temperature while the soak timer counts down.
    Soaking,
    /// Ramping up to the reflow peak.
    Reflowing,
    /// Cooling back down to ambient.
    Cooling,
    /// Run finished; oven is back at ambient.
    Complete,
    /// Reserved for fault injection. No transition currently enters it.
    Error,
}

impl OvenStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [OvenStatus; 7] = [
        Self::Idle,
        Self::Heating,
        Self::Soaking,
        Self::Reflowing,
        Self::Cooling,
        Self::Complete,
        Self::Error,
    ];

    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Heating => "HEATING",
            Self::Soaking => "SOAKING",
            Self::Reflowing => "REFLOWING",
            Self::Cooling => "COOLING",
            Self::Complete => "COMPLETE",
            Self::Error => "ERROR",
        }
    }

    /// Check if the heater is driving toward a target in this phase.
    pub fn is_heating_phase(&self) -> bool {
        matches!(self, Self::Heating | Self::Soaking | Self::Reflowing)
    }

    /// Check if the simulation leaves this status untouched.
    pub fn is_resting(&self) -> bool {
        matches!(self, Self::Idle | Self::Complete | Self::Error)
    }
}

impl fmt::Display for OvenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OvenStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}
