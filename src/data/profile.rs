//! Reflow profile recipe.

/// A reflow recipe: soak and reflow targets with their durations.
///
/// Values are taken as supplied. Negative durations or temperatures below
/// ambient are not rejected; the simulation simply behaves accordingly
/// (a soak temperature at or below ambient never leaves `HEATING`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    /// Soak phase target temperature in °C.
    pub soak_temp: f64,
    /// Soak phase duration in seconds.
    pub soak_time: i64,
    /// Reflow phase peak temperature in °C.
    pub reflow_temp: f64,
    /// Reflow phase duration in seconds.
    pub reflow_time: i64,
}

impl Profile {
    /// Create a new profile.
    pub fn new(soak_temp: f64, soak_time: i64, reflow_temp: f64, reflow_time: i64) -> Self {
        Self {
            soak_temp,
            soak_time,
            reflow_temp,
            reflow_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_zero() {
        let profile = Profile::default();
        assert_eq!(profile, Profile::new(0.0, 0, 0.0, 0));
    }
}
