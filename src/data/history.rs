//! Rolling temperature history.
//!
//! Keeps the most recent status readings seen by a client, for charting the
//! current run.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use super::status::OvenStatus;
use crate::oven::OvenSnapshot;

/// A single timestamped status reading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemperatureSample {
    /// When the reading was received.
    pub received_at: DateTime<Utc>,
    /// Oven temperature in °C.
    pub current_temp: f64,
    /// Target temperature in °C.
    pub target_temp: f64,
    /// Oven status at the time of the reading.
    pub status: OvenStatus,
}

/// Bounded history of temperature samples, oldest first.
#[derive(Debug, Clone)]
pub struct TemperatureHistory {
    capacity: usize,
    samples: VecDeque<TemperatureSample>,
}

impl TemperatureHistory {
    /// Default number of samples retained (two minutes at one reading per second).
    pub const DEFAULT_CAPACITY: usize = 120;

    /// Create an empty history holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Record a snapshot received now.
    pub fn record(&mut self, snapshot: &OvenSnapshot) {
        self.record_at(snapshot, Utc::now());
    }

    /// Record a snapshot with an explicit timestamp.
    pub fn record_at(&mut self, snapshot: &OvenSnapshot, received_at: DateTime<Utc>) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(TemperatureSample {
            received_at,
            current_temp: snapshot.current_temp,
            target_temp: snapshot.target_temp,
            status: snapshot.status,
        });
    }

    /// Drop all samples, e.g. when a new run starts.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Iterate over samples, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &TemperatureSample> {
        self.samples.iter()
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<&TemperatureSample> {
        self.samples.back()
    }

    /// Highest temperature seen in the retained window.
    pub fn peak_temp(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.current_temp).reduce(f64::max)
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of retained samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TemperatureHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(current_temp: f64) -> OvenSnapshot {
        OvenSnapshot {
            current_temp,
            target_temp: 150.0,
            status: OvenStatus::Heating,
            timer: 0,
        }
    }

    #[test]
    fn test_history_drops_oldest_beyond_capacity() {
        let mut history = TemperatureHistory::new(3);
        for temp in [25.0, 26.0, 27.0, 28.0] {
            history.record(&snapshot(temp));
        }

        let temps: Vec<f64> = history.samples().map(|s| s.current_temp).collect();
        assert_eq!(temps, vec![26.0, 27.0, 28.0]);
        assert_eq!(history.latest().map(|s| s.current_temp), Some(28.0));
        assert_eq!(history.peak_temp(), Some(28.0));
    }

    #[test]
    fn test_history_clear() {
        let mut history = TemperatureHistory::default();
        assert_eq!(history.capacity(), 120);
        history.record(&snapshot(30.0));
        assert_eq!(history.len(), 1);

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.peak_temp(), None);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut history = TemperatureHistory::new(0);
        history.record(&snapshot(30.0));
        history.record(&snapshot(31.0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|s| s.current_temp), Some(31.0));
    }
}
