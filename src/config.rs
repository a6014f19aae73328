//! Server configuration.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::simulation::{SimulationEngine, ThermalModel};

/// Startup configuration for [`OvenServer`](crate::OvenServer).
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Host or address to bind.
    pub host: String,
    /// TCP port to bind. Zero picks an ephemeral port.
    pub port: u16,
    /// Tag attached to every log line emitted by the server.
    pub tag: String,
    /// Time between simulation ticks.
    pub tick_interval: Duration,
    /// Heating and cooling rates.
    pub thermal: ThermalModel,
}

impl ServerConfig {
    /// Default bind host (all interfaces).
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    /// Default port.
    pub const DEFAULT_PORT: u16 = 8080;
    /// Default log tag.
    pub const DEFAULT_TAG: &'static str = "SIMULATOR";

    /// Set the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the log tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the time between simulation ticks.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Set the heating and cooling rates.
    pub fn with_thermal(mut self, thermal: ThermalModel) -> Self {
        self.thermal = thermal;
        self
    }

    /// The `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that the configuration can drive a simulation.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(Error::InvalidParameter {
                name: "tick_interval".to_string(),
                value: format!("{:?}", self.tick_interval),
            });
        }
        for (name, rate) in [
            ("heat_rate", self.thermal.heat_rate),
            ("cool_rate", self.thermal.cool_rate),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(Error::InvalidParameter {
                    name: name.to_string(),
                    value: rate.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            tag: Self::DEFAULT_TAG.to_string(),
            tick_interval: SimulationEngine::DEFAULT_TICK_INTERVAL,
            thermal: ThermalModel::default(),
        }
    }
}
