//! # reflow-oven-sim
//!
//! A networked reflow-soldering oven simulator.
//!
//! The simulator exposes a small line-based text protocol over TCP that lets
//! clients query oven status, start a reflow profile and abort a run, while a
//! background task advances a simulated thermal model once per second.
//!
//! ## Features
//!
//! - **Phase model**: Heating, soaking, reflow and cooling against a
//!   caller-supplied profile
//! - **Shared state**: Every client observes and drives the same oven
//! - **Protocol codec**: Pure encode/decode functions for status lines and commands
//! - **Client**: An async client for driving a running simulator
//!
//! ## Protocol
//!
//! ```text
//! client -> server   STATUS?
//!                    START;<soakTemp>;<soakTime>;<reflowTemp>;<reflowTime>
//!                    STOP
//! server -> client   STATUS;<currentTemp>;<targetTemp>;<status>;<timer>
//! ```
//!
//! The server pushes one status line when a client connects. Malformed and
//! unknown commands get no reply.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reflow_oven_sim::{OvenServer, Result, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let server = OvenServer::bind(ServerConfig::default().with_port(8080)).await?;
//!     server.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     }).await
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types

// Public modules
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod oven;
pub mod protocol;
pub mod server;
pub mod simulation;

// Re-exports for convenience
pub use client::OvenClient;
pub use config::ServerConfig;
pub use error::{Error, ParseError, Result};
pub use oven::{Oven, OvenSnapshot, OvenState, AMBIENT_TEMP};
pub use server::{ConnectionHandler, OvenServer};
pub use simulation::{PhaseTransition, SimulationEngine, ThermalModel};

// Re-export commonly used types from submodules
pub use data::{OvenStatus, Profile, TemperatureHistory, TemperatureSample};
pub use protocol::{decode_start, decode_status, encode_start, encode_status, Command};
