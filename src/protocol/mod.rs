//! Line-based text protocol.
//!
//! This module contains the implementations for:
//! - Status line and START command encoding
//! - Client command parsing
//! - Line reassembly from a byte stream

pub mod codec;
pub mod command;
pub mod line_buffer;

pub use codec::{decode_start, decode_status, encode_start, encode_status};
pub use command::Command;
pub use line_buffer::{LineBuffer, MAX_LINE_LEN};
