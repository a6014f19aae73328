//! Client commands.

use super::codec::{decode_start, encode_start, START_KEYWORD};
use crate::data::Profile;
use crate::error::ParseError;

/// Wire form of the status query.
pub const STATUS_QUERY: &str = "STATUS?";
/// Wire form of the stop command.
pub const STOP: &str = "STOP";

/// A command sent by a client.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `STATUS?`: request a status line.
    StatusQuery,
    /// `START;...`: install a profile and begin a run.
    Start(Profile),
    /// `STOP`: abort and cool down.
    Stop,
    /// Anything else. The server ignores these.
    Unknown(String),
}

impl Command {
    /// Parse one line, without its terminator, into a command.
    ///
    /// Surrounding whitespace is ignored. Any line beginning with `START` is
    /// treated as a START command, so a malformed one is a parse error rather
    /// than an unknown command.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line == STATUS_QUERY {
            Ok(Self::StatusQuery)
        } else if line == STOP {
            Ok(Self::Stop)
        } else if line.starts_with(START_KEYWORD) {
            decode_start(line).map(Self::Start)
        } else {
            Ok(Self::Unknown(line.to_string()))
        }
    }

    /// Encode as a newline-terminated line.
    pub fn to_line(&self) -> String {
        match self {
            Self::StatusQuery => format!("{STATUS_QUERY}\n"),
            Self::Start(profile) => encode_start(profile),
            Self::Stop => format!("{STOP}\n"),
            Self::Unknown(line) => format!("{line}\n"),
        }
    }
}
