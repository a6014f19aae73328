//! Status line and START command encoding.
//!
//! Line formats:
//! - `STATUS;<currentTemp>;<targetTemp>;<status>;<timer>` (temperatures with
//!   exactly one fractional digit)
//! - `START;<soakTemp>;<soakTime>;<reflowTemp>;<reflowTime>`
//!
//! All functions here are pure. Installing a decoded profile into the oven
//! is the caller's job.

use std::str::FromStr;

use crate::data::{OvenStatus, Profile};
use crate::error::ParseError;
use crate::oven::OvenSnapshot;

/// Keyword starting a status line.
pub const STATUS_KEYWORD: &str = "STATUS";
/// Keyword starting a START command.
pub const START_KEYWORD: &str = "START";

/// Field separator.
const SEPARATOR: char = ';';

/// Number of fields in a START command, keyword included.
const START_FIELDS: usize = 5;

/// Number of fields in a status line, keyword included.
const STATUS_FIELDS: usize = 5;

/// Encode a snapshot as a newline-terminated status line.
pub fn encode_status(snapshot: &OvenSnapshot) -> String {
    format!(
        "{STATUS_KEYWORD};{:.1};{:.1};{};{}\n",
        snapshot.current_temp, snapshot.target_temp, snapshot.status, snapshot.timer
    )
}

/// Decode a START command into a profile.
///
/// A trailing line terminator is tolerated. Fields beyond the fifth are
/// ignored, and the keyword itself is not checked.
pub fn decode_start(line: &str) -> Result<Profile, ParseError> {
    let fields = split_fields(line);
    if fields.len() < START_FIELDS {
        return Err(ParseError::MissingFields {
            expected: START_FIELDS,
            found: fields.len(),
        });
    }

    Ok(Profile {
        soak_temp: parse_field(fields[1], "soak_temp")?,
        soak_time: parse_field(fields[2], "soak_time")?,
        reflow_temp: parse_field(fields[3], "reflow_temp")?,
        reflow_time: parse_field(fields[4], "reflow_time")?,
    })
}

/// Encode a profile as a newline-terminated START command.
pub fn encode_start(profile: &Profile) -> String {
    format!(
        "{START_KEYWORD};{};{};{};{}\n",
        profile.soak_temp, profile.soak_time, profile.reflow_temp, profile.reflow_time
    )
}

/// Decode a status line received from the oven.
pub fn decode_status(line: &str) -> Result<OvenSnapshot, ParseError> {
    let fields = split_fields(line);
    if fields[0] != STATUS_KEYWORD {
        return Err(ParseError::UnexpectedKeyword {
            expected: STATUS_KEYWORD,
            found: fields[0].to_string(),
        });
    }
    if fields.len() < STATUS_FIELDS {
        return Err(ParseError::MissingFields {
            expected: STATUS_FIELDS,
            found: fields.len(),
        });
    }

    Ok(OvenSnapshot {
        current_temp: parse_field(fields[1], "current_temp")?,
        target_temp: parse_field(fields[2], "target_temp")?,
        status: OvenStatus::from_str(fields[3])?,
        timer: parse_field(fields[4], "timer")?,
    })
}

fn split_fields(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n'])
        .split(SEPARATOR)
        .map(str::trim)
        .collect()
}

fn parse_field<T: FromStr>(value: &str, field: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
