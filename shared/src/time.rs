//! Time-of-day and day-index utilities shared by template and demand
//! derivation. Times are represented as minutes since midnight so that
//! midpoint and duration arithmetic stays in exact integers.

use crate::error::{RosterError, RosterResult};

/// Minutes since midnight, e.g. `"08:30"` -> `510`.
pub fn parse_hhmm(value: &str) -> RosterResult<u32> {
    let (h, m) = value
        .split_once(':')
        .ok_or_else(|| RosterError::InvalidInput(format!("malformed time '{value}'")))?;
    let h: u32 = h
        .trim()
        .parse()
        .map_err(|_| RosterError::InvalidInput(format!("malformed time '{value}'")))?;
    let m: u32 = m
        .trim()
        .parse()
        .map_err(|_| RosterError::InvalidInput(format!("malformed time '{value}'")))?;
    if h > 23 || m > 59 {
        return Err(RosterError::InvalidInput(format!(
            "time out of range '{value}'"
        )));
    }
    Ok(h * 60 + m)
}

/// Minutes since midnight -> `"HH:MM"`.
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Hours between two minute-of-day marks, as tenths of an hour (fixed-point
/// integer scale used throughout the constraint model).
pub fn duration_tenths(start_minutes: u32, end_minutes: u32) -> u32 {
    debug_assert!(end_minutes >= start_minutes);
    ((end_minutes - start_minutes) * 10) / 60
}

pub fn tenths_to_decimal_hours(tenths: i64) -> f64 {
    (tenths as f64) / 10.0
}

/// Normalise a day reference (either a short/long English name or a
/// `0..=6` index with Monday = 0) to a day index.
pub fn normalize_day(value: &str) -> Option<u8> {
    let lower = value.trim().to_lowercase();
    if let Ok(idx) = lower.parse::<u8>() {
        if idx <= 6 {
            return Some(idx);
        }
    }
    let idx = match lower.as_str() {
        "mon" | "monday" => 0,
        "tue" | "tues" | "tuesday" => 1,
        "wed" | "weds" | "wednesday" => 2,
        "thu" | "thur" | "thurs" | "thursday" => 3,
        "fri" | "friday" => 4,
        "sat" | "saturday" => 5,
        "sun" | "sunday" => 6,
        _ => return None,
    };
    Some(idx)
}

pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn day_name(idx: u8) -> &'static str {
    DAY_NAMES[idx as usize % 7]
}
