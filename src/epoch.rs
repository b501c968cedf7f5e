//! Calendar helpers: validity dates are plain civil dates,
//! expressed as [Epoch] at midnight UTC so interval containment
//! reduces to total ordering.
use crate::ParsingError;
use hifitime::{Duration, Epoch};
use std::str::FromStr;

/// Sentinel for ground records and for satellite records
/// that never declared an end of validity.
pub(crate) fn far_future() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2500, 1, 1)
}

/// Sentinel start of the all-time validity window.
pub(crate) fn far_past() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(1900, 1, 1)
}

/// Builds the [Epoch] describing given civil date at midnight UTC.
pub fn from_ymd(year: i32, month: u8, day: u8) -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(year, month, day)
}

/// Builds the [Epoch] describing given (year, day of year),
/// day of year starting at 1.
pub fn from_year_doy(year: i32, doy: u16) -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(year, 1, 1)
        + Duration::from_days((doy.saturating_sub(1)) as f64)
}

/// Parses the date contained in a "VALID FROM" / "VALID UNTIL"
/// field: "yyyy mm dd [hh mm ss.sssssss]", trailing time of day
/// is not significant for validity windows and is ignored.
pub(crate) fn parse_validity(content: &str) -> Result<Epoch, ParsingError> {
    let mut items = content.split_ascii_whitespace();

    let year = items
        .next()
        .ok_or(ParsingError::DatetimeFormat)
        .and_then(|s| i32::from_str(s).or(Err(ParsingError::DatetimeParsing(s.to_string()))))?;

    let month = items
        .next()
        .ok_or(ParsingError::DatetimeFormat)
        .and_then(|s| u8::from_str(s).or(Err(ParsingError::DatetimeParsing(s.to_string()))))?;

    let day = items
        .next()
        .ok_or(ParsingError::DatetimeFormat)
        .and_then(|s| u8::from_str(s).or(Err(ParsingError::DatetimeParsing(s.to_string()))))?;

    Ok(from_ymd(year, month, day))
}
