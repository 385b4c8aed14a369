//! Calendar and sidereal time helpers
use std::{f64::consts::TAU, str::FromStr};

use hifitime::{Epoch, Unit};

/// Calendar date and time of day, as written in product files
/// and simulation scenarios. Seconds may carry a fractional part.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CalendarTime {
    pub year: i32,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: f64,
}

impl Default for CalendarTime {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0.0,
        }
    }
}

impl CalendarTime {
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Parses the 6 calendar fields `YYYY MM DD hh mm ss.sss`
    /// from a whitespace separated token iterator.
    pub(crate) fn from_tokens<'a, I: Iterator<Item = &'a str>>(mut tokens: I) -> Option<Self> {
        let year = i32::from_str(tokens.next()?).ok()?;
        let month = u8::from_str(tokens.next()?).ok()?;
        let day = u8::from_str(tokens.next()?).ok()?;
        let hour = u8::from_str(tokens.next()?).ok()?;
        let minute = u8::from_str(tokens.next()?).ok()?;
        let second = f64::from_str(tokens.next()?).ok()?;
        let t = Self::new(year, month, day, hour, minute, second);
        t.to_epoch().map(|_| t)
    }

    /// Converts to [Epoch], None if this is not a valid Gregorian date.
    pub fn to_epoch(&self) -> Option<Epoch> {
        if !self.second.is_finite() || self.second < 0.0 || self.second >= 61.0 {
            return None;
        }
        let minute =
            Epoch::maybe_from_gregorian_utc(self.year, self.month, self.day, self.hour, self.minute, 0, 0)
                .ok()?;
        Some(minute + self.second * Unit::Second)
    }

    /// Seconds elapsed since 1970-01-01T00:00:00 UTC.
    pub fn unix_seconds(&self) -> Option<f64> {
        Some(self.to_epoch()?.to_unix_seconds())
    }

    /// Julian date (UTC days)
    pub fn julian_date(&self) -> Option<f64> {
        Some(self.to_epoch()?.to_jde_utc_days())
    }

    /// Greenwich mean sidereal angle in [0, 2π[ (IAU-82).
    pub fn gmst_rad(&self) -> Option<f64> {
        Some(gmst_rad(self.julian_date()?))
    }
}

/// Greenwich mean sidereal angle (rad) at given Julian date,
/// UT1 being approximated by UTC.
pub fn gmst_rad(julian_date: f64) -> f64 {
    let t = (julian_date - 2451545.0) / 36525.0;

    let gmst_s = -6.2E-6 * t * t * t
        + 0.093104 * t * t
        + (876600.0 * 3600.0 + 8640184.812866) * t
        + 67310.54841;

    (gmst_s / 240.0).to_radians().rem_euclid(TAU)
}
