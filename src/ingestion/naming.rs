//! Product directories and file name sequences
use std::path::PathBuf;

use crate::error::Error;

/// Longest file sequence we accept
pub const MAX_SEQUENCE_FILES: usize = 10_000;

/// Hours between two consecutive ultra-rapid products
const ULTRA_RAPID_STEP_HOURS: u8 = 6;

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// True when this sort designates ultra-rapid orbit products.
pub fn is_ultra_rapid(sort: &str) -> bool {
    sort.starts_with("IGU") || sort.contains("Ultra")
}

/// Relative directory hosting the products of this sort, for example
/// `IGS/igr` for "IGR", `JAXA/madoca` for "madoca" and
/// `COD/final` for "COD_Final".
pub fn product_directory(sort: &str) -> Result<PathBuf, Error> {
    let unknown = || Error::UnknownProductSort(sort.to_string());

    if let Some(rest) = sort.strip_prefix("IG") {
        let sub = match rest.chars().next() {
            Some('S') => "igs",
            Some('R') => "igr",
            Some('U') => "igu",
            _ => return Err(unknown()),
        };
        return Ok(PathBuf::from("IGS").join(sub));
    }

    if sort.starts_with("ma") {
        return Ok(PathBuf::from("JAXA").join("madoca"));
    }

    let (agency, latency) = sort.split_once('_').ok_or_else(unknown)?;
    if agency.is_empty() {
        return Err(unknown());
    }
    let sub = match latency.chars().next() {
        Some('F') => "final",
        Some('R') => "rapid",
        Some('U') => "ultra_rapid",
        _ => return Err(unknown()),
    };
    Ok(PathBuf::from(agency).join(sub))
}

/// File naming conventions we know how to sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingScheme {
    /// `{head}YYYYDDD{tail}` (long names, day of year), one file per day
    DayOfYear { head: String, year: i32, day: u16, tail: String },
    /// `{head}WWWWD_HH{tail}`, one file every 6 hours
    UltraRapid {
        head: String,
        week: u32,
        day: u8,
        hour: u8,
        tail: String,
    },
    /// `{head}WWWWD{tail}`, one file per day
    Daily {
        head: String,
        week: u32,
        day: u8,
        tail: String,
    },
}

/// Splits `name` at its first digit: (head, numeric part and following).
fn split_at_digit(name: &str) -> Option<(&str, &str)> {
    let pos = name.find(|c: char| c.is_ascii_digit())?;
    Some(name.split_at(pos))
}

fn number<T: std::str::FromStr>(s: &str, range: std::ops::Range<usize>) -> Option<T> {
    s.get(range)?.parse::<T>().ok()
}

impl NamingScheme {
    fn day_of_year(first: &str) -> Option<Self> {
        let (head, rest) = first.split_at(first.find('_')? + 1);
        let year = number::<i32>(rest, 0..4)?;
        let day = number::<u16>(rest, 4..7)?;
        if day == 0 || day > days_in_year(year) {
            return None;
        }
        Some(Self::DayOfYear {
            head: head.to_string(),
            year,
            day,
            tail: rest.get(7..)?.to_string(),
        })
    }

    fn ultra_rapid(first: &str) -> Option<Self> {
        let (head, rest) = split_at_digit(first)?;
        if rest.get(5..6)? != "_" {
            return None;
        }
        let hour = number::<u8>(rest, 6..8)?;
        if hour % ULTRA_RAPID_STEP_HOURS != 0 || hour >= 24 {
            return None;
        }
        Some(Self::UltraRapid {
            head: head.to_string(),
            week: number(rest, 0..4)?,
            day: number::<u8>(rest, 4..5).filter(|d| *d < 7)?,
            hour,
            tail: rest.get(8..)?.to_string(),
        })
    }

    fn daily(first: &str) -> Option<Self> {
        let (head, rest) = split_at_digit(first)?;
        Some(Self::Daily {
            head: head.to_string(),
            week: number(rest, 0..4)?,
            day: number::<u8>(rest, 4..5).filter(|d| *d < 7)?,
            tail: rest.get(5..)?.to_string(),
        })
    }

    /// Naming scheme of an orbit product sequence starting at `first`.
    pub fn orbit(sort: &str, first: &str) -> Result<Self, Error> {
        let scheme = if first.starts_with("COD") {
            Self::day_of_year(first)
        } else if is_ultra_rapid(sort) {
            Self::ultra_rapid(first)
        } else {
            Self::daily(first)
        };
        scheme.ok_or(Error::InvalidFileName(first.to_string()))
    }

    /// Naming scheme of a clock product sequence starting at `first`.
    pub fn clock(sort: &str, first: &str) -> Result<Self, Error> {
        let scheme = if sort.contains("Ultra") {
            Self::ultra_rapid(first)
        } else {
            Self::daily(first)
        };
        scheme.ok_or(Error::InvalidFileName(first.to_string()))
    }

    /// Current file name
    pub fn file_name(&self) -> String {
        match self {
            Self::DayOfYear {
                head,
                year,
                day,
                tail,
            } => format!("{}{:04}{:03}{}", head, year, day, tail),
            Self::UltraRapid {
                head,
                week,
                day,
                hour,
                tail,
            } => format!("{}{:04}{}_{:02}{}", head, week, day, hour, tail),
            Self::Daily {
                head,
                week,
                day,
                tail,
            } => format!("{}{:04}{}{}", head, week, day, tail),
        }
    }

    /// Moves on to the following file
    pub fn step(&mut self) {
        match self {
            Self::DayOfYear { year, day, .. } => {
                *day += 1;
                if *day > days_in_year(*year) {
                    *year += 1;
                    *day = 1;
                }
            },
            Self::UltraRapid {
                week, day, hour, ..
            } => {
                *hour += ULTRA_RAPID_STEP_HOURS;
                if *hour >= 24 {
                    *hour = 0;
                    *day += 1;
                }
                if *day == 7 {
                    *day = 0;
                    *week += 1;
                }
            },
            Self::Daily { week, day, .. } => {
                *day += 1;
                if *day == 7 {
                    *day = 0;
                    *week += 1;
                }
            },
        }
    }

    /// Every file name from the current one, up to `last` (included).
    pub fn sequence(mut self, last: &str) -> Result<Vec<String>, Error> {
        let first = self.file_name();
        let mut names = Vec::<String>::new();
        loop {
            let name = self.file_name();
            let done = name == last;
            names.push(name);
            if done {
                return Ok(names);
            }
            if names.len() >= MAX_SEQUENCE_FILES {
                return Err(Error::UnterminatedSequence(first, last.to_string()));
            }
            self.step();
        }
    }
}
