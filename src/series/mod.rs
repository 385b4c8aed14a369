//! Per satellite time series, built from product files
use std::ops::{Add, Mul};

use nalgebra::Vector3;
use num_traits::Zero;

use crate::{
    constants::SAME_EPOCH_TOLERANCE_S, constellation::ConstellationTable, error::Error,
    ingestion::Page,
};

#[cfg(feature = "serde")]
use serde::Deserialize;

mod clock;
mod sp3;

/// Time span (unix seconds) covered by a product
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    fn including(span: Option<Self>, t: f64) -> Self {
        match span {
            Some(span) => Self {
                start: span.start.min(t),
                end: span.end.max(t),
            },
            None => Self { start: t, end: t },
        }
    }
}

/// Satellite position, in both Earth-fixed and inertial frames.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitSample {
    /// ECEF coordinates (m)
    pub ecef_m: Vector3<f64>,
    /// ECI coordinates (m)
    pub eci_m: Vector3<f64>,
}

impl OrbitSample {
    pub fn new(ecef_m: Vector3<f64>, eci_m: Vector3<f64>) -> Self {
        Self { ecef_m, eci_m }
    }
}

impl Add for OrbitSample {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            ecef_m: self.ecef_m + rhs.ecef_m,
            eci_m: self.eci_m + rhs.eci_m,
        }
    }
}

impl Mul<f64> for OrbitSample {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self {
            ecef_m: self.ecef_m * rhs,
            eci_m: self.eci_m * rhs,
        }
    }
}

impl Zero for OrbitSample {
    fn zero() -> Self {
        Self {
            ecef_m: Vector3::zeros(),
            eci_m: Vector3::zeros(),
        }
    }
    fn is_zero(&self) -> bool {
        self.ecef_m.is_zero() && self.eci_m.is_zero()
    }
}

/// Chronological samples of one satellite.
/// Timestamps are unix seconds and strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    t: Vec<f64>,
    values: Vec<T>,
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self {
            t: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T: Copy> TimeSeries<T> {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.t
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<(f64, T)> {
        Some((*self.t.get(index)?, *self.values.get(index)?))
    }

    pub fn last_time(&self) -> Option<f64> {
        self.t.last().copied()
    }

    /// Inserts a new sample. A sample within 1 s of an existing one
    /// is a correction of that epoch and replaces it.
    pub fn insert(&mut self, t: f64, value: T) {
        if let Some(last) = self.last_time() {
            if (t - last).abs() < SAME_EPOCH_TOLERANCE_S {
                let n = self.t.len() - 1;
                self.t[n] = t;
                self.values[n] = value;
                return;
            }
            if t < last {
                let pos = self.t.partition_point(|ti| *ti < t);
                for neighbour in [pos.checked_sub(1), Some(pos)].into_iter().flatten() {
                    if let Some(ti) = self.t.get(neighbour) {
                        if (t - ti).abs() < SAME_EPOCH_TOLERANCE_S {
                            self.t[neighbour] = t;
                            self.values[neighbour] = value;
                            return;
                        }
                    }
                }
                self.t.insert(pos, t);
                self.values.insert(pos, value);
                return;
            }
        }
        self.t.push(t);
        self.values.push(value);
    }
}

/// Time series of every tracked satellite, for one kind of data.
#[derive(Debug, Clone)]
pub struct SeriesStore<T> {
    pub(crate) series: Vec<TimeSeries<T>>,
    /// Nominal sampling interval (s)
    pub(crate) interval_s: f64,
}

impl<T: Copy> SeriesStore<T> {
    pub fn new(total: usize) -> Self {
        Self {
            series: (0..total).map(|_| TimeSeries::default()).collect(),
            interval_s: 0.0,
        }
    }

    pub fn series(&self, index: usize) -> Option<&TimeSeries<T>> {
        self.series.get(index)
    }

    pub fn interval_s(&self) -> f64 {
        self.interval_s
    }

    pub(crate) fn insert(&mut self, index: usize, t: f64, value: T) {
        if let Some(series) = self.series.get_mut(index) {
            series.insert(t, value);
        }
    }
}

/// Orbit time series of every tracked satellite
pub type PositionStore = SeriesStore<OrbitSample>;

/// Clock bias (m) time series of every tracked satellite
pub type ClockStore = SeriesStore<f64>;

impl PositionStore {
    /// Parses orbit product pages. Returns the time span they cover.
    pub fn ingest(
        &mut self,
        pages: &[Page],
        segment: UltraRapidMode,
        table: &ConstellationTable,
    ) -> Result<Option<TimeSpan>, Error> {
        sp3::ingest_positions(pages, segment, table, self)
    }
}

impl ClockStore {
    /// Parses the clock column of orbit product pages.
    pub fn ingest_sp3(
        &mut self,
        pages: &[Page],
        segment: UltraRapidMode,
        table: &ConstellationTable,
    ) -> Result<Option<TimeSpan>, Error> {
        sp3::ingest_clocks(pages, segment, table, self)
    }

    /// Parses clock RINEX pages. `span` is the time span of the
    /// associated orbit product.
    pub fn ingest_clk(
        &mut self,
        pages: &[Page],
        segment: UltraRapidMode,
        span: Option<TimeSpan>,
        table: &ConstellationTable,
    ) -> Result<(), Error> {
        clock::ingest(pages, segment, span, table, self)
    }
}

/// Ultra-rapid products cover 48 h: 24 h observed then 24 h predicted.
/// Each is split into four 6 h segments, and one segment is selected.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
pub enum UltraRapidMode {
    /// Whole files are used
    #[default]
    NotUsed,
    /// Observed segment (1..=4)
    Observe(u8),
    /// Predicted segment (1..=4)
    Predict(u8),
}

impl UltraRapidMode {
    /// Number of segments in one product file
    pub const SEGMENTS: usize = 8;

    /// Selected segment in 0..8, None when whole files are used.
    pub fn segment(&self) -> Option<usize> {
        match self {
            Self::NotUsed => None,
            Self::Observe(n) => Some((*n as usize).saturating_sub(1)),
            Self::Predict(n) => Some(*n as usize + 3),
        }
    }

    pub fn is_predicted(&self) -> bool {
        matches!(self, Self::Predict(_))
    }
}

impl std::str::FromStr for UltraRapidMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if lowered.is_empty() || lowered == "none" {
            return Ok(Self::NotUsed);
        }
        let segment = |prefix: &str| -> Option<u8> {
            let n = lowered.strip_prefix(prefix)?.trim().parse::<u8>().ok()?;
            (1..=4).contains(&n).then_some(n)
        };
        if let Some(n) = segment("observe") {
            Ok(Self::Observe(n))
        } else if let Some(n) = segment("predict") {
            Ok(Self::Predict(n))
        } else {
            Err(Error::InvalidUltraRapidMode(s.to_string()))
        }
    }
}

impl TryFrom<String> for UltraRapidMode {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl std::fmt::Display for UltraRapidMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotUsed => write!(f, "none"),
            Self::Observe(n) => write!(f, "observe{}", n),
            Self::Predict(n) => write!(f, "predict{}", n),
        }
    }
}
