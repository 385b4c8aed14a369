use hifitime::{Epoch, Unit};
use nalgebra::Vector3;

use crate::{
    constants::{SP3_UNAVAILABLE, TRIGONOMETRIC_ANGULAR_RATE_RAD_S},
    ingestion::Page,
    tests::data::{phase_rad, REFERENCE_UNIX_S},
};

/// Orbit radius (km)
const ORBIT_RADIUS_KM: f64 = 26_560.0;

/// Orbit inclination (°)
const ORBIT_INCLINATION_DEG: f64 = 55.0;

/// Builds daily SP3 pages, sampling a synthetic circular orbit
/// (two revolutions per day) and a linear clock, for each satellite.
#[derive(Debug, Clone)]
pub struct Sp3Builder {
    start: Epoch,
    epochs: usize,
    interval_s: f64,
    satellites: Vec<String>,
    unavailable: Vec<(String, usize)>,
    unavailable_clock: Vec<(String, usize)>,
    malformed: Vec<(String, usize)>,
}

impl Sp3Builder {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self {
            start: Epoch::from_gregorian_utc_at_midnight(year, month, day),
            epochs: 288,
            interval_s: 300.0,
            satellites: vec!["G01".to_string()],
            unavailable: Vec::new(),
            unavailable_clock: Vec::new(),
            malformed: Vec::new(),
        }
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn interval_s(mut self, interval_s: f64) -> Self {
        self.interval_s = interval_s;
        self
    }

    pub fn satellites(mut self, satellites: &[&str]) -> Self {
        self.satellites = satellites.iter().map(|sv| sv.to_string()).collect();
        self
    }

    /// Coordinates of this satellite are unavailable at this epoch
    pub fn unavailable(mut self, id: &str, epoch: usize) -> Self {
        self.unavailable.push((id.to_string(), epoch));
        self
    }

    /// Clock of this satellite is unavailable at this epoch
    pub fn unavailable_clock(mut self, id: &str, epoch: usize) -> Self {
        self.unavailable_clock.push((id.to_string(), epoch));
        self
    }

    /// Record of this satellite is corrupted at this epoch
    pub fn malformed(mut self, id: &str, epoch: usize) -> Self {
        self.malformed.push((id.to_string(), epoch));
        self
    }

    /// Synthetic ECEF coordinates (km) at `t` (unix seconds)
    pub fn orbit_km(id: &str, t: f64) -> Vector3<f64> {
        let theta = 2.0 * TRIGONOMETRIC_ANGULAR_RATE_RAD_S * (t - REFERENCE_UNIX_S) + phase_rad(id);
        let (sin, cos) = theta.sin_cos();
        let (sin_i, cos_i) = ORBIT_INCLINATION_DEG.to_radians().sin_cos();
        Vector3::new(cos, sin * cos_i, sin * sin_i) * ORBIT_RADIUS_KM
    }

    /// Synthetic clock offset (µs) at `t` (unix seconds)
    pub fn clock_us(id: &str, t: f64) -> f64 {
        phase_rad(id).rem_euclid(100.0) + 1.0E-6 * (t - REFERENCE_UNIX_S)
    }

    fn contains(list: &[(String, usize)], id: &str, epoch: usize) -> bool {
        list.iter().any(|(sv, e)| sv == id && *e == epoch)
    }

    pub fn build(&self) -> Page {
        let (year, month, day, _, _, _, _) = self.start.to_gregorian_utc();

        let mut page = vec![
            format!(
                "#dP{:4} {:2} {:2}  0  0  0.00000000 {:7} ORBIT IGS14 HLM  IGS",
                year, month, day, self.epochs
            ),
            format!(
                "## 2277      0.00000000 {:14.8} 60183 0.0000000000000",
                self.interval_s
            ),
            format!(
                "+   {:2}   {}",
                self.satellites.len(),
                self.satellites.concat()
            ),
            "++         2  2  2  2  2  2  2  2  2  2  2  2  2  2  2  2  2".to_string(),
            "%c M  cc GPS ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc".to_string(),
            "%f  1.2500000  1.025000000  0.00000000000  0.000000000000000".to_string(),
            "/* synthetic orbit product".to_string(),
        ];

        for epoch in 0..self.epochs {
            let t = self.start + (epoch as f64 * self.interval_s) * Unit::Second;
            let (y, m, d, hh, mm, ss, ns) = t.to_gregorian_utc();
            page.push(format!(
                "*  {:4} {:2} {:2} {:2} {:2} {:11.8}",
                y,
                m,
                d,
                hh,
                mm,
                ss as f64 + ns as f64 * 1.0E-9
            ));

            let unix_s = t.to_unix_seconds();

            for id in self.satellites.iter() {
                if Self::contains(&self.malformed, id, epoch) {
                    page.push(format!("P{}  corrupted   record", id));
                    continue;
                }

                let position_km = if Self::contains(&self.unavailable, id, epoch) {
                    Vector3::new(SP3_UNAVAILABLE, SP3_UNAVAILABLE, SP3_UNAVAILABLE)
                } else {
                    Self::orbit_km(id, unix_s)
                };

                let clock_us = if Self::contains(&self.unavailable_clock, id, epoch) {
                    SP3_UNAVAILABLE
                } else {
                    Self::clock_us(id, unix_s)
                };

                page.push(format!(
                    "P{}{:14.6}{:14.6}{:14.6}{:14.6}",
                    id, position_km[0], position_km[1], position_km[2], clock_us
                ));
            }
        }

        page.push("EOF".to_string());
        page
    }
}
