use hifitime::{Epoch, Unit};

use crate::{
    ingestion::Page,
    tests::data::{phase_rad, REFERENCE_UNIX_S},
};

/// Builds clock (RINEX clock style) pages: a linear bias per satellite,
/// interleaved with receiver records that must be ignored.
#[derive(Debug, Clone)]
pub struct ClockBuilder {
    start: Epoch,
    interval_s: f64,
    records: usize,
    satellites: Vec<String>,
}

impl ClockBuilder {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self {
            start: Epoch::from_gregorian_utc_at_midnight(year, month, day),
            interval_s: 30.0,
            records: 2880,
            satellites: vec!["G01".to_string()],
        }
    }

    pub fn interval_s(mut self, interval_s: f64) -> Self {
        self.interval_s = interval_s;
        self
    }

    /// Number of records per satellite
    pub fn records(mut self, records: usize) -> Self {
        self.records = records;
        self
    }

    pub fn satellites(mut self, satellites: &[&str]) -> Self {
        self.satellites = satellites.iter().map(|sv| sv.to_string()).collect();
        self
    }

    /// Synthetic clock bias (s) at `t` (unix seconds)
    pub fn bias_s(id: &str, t: f64) -> f64 {
        1.0E-6 * phase_rad(id).rem_euclid(100.0) + 1.0E-12 * (t - REFERENCE_UNIX_S)
    }

    pub fn build(&self) -> Page {
        let mut page = vec![
            "     3.00           C                   M                   RINEX VERSION / TYPE"
                .to_string(),
            "    30.000000                                               INTERVAL".to_string(),
            format!(
                "{:6}                                                      # OF SOLN SATS",
                self.satellites.len()
            ),
            "                                                            END OF HEADER".to_string(),
        ];

        for record in 0..self.records {
            let t = self.start + (record as f64 * self.interval_s) * Unit::Second;
            let (y, m, d, hh, mm, ss, ns) = t.to_gregorian_utc();
            let seconds = ss as f64 + ns as f64 * 1.0E-9;
            let unix_s = t.to_unix_seconds();

            page.push(format!(
                "AR ALGO {:4} {:02} {:02} {:02} {:02} {:9.6}  1    1.000000000000E-09",
                y, m, d, hh, mm, seconds
            ));

            for id in self.satellites.iter() {
                page.push(format!(
                    "AS {}  {:4} {:02} {:02} {:02} {:02} {:9.6}  2   {:.12E}  {:.12E}",
                    id,
                    y,
                    m,
                    d,
                    hh,
                    mm,
                    seconds,
                    Self::bias_s(id, unix_s),
                    3.1E-11
                ));
            }
        }

        page
    }
}
