//! Orbit product (SP3 style) parsing
use std::str::FromStr;

use log::{debug, error, warn};
use nalgebra::{Rotation3, Vector3};

use crate::{
    constants::{SP3_UNAVAILABLE, SP3_UNAVAILABLE_TOLERANCE, SPEED_OF_LIGHT_M_S},
    constellation::ConstellationTable,
    error::Error,
    ingestion::Page,
    series::{OrbitSample, SeriesStore, TimeSpan, UltraRapidMode},
    time::CalendarTime,
};

fn unavailable(value: f64) -> bool {
    (value - SP3_UNAVAILABLE).abs() < SP3_UNAVAILABLE_TOLERANCE
}

fn new_epoch(line: &str) -> bool {
    line.starts_with('*')
}

/// Header fields we need, from the first three lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Header {
    /// Number of epochs in this file
    pub epochs: usize,
    /// Sampling interval (s)
    pub interval_s: f64,
    /// Number of satellites per epoch
    pub satellites: usize,
    /// First body line (epoch marker)
    pub body: usize,
}

impl Header {
    pub fn parse(page: &[String]) -> Result<Self, Error> {
        let token = |line: usize, nth: usize| -> Result<&str, Error> {
            page.get(line)
                .and_then(|content| content.split_whitespace().nth(nth))
                .ok_or(Error::MalformedHeader(format!(
                    "missing field #{} on line {}",
                    nth + 1,
                    line + 1
                )))
        };

        let epochs = token(0, 6)?;
        let epochs = usize::from_str(epochs)
            .map_err(|_| Error::MalformedHeader(format!("invalid epoch count \"{}\"", epochs)))?;

        let interval = token(1, 3)?;
        let interval_s = f64::from_str(interval)
            .map_err(|_| Error::MalformedHeader(format!("invalid interval \"{}\"", interval)))?;

        let satellites = token(2, 1)?;
        let satellites = usize::from_str(satellites).map_err(|_| {
            Error::MalformedHeader(format!("invalid satellite count \"{}\"", satellites))
        })?;

        let body = page
            .iter()
            .skip(3)
            .position(|line| new_epoch(line))
            .map(|pos| pos + 3)
            .ok_or(Error::MalformedHeader("no epoch in this file".to_string()))?;

        // every segment of the body must be addressable
        satellites
            .checked_add(1)
            .and_then(|block| block.checked_mul(epochs))
            .and_then(|lines| lines.checked_add(body))
            .ok_or(Error::MalformedHeader(format!(
                "{} epochs of {} satellites",
                epochs, satellites
            )))?;

        Ok(Self {
            epochs,
            interval_s,
            satellites,
            body,
        })
    }

    /// Body lines to read, for selected segment
    fn lines(&self, segment: UltraRapidMode) -> (usize, usize) {
        let block = self.satellites + 1;
        match segment.segment() {
            None => (self.body, self.body + block * self.epochs),
            Some(k) => {
                let epochs = self.epochs / UltraRapidMode::SEGMENTS;
                (
                    self.body + block * epochs * k,
                    self.body + block * epochs * (k + 1),
                )
            },
        }
    }
}

/// Epoch marker content
struct EpochDescriptor {
    t: f64,
    /// ECEF to ECI rotation
    rotation: Rotation3<f64>,
}

impl EpochDescriptor {
    fn parse(line: &str) -> Option<Self> {
        let calendar = CalendarTime::from_tokens(line.split_whitespace().skip(1))?;
        let t = calendar.unix_seconds()?;
        let gmst = calendar.gmst_rad()?;
        Some(Self {
            t,
            rotation: Rotation3::from_axis_angle(&Vector3::z_axis(), gmst),
        })
    }
}

/// Walks through every satellite record of the selected segment.
/// `f` is called with the current epoch, the flat index of the satellite
/// and the record fields (identifier excluded).
fn for_each_record<F: FnMut(&EpochDescriptor, usize, &[&str])>(
    page_num: usize,
    page: &[String],
    header: &Header,
    segment: UltraRapidMode,
    table: &ConstellationTable,
    span: &mut Option<TimeSpan>,
    mut f: F,
) {
    let (start, end) = header.lines(segment);
    if end > page.len() {
        warn!(
            "page #{}: truncated product ({} lines expected, {} available)",
            page_num,
            end,
            page.len()
        );
    }

    let block = header.satellites + 1;
    let mut epoch = Option::<EpochDescriptor>::None;

    for (i, line) in page.iter().enumerate().take(end).skip(start) {
        let i = i - start;
        if i % block == 0 {
            epoch = EpochDescriptor::parse(line);
            match &epoch {
                Some(descriptor) => {
                    *span = Some(TimeSpan::including(*span, descriptor.t));
                },
                None => {
                    warn!("page #{}: invalid epoch marker \"{}\"", page_num, line);
                },
            }
            continue;
        }

        let Some(descriptor) = &epoch else {
            continue;
        };

        let fields = line.split_whitespace().collect::<Vec<_>>();
        let Some((id, fields)) = fields.split_first() else {
            continue;
        };

        match table.index_from_id(id) {
            Some(index) => f(descriptor, index, fields),
            None => debug!("page #{}: untracked satellite \"{}\"", page_num, id),
        }
    }
}

/// Parses SP3 pages into position time series.
/// Returns the time span covered by the parsed epochs.
pub(crate) fn ingest_positions(
    pages: &[Page],
    segment: UltraRapidMode,
    table: &ConstellationTable,
    store: &mut SeriesStore<OrbitSample>,
) -> Result<Option<TimeSpan>, Error> {
    let mut span = Option::<TimeSpan>::None;

    for (page_num, page) in pages.iter().enumerate() {
        let header = Header::parse(page).inspect_err(|e| {
            error!("page #{}: {}", page_num, e);
        })?;

        store.interval_s = store.interval_s.max(header.interval_s);

        for_each_record(
            page_num,
            page,
            &header,
            segment,
            table,
            &mut span,
            |epoch, index, fields| {
                let mut ecef_km = Vector3::<f64>::zeros();
                for axis in 0..3 {
                    let value = fields.get(axis).and_then(|v| f64::from_str(v).ok());
                    match value {
                        Some(value) if !unavailable(value) => ecef_km[axis] = value,
                        Some(_) => return,
                        None => {
                            warn!("page #{}: malformed coordinates {:?}", page_num, fields);
                            return;
                        },
                    }
                }

                let ecef_m = ecef_km * 1.0E3;
                let eci_m = epoch.rotation * ecef_m;

                store.insert(index, epoch.t, OrbitSample::new(ecef_m, eci_m));
            },
        );
    }

    debug!(
        "parsed {} orbit page(s) - interval {}s - span {:?}",
        pages.len(),
        store.interval_s,
        span
    );
    Ok(span)
}

/// Parses the clock column of SP3 pages, expressed in µs,
/// into clock bias time series expressed in meters.
pub(crate) fn ingest_clocks(
    pages: &[Page],
    segment: UltraRapidMode,
    table: &ConstellationTable,
    store: &mut SeriesStore<f64>,
) -> Result<Option<TimeSpan>, Error> {
    let mut span = Option::<TimeSpan>::None;

    for (page_num, page) in pages.iter().enumerate() {
        let header = Header::parse(page).inspect_err(|e| {
            error!("page #{}: {}", page_num, e);
        })?;

        store.interval_s = store.interval_s.max(header.interval_s);

        for_each_record(
            page_num,
            page,
            &header,
            segment,
            table,
            &mut span,
            |epoch, index, fields| {
                let Some(clock_us) = fields.get(3).and_then(|v| f64::from_str(v).ok()) else {
                    warn!("page #{}: malformed clock {:?}", page_num, fields);
                    return;
                };
                if unavailable(clock_us) {
                    return;
                }
                store.insert(index, epoch.t, clock_us * SPEED_OF_LIGHT_M_S * 1.0E-6);
            },
        );
    }

    Ok(span)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::data::Sp3Builder;

    #[test]
    fn header() {
        let page = Sp3Builder::new(2023, 8, 27)
            .epochs(288)
            .interval_s(300.0)
            .satellites(&["G01", "G02", "R01"])
            .build();

        let header = Header::parse(&page).unwrap();
        assert_eq!(header.epochs, 288);
        assert_eq!(header.interval_s, 300.0);
        assert_eq!(header.satellites, 3);
        assert!(page[header.body].starts_with('*'));

        assert_eq!(header.lines(UltraRapidMode::NotUsed), (header.body, header.body + 4 * 288));
        assert_eq!(
            header.lines(UltraRapidMode::Predict(1)),
            (header.body + 4 * 36 * 4, header.body + 4 * 36 * 5)
        );
    }

    #[test]
    fn malformed_header() {
        let page: Page = vec!["#dP2023  8 27".to_string()];
        assert!(matches!(Header::parse(&page), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn oversized_header() {
        let table = ConstellationTable::default();
        let page = Sp3Builder::new(2023, 8, 27).epochs(2).build();

        for (line, field, value) in [(0, 6, usize::MAX), (2, 1, usize::MAX), (2, 1, usize::MAX / 2)] {
            let mut page = page.clone();
            let mut tokens = page[line]
                .split_whitespace()
                .map(|t| t.to_string())
                .collect::<Vec<_>>();
            tokens[field] = value.to_string();
            page[line] = tokens.join(" ");

            assert!(
                matches!(Header::parse(&page), Err(Error::MalformedHeader(_))),
                "{} accepted on line {}",
                value,
                line + 1
            );

            let mut store = SeriesStore::new(table.total());
            assert!(matches!(
                ingest_positions(&[page], UltraRapidMode::Observe(4), &table, &mut store),
                Err(Error::MalformedHeader(_))
            ));
        }
    }

    #[test]
    fn positions() {
        let table = ConstellationTable::default();
        let page = Sp3Builder::new(2023, 8, 27)
            .epochs(4)
            .satellites(&["G01", "G02", "S20"])
            .unavailable("G02", 1)
            .malformed("G01", 2)
            .build();

        let mut store = SeriesStore::new(table.total());
        let span = ingest_positions(&[page], UltraRapidMode::NotUsed, &table, &mut store)
            .unwrap()
            .unwrap();

        assert_eq!(span.end - span.start, 900.0);
        assert_eq!(store.interval_s(), 300.0);

        let g01 = store.series(0).unwrap();
        let g02 = store.series(1).unwrap();
        assert_eq!(g01.len(), 3, "malformed record should be dropped");
        assert_eq!(g02.len(), 3, "unavailable record should be dropped");

        let (t, sample) = g01.get(0).unwrap();
        assert_eq!(t, span.start);
        // records are written with a millimeter resolution
        let expected = Sp3Builder::orbit_km("G01", t) * 1.0E3;
        assert!((sample.ecef_m - expected).norm() < 1.0E-2);

        // inertial and earth fixed frames share the z axis and radius
        assert!((sample.eci_m.z - sample.ecef_m.z).abs() < 1.0E-6);
        assert!((sample.eci_m.norm() - sample.ecef_m.norm()).abs() < 1.0E-6);
    }

    #[test]
    fn clocks() {
        let table = ConstellationTable::default();
        let page = Sp3Builder::new(2023, 8, 27)
            .epochs(3)
            .satellites(&["G01", "E05"])
            .unavailable_clock("E05", 0)
            .build();

        let mut store = SeriesStore::new(table.total());
        ingest_clocks(&[page], UltraRapidMode::NotUsed, &table, &mut store).unwrap();

        let g01 = store.series(0).unwrap();
        assert_eq!(g01.len(), 3);
        let (t, clock_m) = g01.get(1).unwrap();
        let expected = Sp3Builder::clock_us("G01", t) * SPEED_OF_LIGHT_M_S * 1.0E-6;
        assert!((clock_m - expected).abs() < 1.0E-3);

        let e05 = store.series(table.index_from_id("E05").unwrap()).unwrap();
        assert_eq!(e05.len(), 2);
    }

    #[test]
    fn ultra_rapid_segment() {
        let table = ConstellationTable::default();
        let page = Sp3Builder::new(2023, 8, 27)
            .epochs(16)
            .interval_s(900.0)
            .satellites(&["G01"])
            .build();

        let mut store = SeriesStore::new(table.total());
        let span = ingest_positions(&[page], UltraRapidMode::Observe(3), &table, &mut store)
            .unwrap()
            .unwrap();

        // 16 epochs: 2 per segment
        let g01 = store.series(0).unwrap();
        assert_eq!(g01.len(), 2);

        let t0 = CalendarTime::new(2023, 8, 27, 0, 0, 0.0).unix_seconds().unwrap();
        assert_eq!(span.start, t0 + 4.0 * 900.0);
        assert_eq!(span.end, t0 + 5.0 * 900.0);
    }

    #[test]
    fn consecutive_pages_merge() {
        let table = ConstellationTable::default();
        let first = Sp3Builder::new(2023, 8, 27)
            .epochs(289)
            .satellites(&["G01"])
            .build();
        let second = Sp3Builder::new(2023, 8, 28)
            .epochs(288)
            .satellites(&["G01"])
            .build();

        let mut store = SeriesStore::new(table.total());
        ingest_positions(&[first, second], UltraRapidMode::NotUsed, &table, &mut store).unwrap();

        // last epoch of day #1 is the first epoch of day #2
        let g01 = store.series(0).unwrap();
        assert_eq!(g01.len(), 288 * 2);
        assert!(g01.times().windows(2).all(|w| (w[1] - w[0] - 300.0).abs() < 1.0E-6));
    }
}
