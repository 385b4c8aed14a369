//! Clock product (RINEX clock style) parsing.
//! Only satellite bias records (`AS`) are of interest.
use std::str::FromStr;

use log::{debug, error, warn};

use crate::{
    constants::{
        CLOCK_END_MARGIN_S, SAME_EPOCH_TOLERANCE_S, SPEED_OF_LIGHT_M_S, TIME_EPSILON_S,
        ULTRA_RAPID_SEGMENT_S,
    },
    constellation::ConstellationTable,
    error::Error,
    ingestion::Page,
    series::{SeriesStore, TimeSpan, UltraRapidMode},
    time::CalendarTime,
};

/// Interval we start from, before any pair of records is found
const UNKNOWN_INTERVAL_S: f64 = 1.0E9;

fn satellite_bias(line: &str) -> bool {
    line.starts_with("AS ")
}

/// Satellite clock bias record
#[derive(Debug, Clone, PartialEq)]
struct BiasRecord {
    id: String,
    t: f64,
    /// Bias (s)
    bias_s: f64,
}

impl FromStr for BiasRecord {
    type Err = ();
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace().skip(1);
        let id = fields.next().ok_or(())?.to_string();
        let calendar = CalendarTime::from_tokens(fields.by_ref()).ok_or(())?;
        let t = calendar.unix_seconds().ok_or(())?;
        // number of values, then bias
        let _ = fields.next().ok_or(())?;
        let bias_s = f64::from_str(fields.next().ok_or(())?).map_err(|_| ())?;
        Ok(Self { id, t, bias_s })
    }
}

/// Parses clock pages into clock bias time series (m).
/// Without ultra-rapid segment, only records within `span`
/// (extended by 30 s) are kept: `span` is the time span of the
/// associated orbit product.
pub(crate) fn ingest(
    pages: &[Page],
    segment: UltraRapidMode,
    span: Option<TimeSpan>,
    table: &ConstellationTable,
    store: &mut SeriesStore<f64>,
) -> Result<(), Error> {
    if segment.is_predicted() {
        error!("predicted segment {} selected for clock product", segment);
        return Err(Error::PredictedClockSegment);
    }

    let mut interval_s = UNKNOWN_INTERVAL_S;

    for (page_num, page) in pages.iter().enumerate() {
        let mut window = match (segment.segment(), span) {
            (None, Some(span)) => Some((span.start, span.end + CLOCK_END_MARGIN_S)),
            (None, None) => Some((f64::NEG_INFINITY, f64::INFINITY)),
            // defined by first record
            (Some(_), _) => None,
        };

        for line in page.iter().filter(|line| satellite_bias(line)) {
            let Ok(record) = BiasRecord::from_str(line) else {
                warn!("page #{}: malformed clock record \"{}\"", page_num, line);
                continue;
            };

            let (start, end) = *window.get_or_insert_with(|| {
                let offset = segment.segment().unwrap_or(0) as f64;
                let start = record.t + offset * ULTRA_RAPID_SEGMENT_S;
                (start, start + ULTRA_RAPID_SEGMENT_S)
            });

            if start - record.t > TIME_EPSILON_S {
                continue;
            }
            if end - record.t < TIME_EPSILON_S {
                break;
            }

            let Some(index) = table.index_from_id(&record.id) else {
                continue;
            };

            if let Some(last) = store.series(index).and_then(|series| series.last_time()) {
                let dt = record.t - last;
                if dt >= SAME_EPOCH_TOLERANCE_S {
                    interval_s = interval_s.min(dt);
                }
            }

            store.insert(index, record.t, record.bias_s * SPEED_OF_LIGHT_M_S);
        }
    }

    store.interval_s = interval_s;
    debug!(
        "parsed {} clock page(s) - interval {}s",
        pages.len(),
        store.interval_s
    );
    Ok(())
}
