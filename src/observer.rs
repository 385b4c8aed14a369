//! Per epoch reporting
use log::trace;

use crate::{constellation::ConstellationTable, track::EphemerisSet};

/// [EpochObserver] is notified after each update of the engine,
/// with both the true and estimate states. Use this to dump or
/// compare states, typically when debugging product files.
pub trait EpochObserver {
    fn on_update(
        &mut self,
        t_s: f64,
        table: &ConstellationTable,
        truth: &EphemerisSet,
        estimate: &EphemerisSet,
    );
}

/// Does nothing
#[derive(Debug, Default, Copy, Clone)]
pub struct NullObserver;

impl EpochObserver for NullObserver {
    fn on_update(&mut self, _: f64, _: &ConstellationTable, _: &EphemerisSet, _: &EphemerisSet) {}
}

/// Reports true and estimate states of every valid satellite,
/// and their difference, at trace level.
#[derive(Debug, Default, Copy, Clone)]
pub struct TraceObserver;

impl EpochObserver for TraceObserver {
    fn on_update(
        &mut self,
        t_s: f64,
        table: &ConstellationTable,
        truth: &EphemerisSet,
        estimate: &EphemerisSet,
    ) {
        for index in 0..table.total() {
            if !truth.is_valid(index) || !estimate.is_valid(index) {
                continue;
            }

            let id = table.id_from_index(index).unwrap_or_default();

            let (true_m, estimate_m) = (truth.position_ecef_m(index), estimate.position_ecef_m(index));
            let (true_clock_m, estimate_clock_m) =
                (truth.clock_offset_m(index), estimate.clock_offset_m(index));

            trace!(
                "{:.3} ({}) - true={:?} clock={:.6}m - estimate={:?} clock={:.6}m - error={:.3}m clock={:.6}m",
                t_s,
                id,
                true_m,
                true_clock_m,
                estimate_m,
                estimate_clock_m,
                (estimate_m - true_m).norm(),
                estimate_clock_m - true_clock_m,
            );
        }
    }
}
