//! Interpolated satellite states
use log::{debug, error};
use nalgebra::Vector3;

use crate::{
    cfg::{ClockProduct, PositionProduct},
    constellation::ConstellationTable,
    error::Error,
    ingestion::ProductSource,
    interpolation::{InterpolationWindow, Sample, WindowPolicy},
    series::{ClockStore, OrbitSample, PositionStore, SeriesStore, UltraRapidMode},
};

/// [EphemerisTrack] interpolates one kind of data (positions or clocks)
/// for every tracked satellite, and holds the latest evaluation.
#[derive(Debug, Clone)]
pub struct EphemerisTrack<T> {
    store: SeriesStore<T>,
    policy: WindowPolicy,
    windows: Vec<InterpolationWindow>,
    values: Vec<T>,
    valid: Vec<bool>,
}

impl<T: Sample> EphemerisTrack<T> {
    /// Builds a new [EphemerisTrack]. The policy interval
    /// is the nominal interval of the store.
    pub fn new(store: SeriesStore<T>, policy: WindowPolicy) -> Self {
        let total = store.series.len();
        let policy = policy.with_interval(store.interval_s());
        Self {
            store,
            policy,
            windows: vec![InterpolationWindow::default(); total],
            values: vec![T::zero(); total],
            valid: vec![false; total],
        }
    }

    pub fn store(&self) -> &SeriesStore<T> {
        &self.store
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    /// Binds every window at `t`
    pub fn bind(&mut self, t: f64) {
        for (window, series) in self.windows.iter_mut().zip(self.store.series.iter()) {
            *window = InterpolationWindow::bind(series, t, &self.policy);
        }
        self.evaluate(t);
    }

    /// Slides every window to `t`
    pub fn advance(&mut self, t: f64) {
        for (window, series) in self.windows.iter_mut().zip(self.store.series.iter()) {
            window.advance(series, t, &self.policy);
        }
        self.evaluate(t);
    }

    fn evaluate(&mut self, t: f64) {
        for (index, (window, series)) in self
            .windows
            .iter()
            .zip(self.store.series.iter())
            .enumerate()
        {
            let (value, valid) = window.evaluate(series, t, &self.policy);
            self.values[index] = value;
            self.valid[index] = valid;
        }
    }

    /// Latest evaluation, zero when not valid.
    pub fn value(&self, index: usize) -> T {
        self.values.get(index).copied().unwrap_or_else(T::zero)
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.valid.get(index).copied().unwrap_or(false)
    }

    /// Number of satellites currently valid
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|valid| **valid).count()
    }
}

/// [EphemerisSet] combines positions and clocks. A satellite
/// is valid when both its position and clock are.
#[derive(Debug, Clone)]
pub struct EphemerisSet {
    position: EphemerisTrack<OrbitSample>,
    clock: EphemerisTrack<f64>,
}

impl EphemerisSet {
    pub fn new(position: EphemerisTrack<OrbitSample>, clock: EphemerisTrack<f64>) -> Self {
        Self { position, clock }
    }

    /// [EphemerisSet] without any sample: never valid.
    pub fn empty(table: &ConstellationTable) -> Self {
        Self::new(
            EphemerisTrack::new(PositionStore::new(table.total()), WindowPolicy::position(1)),
            EphemerisTrack::new(ClockStore::new(table.total()), WindowPolicy::clock(1)),
        )
    }

    /// Loads and parses these products from [ProductSource].
    /// `segment` applies to both position and clock products.
    pub fn load<S: ProductSource>(
        source: &S,
        table: &ConstellationTable,
        position: &PositionProduct,
        clock: &ClockProduct,
        segment: UltraRapidMode,
    ) -> Result<Self, Error> {
        for size in [position.interpolation_number, clock.interpolation_number] {
            if size == 0 {
                error!("null interpolation number");
                return Err(Error::InvalidInterpolationNumber(size));
            }
        }

        let pages = source.orbit_pages(position)?;
        let mut positions = PositionStore::new(table.total());
        let span = positions.ingest(&pages, segment, table)?;

        let pages = source.clock_pages(clock)?;
        let mut clocks = ClockStore::new(table.total());
        if clock.is_sp3() {
            clocks.ingest_sp3(&pages, segment, table)?;
        } else {
            clocks.ingest_clk(&pages, segment, span, table)?;
        }

        debug!(
            "{}: {} position interval {}s - {}: clock interval {}s",
            position.first,
            position.interpolation_method,
            positions.interval_s(),
            clock.first,
            clocks.interval_s()
        );

        let position_policy = WindowPolicy::position(position.interpolation_number)
            .with_kernel(position.interpolation_method);
        let clock_policy = WindowPolicy::clock(clock.interpolation_number);

        Ok(Self::new(
            EphemerisTrack::new(positions, position_policy),
            EphemerisTrack::new(clocks, clock_policy),
        ))
    }

    pub fn position_track(&self) -> &EphemerisTrack<OrbitSample> {
        &self.position
    }

    pub fn clock_track(&self) -> &EphemerisTrack<f64> {
        &self.clock
    }

    pub fn bind(&mut self, t: f64) {
        self.position.bind(t);
        self.clock.bind(t);
    }

    pub fn advance(&mut self, t: f64) {
        self.position.advance(t);
        self.clock.advance(t);
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.position.is_valid(index) && self.clock.is_valid(index)
    }

    /// ECEF position (m), zero when not valid
    pub fn position_ecef_m(&self, index: usize) -> Vector3<f64> {
        self.position.value(index).ecef_m
    }

    /// ECI position (m), zero when not valid
    pub fn position_eci_m(&self, index: usize) -> Vector3<f64> {
        self.position.value(index).eci_m
    }

    /// Clock offset (m), zero when not valid
    pub fn clock_offset_m(&self, index: usize) -> f64 {
        self.clock.value(index)
    }
}
