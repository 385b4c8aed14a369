//! GNSS constellations simulation
use itertools::Itertools;
use log::{debug, error, info};
use nalgebra::Vector3;

use crate::{
    bias::{Bias, BiasRuntime, IonosphereModel},
    cfg::Config,
    constants::SPEED_OF_LIGHT_M_S,
    constellation::ConstellationTable,
    error::Error,
    ingestion::{DirectorySource, ProductSource},
    observer::{EpochObserver, NullObserver},
    prelude::{Constellation, SV},
    series::UltraRapidMode,
    time::CalendarTime,
    track::EphemerisSet,
};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Frame in which receiver coordinates are expressed
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum GnssFrame {
    /// Earth centered Earth fixed
    #[default]
    Ecef,
    /// Earth centered inertial
    Eci,
}

/// Carrier phase, split in fractional cycles and integer ambiguity
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CarrierPhase {
    /// Fractional part, in [0, 1[
    pub cycles: f64,
    /// Integer number of cycles
    pub ambiguity: f64,
}

impl CarrierPhase {
    /// Total phase (cycles)
    pub fn total_cycles(&self) -> f64 {
        self.ambiguity + self.cycles
    }
}

/// [GnssSatellites] maintains the state of every tracked satellite
/// along the simulation, from precise orbit and clock products.
///
/// Two sets of states are maintained:
///  - the true states, used to generate the observables
///  - the estimate states, which is what the navigation
///    solution knows about the satellites (broadcast or predicted products).
///
/// A satellite is only valid when both sets are valid.
/// Time only moves forward: call [Self::set_up] once,
/// then [Self::update] at each simulation step.
pub struct GnssSatellites {
    enabled: bool,
    table: ConstellationTable,
    truth: EphemerisSet,
    estimate: EphemerisSet,
    ionosphere: IonosphereModel,
    observer: Box<dyn EpochObserver>,
    /// Set up instant (unix seconds)
    start_s: Option<f64>,
    /// Latest instant (unix seconds)
    latest_s: Option<f64>,
}

impl std::fmt::Debug for GnssSatellites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GnssSatellites")
            .field("enabled", &self.enabled)
            .field("table", &self.table)
            .field("ionosphere", &self.ionosphere)
            .field("start_s", &self.start_s)
            .field("latest_s", &self.latest_s)
            .finish()
    }
}

impl GnssSatellites {
    /// Builds [GnssSatellites] from already loaded sets
    pub fn new(table: ConstellationTable, truth: EphemerisSet, estimate: EphemerisSet) -> Self {
        Self {
            enabled: true,
            table,
            truth,
            estimate,
            ionosphere: IonosphereModel::default(),
            observer: Box::new(NullObserver),
            start_s: None,
            latest_s: None,
        }
    }

    /// Builds a disabled [GnssSatellites]: nothing is ever valid.
    pub fn disabled() -> Self {
        Self::disabled_with(ConstellationTable::default())
    }

    fn disabled_with(table: ConstellationTable) -> Self {
        let mut s = Self::new(table, EphemerisSet::empty(&table), EphemerisSet::empty(&table));
        s.enabled = false;
        s
    }

    /// Builds [GnssSatellites] from [Config], loading every product
    /// from [Config::directory_path].
    pub fn from_config(cfg: &Config) -> Result<Self, Error> {
        let source = DirectorySource::new(&cfg.directory_path);
        Self::from_source(cfg, &source)
    }

    /// Builds [GnssSatellites] from [Config], loading every product
    /// from this [ProductSource].
    pub fn from_source<S: ProductSource>(cfg: &Config, source: &S) -> Result<Self, Error> {
        let table = ConstellationTable::new(cfg.constellations);

        if !cfg.calculation {
            info!("gnss satellites: disabled");
            return Ok(Self::disabled_with(table));
        }

        let truth = EphemerisSet::load(
            source,
            &table,
            &cfg.true_position,
            &cfg.true_clock,
            UltraRapidMode::NotUsed,
        )
        .inspect_err(|e| error!("true products: {}", e))?;

        let segment = cfg.estimate_segment();

        let estimate = EphemerisSet::load(
            source,
            &table,
            &cfg.estimate_position,
            &cfg.estimate_clock,
            segment,
        )
        .inspect_err(|e| error!("estimate products: {}", e))?;

        info!(
            "gnss satellites: {} tracked - estimate segment: {}",
            table.total(),
            segment
        );

        Ok(Self::new(table, truth, estimate))
    }

    /// Copies and returns [Self] with this [EpochObserver]
    pub fn with_observer<O: EpochObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Copies and returns [Self] with this [IonosphereModel]
    pub fn with_ionosphere_model(mut self, model: IonosphereModel) -> Self {
        self.ionosphere = model;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn table(&self) -> &ConstellationTable {
        &self.table
    }

    /// Total number of tracked satellites
    pub fn number_of_satellites(&self) -> usize {
        self.table.total()
    }

    pub fn id_from_index(&self, index: usize) -> Option<String> {
        self.table.id_from_index(index)
    }

    pub fn index_from_id(&self, id: &str) -> Option<usize> {
        self.table.index_from_id(id)
    }

    /// Set up instant (unix seconds)
    pub fn start_unix_s(&self) -> Option<f64> {
        self.start_s
    }

    /// Binds every interpolation window at simulation start
    /// (unix seconds). May be called again to restart the simulation.
    pub fn set_up(&mut self, unix_s: f64) -> Result<(), Error> {
        if !unix_s.is_finite() {
            error!("gnss satellites: set up at {} s", unix_s);
            return Err(Error::NonFiniteTime(unix_s));
        }

        self.start_s = Some(unix_s);
        self.latest_s = Some(unix_s);

        if !self.enabled {
            return Ok(());
        }

        self.truth.bind(unix_s);
        self.estimate.bind(unix_s);

        debug!(
            "gnss satellites: set up at {:.3} - {}/{} true positions - {}/{} estimate positions",
            unix_s,
            self.truth.position_track().valid_count(),
            self.table.total(),
            self.estimate.position_track().valid_count(),
            self.table.total(),
        );
        Ok(())
    }

    /// [Self::set_up] at this calendar date (UTC)
    pub fn set_up_calendar(&mut self, start: &CalendarTime) -> Result<(), Error> {
        let unix_s = start
            .unix_seconds()
            .ok_or_else(|| Error::InvalidCalendarTime(format!("{:?}", start)))?;
        self.set_up(unix_s)
    }

    /// Moves every satellite state to this instant (unix seconds).
    pub fn update(&mut self, unix_s: f64) -> Result<(), Error> {
        let previous = self.latest_s.ok_or(Error::NotSetUp)?;

        if !unix_s.is_finite() {
            return Err(Error::NonFiniteTime(unix_s));
        }

        if unix_s < previous {
            return Err(Error::NonMonotonicTime {
                previous,
                requested: unix_s,
            });
        }

        self.latest_s = Some(unix_s);

        if !self.enabled {
            return Ok(());
        }

        self.truth.advance(unix_s);
        self.estimate.advance(unix_s);

        self.observer
            .on_update(unix_s, &self.table, &self.truth, &self.estimate);

        Ok(())
    }

    /// [Self::update] from simulation time, elapsed since [Self::set_up] (s).
    pub fn update_elapsed(&mut self, elapsed_s: f64) -> Result<(), Error> {
        let start_s = self.start_s.ok_or(Error::NotSetUp)?;
        self.update(start_s + elapsed_s)
    }

    /// True states
    pub fn true_set(&self) -> &EphemerisSet {
        &self.truth
    }

    /// Estimate states
    pub fn estimate_set(&self) -> &EphemerisSet {
        &self.estimate
    }

    /// True when both true and estimate states of this satellite are valid.
    pub fn is_valid(&self, index: usize) -> bool {
        index < self.table.total() && self.truth.is_valid(index) && self.estimate.is_valid(index)
    }

    /// [Self::is_valid] for this [SV]
    pub fn is_sv_valid(&self, sv: SV) -> bool {
        self.table
            .index_of(sv)
            .is_some_and(|index| self.is_valid(index))
    }

    /// Estimate ECEF position (m), zero when not valid.
    pub fn sv_position_ecef_m(&self, index: usize) -> Vector3<f64> {
        if !self.is_valid(index) {
            return Vector3::zeros();
        }
        self.estimate.position_ecef_m(index)
    }

    /// Estimate ECI position (m), zero when not valid.
    pub fn sv_position_eci_m(&self, index: usize) -> Vector3<f64> {
        if !self.is_valid(index) {
            return Vector3::zeros();
        }
        self.estimate.position_eci_m(index)
    }

    /// Estimate clock offset (m), zero when not valid.
    pub fn sv_clock_offset_m(&self, index: usize) -> f64 {
        if !self.is_valid(index) {
            return 0.0;
        }
        self.estimate.clock_offset_m(index)
    }

    fn true_position_m(&self, index: usize, frame: GnssFrame) -> Vector3<f64> {
        match frame {
            GnssFrame::Ecef => self.truth.position_ecef_m(index),
            GnssFrame::Eci => self.truth.position_eci_m(index),
        }
    }

    /// Geometric range plus clock offsets (m)
    fn clocked_range_m(
        &self,
        index: usize,
        frame: GnssFrame,
        rx_position_m: Vector3<f64>,
        rx_clock_m: f64,
    ) -> f64 {
        (rx_position_m - self.true_position_m(index, frame)).norm() + rx_clock_m
            - self.truth.clock_offset_m(index)
    }

    /// Ionospheric delay (m) affecting the signal of this satellite,
    /// at this frequency (MHz). Zero when not valid.
    pub fn ionospheric_delay_m(
        &self,
        index: usize,
        frame: GnssFrame,
        rx_position_m: Vector3<f64>,
        frequency_mhz: f64,
    ) -> f64 {
        if !self.is_valid(index) {
            return 0.0;
        }
        self.ionosphere.bias_m(&BiasRuntime {
            rx_position_m,
            sv_position_m: self.true_position_m(index, frame),
            frequency_mhz,
        })
    }

    /// Pseudo range (m) of this satellite, at this frequency (MHz), using
    /// the true states. Zero when not valid.
    pub fn pseudo_range_m(
        &self,
        index: usize,
        frame: GnssFrame,
        rx_position_m: Vector3<f64>,
        rx_clock_m: f64,
        frequency_mhz: f64,
    ) -> f64 {
        if !self.is_valid(index) {
            return 0.0;
        }
        self.clocked_range_m(index, frame, rx_position_m, rx_clock_m)
            + self.ionospheric_delay_m(index, frame, rx_position_m, frequency_mhz)
    }

    /// [CarrierPhase] of this satellite, at this frequency (MHz), using
    /// the true states. The ionosphere advances the phase.
    /// Null when not valid.
    pub fn carrier_phase(
        &self,
        index: usize,
        frame: GnssFrame,
        rx_position_m: Vector3<f64>,
        rx_clock_m: f64,
        frequency_mhz: f64,
    ) -> CarrierPhase {
        if !self.is_valid(index) || !frequency_mhz.is_finite() || frequency_mhz <= 0.0 {
            return CarrierPhase::default();
        }

        let range_m = self.clocked_range_m(index, frame, rx_position_m, rx_clock_m)
            - self.ionospheric_delay_m(index, frame, rx_position_m, frequency_mhz);

        let wavelength_m = SPEED_OF_LIGHT_M_S * 1.0E-6 / frequency_mhz;
        let total = range_m / wavelength_m;
        let ambiguity = total.floor();

        CarrierPhase {
            cycles: total - ambiguity,
            ambiguity,
        }
    }

    fn gps_indexes(&self) -> impl Iterator<Item = usize> + '_ {
        (1..=self.table.size(Constellation::GPS))
            .filter_map(|prn| self.table.index_of(SV::new(Constellation::GPS, prn as u8)))
    }

    /// CSV header: true ECEF position and clock offset of every GPS satellite
    pub fn log_header(&self) -> String {
        self.gps_indexes()
            .enumerate()
            .map(|(n, _)| {
                let name = format!("GPS{}", n);
                format!(
                    "{name}_position_ecef_x[m],{name}_position_ecef_y[m],{name}_position_ecef_z[m],{name}_clock_offset[m],",
                    name = name
                )
            })
            .join("")
    }

    /// CSV values matching [Self::log_header]
    pub fn log_value(&self) -> String {
        self.gps_indexes()
            .map(|index| {
                let position = self.truth.position_ecef_m(index);
                format!(
                    "{:.15e},{:.15e},{:.15e},{:.15e},",
                    position[0],
                    position[1],
                    position[2],
                    self.truth.clock_offset_m(index)
                )
            })
            .join("")
    }
}
