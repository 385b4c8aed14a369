#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod bias;
mod carrier;
mod cfg;
mod constants;
mod constellation;
mod error;
mod ingestion;
mod interpolation;
mod observer;
mod satellites;
mod series;
mod time;
mod track;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::bias::{Bias, BiasRuntime, IonosphereModel, SingleLayerModel};
    pub use crate::carrier::Carrier;
    pub use crate::cfg::{ClockProduct, Config, PositionProduct};
    pub use crate::constants::SPEED_OF_LIGHT_M_S;
    pub use crate::constellation::{ConstellationSizes, ConstellationTable};
    pub use crate::error::Error;
    pub use crate::ingestion::{DirectorySource, Page, ProductSource};
    pub use crate::interpolation::{InterpolationWindow, Kernel, Sample, WindowPolicy};
    pub use crate::observer::{EpochObserver, NullObserver, TraceObserver};
    pub use crate::satellites::{CarrierPhase, GnssFrame, GnssSatellites};
    pub use crate::series::{
        ClockStore, OrbitSample, PositionStore, SeriesStore, TimeSeries, TimeSpan, UltraRapidMode,
    };
    pub use crate::time::CalendarTime;
    pub use crate::track::{EphemerisSet, EphemerisTrack};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
