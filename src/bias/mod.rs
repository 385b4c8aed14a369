use nalgebra::Vector3;

use crate::constants::EARTH_EQUATORIAL_RADIUS_KM;

mod iono;
pub use iono::{IonosphereModel, SingleLayerModel};

/// Parameters of one signal path, at evaluation time.
/// Both positions must be expressed in the same frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BiasRuntime {
    /// Receiver position (m)
    pub rx_position_m: Vector3<f64>,
    /// Satellite position (m)
    pub sv_position_m: Vector3<f64>,
    /// Signal frequency (MHz)
    pub frequency_mhz: f64,
}

impl BiasRuntime {
    /// Receiver altitude (km) above the equatorial radius
    pub fn rx_altitude_km(&self) -> f64 {
        self.rx_position_m.norm() / 1.0E3 - EARTH_EQUATORIAL_RADIUS_KM
    }

    /// Angle between local vertical and line of sight (rad)
    pub fn zenith_angle_rad(&self) -> f64 {
        self.rx_position_m
            .angle(&(self.sv_position_m - self.rx_position_m))
    }
}

/// Any propagation delay model
pub trait Bias {
    /// Delay (m) affecting this signal path
    fn bias_m(&self, rtm: &BiasRuntime) -> f64;
}
