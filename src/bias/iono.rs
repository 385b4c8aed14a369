use crate::{
    bias::{Bias, BiasRuntime},
    constants::{
        IONOSPHERE_CEILING_KM, IONOSPHERE_REFERENCE_FREQUENCY_MHZ, IONOSPHERE_ZENITH_DELAY_M,
    },
};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Ionospheric delay models that we propose.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum IonosphereModel {
    /// No ionospheric delay
    Disabled,
    /// Provide a [SingleLayerModel]
    SingleLayer(SingleLayerModel),
}

impl Default for IonosphereModel {
    fn default() -> Self {
        Self::SingleLayer(SingleLayerModel::default())
    }
}

impl Bias for IonosphereModel {
    fn bias_m(&self, rtm: &BiasRuntime) -> f64 {
        match self {
            Self::Disabled => 0.0,
            Self::SingleLayer(model) => model.bias_m(rtm),
        }
    }
}

/// Simple ionosphere: the delay linearly decreases from the ground
/// to the layer ceiling, is stretched by the slant of the path
/// and scales with the inverse square of the frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct SingleLayerModel {
    /// No ionosphere above this altitude (km)
    pub ceiling_km: f64,
    /// Vertical delay at ground level (m)
    pub zenith_delay_m: f64,
    /// Frequency of [Self::zenith_delay_m] (MHz)
    pub reference_frequency_mhz: f64,
}

impl Default for SingleLayerModel {
    fn default() -> Self {
        Self {
            ceiling_km: IONOSPHERE_CEILING_KM,
            zenith_delay_m: IONOSPHERE_ZENITH_DELAY_M,
            reference_frequency_mhz: IONOSPHERE_REFERENCE_FREQUENCY_MHZ,
        }
    }
}

impl Bias for SingleLayerModel {
    fn bias_m(&self, rtm: &BiasRuntime) -> f64 {
        if !rtm.frequency_mhz.is_finite() || rtm.frequency_mhz <= 0.0 {
            return 0.0;
        }

        let altitude_km = rtm.rx_altitude_km();
        if altitude_km >= self.ceiling_km {
            return 0.0;
        }

        // slant path: below the horizon, this turns negative
        let delay_m = self.zenith_delay_m * (self.ceiling_km - altitude_km)
            / self.ceiling_km
            / rtm.zenith_angle_rad().cos();

        let delay_m = delay_m * (self.reference_frequency_mhz / rtm.frequency_mhz).powi(2);
        if delay_m.is_finite() {
            delay_m
        } else {
            0.0
        }
    }
}
