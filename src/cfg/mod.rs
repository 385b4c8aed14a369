#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{
    constellation::ConstellationSizes, ingestion::is_ultra_rapid, interpolation::Kernel,
    series::UltraRapidMode,
};

fn default_calculation() -> bool {
    true
}

fn default_interpolation_number() -> usize {
    9
}

fn default_clock_extension() -> String {
    ".sp3".to_string()
}

/// Orbit product (SP3) description
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct PositionProduct {
    /// Product sort, which defines both the naming convention
    /// and the products directory: "IGS", "IGU", "COD_Final"..
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_sort: String,
    /// First file name
    #[cfg_attr(feature = "serde", serde(default))]
    pub first: String,
    /// Last file name (included)
    #[cfg_attr(feature = "serde", serde(default))]
    pub last: String,
    /// Interpolation [Kernel]
    #[cfg_attr(feature = "serde", serde(default))]
    pub interpolation_method: Kernel,
    /// Number of samples per interpolation window
    #[cfg_attr(feature = "serde", serde(default = "default_interpolation_number"))]
    pub interpolation_number: usize,
}

impl Default for PositionProduct {
    fn default() -> Self {
        Self {
            file_sort: String::default(),
            first: String::default(),
            last: String::default(),
            interpolation_method: Kernel::default(),
            interpolation_number: default_interpolation_number(),
        }
    }
}

/// Clock product description. Clocks are always interpolated
/// with [Kernel::Lagrange].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct ClockProduct {
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_sort: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub first: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last: String,
    /// ".sp3" to use the clock column of orbit products,
    /// any other extension designates clock RINEX products
    /// (".clk", ".clk_30s"..), stored in a dedicated sub directory.
    #[cfg_attr(feature = "serde", serde(default = "default_clock_extension"))]
    pub file_extension: String,
    #[cfg_attr(feature = "serde", serde(default = "default_interpolation_number"))]
    pub interpolation_number: usize,
}

impl Default for ClockProduct {
    fn default() -> Self {
        Self {
            file_sort: String::default(),
            first: String::default(),
            last: String::default(),
            file_extension: default_clock_extension(),
            interpolation_number: default_interpolation_number(),
        }
    }
}

impl ClockProduct {
    /// True when clocks are read from orbit products
    pub fn is_sp3(&self) -> bool {
        self.file_extension.eq_ignore_ascii_case(".sp3")
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Turn this off to obtain a disabled engine,
    /// which does not load any product.
    #[cfg_attr(feature = "serde", serde(default = "default_calculation"))]
    pub calculation: bool,
    /// Root of the products tree
    #[cfg_attr(feature = "serde", serde(default))]
    pub directory_path: String,
    /// Tracked satellites
    #[cfg_attr(feature = "serde", serde(default))]
    pub constellations: ConstellationSizes,
    /// Products describing the actual satellite states
    #[cfg_attr(feature = "serde", serde(default))]
    pub true_position: PositionProduct,
    #[cfg_attr(feature = "serde", serde(default))]
    pub true_clock: ClockProduct,
    /// Products describing the satellite states, as known
    /// by the navigation solution.
    #[cfg_attr(feature = "serde", serde(default))]
    pub estimate_position: PositionProduct,
    #[cfg_attr(feature = "serde", serde(default))]
    pub estimate_clock: ClockProduct,
    /// Ultra-rapid segment of the estimate products, only
    /// effective with ultra-rapid estimate orbit products.
    #[cfg_attr(feature = "serde", serde(default))]
    pub estimate_ur_observe_or_predict: UltraRapidMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calculation: default_calculation(),
            directory_path: String::default(),
            constellations: ConstellationSizes::default(),
            true_position: PositionProduct::default(),
            true_clock: ClockProduct::default(),
            estimate_position: PositionProduct::default(),
            estimate_clock: ClockProduct::default(),
            estimate_ur_observe_or_predict: UltraRapidMode::default(),
        }
    }
}

impl Config {
    /// Returns [Config] where both true and estimate states
    /// derive from the same products. You can then customize [Self] as you will.
    pub fn single_source_preset(
        directory_path: &str,
        position: PositionProduct,
        clock: ClockProduct,
    ) -> Self {
        Self {
            directory_path: directory_path.to_string(),
            true_position: position.clone(),
            true_clock: clock.clone(),
            estimate_position: position,
            estimate_clock: clock,
            ..Default::default()
        }
    }

    /// Returns a disabled [Config]
    pub fn disabled() -> Self {
        Self {
            calculation: false,
            ..Default::default()
        }
    }

    /// Ultra-rapid segment actually applied to the estimate products
    /// (both position and clock).
    pub fn estimate_segment(&self) -> UltraRapidMode {
        if is_ultra_rapid(&self.estimate_position.file_sort) {
            self.estimate_ur_observe_or_predict
        } else {
            UltraRapidMode::NotUsed
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn segment_only_applies_to_ultra_rapid() {
        let mut cfg = Config {
            estimate_ur_observe_or_predict: UltraRapidMode::Observe(2),
            ..Default::default()
        };

        cfg.estimate_position.file_sort = "IGS".to_string();
        assert_eq!(cfg.estimate_segment(), UltraRapidMode::NotUsed);

        cfg.estimate_position.file_sort = "IGU".to_string();
        assert_eq!(cfg.estimate_segment(), UltraRapidMode::Observe(2));

        cfg.estimate_position.file_sort = "JAXA_Ultra".to_string();
        assert_eq!(cfg.estimate_segment(), UltraRapidMode::Observe(2));
    }

    #[test]
    fn clock_products() {
        assert!(ClockProduct::default().is_sp3());
        let clk = ClockProduct {
            file_extension: ".clk_30s".to_string(),
            ..Default::default()
        };
        assert!(!clk.is_sp3());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization() {
        let cfg: Config = serde_json::from_str(
            r#"{
                "directory_path": "/data/gnss",
                "true_position": {
                    "file_sort": "IGS",
                    "first": "igs22775.sp3",
                    "last": "igs22776.sp3",
                    "interpolation_number": 11
                },
                "true_clock": {
                    "file_sort": "IGS",
                    "first": "igs22775.clk_30s",
                    "last": "igs22776.clk_30s",
                    "file_extension": ".clk_30s"
                },
                "estimate_position": {
                    "file_sort": "IGU",
                    "first": "igu22775_00.sp3",
                    "last": "igu22776_18.sp3",
                    "interpolation_method": "Lagrange"
                },
                "estimate_ur_observe_or_predict": "observe1"
            }"#,
        )
        .unwrap();

        assert!(cfg.calculation);
        assert_eq!(cfg.directory_path, "/data/gnss");
        assert_eq!(cfg.true_position.interpolation_number, 11);
        assert_eq!(cfg.true_position.interpolation_method, Kernel::Trigonometric);
        assert_eq!(cfg.true_clock.file_extension, ".clk_30s");
        assert_eq!(cfg.true_clock.interpolation_number, 9);
        assert_eq!(cfg.estimate_position.interpolation_method, Kernel::Lagrange);
        assert!(cfg.estimate_clock.is_sp3());
        assert_eq!(cfg.estimate_segment(), UltraRapidMode::Observe(1));
        assert_eq!(cfg.constellations, ConstellationSizes::default());

        let invalid = serde_json::from_str::<Config>(r#"{"estimate_ur_observe_or_predict": "observe9"}"#);
        assert!(invalid.is_err());
    }
}
