use std::f64::consts::TAU;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Earth equatorial radius (kilometers)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.1366;

/// Earth equatorial radius (meters)
pub const EARTH_EQUATORIAL_RADIUS_M: f64 = EARTH_EQUATORIAL_RADIUS_KM * 1.0E3;

/// Seconds in one solar day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Angular rate used by the trigonometric kernel (rad/s).
/// GNSS satellites revolve slightly faster than one solar day.
pub const TRIGONOMETRIC_ANGULAR_RATE_RAD_S: f64 = TAU / SECONDS_PER_DAY * 1.03;

/// Reserved value flagging unavailable fields in orbit products
pub const SP3_UNAVAILABLE: f64 = 999999.999999;

/// Any field closer than this to [SP3_UNAVAILABLE] is considered unavailable
pub(crate) const SP3_UNAVAILABLE_TOLERANCE: f64 = 1.0;

/// Two samples closer than this (s) describe the same epoch
pub(crate) const SAME_EPOCH_TOLERANCE_S: f64 = 1.0;

/// Numerical guard (s) for time coincidence
pub(crate) const TIME_EPSILON_S: f64 = 1.0E-4;

/// Ultra-rapid products are split in segments of this duration (s)
pub const ULTRA_RAPID_SEGMENT_S: f64 = 6.0 * 3600.0;

/// Clock records are kept up to this margin (s) past the last orbit epoch
pub(crate) const CLOCK_END_MARGIN_S: f64 = 30.0;

/// No ionosphere above this altitude (km)
pub const IONOSPHERE_CEILING_KM: f64 = 1000.0;

/// Vertical ionospheric delay at ground level (m)
pub const IONOSPHERE_ZENITH_DELAY_M: f64 = 20.0;

/// Reference frequency of [IONOSPHERE_ZENITH_DELAY_M] (MHz)
pub const IONOSPHERE_REFERENCE_FREQUENCY_MHZ: f64 = 1500.0;
