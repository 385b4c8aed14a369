use crate::constants::SPEED_OF_LIGHT_M_S;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Common GNSS carriers, so observables can be requested
/// without hardcoding frequencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum Carrier {
    /// L1 (GPS/QZSS) same frequency as E1 and B1C
    #[default]
    L1,
    /// L2 (GPS/QZSS)
    L2,
    /// L5 (GPS/QZSS) same frequency as E5a and B2a
    L5,
    /// L6 (QZSS) same frequency as E6
    L6,
    /// G1 (Glonass) FDMA center frequency
    G1,
    /// G2 (Glonass) FDMA center frequency
    G2,
    /// E1 (Galileo)
    E1,
    /// E5a (Galileo)
    E5A,
    /// E5b (Galileo) same frequency as B2I
    E5B,
    /// E6 (Galileo)
    E6,
    /// B1I (BDS)
    B1I,
    /// B3 (BDS)
    B3,
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
            Self::L6 => write!(f, "L6"),
            Self::G1 => write!(f, "G1"),
            Self::G2 => write!(f, "G2"),
            Self::E1 => write!(f, "E1"),
            Self::E5A => write!(f, "E5A"),
            Self::E5B => write!(f, "E5B"),
            Self::E6 => write!(f, "E6"),
            Self::B1I => write!(f, "B1I"),
            Self::B3 => write!(f, "B3"),
        }
    }
}

impl Carrier {
    /// Carrier frequency (MHz)
    pub fn frequency_mhz(&self) -> f64 {
        match self {
            Self::L1 | Self::E1 => 1575.42,
            Self::L2 => 1227.60,
            Self::L5 | Self::E5A => 1176.45,
            Self::L6 | Self::E6 => 1278.75,
            Self::G1 => 1602.0,
            Self::G2 => 1246.0,
            Self::E5B => 1207.14,
            Self::B1I => 1561.098,
            Self::B3 => 1268.52,
        }
    }

    /// Carrier wavelength (m)
    pub fn wavelength_m(&self) -> f64 {
        SPEED_OF_LIGHT_M_S * 1.0E-6 / self.frequency_mhz()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wavelengths() {
        assert!((Carrier::L1.wavelength_m() - 0.190293672798).abs() < 1.0E-9);
        assert!((Carrier::L2.wavelength_m() - 0.244210213425).abs() < 1.0E-9);
        assert_eq!(Carrier::E5A.frequency_mhz(), Carrier::L5.frequency_mhz());
    }
}
