use std::ops::Mul;

use num_traits::Zero;

use crate::{constants::TRIGONOMETRIC_ANGULAR_RATE_RAD_S, error::Error};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Any value that may be interpolated: a weighted sum of samples.
pub trait Sample: Copy + Zero + Mul<f64, Output = Self> {}

impl<T: Copy + Zero + Mul<f64, Output = T>> Sample for T {}

/// Interpolation [Kernel] applied over a window of samples.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum Kernel {
    /// Trigonometric interpolation, periodic over (slightly less than) one day.
    /// Suited for orbits.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "trigonometric", alias = "0"))]
    Trigonometric,
    /// Lagrange polynomial interpolation. Suited for clocks.
    #[cfg_attr(feature = "serde", serde(alias = "lagrange", alias = "1"))]
    Lagrange,
}

impl std::str::FromStr for Kernel {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "trigonometric" => Ok(Self::Trigonometric),
            "1" | "lagrange" => Ok(Self::Lagrange),
            _ => Err(Error::InvalidInterpolationMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trigonometric => write!(f, "trigonometric"),
            Self::Lagrange => write!(f, "lagrange"),
        }
    }
}

impl Kernel {
    /// Weight of sample `i` at instant `t`.
    pub fn weight(&self, times: &[f64], i: usize, t: f64) -> f64 {
        let t_i = times[i];
        times
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .fold(1.0, |w, (_, t_j)| match self {
                Self::Trigonometric => {
                    let half = TRIGONOMETRIC_ANGULAR_RATE_RAD_S / 2.0;
                    w * (half * (t - t_j)).sin() / (half * (t_i - t_j)).sin()
                },
                Self::Lagrange => w * (t - t_j) / (t_i - t_j),
            })
    }

    /// Interpolates `values` sampled at `times`, at instant `t`.
    pub fn interpolate<T: Sample>(&self, times: &[f64], values: &[T], t: f64) -> T {
        times
            .iter()
            .zip(values.iter())
            .enumerate()
            .fold(T::zero(), |acc, (i, (_, value))| {
                acc + *value * self.weight(times, i, t)
            })
    }
}
