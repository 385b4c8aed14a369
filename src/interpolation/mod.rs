//! Windowed interpolation of time series
mod kernel;
mod window;

pub use kernel::{Kernel, Sample};
pub use window::{InterpolationWindow, WindowPolicy};
