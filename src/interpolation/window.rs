use log::trace;

use crate::{
    constants::TIME_EPSILON_S,
    interpolation::{Kernel, Sample},
    series::TimeSeries,
};

/// How a series is interpolated
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WindowPolicy {
    /// Interpolation [Kernel]
    pub kernel: Kernel,
    /// Number of samples per window
    pub size: usize,
    /// Number of missing samples we tolerate within one window
    pub gap_slack: usize,
    /// Nominal sampling interval (s)
    pub interval_s: f64,
}

impl WindowPolicy {
    /// Orbits: trigonometric interpolation, tolerating up to 3 missing samples.
    pub fn position(size: usize) -> Self {
        Self {
            kernel: Kernel::Trigonometric,
            size,
            gap_slack: 3,
            interval_s: 0.0,
        }
    }

    /// Clocks: Lagrange interpolation, no missing sample tolerated.
    pub fn clock(size: usize) -> Self {
        Self {
            kernel: Kernel::Lagrange,
            size,
            gap_slack: 0,
            interval_s: 0.0,
        }
    }

    pub fn with_kernel(&self, kernel: Kernel) -> Self {
        let mut s = *self;
        s.kernel = kernel;
        s
    }

    pub fn with_interval(&self, interval_s: f64) -> Self {
        let mut s = *self;
        s.interval_s = interval_s;
        s
    }

    /// Longest time span of a valid window (s)
    fn max_span_s(&self) -> f64 {
        self.interval_s * (self.size + self.gap_slack).saturating_sub(1) as f64 + TIME_EPSILON_S
    }
}

/// [InterpolationWindow] selects `N` consecutive samples of one
/// [TimeSeries], centered on the sample nearest to current instant.
/// It only refers to the series by index and must always be used
/// with the series it was bound to.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct InterpolationWindow {
    /// Nearest sample, None past the end of the series
    nearest: Option<usize>,
    /// First sample
    start: usize,
    /// Last sample (excluded)
    end: usize,
}

impl InterpolationWindow {
    /// Binds a new window to this series, at `t`.
    pub fn bind<T: Copy>(series: &TimeSeries<T>, t: f64, policy: &WindowPolicy) -> Self {
        let times = series.times();

        let mut index = times.partition_point(|ti| *ti < t);
        if index == times.len() {
            return Self::default();
        }

        if policy.size % 2 == 1 && index > 0 && (t - times[index - 1]).abs() < (t - times[index]).abs()
        {
            index -= 1;
        }

        let mut s = Self::default();
        s.rebuild(times.len(), index, policy.size);
        s
    }

    /// Centers the window on `index`: `[index - N/2, index + (N+1)/2)`, clipped to the series.
    fn rebuild(&mut self, len: usize, index: usize, size: usize) {
        self.nearest = Some(index);
        self.start = index.saturating_sub(size / 2);
        self.end = (index + (size + 1) / 2).min(len);
    }

    /// Slides forward while the next sample is closer to `t`.
    pub fn advance<T: Copy>(&mut self, series: &TimeSeries<T>, t: f64, policy: &WindowPolicy) {
        let Some(mut index) = self.nearest else {
            return;
        };
        let times = series.times();
        while index + 1 < times.len() && (t - times[index + 1]).abs() < (t - times[index]).abs() {
            index += 1;
        }
        if Some(index) != self.nearest {
            trace!("window: {:?} -> {}", self.nearest, index);
            self.rebuild(times.len(), index, policy.size);
        }
    }

    /// Nearest sample index
    pub fn nearest(&self) -> Option<usize> {
        self.nearest
    }

    /// Number of samples in this window
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when this window may be interpolated at `t`
    pub fn is_valid<T: Copy>(&self, series: &TimeSeries<T>, t: f64, policy: &WindowPolicy) -> bool {
        if policy.size == 0 {
            return false;
        }
        let Some(index) = self.nearest else {
            return false;
        };
        let times = series.times();
        let Some(nearest) = times.get(index) else {
            return false;
        };

        // fails on non finite instants
        if !((t - nearest).abs() <= policy.interval_s) {
            return false;
        }
        if self.len() != policy.size || self.end > times.len() {
            return false;
        }

        times[self.end - 1] - times[self.start] <= policy.max_span_s()
    }

    /// Evaluates the series at `t`. Returns the value and its validity,
    /// the value being zero when not valid.
    pub fn evaluate<T: Sample>(
        &self,
        series: &TimeSeries<T>,
        t: f64,
        policy: &WindowPolicy,
    ) -> (T, bool) {
        if !self.is_valid(series, t, policy) {
            return (T::zero(), false);
        }
        let Some(index) = self.nearest else {
            return (T::zero(), false);
        };

        let (times, values) = (series.times(), series.values());

        if (t - times[index]).abs() < TIME_EPSILON_S {
            return (values[index], true);
        }

        let value = policy.kernel.interpolate(
            &times[self.start..self.end],
            &values[self.start..self.end],
            t,
        );
        (value, true)
    }
}
