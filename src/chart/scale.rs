//! Linear value scale with rounded tick steps.

/// A value range snapped outward to a multiple of `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ValueScale {
    /// Scale covering `values` and zero, with roughly five ticks.
    #[must_use]
    pub fn including_zero(values: impl IntoIterator<Item = f64>) -> Self {
        let (lo, hi) = values
            .into_iter()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Self::nice(lo, hi, 5)
    }

    /// Snap `[lo, hi]` outward so that it divides into about `target_ticks` steps.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn nice(lo: f64, hi: f64, target_ticks: usize) -> Self {
        let hi = if (hi - lo).abs() < f64::EPSILON { lo + 1.0 } else { hi };
        let step = nice_step((hi - lo) / target_ticks.max(1) as f64);
        Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    /// Position of `value` within the scale, 0.0 at `min` and 1.0 at `max`.
    #[must_use]
    pub fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    /// Tick values from `min` to `max` inclusive.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn ticks(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count)
            .map(|i| self.step.mul_add(i as f64, self.min))
            .collect()
    }
}

fn nice_step(raw: f64) -> f64 {
    let base = 10_f64.powf(raw.log10().floor());
    let fraction = raw / base;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

#[cfg(test)]
#[path = "scale_tests.rs"]
mod tests;
