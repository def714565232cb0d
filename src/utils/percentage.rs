use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}%", self.0)
    }
}

impl Percentage {
    pub const ZERO: Percentage = Percentage(0.);

    /// Clamps into [0, 100]. Anything that isn't a number collapses to 0.
    pub fn clamped(value: f64) -> Percentage {
        if value.is_nan() {
            Self::ZERO
        } else {
            Percentage(value.clamp(0., 100.))
        }
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Share of `part` in `whole`. An empty whole yields 0 instead of a division error.
pub fn ratio_percentage(part: u32, whole: u32) -> Percentage {
    if whole == 0 {
        return Percentage::ZERO;
    }
    Percentage::clamped(part as f64 / whole as f64 * 100.)
}
