use std::cmp::Ordering;
use std::fmt::Display;

/// Absolute tolerance (mm) under which two lengths are considered equal
pub const FPA_EPSILON: f64 = 1e-9;

/// Length wrapper comparing with [`float_cmp::approx_eq!()`]: values within [`FPA_EPSILON`] (or 4 ulps) are equal,
/// so `FPA(a) <= FPA(b)` also holds when `a` exceeds `b` by rounding noise only.
#[derive(Debug, Clone, Copy)]
pub struct FPA(pub f64);

impl<T: Into<f64>> From<T> for FPA {
    fn from(n: T) -> Self {
        FPA(n.into())
    }
}

impl PartialEq for FPA {
    fn eq(&self, other: &Self) -> bool {
        float_cmp::approx_eq!(f64, self.0, other.0, epsilon = FPA_EPSILON, ulps = 4)
    }
}

impl PartialOrd for FPA {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        self.0.partial_cmp(&other.0)
    }
}

impl Display for FPA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
