//! Grid coordinates used as map keys.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// `(expiry, tenor)` coordinate of a surface node or a priced point.
///
/// Ordered by expiry then tenor using IEEE total ordering so it can key
/// ordered maps. `-0.0` and `0.0` compare equal.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::surfaces::GridPoint;
///
/// let a = GridPoint::new(1.0, 5.0);
/// let b = GridPoint::new(1.0, 10.0);
/// assert!(a < b);
/// assert_eq!(a, GridPoint::new(1.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    /// Option expiry in years.
    pub expiry: f64,
    /// Underlying tenor in years.
    pub tenor: f64,
}

impl GridPoint {
    /// Create a grid point.
    #[inline]
    pub fn new(expiry: f64, tenor: f64) -> Self {
        // Adding 0.0 maps -0.0 to 0.0.
        Self {
            expiry: expiry + 0.0,
            tenor: tenor + 0.0,
        }
    }
}

impl PartialEq for GridPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GridPoint {}

impl PartialOrd for GridPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GridPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.expiry
            .total_cmp(&other.expiry)
            .then_with(|| self.tenor.total_cmp(&other.tenor))
    }
}

impl Hash for GridPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expiry.to_bits().hash(state);
        self.tenor.to_bits().hash(state);
    }
}

impl From<(f64, f64)> for GridPoint {
    fn from((expiry, tenor): (f64, f64)) -> Self {
        Self::new(expiry, tenor)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.expiry, self.tenor)
    }
}
