use std::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};

/// A single (x, y) observation, e.g. an isotope peak's m/z and relative abundance.
///
/// Used both for the centroided input of a reconstruction and for the points of
/// the continuous curve it returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StickPoint {
    pub x: f64,
    pub y: f64,
}

impl StickPoint {
    /// Creates a new `StickPoint`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msgauss::data::stick::StickPoint;
    /// let stick = StickPoint::new(1000.5, 42.0);
    /// assert_eq!(stick.x, 1000.5);
    /// assert_eq!(stick.y, 42.0);
    /// ```
    pub const fn new(x: f64, y: f64) -> Self {
        StickPoint { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for StickPoint {
    fn from((x, y): (f64, f64)) -> Self {
        StickPoint { x, y }
    }
}

impl From<StickPoint> for (f64, f64) {
    fn from(point: StickPoint) -> Self {
        (point.x, point.y)
    }
}

impl Display for StickPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {})", self.x, self.y)
    }
}
