//! Basic 2D point type used for plan-view calculations.

/// Representation of a 2D point in plan view.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<super::Point3> for Point {
    fn from(p: super::Point3) -> Self {
        Self::new(p.x, p.y)
    }
}
