//! Basic geometry primitives for terrain operations.

mod point;
mod point3;
pub mod predicates;

pub use point::Point;
pub use point3::Point3;

/// Calculates the signed area of a simple polygon using the shoelace formula.
/// Counter-clockwise polygons yield a positive area.
pub fn signed_polygon_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        sum += vertices[i].x * vertices[j].y - vertices[j].x * vertices[i].y;
    }
    sum * 0.5
}

/// Calculates the area of a simple polygon using the shoelace formula.
pub fn polygon_area(vertices: &[Point]) -> f64 {
    signed_polygon_area(vertices).abs()
}

/// Representation of a series of connected line segments.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polyline3 {
    pub vertices: Vec<Point3>,
}

impl Polyline3 {
    /// Creates a new polyline from a list of vertices.
    pub fn new(vertices: Vec<Point3>) -> Self {
        Self { vertices }
    }

    /// Returns the total plan length of all segments in the polyline.
    pub fn plan_length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| predicates::plan_distance(pair[0], pair[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_area_square() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        assert!((polygon_area(&square) - 1.0).abs() < 1e-6);
        assert!(signed_polygon_area(&square) > 0.0);
        let reversed: Vec<Point> = square.into_iter().rev().collect();
        assert!(signed_polygon_area(&reversed) < 0.0);
    }

    #[test]
    fn polyline_plan_length_ignores_z() {
        let pl = Polyline3::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 10.0),
            Point3::new(6.0, 8.0, -4.0),
        ]);
        assert!((pl.plan_length() - 10.0).abs() < 1e-6);
    }
}
