use thiserror::Error;

pub type Result<T> = std::result::Result<T, TinError>;

/// Errors raised by TIN construction and editing. None of them is fatal:
/// every failing mutation leaves the mesh in its last valid state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TinError {
    #[error("at least 3 non-collinear points are required, got {usable} usable points")]
    InsufficientPoints { usable: usize },
    #[error("triangle index {index} is out of range (mesh has {count} triangles)")]
    InvalidTriangleIndex { index: usize, count: usize },
    #[error("point does not lie within triangle {triangle}")]
    PointOutsideTriangle { triangle: usize },
    #[error("a point already exists at this plan position (vertex {index})")]
    DuplicatePoint { index: usize },
    #[error("triangles {a} and {b} do not share an edge")]
    EdgeNotShared { a: usize, b: usize },
    #[error("triangles {a} and {b} form a non-convex quadrilateral, edge not swappable")]
    NonConvexQuad { a: usize, b: usize },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}
