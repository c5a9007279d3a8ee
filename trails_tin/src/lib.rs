//! Core library for building and editing terrain surfaces as triangulated
//! irregular networks.

pub mod analysis;
pub mod boundary;
pub mod config;
pub mod contour;
pub mod delaunay;
pub mod error;
pub mod geometry;
pub mod georigin;
pub mod io;
pub mod mesh;
pub mod point_set;
pub mod quality;
pub mod topology;

pub use analysis::{analyze, AnalysisKind};
pub use boundary::BoundaryPolyline;
pub use config::TinConfig;
pub use contour::{ContourKind, ContourPolyline, ContourSet};
pub use error::{Result, TinError};
pub use geometry::{Point, Point3};
pub use georigin::GeoOrigin;
pub use mesh::{build_tin, MeshState, TinMesh, TinSnapshot};
pub use point_set::{PlanarPointSet, PointCluster};
pub use quality::QualityFilter;
pub use topology::Triangle;
