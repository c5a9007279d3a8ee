//! GeoJSON export of contour and boundary polylines.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};

use crate::boundary::BoundaryPolyline;
use crate::contour::{ContourKind, ContourPolyline, ContourSet};
use crate::geometry::Point3;
use crate::georigin::GeoOrigin;

fn line_feature(points: &[Point3], close: bool, properties: JsonObject) -> Feature {
    let mut coords: Vec<Vec<f64>> = points.iter().map(|p| vec![p.x, p.y, p.z]).collect();
    if close {
        if let Some(first) = coords.first().cloned() {
            coords.push(first);
        }
    }
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coords))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn contour_feature(line: &ContourPolyline, origin: &GeoOrigin) -> Feature {
    let global = line.to_global(origin);
    let mut props = JsonObject::new();
    props.insert("elevation".to_string(), JsonValue::from(line.elevation));
    let kind = match line.kind {
        ContourKind::Major => "major",
        ContourKind::Minor => "minor",
    };
    props.insert("kind".to_string(), JsonValue::from(kind));
    props.insert("closed".to_string(), JsonValue::from(line.closed));
    line_feature(&global.points, line.closed, props)
}

fn collection(features: Vec<Feature>) -> String {
    GeoJson::from(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
    .to_string()
}

/// Serialises contours as LineString features in absolute coordinates.
/// Major contours come first.
pub fn contours_to_geojson(set: &ContourSet, origin: &GeoOrigin) -> String {
    let features = set
        .major
        .iter()
        .chain(set.minor.iter())
        .map(|line| contour_feature(line, origin))
        .collect();
    collection(features)
}

/// Serialises boundary loops as closed LineString features in absolute
/// coordinates, flagging holes.
pub fn boundaries_to_geojson(loops: &[BoundaryPolyline], origin: &GeoOrigin) -> String {
    let features = loops
        .iter()
        .map(|l| {
            let mut props = JsonObject::new();
            props.insert("hole".to_string(), JsonValue::from(l.is_hole()));
            props.insert("area".to_string(), JsonValue::from(l.area()));
            line_feature(&l.to_global(origin).points, true, props)
        })
        .collect();
    collection(features)
}
