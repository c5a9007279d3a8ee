//! Shared local origin used to keep terrain coordinates well conditioned.

use crate::geometry::Point3;

/// Geographic anchor for all terrain geometry.
///
/// Terrain points are stored relative to `origin` and only converted back to
/// absolute coordinates at export boundaries. The origin elevation is always
/// zero so elevations stay absolute.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoOrigin {
    /// Zone identifier (UTM zone name).
    pub zone: String,
    /// Absolute easting/northing of the local origin.
    pub origin: Point3,
}

impl Default for GeoOrigin {
    fn default() -> Self {
        Self {
            zone: "Z1".to_string(),
            origin: Point3::new(0.0, 0.0, 0.0),
        }
    }
}

impl GeoOrigin {
    /// Creates a new origin. The elevation component is discarded.
    pub fn new(zone: impl Into<String>, origin: Point3) -> Self {
        Self {
            zone: zone.into(),
            origin: Point3::new(origin.x, origin.y, 0.0),
        }
    }

    /// Returns the origin held in `slot`, creating it from `first` when no
    /// origin exists yet. An existing origin still sitting at (0, 0) adopts
    /// `first` as well.
    pub fn get_or_init(slot: &mut Option<GeoOrigin>, first: Point3) -> &mut GeoOrigin {
        let origin = slot.get_or_insert_with(|| {
            log::debug!("creating geo origin at ({}, {})", first.x, first.y);
            GeoOrigin::new("Z1", first)
        });
        if origin.is_unset() {
            origin.set_origin(first);
        }
        origin
    }

    /// Returns `true` while the origin is still at the default (0, 0).
    pub fn is_unset(&self) -> bool {
        self.origin.x == 0.0 && self.origin.y == 0.0
    }

    /// Moves the origin. Elevation is forced to zero.
    pub fn set_origin(&mut self, origin: Point3) {
        self.origin = Point3::new(origin.x, origin.y, 0.0);
    }

    /// Changes the zone identifier.
    pub fn set_zone(&mut self, zone: impl Into<String>) {
        self.zone = zone.into();
    }

    /// Converts an absolute coordinate to the local frame.
    pub fn to_local(&self, p: Point3) -> Point3 {
        p - self.origin
    }

    /// Converts a local coordinate back to absolute coordinates.
    pub fn to_global(&self, p: Point3) -> Point3 {
        p + self.origin
    }

    /// Saves this origin to a JSON file.
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        crate::io::write_string(path, &json)
    }

    /// Loads an origin from a JSON file.
    pub fn load(path: &str) -> std::io::Result<Self> {
        let data = crate::io::read_to_string(path)?;
        let origin: GeoOrigin = serde_json::from_str(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let origin = GeoOrigin::new("Z35", Point3::new(500_000.0, 4_400_000.0, 120.0));
        let global = Point3::new(500_010.0, 4_400_020.0, 130.0);
        let local = origin.to_local(global);
        assert_eq!(local, Point3::new(10.0, 20.0, 130.0));
        assert_eq!(origin.to_global(local), global);
    }

    #[test]
    fn lazy_creation_adopts_first_point() {
        let mut slot = None;
        let origin = GeoOrigin::get_or_init(&mut slot, Point3::new(100.0, 200.0, 50.0));
        assert_eq!(origin.origin, Point3::new(100.0, 200.0, 0.0));
        assert_eq!(origin.zone, "Z1");

        let origin = GeoOrigin::get_or_init(&mut slot, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(origin.origin, Point3::new(100.0, 200.0, 0.0));
    }

    #[test]
    fn unset_origin_adopts_point() {
        let mut slot = Some(GeoOrigin::default());
        GeoOrigin::get_or_init(&mut slot, Point3::new(7.0, 8.0, 9.0));
        assert_eq!(slot.unwrap().origin, Point3::new(7.0, 8.0, 0.0));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("origin.json");
        let path = path.to_str().unwrap();
        let mut origin = GeoOrigin::new("Z1", Point3::new(1.0, 2.0, 0.0));
        origin.set_zone("Z36");
        origin.save(path).unwrap();
        assert_eq!(GeoOrigin::load(path).unwrap(), origin);
    }
}
