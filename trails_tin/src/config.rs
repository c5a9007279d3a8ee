//! Persistent surface settings.

use std::io;

use crate::quality::QualityFilter;

fn default_max_edge_length() -> f64 {
    f64::MAX
}

fn default_max_angle() -> f64 {
    180.0
}

fn default_major_interval() -> f64 {
    5.0
}

fn default_minor_interval() -> f64 {
    1.0
}

/// Triangulation thresholds and contour intervals of a surface.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TinConfig {
    #[serde(default = "default_max_edge_length")]
    pub max_edge_length: f64,
    #[serde(default = "default_max_angle")]
    pub max_angle: f64,
    #[serde(default = "default_major_interval")]
    pub major_interval: f64,
    #[serde(default = "default_minor_interval")]
    pub minor_interval: f64,
}

impl Default for TinConfig {
    fn default() -> Self {
        Self {
            max_edge_length: default_max_edge_length(),
            max_angle: default_max_angle(),
            major_interval: default_major_interval(),
            minor_interval: default_minor_interval(),
        }
    }
}

impl TinConfig {
    /// Sets the minor interval; the major interval follows at five times it.
    pub fn with_minor_interval(mut self, minor: f64) -> Self {
        self.minor_interval = minor;
        self.major_interval = minor * 5.0;
        self
    }

    pub fn quality_filter(&self) -> crate::Result<QualityFilter> {
        QualityFilter::new(self.max_edge_length, self.max_angle)
    }

    /// Saves the configuration as JSON.
    pub fn save(&self, path: &str) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        crate::io::write_string(path, &json)
    }

    /// Loads a configuration from JSON. Missing fields take their defaults.
    pub fn load(path: &str) -> io::Result<Self> {
        let data = crate::io::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
