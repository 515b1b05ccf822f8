use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed classification of a point asset.
///
/// The layer controls which visibility group a marker belongs to and which
/// icon style it uses. Gully markers render individually as circle markers;
/// every other layer is placed in a clustered group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetLayer {
    Gullies,
    Playgrounds,
    Walkways,
    Signage,
    Lining,
}

impl AssetLayer {
    pub const ALL: [AssetLayer; 5] = [
        AssetLayer::Gullies,
        AssetLayer::Playgrounds,
        AssetLayer::Walkways,
        AssetLayer::Signage,
        AssetLayer::Lining,
    ];

    /// Whether markers on this layer are grouped into clusters.
    pub fn clustered(&self) -> bool {
        !matches!(self, AssetLayer::Gullies)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetLayer::Gullies => "gullies",
            AssetLayer::Playgrounds => "playgrounds",
            AssetLayer::Walkways => "walkways",
            AssetLayer::Signage => "signage",
            AssetLayer::Lining => "lining",
        }
    }

    pub fn parse(s: &str) -> Option<AssetLayer> {
        match s.to_lowercase().as_str() {
            "gullies" => Some(AssetLayer::Gullies),
            "playgrounds" => Some(AssetLayer::Playgrounds),
            "walkways" => Some(AssetLayer::Walkways),
            "signage" => Some(AssetLayer::Signage),
            "lining" => Some(AssetLayer::Lining),
            _ => None,
        }
    }
}

impl fmt::Display for AssetLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inspection state of an asset. Drives marker styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    #[default]
    Unmarked,
    Flagged,
    Scheduled,
    Resolved,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Unmarked => "Unmarked",
            AssetStatus::Flagged => "Flagged",
            AssetStatus::Scheduled => "Scheduled",
            AssetStatus::Resolved => "Resolved",
        }
    }

    /// Marker fill colour for this status.
    pub fn color(&self) -> &'static str {
        match self {
            AssetStatus::Unmarked => "#3388ff",
            AssetStatus::Flagged => "#d73a2e",
            AssetStatus::Scheduled => "#e8a33d",
            AssetStatus::Resolved => "#2e8b57",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geographic coordinate (latitude, longitude). Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Position { lat, lon }
    }

    /// A coordinate is valid when both components are finite and within
    /// WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Persisted form of an asset record: registry state combined with the
/// outcome of a photo upload, written through the datastore collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub id: String,
    pub layer: AssetLayer,
    pub status: AssetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_clustering_policy() {
        assert!(!AssetLayer::Gullies.clustered());
        assert!(AssetLayer::Playgrounds.clustered());
        assert!(AssetLayer::Signage.clustered());
    }

    #[test]
    fn test_layer_parse_round_trip() {
        for layer in AssetLayer::ALL {
            assert_eq!(AssetLayer::parse(layer.as_str()), Some(layer));
        }
        assert_eq!(AssetLayer::parse("GULLIES"), Some(AssetLayer::Gullies));
        assert_eq!(AssetLayer::parse("roads"), None);
    }

    #[test]
    fn test_position_validity() {
        assert!(Position::new(51.90, -8.48).is_valid());
        assert!(Position::new(-90.0, 180.0).is_valid());
        assert!(!Position::new(91.0, 0.0).is_valid());
        assert!(!Position::new(0.0, -180.5).is_valid());
        assert!(!Position::new(f64::NAN, 0.0).is_valid());
        assert!(!Position::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_default_status() {
        assert_eq!(AssetStatus::default(), AssetStatus::Unmarked);
    }
}
