//! Visual-layer collaborator.
//!
//! The registry never draws anything itself: marker creation, styling,
//! visibility and removal go through the [`MarkerSurface`] trait. Each
//! marker lives in exactly one visibility group, keyed by its layer; layers
//! other than gullies use clustered groups.

use kerbside_core::models::{AssetLayer, AssetStatus, Position};
use std::collections::HashMap;
use uuid::Uuid;

/// Opaque reference to an on-screen marker. Handles are allocated by the
/// surface and exclusively owned by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(Uuid);

impl MarkerHandle {
    pub fn new() -> Self {
        MarkerHandle(Uuid::new_v4())
    }
}

impl Default for MarkerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Visual treatment of a marker under the active filter.
///
/// `VisibleDim` markers stay shown and clickable at reduced opacity —
/// "exists but doesn't match the search" — while `Hidden` markers are
/// removed from display entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayState {
    #[default]
    VisibleFull,
    VisibleDim,
    Hidden,
}

impl DisplayState {
    pub fn shown(&self) -> bool {
        !matches!(self, DisplayState::Hidden)
    }

    /// Marker opacity for this treatment.
    pub fn opacity(&self) -> f64 {
        match self {
            DisplayState::VisibleFull => 1.0,
            DisplayState::VisibleDim | DisplayState::Hidden => 0.2,
        }
    }
}

/// Shape and styling of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Individual circle marker (gullies). Radius in pixels, fill from
    /// status.
    Circle { radius: u8, color: &'static str },
    /// Layer icon, rendered inside a cluster group.
    Icon { name: &'static str },
}

impl MarkerStyle {
    /// Resting style for a layer/status pair.
    pub fn for_asset(layer: AssetLayer, status: AssetStatus) -> MarkerStyle {
        if layer == AssetLayer::Gullies {
            MarkerStyle::Circle {
                radius: 6,
                color: status.color(),
            }
        } else {
            MarkerStyle::Icon {
                name: layer.as_str(),
            }
        }
    }
}

/// Collaborator that owns marker rendering and per-layer visibility groups.
pub trait MarkerSurface {
    /// Create a marker in `layer`'s visibility group and return its handle.
    fn place_marker(
        &mut self,
        layer: AssetLayer,
        position: Position,
        style: MarkerStyle,
    ) -> MarkerHandle;

    fn set_display(&mut self, handle: MarkerHandle, display: DisplayState);

    fn set_style(&mut self, handle: MarkerHandle, style: MarkerStyle);

    /// Detach a marker from its visibility group and drop it.
    fn remove_marker(&mut self, handle: MarkerHandle);
}

/// Recorded state of one marker on a [`MemorySurface`].
#[derive(Debug, Clone)]
pub struct MarkerState {
    pub layer: AssetLayer,
    pub clustered: bool,
    pub position: Position,
    pub style: MarkerStyle,
    pub display: DisplayState,
}

/// Headless surface recording marker state per visibility group, for tests
/// and non-interactive runs.
#[derive(Default)]
pub struct MemorySurface {
    markers: HashMap<MarkerHandle, MarkerState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&MarkerState> {
        self.markers.get(&handle)
    }

    /// Number of markers in a layer's visibility group.
    pub fn group_size(&self, layer: AssetLayer) -> usize {
        self.markers.values().filter(|m| m.layer == layer).count()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl MarkerSurface for MemorySurface {
    fn place_marker(
        &mut self,
        layer: AssetLayer,
        position: Position,
        style: MarkerStyle,
    ) -> MarkerHandle {
        let handle = MarkerHandle::new();
        self.markers.insert(
            handle,
            MarkerState {
                layer,
                clustered: layer.clustered(),
                position,
                style,
                display: DisplayState::VisibleFull,
            },
        );
        handle
    }

    fn set_display(&mut self, handle: MarkerHandle, display: DisplayState) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.display = display;
        }
    }

    fn set_style(&mut self, handle: MarkerHandle, style: MarkerStyle) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.style = style;
        }
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
    }
}
