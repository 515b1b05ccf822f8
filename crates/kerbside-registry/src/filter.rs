//! The filtering predicate applied over the registry.

use crate::surface::DisplayState;
use kerbside_core::models::{AssetLayer, AssetStatus};

/// Layer half of the filter: everything, or a single layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayerSelection {
    #[default]
    All,
    Only(AssetLayer),
}

impl LayerSelection {
    /// Parse the UI's layer selector value ("all" or a layer name).
    pub fn parse(s: &str) -> Option<LayerSelection> {
        if s.eq_ignore_ascii_case("all") {
            Some(LayerSelection::All)
        } else {
            AssetLayer::parse(s).map(LayerSelection::Only)
        }
    }

    pub fn matches(&self, layer: AssetLayer) -> bool {
        match self {
            LayerSelection::All => true,
            LayerSelection::Only(selected) => *selected == layer,
        }
    }
}

/// Active filter state: a free-text query matched case-insensitively
/// against id, status, and title, and a layer selection.
///
/// A record whose layer is filtered out is hidden outright; a record whose
/// layer matches but whose text does not is dimmed yet stays visible and
/// clickable.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    query: String,
    layer: LayerSelection,
}

impl AssetFilter {
    pub fn new(query: &str, layer: LayerSelection) -> Self {
        AssetFilter {
            query: query.trim().to_lowercase(),
            layer,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn layer(&self) -> LayerSelection {
        self.layer
    }

    /// Visual treatment of a record under this filter.
    pub fn display_for(
        &self,
        id: &str,
        status: AssetStatus,
        title: Option<&str>,
        layer: AssetLayer,
    ) -> DisplayState {
        if !self.layer.matches(layer) {
            return DisplayState::Hidden;
        }
        if self.query.is_empty() {
            return DisplayState::VisibleFull;
        }

        let id_match = id.to_lowercase().contains(&self.query);
        let status_match = status.as_str().to_lowercase().contains(&self.query);
        let title_match = title
            .map(|t| t.to_lowercase().contains(&self.query))
            .unwrap_or(false);

        if id_match || status_match || title_match {
            DisplayState::VisibleFull
        } else {
            DisplayState::VisibleDim
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_selection_parse() {
        assert_eq!(LayerSelection::parse("all"), Some(LayerSelection::All));
        assert_eq!(LayerSelection::parse("All"), Some(LayerSelection::All));
        assert_eq!(
            LayerSelection::parse("gullies"),
            Some(LayerSelection::Only(AssetLayer::Gullies))
        );
        assert_eq!(LayerSelection::parse("roads"), None);
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let filter = AssetFilter::new("", LayerSelection::All);
        assert_eq!(
            filter.display_for("G-1", AssetStatus::Unmarked, None, AssetLayer::Gullies),
            DisplayState::VisibleFull
        );
    }

    #[test]
    fn test_layer_mismatch_hides_outright() {
        let filter = AssetFilter::new("", LayerSelection::Only(AssetLayer::Signage));
        assert_eq!(
            filter.display_for("G-1", AssetStatus::Unmarked, None, AssetLayer::Gullies),
            DisplayState::Hidden
        );
    }

    #[test]
    fn test_text_mismatch_dims_but_keeps_visible() {
        let filter = AssetFilter::new("flooded", LayerSelection::All);
        let display = filter.display_for("G-1", AssetStatus::Unmarked, None, AssetLayer::Gullies);
        assert_eq!(display, DisplayState::VisibleDim);
        assert!(display.shown());
        assert_eq!(display.opacity(), 0.2);
    }

    #[test]
    fn test_query_matches_id_status_or_title() {
        let filter = AssetFilter::new("g-1", LayerSelection::All);
        assert_eq!(
            filter.display_for("G-10", AssetStatus::Unmarked, None, AssetLayer::Gullies),
            DisplayState::VisibleFull
        );

        let filter = AssetFilter::new("flagged", LayerSelection::All);
        assert_eq!(
            filter.display_for("G-1", AssetStatus::Flagged, None, AssetLayer::Gullies),
            DisplayState::VisibleFull
        );

        let filter = AssetFilter::new("market cross", LayerSelection::All);
        assert_eq!(
            filter.display_for(
                "S-3",
                AssetStatus::Unmarked,
                Some("Near Market Cross junction"),
                AssetLayer::Signage
            ),
            DisplayState::VisibleFull
        );
    }

    #[test]
    fn test_layer_mismatch_wins_over_text_match() {
        // Hidden even though the query matches the id.
        let filter = AssetFilter::new("g-1", LayerSelection::Only(AssetLayer::Signage));
        assert_eq!(
            filter.display_for("G-1", AssetStatus::Unmarked, None, AssetLayer::Gullies),
            DisplayState::Hidden
        );
    }

    #[test]
    fn test_query_is_trimmed_and_case_folded() {
        let filter = AssetFilter::new("  UNMARKED  ", LayerSelection::All);
        assert_eq!(
            filter.display_for("G-1", AssetStatus::Unmarked, None, AssetLayer::Gullies),
            DisplayState::VisibleFull
        );
    }
}
