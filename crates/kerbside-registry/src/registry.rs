use crate::filter::{AssetFilter, LayerSelection};
use crate::surface::{DisplayState, MarkerHandle, MarkerStyle, MarkerSurface};
use kerbside_core::models::{AssetLayer, AssetStatus, Position};

/// Registry operation errors. Only `add_asset` can fail; filter, query and
/// remove never raise.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid coordinate: lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Asset id already registered: {0}")]
    DuplicateId(String),
}

/// What a marker click should do. Replaces the original UI's ambient
/// delete-mode flag with explicit registry state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Inspect,
    Delete,
}

/// Result of dispatching a marker click under the current mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Open the inspection view for this asset; it is now the current
    /// selection.
    OpenInspection { id: String },
    /// The asset was removed (delete mode).
    Removed { id: String },
    /// The id is not in the registry.
    Ignored,
}

/// One placed asset: identity, classification, state, and the marker
/// handle the registry owns for it.
#[derive(Debug)]
pub struct AssetEntry {
    pub id: String,
    pub layer: AssetLayer,
    pub status: AssetStatus,
    pub title: Option<String>,
    pub position: Position,
    handle: MarkerHandle,
    display: DisplayState,
}

impl AssetEntry {
    pub fn handle(&self) -> MarkerHandle {
        self.handle
    }

    /// Current visual treatment under the active filter.
    pub fn display(&self) -> DisplayState {
        self.display
    }
}

/// The authoritative in-memory registry of placed assets.
///
/// Owns every record and its marker handle; rendering goes through the
/// injected surface. All operations complete synchronously, so `query`
/// never observes a partially applied filter.
pub struct AssetRegistry<S: MarkerSurface> {
    surface: S,
    records: Vec<AssetEntry>,
    filter: AssetFilter,
    mode: InteractionMode,
    selected: Option<String>,
}

impl<S: MarkerSurface> AssetRegistry<S> {
    pub fn new(surface: S) -> Self {
        AssetRegistry {
            surface,
            records: Vec::new(),
            filter: AssetFilter::default(),
            mode: InteractionMode::default(),
            selected: None,
        }
    }

    /// Read access to the surface, for UI wiring and assertions.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Place a new asset.
    ///
    /// Rejects malformed coordinates and duplicate ids; on duplicate the
    /// registry is left untouched. The new marker starts Visible-Full
    /// regardless of the active filter, until the next `set_filter`.
    pub fn add_asset(
        &mut self,
        position: Position,
        id: impl Into<String>,
        layer: AssetLayer,
        status: AssetStatus,
    ) -> Result<MarkerHandle, RegistryError> {
        let id = id.into();

        if !position.is_valid() {
            return Err(RegistryError::InvalidCoordinate {
                lat: position.lat,
                lon: position.lon,
            });
        }
        if self.records.iter().any(|r| r.id == id) {
            return Err(RegistryError::DuplicateId(id));
        }

        let handle = self
            .surface
            .place_marker(layer, position, MarkerStyle::for_asset(layer, status));

        tracing::debug!(asset_id = %id, layer = %layer, "Asset added to registry");

        self.records.push(AssetEntry {
            id,
            layer,
            status,
            title: None,
            position,
            handle,
            display: DisplayState::VisibleFull,
        });

        Ok(handle)
    }

    /// Remove an asset and detach its marker. Returns `false` when the id
    /// is not registered.
    pub fn remove_asset(&mut self, id: &str) -> bool {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            tracing::debug!(asset_id = %id, "Remove requested for unknown asset");
            return false;
        };

        let entry = self.records.remove(index);
        self.surface.remove_marker(entry.handle);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }

        tracing::debug!(asset_id = %id, layer = %entry.layer, "Asset removed from registry");
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&AssetEntry> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Update an asset's status and restyle its marker. Returns `false`
    /// when the id is not registered.
    pub fn set_status(&mut self, id: &str, status: AssetStatus) -> bool {
        let Some(entry) = self.records.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        entry.status = status;
        self.surface
            .set_style(entry.handle, MarkerStyle::for_asset(entry.layer, status));
        true
    }

    /// Set or clear an asset's free-text title. Titles participate in the
    /// text filter on the next `set_filter`.
    pub fn set_title(&mut self, id: &str, title: Option<String>) -> bool {
        let Some(entry) = self.records.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        entry.title = title;
        true
    }

    /// Apply a new filter, recomputing the visual treatment of every
    /// record and pushing it to the surface. Synchronous: there is no
    /// intermediate state a concurrent `query` could observe.
    pub fn set_filter(&mut self, query: &str, layer: LayerSelection) {
        self.filter = AssetFilter::new(query, layer);

        for entry in &mut self.records {
            let display = self.filter.display_for(
                &entry.id,
                entry.status,
                entry.title.as_deref(),
                entry.layer,
            );
            entry.display = display;
            self.surface.set_display(entry.handle, display);
        }

        tracing::debug!(
            query = %self.filter.query(),
            layer = ?self.filter.layer(),
            records = self.records.len(),
            "Filter applied"
        );
    }

    pub fn filter(&self) -> &AssetFilter {
        &self.filter
    }

    /// Lazy, restartable iteration over records matching `predicate`.
    pub fn query<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a AssetEntry>
    where
        P: Fn(&AssetEntry) -> bool + 'a,
    {
        self.records.iter().filter(move |entry| predicate(entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetEntry> {
        self.records.iter()
    }

    /// Records currently shown on the map (full or dimmed).
    pub fn visible(&self) -> impl Iterator<Item = &AssetEntry> {
        self.records.iter().filter(|entry| entry.display.shown())
    }

    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.mode
    }

    /// The asset whose inspection view is open, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Dispatch a marker click under the current interaction mode.
    pub fn handle_click(&mut self, id: &str) -> ClickOutcome {
        if !self.contains(id) {
            return ClickOutcome::Ignored;
        }

        match self.mode {
            InteractionMode::Delete => {
                self.remove_asset(id);
                ClickOutcome::Removed { id: id.to_string() }
            }
            InteractionMode::Inspect => {
                self.selected = Some(id.to_string());
                ClickOutcome::OpenInspection { id: id.to_string() }
            }
        }
    }

    /// Dispatch hover styling. Gully circle markers grow while hovered in
    /// delete mode (radius 10), settle to 8 leaving delete-mode hover, and
    /// rest at 6 otherwise. Other layers keep their icons.
    pub fn handle_hover(&mut self, id: &str, entered: bool) {
        let Some(entry) = self.records.iter().find(|r| r.id == id) else {
            return;
        };
        if entry.layer != AssetLayer::Gullies {
            return;
        }

        let radius = match (entered, self.mode) {
            (true, InteractionMode::Delete) => 10,
            (false, InteractionMode::Delete) => 8,
            (false, InteractionMode::Inspect) => 6,
            (true, InteractionMode::Inspect) => return,
        };

        self.surface.set_style(
            entry.handle,
            MarkerStyle::Circle {
                radius,
                color: entry.status.color(),
            },
        );
    }
}
