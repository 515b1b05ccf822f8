//! Asset Registry
//!
//! The single source of truth for what is currently on the map and in what
//! state: the record list, each record's visual handle and display
//! treatment, the active filter, and the interaction mode. All operations
//! are synchronous in-memory mutations; rendering is delegated to an
//! injected [`MarkerSurface`] collaborator.

pub mod filter;
pub mod registry;
pub mod surface;

pub use filter::{AssetFilter, LayerSelection};
pub use registry::{AssetEntry, AssetRegistry, ClickOutcome, InteractionMode, RegistryError};
pub use surface::{DisplayState, MarkerHandle, MarkerStyle, MarkerSurface, MemorySurface};
