//! Window manager, icon layout, and app registry for the desktop shell.
//!
//! Together with `virtual_fs` this crate is the state core the presentation
//! layer renders from: windows are opened against the registry's instance
//! policies, stacked by a monotonic z-index, and persisted best-effort
//! through the `platform_host` contracts.

pub mod apps;
pub mod icons;
pub mod model;
pub mod persistence;
pub mod windows;

pub use apps::{descriptor_for, family_of, resolve_window_content, AppDescriptor, InstancePolicy};
pub use icons::{assign_icon_positions, release_icon_position, IconGrid};
pub use model::{CreateWindowOptions, Point, Size, Viewport, WindowContent, WindowId, WindowState};
pub use persistence::{
    hydrate_windows, load_icon_positions, load_window_registry, persist_icon_positions,
    persist_window_registry, snapshot_windows, WindowSnapshot, ICON_POSITIONS_KEY,
    WINDOW_REGISTRY_KEY,
};
pub use windows::{WindowError, WindowManagerStore};
