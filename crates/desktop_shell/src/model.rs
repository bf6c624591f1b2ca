//! Window-manager data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use virtual_fs::ItemId;

/// Fallback window width when neither the caller nor the app registry
/// supplies one.
pub const DEFAULT_WINDOW_WIDTH: i32 = 640;
/// Fallback window height.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 480;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of one open window instance (`editor-2`, `explorer`).
pub struct WindowId(pub String);

impl WindowId {
    /// Wraps a raw id string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
/// Top-left position in desktop pixels.
pub struct Point {
    /// Horizontal offset.
    pub x: i32,
    /// Vertical offset.
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Width/height in pixels.
pub struct Size {
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Usable desktop area windows are placed into.
pub struct Viewport {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { w: 1280, h: 800 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Rendering payload a window resolves to. Produced by the app registry from
/// the window's base id; never persisted (snapshots rebuild it from the id).
pub enum WindowContent {
    /// File explorer rooted at a folder (`None` = default location).
    Explorer {
        /// Folder the explorer shows.
        folder_id: Option<ItemId>,
    },
    /// Text editor, optionally opened on a file.
    Editor {
        /// File being edited.
        file_id: Option<ItemId>,
    },
    /// Image viewer.
    ImageViewer {
        /// Image file shown.
        file_id: Option<ItemId>,
    },
    /// PDF viewer.
    PdfViewer {
        /// Document shown.
        file_id: Option<ItemId>,
    },
    /// Video player.
    VideoPlayer {
        /// Clip played.
        file_id: Option<ItemId>,
    },
    /// Embedded browser frame.
    Browser,
    /// Game emulator.
    Emulator,
    /// Unrecognized app family, rendered by a generic host.
    App {
        /// Raw base id for the generic host to interpret.
        base_id: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// One open window.
pub struct WindowState {
    /// Instance id.
    pub id: WindowId,
    /// App/content family id this instance was opened from.
    pub base_id: String,
    /// Title-bar text.
    pub title: String,
    /// Hidden into the taskbar. Orthogonal to `maximized`.
    pub minimized: bool,
    /// Fills the viewport; pre-maximize geometry is kept in
    /// `restore_bounds`.
    pub maximized: bool,
    /// Current top-left position.
    pub position: Point,
    /// Current size.
    pub size: Size,
    /// Geometry to return to when un-maximizing.
    pub restore_bounds: Option<(Point, Size)>,
    /// Stacking order; higher renders on top. Issued monotonically by the
    /// store, so the highest value is the most recently focused window.
    pub z_index: u32,
    /// Rendering payload.
    pub content: WindowContent,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Explicit registration request for [`crate::WindowManagerStore::create_window`],
/// used for one-off dialogs and snapshot hydration.
pub struct CreateWindowOptions {
    /// Instance id to register under.
    pub id: String,
    /// Base id; defaults to `id`.
    pub base_id: Option<String>,
    /// Title; defaults to the registry title for the base id's family.
    pub title: Option<String>,
    /// Position; defaults to viewport-centered.
    pub position: Option<Point>,
    /// Size; defaults to the registry size for the base id's family.
    pub size: Option<Size>,
    /// Content; defaults to resolving the base id through the registry.
    pub content: Option<WindowContent>,
}

impl CreateWindowOptions {
    /// Starts an options block for the given instance id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}
