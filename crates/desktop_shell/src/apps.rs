//! App registry: instance policies, default geometry, and the window-content
//! resolution contract.
//!
//! A window's base id is `{family}` or `{family}-{content-id}`; the family
//! selects the descriptor and the suffix addresses the item the app renders
//! (`editor-fs-12`, `explorer-fs-3`).

use virtual_fs::ItemId;

use crate::model::{Size, WindowContent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How many concurrent windows an app family allows.
pub enum InstancePolicy {
    /// One window per base id; the window id is the base id itself, so
    /// reopening the same target refocuses it (explorer per folder, viewers
    /// per file).
    Single,
    /// Unlimited instances with `{base}-{counter}` ids.
    Multi,
    /// At most one window for the whole family, regardless of the content
    /// suffix. Opening anything else in the family refocuses the existing
    /// window.
    SingleFamily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Registry entry for one app family.
pub struct AppDescriptor {
    /// Family prefix of base ids handled by this app.
    pub family: &'static str,
    /// Default window title.
    pub title: &'static str,
    /// Concurrency policy.
    pub policy: InstancePolicy,
    /// Default window size.
    pub default_size: Size,
}

const APP_REGISTRY: [AppDescriptor; 7] = [
    AppDescriptor {
        family: "explorer",
        title: "Explorer",
        policy: InstancePolicy::Single,
        default_size: Size { w: 720, h: 500 },
    },
    AppDescriptor {
        family: "editor",
        title: "Text Editor",
        policy: InstancePolicy::Multi,
        default_size: Size { w: 640, h: 480 },
    },
    AppDescriptor {
        family: "image",
        title: "Image Viewer",
        policy: InstancePolicy::Single,
        default_size: Size { w: 800, h: 600 },
    },
    AppDescriptor {
        family: "pdf",
        title: "Document Viewer",
        policy: InstancePolicy::Single,
        default_size: Size { w: 720, h: 860 },
    },
    AppDescriptor {
        family: "video",
        title: "Video Player",
        policy: InstancePolicy::Single,
        default_size: Size { w: 800, h: 520 },
    },
    AppDescriptor {
        family: "browser",
        title: "Browser",
        policy: InstancePolicy::Single,
        default_size: Size { w: 960, h: 640 },
    },
    AppDescriptor {
        family: "emulator",
        title: "Game Emulator",
        policy: InstancePolicy::SingleFamily,
        default_size: Size { w: 800, h: 600 },
    },
];

const FALLBACK_APP: AppDescriptor = AppDescriptor {
    family: "app",
    title: "Application",
    policy: InstancePolicy::Multi,
    default_size: Size { w: 640, h: 480 },
};

/// Family prefix of a base id (`editor-fs-12` -> `editor`).
pub fn family_of(base_id: &str) -> &str {
    base_id.split('-').next().unwrap_or(base_id)
}

/// Registry descriptor for a base id, falling back to a generic multi-instance
/// app for unknown families.
pub fn descriptor_for(base_id: &str) -> &'static AppDescriptor {
    let family = family_of(base_id);
    APP_REGISTRY
        .iter()
        .find(|descriptor| descriptor.family == family)
        .unwrap_or(&FALLBACK_APP)
}

/// Resolves a base id into the payload the window renders.
///
/// This is the content-resolution contract consumed by the shell renderer:
/// the family prefix picks the app and the remaining suffix addresses the
/// file-system item, when one is embedded.
pub fn resolve_window_content(base_id: &str) -> WindowContent {
    let family = family_of(base_id);
    let item_suffix = base_id
        .strip_prefix(family)
        .and_then(|rest| rest.strip_prefix('-'))
        .filter(|suffix| !suffix.is_empty())
        .map(ItemId::new);

    match family {
        "explorer" => WindowContent::Explorer {
            folder_id: item_suffix,
        },
        "editor" => WindowContent::Editor {
            file_id: item_suffix,
        },
        "image" => WindowContent::ImageViewer {
            file_id: item_suffix,
        },
        "pdf" => WindowContent::PdfViewer {
            file_id: item_suffix,
        },
        "video" => WindowContent::VideoPlayer {
            file_id: item_suffix,
        },
        "browser" => WindowContent::Browser,
        "emulator" => WindowContent::Emulator,
        _ => WindowContent::App {
            base_id: base_id.to_string(),
        },
    }
}
