//! In-memory virtual file system for the desktop shell.
//!
//! Items live in a flat arena keyed by id; parent/child relationships are id
//! references and every item carries its fully materialized path. All
//! mutations either complete (with the whole affected subtree consistent) or
//! return an error with the tree untouched.

pub mod item;
pub mod path;
pub mod store;

pub use item::{FileItem, FolderItem, FsItem, ItemCore, ItemId, ItemKind, ProtectionLevel};
pub use path::{
    breadcrumbs, join_path, leaf_name, parent_path, split_file_name, unique_child_name, Breadcrumb,
    SEPARATOR,
};
pub use store::{Clipboard, ClipboardOp, DriveConfig, FileSystemStore, FsError};
