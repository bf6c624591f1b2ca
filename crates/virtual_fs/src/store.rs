//! The virtual file system store.
//!
//! State lives in a flat arena (`HashMap<ItemId, FsItem>`) with parent/child
//! links as id references. Mutations validate first and only then touch the
//! arena, so a returned error guarantees the tree (including every
//! materialized path) is exactly as it was before the call.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{FileItem, FolderItem, FsItem, ItemCore, ItemId, ItemKind, ProtectionLevel};
use crate::path::{join_path, parent_path, split_file_name, unique_child_name};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Rejection reasons for store operations. All are soft: the store never
/// panics on bad input and state is untouched when one of these is returned.
pub enum FsError {
    /// The create/move/paste target does not resolve to a folder.
    #[error("target does not resolve to a folder")]
    InvalidParent,
    /// A same-kind sibling with the same name already exists at the target.
    #[error("an item with the same name already exists at the target")]
    NameConflict,
    /// The item is a system item and refuses rename/delete/cut/move.
    #[error("item is protected")]
    ProtectedItem,
    /// The referenced id does not exist.
    #[error("unknown item id")]
    UnknownId,
    /// Moving a folder into itself or one of its descendants.
    #[error("cannot move a folder into its own subtree")]
    CyclicMove,
    /// Empty or blank name supplied.
    #[error("name must not be empty")]
    InvalidName,
    /// Internal link that should not be broken was broken. Operations degrade
    /// to this instead of panicking.
    #[error("dangling item reference")]
    DanglingReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Pending clipboard operation.
pub enum ClipboardOp {
    /// Paste will clone the clipboard items.
    Copy,
    /// Paste will move the clipboard items and clear the clipboard.
    Cut,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Clipboard contents: item ids plus the pending operation.
pub struct Clipboard {
    /// Ids captured by the last copy/cut.
    pub items: Vec<ItemId>,
    /// Pending operation; `None` when the clipboard is empty.
    pub operation: Option<ClipboardOp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Construction parameters for a drive.
pub struct DriveConfig {
    /// Root drive name, also the root path (`C:`).
    pub drive_name: String,
    /// System folders seeded directly under the root, protected against
    /// rename/delete/cut.
    pub system_folders: Vec<String>,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            drive_name: "C:".to_string(),
            system_folders: vec!["Desktop".to_string(), "My Documents".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// In-memory hierarchical file system with navigation, selection, and
/// clipboard state.
pub struct FileSystemStore {
    items: HashMap<ItemId, FsItem>,
    root_id: ItemId,
    current_path: String,
    selected: Vec<ItemId>,
    clipboard: Clipboard,
    next_id: u64,
}

impl FileSystemStore {
    /// Builds a store containing the root drive and the configured system
    /// folders.
    pub fn new(config: DriveConfig) -> Self {
        let mut store = Self {
            items: HashMap::new(),
            root_id: ItemId::new("fs-0"),
            current_path: config.drive_name.clone(),
            selected: Vec::new(),
            clipboard: Clipboard::default(),
            next_id: 0,
        };

        let root_id = store.mint_id();
        let now = platform_host::next_monotonic_ms();
        store.items.insert(
            root_id.clone(),
            FsItem::Folder(FolderItem {
                core: ItemCore {
                    id: root_id.clone(),
                    name: config.drive_name.clone(),
                    path: config.drive_name.clone(),
                    parent_id: None,
                    created_ms: now,
                    modified_ms: now,
                    protection: ProtectionLevel::System,
                },
                children: Vec::new(),
            }),
        );
        store.root_id = root_id.clone();

        for name in &config.system_folders {
            store.insert_folder(name, &root_id, ProtectionLevel::System);
        }
        store
    }

    fn mint_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId::new(format!("fs-{}", self.next_id))
    }

    // ---- read access -----------------------------------------------------

    /// Root drive id.
    pub fn root_id(&self) -> &ItemId {
        &self.root_id
    }

    /// The item arena.
    pub fn items(&self) -> &HashMap<ItemId, FsItem> {
        &self.items
    }

    /// Current navigation path.
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Current selection.
    pub fn selected_items(&self) -> &[ItemId] {
        &self.selected
    }

    /// Clipboard contents.
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Looks up an item by id.
    pub fn get_item(&self, id: &ItemId) -> Option<&FsItem> {
        self.items.get(id)
    }

    /// Looks up an item by its materialized path.
    pub fn get_item_by_path(&self, path: &str) -> Option<&FsItem> {
        self.items.values().find(|item| item.path() == path)
    }

    /// Ancestor chain from the root down to `id` (inclusive). Empty when the
    /// id is unknown.
    pub fn get_path_to_item(&self, id: &ItemId) -> Vec<ItemId> {
        let mut chain = Vec::new();
        let mut cursor = Some(id.clone());
        while let Some(current) = cursor {
            let Some(item) = self.items.get(&current) else {
                return Vec::new();
            };
            cursor = item.parent_id().cloned();
            chain.push(current);
        }
        chain.reverse();
        chain
    }

    /// Resolved children of a folder, in stored order. Empty for files and
    /// unknown ids.
    pub fn children_of(&self, id: &ItemId) -> Vec<&FsItem> {
        self.items
            .get(id)
            .and_then(FsItem::as_folder)
            .map(|folder| {
                folder
                    .children
                    .iter()
                    .filter_map(|child| self.items.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn folder(&self, id: &ItemId) -> Result<&FolderItem, FsError> {
        self.items
            .get(id)
            .ok_or(FsError::InvalidParent)?
            .as_folder()
            .ok_or(FsError::InvalidParent)
    }

    fn sibling_names(&self, parent: &FolderItem, kind: ItemKind, exclude: Option<&ItemId>) -> Vec<String> {
        parent
            .children
            .iter()
            .filter(|child| Some(*child) != exclude)
            .filter_map(|child| self.items.get(child))
            .filter(|item| item.kind() == kind)
            .map(|item| item.name().to_string())
            .collect()
    }

    // ---- creation --------------------------------------------------------

    /// Creates a folder under `parent_id`, auto-disambiguating the name.
    pub fn create_folder(&mut self, name: &str, parent_id: &ItemId) -> Result<ItemId, FsError> {
        let name = valid_name(name)?;
        if self.folder(parent_id).is_err() {
            log::warn!("create folder {name:?}: parent {parent_id} is not a folder");
            return Err(FsError::InvalidParent);
        }
        Ok(self.insert_folder(name, parent_id, ProtectionLevel::User))
    }

    /// Creates a file under `parent_id`. The extension is derived from the
    /// disambiguated name; `size` of `None` or zero falls back to the content
    /// length.
    pub fn create_file(
        &mut self,
        name: &str,
        parent_id: &ItemId,
        content: impl Into<String>,
        size: Option<u64>,
    ) -> Result<ItemId, FsError> {
        let name = valid_name(name)?;
        let parent = match self.folder(parent_id) {
            Ok(parent) => parent,
            Err(err) => {
                log::warn!("create file {name:?}: parent {parent_id} is not a folder");
                return Err(err);
            }
        };

        let siblings = self.sibling_names(parent, ItemKind::File, None);
        let unique = unique_child_name(name, true, siblings.iter().map(String::as_str));
        let extension = split_file_name(&unique)
            .1
            .map(str::to_lowercase)
            .unwrap_or_default();
        let path = join_path(&parent.core.path, &unique);

        let content = content.into();
        let size = match size {
            Some(bytes) if bytes > 0 => bytes,
            _ => content.len() as u64,
        };

        let id = self.mint_id();
        let now = platform_host::next_monotonic_ms();
        self.items.insert(
            id.clone(),
            FsItem::File(FileItem {
                core: ItemCore {
                    id: id.clone(),
                    name: unique,
                    path,
                    parent_id: Some(parent_id.clone()),
                    created_ms: now,
                    modified_ms: now,
                    protection: ProtectionLevel::User,
                },
                extension,
                content,
                size,
                original_file_name: None,
            }),
        );
        self.attach_child(parent_id, &id, now);
        Ok(id)
    }

    fn insert_folder(&mut self, name: &str, parent_id: &ItemId, protection: ProtectionLevel) -> ItemId {
        let (unique, path) = {
            let parent = self.folder(parent_id).expect("validated parent folder");
            let siblings = self.sibling_names(parent, ItemKind::Folder, None);
            let unique = unique_child_name(name, false, siblings.iter().map(String::as_str));
            let path = join_path(&parent.core.path, &unique);
            (unique, path)
        };

        let id = self.mint_id();
        let now = platform_host::next_monotonic_ms();
        self.items.insert(
            id.clone(),
            FsItem::Folder(FolderItem {
                core: ItemCore {
                    id: id.clone(),
                    name: unique,
                    path,
                    parent_id: Some(parent_id.clone()),
                    created_ms: now,
                    modified_ms: now,
                    protection,
                },
                children: Vec::new(),
            }),
        );
        self.attach_child(parent_id, &id, now);
        id
    }

    fn attach_child(&mut self, parent_id: &ItemId, child: &ItemId, now: u64) {
        if let Some(parent) = self.items.get_mut(parent_id).and_then(FsItem::as_folder_mut) {
            parent.children.push(child.clone());
            parent.core.modified_ms = now;
        }
    }

    // ---- deletion --------------------------------------------------------

    /// Deletes an item and, for folders, every descendant. Returns the ids
    /// removed so callers can clear dependent side tables (icon positions).
    pub fn delete_item(&mut self, id: &ItemId) -> Result<Vec<ItemId>, FsError> {
        let item = self.items.get(id).ok_or_else(|| {
            log::warn!("delete: unknown item {id}");
            FsError::UnknownId
        })?;
        if item.is_protected() {
            log::warn!("delete: {} is protected", item.path());
            return Err(FsError::ProtectedItem);
        }
        let parent_id = item.parent_id().cloned();

        let mut removed = Vec::new();
        self.collect_post_order(id, &mut removed);
        for doomed in &removed {
            self.items.remove(doomed);
        }

        let now = platform_host::next_monotonic_ms();
        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.items.get_mut(&parent_id).and_then(FsItem::as_folder_mut) {
                parent.children.retain(|child| child != id);
                parent.core.modified_ms = now;
            }
            if !self
                .items
                .values()
                .any(|item| item.path() == self.current_path)
            {
                // Navigation pointed into the deleted subtree; fall back to
                // the nearest surviving ancestor.
                if let Some(parent) = self.items.get(&parent_id) {
                    self.current_path = parent.path().to_string();
                }
            }
        }

        let removed_set: HashSet<&ItemId> = removed.iter().collect();
        self.selected.retain(|sel| !removed_set.contains(sel));
        self.clipboard.items.retain(|held| !removed_set.contains(held));
        if self.clipboard.items.is_empty() {
            self.clipboard.operation = None;
        }
        Ok(removed)
    }

    /// Deletes several items; per-item rejections are logged and skipped.
    /// Returns every id actually removed.
    pub fn delete_items(&mut self, ids: &[ItemId]) -> Vec<ItemId> {
        let mut removed = Vec::new();
        for id in ids {
            match self.delete_item(id) {
                Ok(ids) => removed.extend(ids),
                // Already-cascaded children show up as UnknownId here.
                Err(err) => log::debug!("delete {id}: {err}"),
            }
        }
        removed
    }

    fn collect_post_order(&self, id: &ItemId, out: &mut Vec<ItemId>) {
        if let Some(folder) = self.items.get(id).and_then(FsItem::as_folder) {
            for child in folder.children.clone() {
                self.collect_post_order(&child, out);
            }
        }
        out.push(id.clone());
    }

    // ---- rename ----------------------------------------------------------

    /// Renames an item, auto-disambiguating collisions with same-kind
    /// siblings. Returns the final (possibly suffixed) name.
    pub fn rename_item(&mut self, id: &ItemId, new_name: &str) -> Result<String, FsError> {
        let new_name = valid_name(new_name)?;
        let item = self.items.get(id).ok_or(FsError::UnknownId)?;
        if item.is_protected() {
            log::warn!("rename: {} is protected", item.path());
            return Err(FsError::ProtectedItem);
        }
        if item.name() == new_name {
            return Ok(new_name.to_string());
        }
        let kind = item.kind();
        let old_name = item.name().to_string();
        let parent_id = item
            .parent_id()
            .cloned()
            .ok_or(FsError::DanglingReference)?;

        let parent = self.folder(&parent_id).map_err(|_| FsError::DanglingReference)?;
        let parent_path = parent.core.path.clone();
        let siblings = self.sibling_names(parent, kind, Some(id));
        let final_name =
            unique_child_name(new_name, kind == ItemKind::File, siblings.iter().map(String::as_str));

        let now = platform_host::next_monotonic_ms();
        let item = self.items.get_mut(id).ok_or(FsError::UnknownId)?;
        if let Some(file) = item.as_file_mut() {
            if file.extension == "pdf" && file.original_file_name.is_none() {
                file.original_file_name = Some(old_name);
            }
            if let Some(ext) = split_file_name(&final_name).1 {
                file.extension = ext.to_lowercase();
            }
        }
        let core = item.core_mut();
        core.name = final_name.clone();
        core.modified_ms = now;
        self.recompute_subtree_paths(id, join_path(&parent_path, &final_name));
        Ok(final_name)
    }

    // ---- move ------------------------------------------------------------

    /// Moves an item into another folder. Unlike create/copy, a name conflict
    /// rejects the whole operation instead of auto-renaming.
    pub fn move_item(&mut self, id: &ItemId, target_folder_id: &ItemId) -> Result<(), FsError> {
        let item = self.items.get(id).ok_or(FsError::UnknownId)?;
        if item.is_protected() {
            log::warn!("move: {} is protected", item.path());
            return Err(FsError::ProtectedItem);
        }
        let name = item.name().to_string();
        let kind = item.kind();
        let old_parent_id = item.parent_id().cloned();

        let target = match self.folder(target_folder_id) {
            Ok(target) => target,
            Err(err) => {
                log::warn!("move {id}: target {target_folder_id} is not a folder");
                return Err(err);
            }
        };
        let target_path = target.core.path.clone();

        if old_parent_id.as_ref() == Some(target_folder_id) {
            return Ok(());
        }
        if self.is_in_subtree(target_folder_id, id) {
            log::warn!("move {id}: target {target_folder_id} is inside the moved subtree");
            return Err(FsError::CyclicMove);
        }
        let target = self.folder(target_folder_id)?;
        if self
            .sibling_names(target, kind, None)
            .iter()
            .any(|sibling| sibling == &name)
        {
            log::warn!("move {id}: {name:?} already exists in {target_path}");
            return Err(FsError::NameConflict);
        }

        let now = platform_host::next_monotonic_ms();
        if let Some(old_parent_id) = &old_parent_id {
            if let Some(parent) = self.items.get_mut(old_parent_id).and_then(FsItem::as_folder_mut) {
                parent.children.retain(|child| child != id);
                parent.core.modified_ms = now;
            }
        }
        self.attach_child(target_folder_id, id, now);
        let item = self.items.get_mut(id).ok_or(FsError::UnknownId)?;
        item.core_mut().parent_id = Some(target_folder_id.clone());
        item.core_mut().modified_ms = now;
        self.recompute_subtree_paths(id, join_path(&target_path, &name));
        Ok(())
    }

    /// Returns `true` when `candidate` is `ancestor` itself or lies inside
    /// its subtree.
    fn is_in_subtree(&self, candidate: &ItemId, ancestor: &ItemId) -> bool {
        let mut cursor = Some(candidate.clone());
        while let Some(current) = cursor {
            if &current == ancestor {
                return true;
            }
            cursor = self
                .items
                .get(&current)
                .and_then(|item| item.parent_id().cloned());
        }
        false
    }

    fn recompute_subtree_paths(&mut self, id: &ItemId, new_path: String) {
        let children = match self.items.get_mut(id) {
            Some(item) => {
                item.core_mut().path = new_path.clone();
                item.as_folder()
                    .map(|folder| folder.children.clone())
                    .unwrap_or_default()
            }
            None => return,
        };
        for child in children {
            let Some(name) = self.items.get(&child).map(|item| item.name().to_string()) else {
                log::warn!("path recompute: dangling child {child} under {new_path}");
                continue;
            };
            self.recompute_subtree_paths(&child, join_path(&new_path, &name));
        }
    }

    // ---- copy ------------------------------------------------------------

    /// Deep-copies an item (and, for folders, its whole subtree) into the
    /// target folder, assigning fresh ids throughout. The copy's name is
    /// auto-disambiguated like create. Returns the new root id.
    pub fn copy_item(&mut self, id: &ItemId, target_folder_id: &ItemId) -> Result<ItemId, FsError> {
        let source = self.items.get(id).ok_or(FsError::UnknownId)?;
        let desired = source.name().to_string();
        let kind = source.kind();

        let target = match self.folder(target_folder_id) {
            Ok(target) => target,
            Err(err) => {
                log::warn!("copy {id}: target {target_folder_id} is not a folder");
                return Err(err);
            }
        };
        let target_path = target.core.path.clone();
        let siblings = self.sibling_names(target, kind, None);
        let copy_name =
            unique_child_name(&desired, kind == ItemKind::File, siblings.iter().map(String::as_str));

        let now = platform_host::next_monotonic_ms();
        let mut next_id = self.next_id;
        let mut cloned = Vec::new();
        let new_root = self.clone_subtree(
            id,
            target_folder_id,
            &target_path,
            Some(copy_name),
            now,
            &mut next_id,
            &mut cloned,
        )?;
        self.next_id = next_id;
        for item in cloned {
            self.items.insert(item.id().clone(), item);
        }
        self.attach_child(target_folder_id, &new_root, now);
        Ok(new_root)
    }

    #[allow(clippy::too_many_arguments)]
    fn clone_subtree(
        &self,
        src_id: &ItemId,
        parent_id: &ItemId,
        parent_path: &str,
        name_override: Option<String>,
        now: u64,
        next_id: &mut u64,
        out: &mut Vec<FsItem>,
    ) -> Result<ItemId, FsError> {
        let source = self.items.get(src_id).ok_or(FsError::DanglingReference)?;
        *next_id += 1;
        let id = ItemId::new(format!("fs-{next_id}"));
        let name = name_override.unwrap_or_else(|| source.name().to_string());
        let core = ItemCore {
            id: id.clone(),
            name: name.clone(),
            path: join_path(parent_path, &name),
            parent_id: Some(parent_id.clone()),
            created_ms: now,
            modified_ms: now,
            // Copies of system items are ordinary items.
            protection: ProtectionLevel::User,
        };

        match source {
            FsItem::File(file) => out.push(FsItem::File(FileItem {
                core,
                extension: file.extension.clone(),
                content: file.content.clone(),
                size: file.size,
                original_file_name: file.original_file_name.clone(),
            })),
            FsItem::Folder(folder) => {
                let path = core.path.clone();
                let mut children = Vec::new();
                let slot = out.len();
                out.push(FsItem::Folder(FolderItem {
                    core,
                    children: Vec::new(),
                }));
                for child in &folder.children {
                    match self.clone_subtree(child, &id, &path, None, now, next_id, out) {
                        Ok(new_child) => children.push(new_child),
                        Err(err) => log::warn!("copy: skipping child {child}: {err}"),
                    }
                }
                if let Some(FsItem::Folder(placed)) = out.get_mut(slot) {
                    placed.children = children;
                }
            }
        }
        Ok(id)
    }

    // ---- clipboard -------------------------------------------------------

    /// Captures `ids` for a later copy-paste. Unknown ids are dropped.
    pub fn copy_items(&mut self, ids: &[ItemId]) {
        let held: Vec<ItemId> = ids
            .iter()
            .filter(|id| self.items.contains_key(*id))
            .cloned()
            .collect();
        self.clipboard = Clipboard {
            operation: (!held.is_empty()).then_some(ClipboardOp::Copy),
            items: held,
        };
    }

    /// Captures `ids` for a later cut-paste. Protected and unknown ids are
    /// dropped with a log line.
    pub fn cut_items(&mut self, ids: &[ItemId]) {
        let mut held = Vec::new();
        for id in ids {
            match self.items.get(id) {
                Some(item) if item.is_protected() => {
                    log::warn!("cut: {} is protected", item.path());
                }
                Some(_) => held.push(id.clone()),
                None => log::warn!("cut: unknown item {id}"),
            }
        }
        self.clipboard = Clipboard {
            operation: (!held.is_empty()).then_some(ClipboardOp::Cut),
            items: held,
        };
    }

    /// Applies the pending clipboard operation to `target_folder_id`.
    ///
    /// Copy-paste clones every held item (the clipboard survives for repeat
    /// pastes); cut-paste moves them and clears the clipboard. Per-item
    /// failures are logged and skipped. Returns the ids now present in the
    /// target.
    pub fn paste_items(&mut self, target_folder_id: &ItemId) -> Result<Vec<ItemId>, FsError> {
        self.folder(target_folder_id)?;
        let Some(operation) = self.clipboard.operation else {
            return Ok(Vec::new());
        };
        let held = self.clipboard.items.clone();

        let mut pasted = Vec::new();
        match operation {
            ClipboardOp::Copy => {
                for id in &held {
                    match self.copy_item(id, target_folder_id) {
                        Ok(new_id) => pasted.push(new_id),
                        Err(err) => log::warn!("paste copy {id}: {err}"),
                    }
                }
            }
            ClipboardOp::Cut => {
                for id in &held {
                    match self.move_item(id, target_folder_id) {
                        Ok(()) => pasted.push(id.clone()),
                        Err(err) => log::warn!("paste move {id}: {err}"),
                    }
                }
                self.clipboard = Clipboard::default();
            }
        }
        Ok(pasted)
    }

    // ---- navigation & selection -----------------------------------------

    /// Points navigation at a folder's path.
    pub fn navigate_to_folder(&mut self, id: &ItemId) -> Result<(), FsError> {
        match self.items.get(id) {
            Some(FsItem::Folder(folder)) => {
                self.current_path = folder.core.path.clone();
                Ok(())
            }
            Some(_) => {
                log::warn!("navigate: {id} is not a folder");
                Err(FsError::InvalidParent)
            }
            None => {
                log::warn!("navigate: unknown item {id}");
                Err(FsError::UnknownId)
            }
        }
    }

    /// Strips the last segment from the navigation path; no-op at the root.
    pub fn navigate_up(&mut self) {
        if let Some(parent) = parent_path(&self.current_path) {
            self.current_path = parent.to_string();
        }
    }

    /// Replaces the selection. Stale ids are harmless and pruned on delete.
    pub fn select_items(&mut self, ids: Vec<ItemId>) {
        self.selected = ids;
    }
}

fn valid_name(name: &str) -> Result<&str, FsError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FsError::InvalidName);
    }
    Ok(trimmed)
}
