//! Item model: the tagged File/Folder union stored in the arena.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque item identifier, stable for the item's lifetime and never reused.
pub struct ItemId(pub String);

impl ItemId {
    /// Wraps a raw id string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Discriminant for the two item variants. Sibling-name uniqueness is scoped
/// per kind: a folder and a file may share a name in the same parent.
pub enum ItemKind {
    /// Folder variant.
    Folder,
    /// File variant.
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Protection attribute carried on the item itself.
pub enum ProtectionLevel {
    /// Ordinary user item, all operations allowed.
    #[default]
    User,
    /// System item: rename, delete, cut, and move are refused; open and copy
    /// remain allowed.
    System,
}

impl ProtectionLevel {
    /// Returns `true` when destructive operations must be refused.
    pub fn is_protected(self) -> bool {
        matches!(self, Self::System)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Fields shared by both item variants.
pub struct ItemCore {
    /// Stable identifier.
    pub id: ItemId,
    /// Display name, unique among same-kind siblings.
    pub name: String,
    /// Fully materialized path (`C:\Desktop\Projects`), kept in sync with the
    /// ancestor chain on every move/rename.
    pub path: String,
    /// Owning parent folder; `None` only for the drive root.
    pub parent_id: Option<ItemId>,
    /// Creation time in unix milliseconds.
    pub created_ms: u64,
    /// Last change (content, membership, or name) in unix milliseconds.
    pub modified_ms: u64,
    /// Protection attribute.
    pub protection: ProtectionLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Folder item with an insertion-ordered child list.
pub struct FolderItem {
    /// Shared fields.
    #[serde(flatten)]
    pub core: ItemCore,
    /// Child item ids. Order is not semantically meaningful but preserved for
    /// UI stability.
    pub children: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// File item with content payload.
pub struct FileItem {
    /// Shared fields.
    #[serde(flatten)]
    pub core: ItemCore,
    /// Lowercased extension derived from the name (empty when none).
    pub extension: String,
    /// Opaque content payload.
    pub content: String,
    /// Size in bytes.
    pub size: u64,
    /// Name the file carried before its first rename. Recorded for PDFs only,
    /// where the viewer displays the original document title.
    pub original_file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// A node in the virtual file system tree.
pub enum FsItem {
    /// Folder node.
    Folder(FolderItem),
    /// File node.
    File(FileItem),
}

impl FsItem {
    /// Shared fields of either variant.
    pub fn core(&self) -> &ItemCore {
        match self {
            Self::Folder(folder) => &folder.core,
            Self::File(file) => &file.core,
        }
    }

    /// Mutable shared fields of either variant.
    pub fn core_mut(&mut self) -> &mut ItemCore {
        match self {
            Self::Folder(folder) => &mut folder.core,
            Self::File(file) => &mut file.core,
        }
    }

    /// Item id.
    pub fn id(&self) -> &ItemId {
        &self.core().id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.core().name
    }

    /// Materialized path.
    pub fn path(&self) -> &str {
        &self.core().path
    }

    /// Owning parent id (`None` only for the root).
    pub fn parent_id(&self) -> Option<&ItemId> {
        self.core().parent_id.as_ref()
    }

    /// Variant discriminant.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Folder(_) => ItemKind::Folder,
            Self::File(_) => ItemKind::File,
        }
    }

    /// Returns `true` when destructive operations must be refused.
    pub fn is_protected(&self) -> bool {
        self.core().protection.is_protected()
    }

    /// Folder view of this item.
    pub fn as_folder(&self) -> Option<&FolderItem> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    /// Mutable folder view of this item.
    pub fn as_folder_mut(&mut self) -> Option<&mut FolderItem> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }

    /// File view of this item.
    pub fn as_file(&self) -> Option<&FileItem> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    /// Mutable file view of this item.
    pub fn as_file_mut(&mut self) -> Option<&mut FileItem> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn sample_file() -> FsItem {
        FsItem::File(FileItem {
            core: ItemCore {
                id: ItemId::new("fs-9"),
                name: "resume.pdf".to_string(),
                path: "C:\\Desktop\\resume.pdf".to_string(),
                parent_id: Some(ItemId::new("fs-1")),
                created_ms: 100,
                modified_ms: 200,
                protection: ProtectionLevel::User,
            },
            extension: "pdf".to_string(),
            content: String::new(),
            size: 0,
            original_file_name: None,
        })
    }

    #[test]
    fn item_serde_uses_kind_tag_and_kebab_case() {
        let value = serde_json::to_value(sample_file()).expect("serialize");
        assert_eq!(value["kind"], json!("file"));
        assert_eq!(value["id"], json!("fs-9"));
        assert_eq!(value["extension"], json!("pdf"));

        let round_trip: FsItem = serde_json::from_value(value).expect("deserialize");
        assert_eq!(round_trip.kind(), ItemKind::File);
        assert_eq!(round_trip.name(), "resume.pdf");
    }

    #[test]
    fn protection_gates_only_system_items() {
        assert!(!ProtectionLevel::User.is_protected());
        assert!(ProtectionLevel::System.is_protected());
        assert!(!sample_file().is_protected());
    }

    #[test]
    fn variant_views_match_kind() {
        let file = sample_file();
        assert!(file.as_file().is_some());
        assert!(file.as_folder().is_none());
        assert_eq!(file.parent_id(), Some(&ItemId::new("fs-1")));
    }
}
