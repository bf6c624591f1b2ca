//! Pure helpers for the drive-style virtual paths used by the file system.
//!
//! Paths are `\`-separated with a drive-name root (`C:\Desktop\Projects`).
//! Every item stores its materialized path, so these helpers never touch the
//! item arena; the store keeps paths in sync on mutation.

use serde::{Deserialize, Serialize};

/// Separator between path segments.
pub const SEPARATOR: char = '\\';

/// Joins a parent path and a child name.
pub fn join_path(parent: &str, name: &str) -> String {
    format!("{parent}{SEPARATOR}{name}")
}

/// Returns the parent portion of `path`, or `None` for a root path.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|idx| &path[..idx])
}

/// Returns the last segment of `path` (the item's own name).
pub fn leaf_name(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One segment of a path together with the cumulative path up to it.
pub struct Breadcrumb {
    /// Segment display name.
    pub name: String,
    /// Full path from the root through this segment.
    pub path: String,
}

/// Decomposes `path` into breadcrumbs, one per segment, each carrying the
/// cumulative path navigable by the explorer address bar.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = Vec::new();
    let mut cumulative = String::new();
    for segment in path.split(SEPARATOR) {
        if segment.is_empty() {
            continue;
        }
        if cumulative.is_empty() {
            cumulative.push_str(segment);
        } else {
            cumulative.push(SEPARATOR);
            cumulative.push_str(segment);
        }
        crumbs.push(Breadcrumb {
            name: segment.to_string(),
            path: cumulative.clone(),
        });
    }
    crumbs
}

/// Splits a file name into stem and extension at the last `.`.
///
/// Names without a dot, or with only a leading dot, have no extension.
pub fn split_file_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Picks a child name that does not collide with any name in `existing`
/// (the same-kind siblings of the prospective parent).
///
/// When `desired` is free it is returned unchanged. Otherwise the suffix
/// ` (n)` is inserted before the extension, with `n` one greater than the
/// highest suffix already present among `base`/`base (k)` siblings — a plain
/// `base` counts as suffix 0, and numbering gaps are never re-filled, so the
/// result is stable regardless of deletion history.
pub fn unique_child_name<'a, I>(desired: &str, is_file: bool, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let (stem, ext) = if is_file {
        split_file_name(desired)
    } else {
        (desired, None)
    };

    let mut desired_taken = false;
    let mut max_suffix: u32 = 0;
    for name in existing {
        if name == desired {
            desired_taken = true;
        }
        let (sibling_stem, sibling_ext) = if is_file {
            split_file_name(name)
        } else {
            (name, None)
        };
        if sibling_ext != ext {
            continue;
        }
        if sibling_stem == stem {
            max_suffix = max_suffix.max(0);
        } else if let Some(n) = parse_numbered_suffix(sibling_stem, stem) {
            max_suffix = max_suffix.max(n);
        }
    }

    if !desired_taken {
        return desired.to_string();
    }

    let next = max_suffix + 1;
    match ext {
        Some(ext) => format!("{stem} ({next}).{ext}"),
        None => format!("{stem} ({next})"),
    }
}

/// Parses `candidate` as `{base} (n)` and returns `n`.
fn parse_numbered_suffix(candidate: &str, base: &str) -> Option<u32> {
    let rest = candidate.strip_prefix(base)?;
    let digits = rest.strip_prefix(" (")?.strip_suffix(')')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn join_parent_and_leaf_are_inverses() {
        let joined = join_path("C:\\Desktop", "Projects");
        assert_eq!(joined, "C:\\Desktop\\Projects");
        assert_eq!(parent_path(&joined), Some("C:\\Desktop"));
        assert_eq!(leaf_name(&joined), "Projects");
        assert_eq!(parent_path("C:"), None);
    }

    #[test]
    fn breadcrumbs_accumulate_paths() {
        let crumbs = breadcrumbs("C:\\Desktop\\My Projects");
        assert_eq!(
            crumbs,
            vec![
                Breadcrumb {
                    name: "C:".to_string(),
                    path: "C:".to_string()
                },
                Breadcrumb {
                    name: "Desktop".to_string(),
                    path: "C:\\Desktop".to_string()
                },
                Breadcrumb {
                    name: "My Projects".to_string(),
                    path: "C:\\Desktop\\My Projects".to_string()
                },
            ]
        );
        assert!(breadcrumbs("").is_empty());
    }

    #[test]
    fn split_file_name_handles_dots() {
        assert_eq!(split_file_name("notes.txt"), ("notes", Some("txt")));
        assert_eq!(split_file_name("archive.tar.gz"), ("archive.tar", Some("gz")));
        assert_eq!(split_file_name("README"), ("README", None));
        assert_eq!(split_file_name(".gitignore"), (".gitignore", None));
        assert_eq!(split_file_name("trailing."), ("trailing.", None));
    }

    #[test]
    fn unique_name_returns_desired_when_free() {
        assert_eq!(
            unique_child_name("notes.txt", true, ["readme.md", "notes.md"]),
            "notes.txt"
        );
        // A numbering gap does not block the plain name.
        assert_eq!(
            unique_child_name("a.txt", true, ["a (1).txt", "a (3).txt"]),
            "a.txt"
        );
    }

    #[test]
    fn unique_name_appends_suffix_before_extension() {
        assert_eq!(unique_child_name("a.txt", true, ["a.txt"]), "a (1).txt");
        assert_eq!(
            unique_child_name("New Folder", false, ["New Folder"]),
            "New Folder (1)"
        );
    }

    #[test]
    fn unique_name_picks_max_suffix_plus_one_not_first_gap() {
        assert_eq!(
            unique_child_name("a.txt", true, ["a.txt", "a (1).txt", "a (5).txt"]),
            "a (6).txt"
        );
        assert_eq!(
            unique_child_name("pix", false, ["pix", "pix (2)"]),
            "pix (3)"
        );
    }

    #[test]
    fn unique_name_ignores_other_extensions_and_lookalikes() {
        assert_eq!(
            unique_child_name("a.txt", true, ["a.md", "a (1).md", "a (x).txt", "ab (2).txt"]),
            "a.txt"
        );
        assert_eq!(
            unique_child_name("a.txt", true, ["a.txt", "a (2).md"]),
            "a (1).txt"
        );
    }
}
