//! Best-effort persistence of the window registry and icon positions.
//!
//! Both tables go through the `platform_host` key-value contract under fixed
//! key names. Loads tolerate anything — missing keys, decode failures, or a
//! newer schema — by logging and returning empty state, so a broken snapshot
//! can never wedge the desktop at boot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use platform_host::{
    build_envelope, decode_envelope, load_typed, save_typed, KeyValueStore, StateEnvelope,
    STATE_ENVELOPE_VERSION,
};
use virtual_fs::ItemId;

use crate::model::{CreateWindowOptions, Point, Size};
use crate::windows::WindowManagerStore;

/// Key-value key for the desktop icon position table.
pub const ICON_POSITIONS_KEY: &str = "deskfolio.desktop.icons.v1";
/// Key-value key for the window registry snapshot envelope.
pub const WINDOW_REGISTRY_KEY: &str = "deskfolio.desktop.windows.v1";
/// Envelope namespace of the window registry snapshot.
pub const WINDOW_REGISTRY_NAMESPACE: &str = "desktop.windows";
/// Schema version of [`WindowSnapshot`].
pub const WINDOW_REGISTRY_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Serializable projection of one open window.
///
/// The content payload is deliberately absent: hydration re-resolves it from
/// `base_id` through the app registry. For maximized windows `position`/`size`
/// hold the remembered restore geometry; re-maximizing against the current
/// viewport happens on hydrate.
pub struct WindowSnapshot {
    /// Instance id.
    pub id: String,
    /// App family id.
    pub base_id: String,
    /// Title-bar text.
    pub title: String,
    /// Minimized flag.
    pub minimized: bool,
    /// Maximized flag.
    pub maximized: bool,
    /// Restore position.
    pub position: Point,
    /// Restore size.
    pub size: Size,
    /// Stacking order at snapshot time; only the relative order is reused.
    pub z_index: u32,
}

/// Projects the open windows into serializable snapshots.
pub fn snapshot_windows(store: &WindowManagerStore) -> Vec<WindowSnapshot> {
    store
        .windows()
        .iter()
        .map(|window| {
            let (position, size) = match (window.maximized, window.restore_bounds) {
                (true, Some(bounds)) => bounds,
                _ => (window.position, window.size),
            };
            WindowSnapshot {
                id: window.id.as_str().to_string(),
                base_id: window.base_id.clone(),
                title: window.title.clone(),
                minimized: window.minimized,
                maximized: window.maximized,
                position,
                size,
                z_index: window.z_index,
            }
        })
        .collect()
}

/// Saves the window registry snapshot.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails; callers log
/// and carry on (best-effort durability).
pub async fn persist_window_registry<S: KeyValueStore + ?Sized>(
    store: &S,
    windows: &WindowManagerStore,
) -> Result<(), String> {
    let envelope = build_envelope(
        WINDOW_REGISTRY_NAMESPACE,
        WINDOW_REGISTRY_SCHEMA_VERSION,
        &snapshot_windows(windows),
    )?;
    save_typed(store, WINDOW_REGISTRY_KEY, &envelope).await
}

/// Loads the persisted window registry snapshot, or an empty list when
/// nothing usable is stored.
pub async fn load_window_registry<S: KeyValueStore + ?Sized>(store: &S) -> Vec<WindowSnapshot> {
    let envelope: StateEnvelope = match load_typed(store, WINDOW_REGISTRY_KEY).await {
        Ok(Some(envelope)) => envelope,
        Ok(None) => return Vec::new(),
        Err(err) => {
            log::warn!("window registry load failed: {err}");
            return Vec::new();
        }
    };
    if envelope.envelope_version != STATE_ENVELOPE_VERSION
        || envelope.namespace != WINDOW_REGISTRY_NAMESPACE
        || envelope.schema_version > WINDOW_REGISTRY_SCHEMA_VERSION
    {
        log::warn!(
            "window registry snapshot ignored: namespace {} schema {}",
            envelope.namespace,
            envelope.schema_version
        );
        return Vec::new();
    }
    match decode_envelope(&envelope) {
        Ok(snapshots) => snapshots,
        Err(err) => {
            log::warn!("window registry decode failed: {err}");
            Vec::new()
        }
    }
}

/// Re-opens persisted windows in their saved stacking order.
///
/// Each snapshot goes through the normal registration path: content is
/// rebuilt from the base id, fresh z-indices are issued in stored order, and
/// maximize/minimize flags replay through the regular transitions so the
/// restore bounds come out right. Undecodable or duplicate entries are
/// dropped with a log line.
pub fn hydrate_windows(windows: &mut WindowManagerStore, mut snapshots: Vec<WindowSnapshot>) {
    snapshots.sort_by_key(|snapshot| snapshot.z_index);
    for snapshot in snapshots {
        let mut options = CreateWindowOptions::new(snapshot.id.clone());
        options.base_id = Some(snapshot.base_id);
        options.title = Some(snapshot.title);
        options.position = Some(snapshot.position);
        options.size = Some(snapshot.size);
        let id = match windows.create_window(options) {
            Ok(id) => id,
            Err(err) => {
                log::warn!("hydrate window {}: {err}", snapshot.id);
                continue;
            }
        };
        if snapshot.maximized {
            let _ = windows.maximize_window(&id);
        }
        if snapshot.minimized {
            let _ = windows.minimize_window(&id);
        }
    }
}

/// Saves the icon position table.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn persist_icon_positions<S: KeyValueStore + ?Sized>(
    store: &S,
    positions: &HashMap<ItemId, Point>,
) -> Result<(), String> {
    save_typed(store, ICON_POSITIONS_KEY, positions).await
}

/// Loads the icon position table, or an empty table when nothing usable is
/// stored.
pub async fn load_icon_positions<S: KeyValueStore + ?Sized>(store: &S) -> HashMap<ItemId, Point> {
    match load_typed(store, ICON_POSITIONS_KEY).await {
        Ok(Some(positions)) => positions,
        Ok(None) => HashMap::new(),
        Err(err) => {
            log::warn!("icon position load failed: {err}");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    use crate::model::Viewport;

    use super::*;

    #[test]
    fn window_registry_round_trips_through_the_store() {
        let kv = MemoryKeyValueStore::default();
        let mut wm = WindowManagerStore::new(Viewport::default());
        let explorer = wm.open_window("explorer");
        let editor = wm.open_window("editor");
        wm.minimize_window(&explorer).expect("minimize");
        wm.maximize_window(&editor).expect("maximize");

        block_on(persist_window_registry(&kv, &wm)).expect("persist");
        let snapshots = block_on(load_window_registry(&kv));
        assert_eq!(snapshots.len(), 2);

        let mut hydrated = WindowManagerStore::new(Viewport::default());
        hydrate_windows(&mut hydrated, snapshots);

        let explorer = hydrated.get(&explorer).expect("explorer hydrated");
        assert!(explorer.minimized);
        let editor = hydrated.get(&editor).expect("editor hydrated");
        assert!(editor.maximized);
        assert!(editor.restore_bounds.is_some());
        assert_eq!(hydrated.active_window_id(), Some(&editor.id));
    }

    #[test]
    fn maximized_snapshots_store_restore_geometry() {
        let mut wm = WindowManagerStore::new(Viewport::default());
        let editor = wm.open_window("editor");
        let before = wm.get(&editor).map(|w| (w.position, w.size)).expect("window");
        wm.maximize_window(&editor).expect("maximize");

        let snapshots = snapshot_windows(&wm);
        assert_eq!((snapshots[0].position, snapshots[0].size), before);
        assert!(snapshots[0].maximized);
    }

    #[test]
    fn hydration_preserves_stacking_order() {
        let kv = MemoryKeyValueStore::default();
        let mut wm = WindowManagerStore::new(Viewport::default());
        let a = wm.open_window("editor");
        let b = wm.open_window("editor");
        wm.set_active_window(&a).expect("refocus a");

        block_on(persist_window_registry(&kv, &wm)).expect("persist");
        let mut hydrated = WindowManagerStore::new(Viewport::default());
        hydrate_windows(&mut hydrated, block_on(load_window_registry(&kv)));

        assert_eq!(hydrated.active_window_id(), Some(&a));
        let z_a = hydrated.get(&a).expect("a").z_index;
        let z_b = hydrated.get(&b).expect("b").z_index;
        assert!(z_a > z_b);
    }

    #[test]
    fn content_is_resolved_from_the_base_id_on_hydrate() {
        let kv = MemoryKeyValueStore::default();
        let mut wm = WindowManagerStore::new(Viewport::default());
        let viewer = wm.open_window("image-fs-42");

        block_on(persist_window_registry(&kv, &wm)).expect("persist");
        let mut hydrated = WindowManagerStore::new(Viewport::default());
        hydrate_windows(&mut hydrated, block_on(load_window_registry(&kv)));

        let window = hydrated.get(&viewer).expect("hydrated");
        assert_eq!(
            window.content,
            crate::model::WindowContent::ImageViewer {
                file_id: Some(ItemId::new("fs-42"))
            }
        );
    }

    #[test]
    fn foreign_or_future_envelopes_are_ignored() {
        let kv = MemoryKeyValueStore::default();
        let envelope = build_envelope("something.else", 1, &Vec::<WindowSnapshot>::new())
            .expect("build");
        block_on(save_typed(&kv, WINDOW_REGISTRY_KEY, &envelope)).expect("save");
        assert!(block_on(load_window_registry(&kv)).is_empty());

        let envelope = build_envelope(
            WINDOW_REGISTRY_NAMESPACE,
            WINDOW_REGISTRY_SCHEMA_VERSION + 1,
            &Vec::<WindowSnapshot>::new(),
        )
        .expect("build");
        block_on(save_typed(&kv, WINDOW_REGISTRY_KEY, &envelope)).expect("save");
        assert!(block_on(load_window_registry(&kv)).is_empty());
    }

    #[test]
    fn garbage_registry_payloads_load_as_empty() {
        let kv = MemoryKeyValueStore::default();
        block_on(kv.save_value(WINDOW_REGISTRY_KEY, "definitely not json")).expect("save");
        assert!(block_on(load_window_registry(&kv)).is_empty());
    }

    #[test]
    fn icon_positions_round_trip_and_default_to_empty() {
        let kv = MemoryKeyValueStore::default();
        assert!(block_on(load_icon_positions(&kv)).is_empty());

        let mut positions = HashMap::new();
        positions.insert(ItemId::new("fs-7"), Point { x: 20, y: 115 });
        block_on(persist_icon_positions(&kv, &positions)).expect("persist");

        assert_eq!(block_on(load_icon_positions(&kv)), positions);
    }
}
