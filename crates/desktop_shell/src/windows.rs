//! The window manager store.
//!
//! A flat registry of open windows with explicit focus and stacking state.
//! `highest_z_index` only ever grows: every focus-granting operation issues
//! the next value, so the topmost window is always the most recently focused
//! one and no re-sort is ever needed.

use std::collections::HashMap;

use thiserror::Error;

use crate::apps::{self, InstancePolicy};
use crate::model::{CreateWindowOptions, Point, Size, Viewport, WindowId, WindowState};

/// Diagonal offset between cascading windows of the same family.
const CASCADE_OFFSET: i32 = 32;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Rejection reasons for window operations. State is untouched when one of
/// these is returned.
pub enum WindowError {
    /// The id does not name an open window.
    #[error("window not found")]
    WindowNotFound,
    /// A window with the requested id is already registered.
    #[error("window id already in use")]
    DuplicateWindow,
    /// The operation requires a visible window but the target is minimized.
    #[error("window is minimized")]
    WindowMinimized,
}

#[derive(Debug, Clone, PartialEq)]
/// Registry of open windows plus focus, stacking, and instance-counter state.
pub struct WindowManagerStore {
    windows: Vec<WindowState>,
    active_window_id: Option<WindowId>,
    highest_z_index: u32,
    instance_counters: HashMap<String, u32>,
    viewport: Viewport,
}

impl WindowManagerStore {
    /// Creates an empty store placing windows into `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            windows: Vec::new(),
            active_window_id: None,
            highest_z_index: 0,
            instance_counters: HashMap::new(),
            viewport,
        }
    }

    // ---- read access -----------------------------------------------------

    /// Open windows in creation order.
    pub fn windows(&self) -> &[WindowState] {
        &self.windows
    }

    /// Looks up an open window.
    pub fn get(&self, id: &WindowId) -> Option<&WindowState> {
        self.windows.iter().find(|window| &window.id == id)
    }

    /// Currently active (focused) window, if any.
    pub fn active_window_id(&self) -> Option<&WindowId> {
        self.active_window_id.as_ref()
    }

    /// Highest z-index issued so far.
    pub fn highest_z_index(&self) -> u32 {
        self.highest_z_index
    }

    /// Current placement viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the placement viewport (e.g. on browser resize). Existing
    /// window geometry is left alone.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn index_of(&self, id: &WindowId) -> Option<usize> {
        self.windows.iter().position(|window| &window.id == id)
    }

    fn next_z(&mut self) -> u32 {
        self.highest_z_index += 1;
        self.highest_z_index
    }

    fn focus_at(&mut self, index: usize) {
        let z = self.next_z();
        let window = &mut self.windows[index];
        window.z_index = z;
        self.active_window_id = Some(window.id.clone());
    }

    /// Hands the active slot to the topmost remaining non-minimized window,
    /// or clears it when none qualifies.
    fn promote_active(&mut self) {
        self.active_window_id = self
            .windows
            .iter()
            .filter(|window| !window.minimized)
            .max_by_key(|window| window.z_index)
            .map(|window| window.id.clone());
    }

    // ---- opening ---------------------------------------------------------

    /// Opens (or refocuses) a window for `base_id`.
    ///
    /// Resolution order: an already-open window with exactly this id is
    /// unminimized and refocused; a single-instance family reuses whatever
    /// window of that family is open; otherwise a fresh `{base}-{counter}`
    /// instance is registered (single-policy apps register under the base id
    /// itself, which is what makes the first rule key them directly).
    pub fn open_window(&mut self, base_id: &str) -> WindowId {
        let direct = WindowId::new(base_id);
        if let Some(index) = self.index_of(&direct) {
            self.windows[index].minimized = false;
            self.focus_at(index);
            return direct;
        }

        let descriptor = apps::descriptor_for(base_id);
        if descriptor.policy == InstancePolicy::SingleFamily {
            let family = apps::family_of(base_id);
            if let Some(index) = self
                .windows
                .iter()
                .position(|window| apps::family_of(&window.base_id) == family)
            {
                log::debug!(
                    "open {base_id}: reusing {} for single-instance family {family}",
                    self.windows[index].id
                );
                self.windows[index].minimized = false;
                self.focus_at(index);
                return self.windows[index].id.clone();
            }
        }

        let id = match descriptor.policy {
            InstancePolicy::Single => direct,
            InstancePolicy::Multi | InstancePolicy::SingleFamily => {
                let counter = self
                    .instance_counters
                    .entry(apps::family_of(base_id).to_string())
                    .or_insert(0);
                *counter += 1;
                WindowId::new(format!("{base_id}-{counter}"))
            }
        };

        let size = descriptor.default_size;
        let position = self.cascade_position(base_id, size);
        self.windows.push(WindowState {
            id: id.clone(),
            base_id: base_id.to_string(),
            title: descriptor.title.to_string(),
            minimized: false,
            maximized: false,
            position,
            size,
            restore_bounds: None,
            z_index: 0,
            content: apps::resolve_window_content(base_id),
        });
        self.focus_at(self.windows.len() - 1);
        id
    }

    /// Registers a window with explicit id/geometry/content (one-off dialogs,
    /// snapshot hydration). Applies the same z/focus bookkeeping as
    /// [`open_window`](Self::open_window).
    pub fn create_window(&mut self, options: CreateWindowOptions) -> Result<WindowId, WindowError> {
        let id = WindowId::new(options.id.clone());
        if self.index_of(&id).is_some() {
            log::warn!("create window: {id} already registered");
            return Err(WindowError::DuplicateWindow);
        }

        let base_id = options.base_id.unwrap_or_else(|| options.id.clone());
        let descriptor = apps::descriptor_for(&base_id);
        let size = options.size.unwrap_or(descriptor.default_size);
        let position = options
            .position
            .unwrap_or_else(|| centered(size, self.viewport));
        self.windows.push(WindowState {
            id: id.clone(),
            title: options
                .title
                .unwrap_or_else(|| descriptor.title.to_string()),
            content: options
                .content
                .unwrap_or_else(|| apps::resolve_window_content(&base_id)),
            base_id,
            minimized: false,
            maximized: false,
            position,
            size,
            restore_bounds: None,
            z_index: 0,
        });
        self.focus_at(self.windows.len() - 1);
        Ok(id)
    }

    /// Default placement: centered, cascaded diagonally off the most recently
    /// opened window of the same family, clamped back into the viewport.
    fn cascade_position(&self, base_id: &str, size: Size) -> Point {
        let family = apps::family_of(base_id);
        let sibling = self
            .windows
            .iter()
            .rev()
            .find(|window| apps::family_of(&window.base_id) == family);
        let position = match sibling {
            Some(sibling) => Point {
                x: sibling.position.x + CASCADE_OFFSET,
                y: sibling.position.y + CASCADE_OFFSET,
            },
            None => centered(size, self.viewport),
        };
        clamp_to_viewport(position, size, self.viewport)
    }

    // ---- lifecycle -------------------------------------------------------

    /// Closes a window. If it was active, the topmost remaining non-minimized
    /// window becomes active.
    pub fn close_window(&mut self, id: &WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::WindowNotFound)?;
        self.windows.remove(index);
        if self.active_window_id.as_ref() == Some(id) {
            self.promote_active();
        }
        Ok(())
    }

    /// Hides a window into the taskbar, promoting another window when the
    /// minimized one was active. The maximized flag is left alone so the
    /// window comes back full-size.
    pub fn minimize_window(&mut self, id: &WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::WindowNotFound)?;
        self.windows[index].minimized = true;
        if self.active_window_id.as_ref() == Some(id) {
            self.promote_active();
        }
        Ok(())
    }

    /// Brings a minimized window back and refocuses it.
    pub fn restore_window(&mut self, id: &WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::WindowNotFound)?;
        self.windows[index].minimized = false;
        self.focus_at(index);
        Ok(())
    }

    /// Maximizes a window to the viewport, remembering its geometry for
    /// [`unmaximize_window`](Self::unmaximize_window).
    pub fn maximize_window(&mut self, id: &WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::WindowNotFound)?;
        let viewport = self.viewport;
        let window = &mut self.windows[index];
        if !window.maximized {
            window.restore_bounds = Some((window.position, window.size));
        }
        window.position = Point::default();
        window.size = Size {
            w: viewport.w,
            h: viewport.h,
        };
        window.maximized = true;
        window.minimized = false;
        self.focus_at(index);
        Ok(())
    }

    /// Returns a maximized window to its remembered geometry. No focus
    /// change.
    pub fn unmaximize_window(&mut self, id: &WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::WindowNotFound)?;
        let window = &mut self.windows[index];
        if window.maximized {
            if let Some((position, size)) = window.restore_bounds.take() {
                window.position = position;
                window.size = size;
            }
            window.maximized = false;
        }
        Ok(())
    }

    /// Focuses a visible window (click-to-front). Minimized windows are
    /// refused; restore them instead.
    pub fn set_active_window(&mut self, id: &WindowId) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::WindowNotFound)?;
        if self.windows[index].minimized {
            log::debug!("activate {id}: window is minimized");
            return Err(WindowError::WindowMinimized);
        }
        self.focus_at(index);
        Ok(())
    }

    // ---- geometry --------------------------------------------------------

    /// Moves a window. No stacking side effects.
    pub fn update_window_position(
        &mut self,
        id: &WindowId,
        position: Point,
    ) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::WindowNotFound)?;
        self.windows[index].position = position;
        Ok(())
    }

    /// Resizes a window. No stacking side effects.
    pub fn update_window_size(&mut self, id: &WindowId, size: Size) -> Result<(), WindowError> {
        let index = self.index_of(id).ok_or(WindowError::WindowNotFound)?;
        self.windows[index].size = size;
        Ok(())
    }
}

fn centered(size: Size, viewport: Viewport) -> Point {
    Point {
        x: ((viewport.w - size.w) / 2).max(0),
        y: ((viewport.h - size.h) / 2).max(0),
    }
}

fn clamp_to_viewport(position: Point, size: Size, viewport: Viewport) -> Point {
    Point {
        x: position.x.clamp(0, (viewport.w - size.w).max(0)),
        y: position.y.clamp(0, (viewport.h - size.h).max(0)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store() -> WindowManagerStore {
        let _ = env_logger::builder().is_test(true).try_init();
        WindowManagerStore::new(Viewport::default())
    }

    /// The window with the highest z-index must be the most recently focused
    /// among non-minimized windows.
    fn assert_topmost(store: &WindowManagerStore, expected: &WindowId) {
        let topmost = store
            .windows()
            .iter()
            .filter(|w| !w.minimized)
            .max_by_key(|w| w.z_index)
            .map(|w| &w.id);
        assert_eq!(topmost, Some(expected));
        assert_eq!(store.active_window_id(), Some(expected));
    }

    #[test]
    fn explorer_lifecycle_keys_directly_and_refocuses() {
        let mut wm = store();

        let id = wm.open_window("explorer");
        assert_eq!(id, WindowId::new("explorer"));
        assert_eq!(wm.active_window_id(), Some(&id));

        wm.open_window("editor");
        wm.minimize_window(&id).expect("minimize");
        assert_ne!(wm.active_window_id(), Some(&id));

        wm.restore_window(&id).expect("restore");
        assert_topmost(&wm, &id);
        assert_eq!(wm.get(&id).expect("window").z_index, wm.highest_z_index());
    }

    #[test]
    fn reopening_a_single_instance_app_reuses_the_window() {
        let mut wm = store();
        let first = wm.open_window("explorer");
        wm.open_window("editor");
        let second = wm.open_window("explorer");

        assert_eq!(first, second);
        assert_eq!(
            wm.windows().iter().filter(|w| w.base_id == "explorer").count(),
            1
        );
        assert_topmost(&wm, &first);
    }

    #[test]
    fn multi_instance_apps_get_counter_ids() {
        let mut wm = store();
        let first = wm.open_window("editor");
        let second = wm.open_window("editor");

        assert_eq!(first, WindowId::new("editor-1"));
        assert_eq!(second, WindowId::new("editor-2"));
        assert!(wm.get(&first).is_some() && wm.get(&second).is_some());
    }

    #[test]
    fn instance_counters_never_reuse_ids_after_close() {
        let mut wm = store();
        let first = wm.open_window("editor");
        wm.close_window(&first).expect("close");
        let second = wm.open_window("editor");
        assert_eq!(second, WindowId::new("editor-2"));
    }

    #[test]
    fn single_instance_family_reuses_across_sub_ids() {
        let mut wm = store();
        let doom = wm.open_window("emulator-doom");
        let reused = wm.open_window("emulator-quake");

        assert_eq!(doom, reused);
        assert_eq!(
            wm.windows()
                .iter()
                .filter(|w| crate::apps::family_of(&w.base_id) == "emulator")
                .count(),
            1
        );
    }

    #[test]
    fn z_order_tracks_focus_across_lifecycle() {
        let mut wm = store();
        let a = wm.open_window("editor");
        let b = wm.open_window("editor");
        let c = wm.open_window("explorer");

        assert_topmost(&wm, &c);
        wm.set_active_window(&a).expect("focus a");
        assert_topmost(&wm, &a);
        wm.minimize_window(&a).expect("minimize a");
        assert_ne!(wm.active_window_id(), Some(&a));
        wm.restore_window(&a).expect("restore a");
        assert_topmost(&wm, &a);
        let _ = b;
    }

    #[test]
    fn closing_the_active_window_promotes_the_topmost_remaining() {
        let mut wm = store();
        let a = wm.open_window("editor");
        let b = wm.open_window("editor");
        let c = wm.open_window("explorer");

        wm.set_active_window(&b).expect("focus b");
        wm.close_window(&b).expect("close b");
        // c was focused after a, so it is the topmost survivor.
        assert_topmost(&wm, &c);

        wm.close_window(&c).expect("close c");
        assert_topmost(&wm, &a);
        wm.close_window(&a).expect("close a");
        assert_eq!(wm.active_window_id(), None);
    }

    #[test]
    fn minimizing_every_window_clears_the_active_slot() {
        let mut wm = store();
        let a = wm.open_window("editor");
        wm.minimize_window(&a).expect("minimize");
        assert_eq!(wm.active_window_id(), None);
    }

    #[test]
    fn second_sibling_cascades_then_clamps_at_the_edge() {
        let mut wm = store();
        let first = wm.open_window("editor");
        let second = wm.open_window("editor");

        let first_pos = wm.get(&first).expect("first").position;
        let second_pos = wm.get(&second).expect("second").position;
        assert_eq!(second_pos.x, first_pos.x + CASCADE_OFFSET);
        assert_eq!(second_pos.y, first_pos.y + CASCADE_OFFSET);

        // Keep opening until the cascade hits the viewport edge; placement
        // must stay fully on-screen.
        for _ in 0..30 {
            wm.open_window("editor");
        }
        let viewport = wm.viewport();
        for window in wm.windows() {
            assert!(window.position.x >= 0 && window.position.y >= 0);
            assert!(window.position.x + window.size.w <= viewport.w);
            assert!(window.position.y + window.size.h <= viewport.h);
        }
    }

    #[test]
    fn maximize_round_trip_restores_geometry() {
        let mut wm = store();
        let id = wm.open_window("editor");
        let before = wm.get(&id).map(|w| (w.position, w.size)).expect("window");

        wm.maximize_window(&id).expect("maximize");
        let maxed = wm.get(&id).expect("window");
        assert!(maxed.maximized);
        assert_eq!(maxed.position, Point::default());
        assert_eq!(maxed.size.w, wm.viewport().w);

        wm.maximize_window(&id).expect("re-maximize keeps snapshot");
        wm.unmaximize_window(&id).expect("unmaximize");
        let restored = wm.get(&id).expect("window");
        assert!(!restored.maximized);
        assert_eq!((restored.position, restored.size), before);
    }

    #[test]
    fn minimized_windows_stay_maximized_for_restore() {
        let mut wm = store();
        let id = wm.open_window("editor");
        wm.maximize_window(&id).expect("maximize");
        wm.minimize_window(&id).expect("minimize");

        let window = wm.get(&id).expect("window");
        assert!(window.minimized && window.maximized);

        wm.restore_window(&id).expect("restore");
        let window = wm.get(&id).expect("window");
        assert!(!window.minimized && window.maximized);
    }

    #[test]
    fn activating_a_minimized_window_is_refused() {
        let mut wm = store();
        let a = wm.open_window("editor");
        let b = wm.open_window("explorer");
        wm.minimize_window(&a).expect("minimize");

        assert_eq!(wm.set_active_window(&a), Err(WindowError::WindowMinimized));
        assert_eq!(wm.active_window_id(), Some(&b));
    }

    #[test]
    fn geometry_updates_do_not_touch_stacking() {
        let mut wm = store();
        let a = wm.open_window("editor");
        let b = wm.open_window("explorer");
        let z_before = wm.highest_z_index();

        wm.update_window_position(&a, Point { x: 5, y: 7 }).expect("move");
        wm.update_window_size(&a, Size { w: 300, h: 200 }).expect("resize");

        assert_eq!(wm.highest_z_index(), z_before);
        assert_eq!(wm.active_window_id(), Some(&b));
        let window = wm.get(&a).expect("window");
        assert_eq!(window.position, Point { x: 5, y: 7 });
        assert_eq!(window.size, Size { w: 300, h: 200 });
    }

    #[test]
    fn unknown_ids_are_rejected_without_side_effects() {
        let mut wm = store();
        wm.open_window("editor");
        let ghost = WindowId::new("ghost");
        let before = wm.clone();

        assert_eq!(wm.close_window(&ghost), Err(WindowError::WindowNotFound));
        assert_eq!(wm.minimize_window(&ghost), Err(WindowError::WindowNotFound));
        assert_eq!(wm.restore_window(&ghost), Err(WindowError::WindowNotFound));
        assert_eq!(wm.maximize_window(&ghost), Err(WindowError::WindowNotFound));
        assert_eq!(wm, before);
    }

    #[test]
    fn create_window_registers_dialogs_and_rejects_duplicates() {
        let mut wm = store();
        let mut options = CreateWindowOptions::new("dialog-about");
        options.title = Some("About".to_string());
        options.size = Some(Size { w: 320, h: 200 });
        let id = wm.create_window(options.clone()).expect("create");

        assert_eq!(wm.active_window_id(), Some(&id));
        let window = wm.get(&id).expect("window");
        assert_eq!(window.title, "About");
        assert_eq!(window.size, Size { w: 320, h: 200 });

        assert_eq!(wm.create_window(options), Err(WindowError::DuplicateWindow));
    }
}
