//! Window lifecycle, focus/z-order, geometry, and the in-place rename gate.
//!
//! Windows are kept in stacking order (bottom → top); a window's `z_index` is its 1-based
//! position. A separate focus history (most recent last) decides who receives focus when the
//! focused window closes or minimizes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DesktopConfig, WindowPlacementConfig};
use crate::entity_store::EntityStore;
use crate::error::{DesktopError, DesktopResult};
use crate::model::{
    EntityId, PointerPosition, WindowKey, WindowKind, WindowRecord, WindowRect, MIN_WINDOW_HEIGHT,
    MIN_WINDOW_WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Result of [`WindowManager::open`].
pub enum OpenOutcome {
    /// A new window was created and focused.
    Created,
    /// The window was already open and has been focused.
    Focused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDragSession {
    pub key: WindowKey,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pending in-place rename of a desktop icon or file node.
pub struct RenameSession {
    /// Entity being renamed.
    pub entity: EntityId,
    /// Name at the time editing started.
    pub original: String,
    /// Current edit text.
    pub draft: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of [`WindowManager::commit_rename`].
pub enum RenameOutcome {
    /// The store accepted the new name.
    Renamed {
        /// Renamed entity.
        entity: EntityId,
        /// Name as stored.
        name: String,
    },
    /// The draft was blank or unchanged; nothing was written.
    Unchanged(EntityId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowManager {
    windows: Vec<WindowRecord>,
    focus_history: Vec<WindowKey>,
    workspace: WindowRect,
    placement: WindowPlacementConfig,
    dragging: Option<WindowDragSession>,
    rename: Option<RenameSession>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(&DesktopConfig::default())
    }
}

impl WindowManager {
    pub fn new(config: &DesktopConfig) -> Self {
        Self {
            windows: Vec::new(),
            focus_history: Vec::new(),
            workspace: config.workspace.maximized_rect(),
            placement: config.windows.clone(),
            dragging: None,
            rename: None,
        }
    }

    /// Open windows in stacking order, bottom first.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn get(&self, key: &WindowKey) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.key == key)
    }

    pub fn is_open(&self, key: &WindowKey) -> bool {
        self.get(key).is_some()
    }

    pub fn focused(&self) -> Option<&WindowKey> {
        self.windows.iter().find(|w| w.is_focused).map(|w| &w.key)
    }

    /// Geometry used for maximized windows.
    pub fn workspace(&self) -> WindowRect {
        self.workspace
    }

    pub fn dragging(&self) -> Option<&WindowDragSession> {
        self.dragging.as_ref()
    }

    pub fn rename_session(&self) -> Option<&RenameSession> {
        self.rename.as_ref()
    }

    /// Opens a window for `(kind, entity)`, or focuses it when already open.
    ///
    /// New windows cascade from the kind's default origin by the number of open windows of the
    /// same kind. `name` becomes the title; unbound panels fall back to their panel title.
    ///
    /// # Errors
    ///
    /// [`DesktopError::InvalidInput`] when an entity-bound kind has no entity or a panel kind
    /// has one.
    pub fn open(
        &mut self,
        kind: WindowKind,
        entity: Option<EntityId>,
        name: &str,
    ) -> DesktopResult<OpenOutcome> {
        if kind.is_entity_bound() != entity.is_some() {
            return Err(DesktopError::InvalidInput(format!(
                "{} windows {} bound to an entity",
                kind.token(),
                if kind.is_entity_bound() { "must be" } else { "cannot be" }
            )));
        }

        let key = WindowKey::new(kind, entity);
        if self.is_open(&key) {
            self.raise_and_focus(&key);
            return Ok(OpenOutcome::Focused);
        }

        let same_kind = self.windows.iter().filter(|w| w.key.kind == kind).count() as u32;
        let slot = (same_kind % self.placement.cascade_slots.max(1)) as i32;
        let offset = slot.saturating_mul(self.placement.cascade_step);
        let rect = kind
            .default_rect()
            .offset(offset, offset)
            .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
        let title = match name.trim() {
            "" => kind.panel_title().to_string(),
            trimmed => trimmed.to_string(),
        };

        debug!(window = %key, x = rect.x, y = rect.y, "window opened");
        self.windows.push(WindowRecord {
            key: key.clone(),
            title,
            rect,
            restore_rect: None,
            z_index: 0,
            is_focused: false,
            minimized: false,
            maximized: false,
        });
        self.raise_and_focus(&key);
        Ok(OpenOutcome::Created)
    }

    /// Closes a window. Focus falls back to the most recently focused remaining window.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn close(&mut self, key: &WindowKey) -> DesktopResult<WindowRecord> {
        let index = self.index_of(key)?;
        let record = self.windows.remove(index);
        self.focus_history.retain(|k| k != key);
        if self.dragging.as_ref().map(|d| &d.key) == Some(key) {
            self.dragging = None;
        }
        debug!(window = %key, "window closed");
        self.normalize();
        Ok(record)
    }

    /// Closes every window bound to `entity`, returning their keys.
    pub fn close_for_entity(&mut self, entity: &EntityId) -> Vec<WindowKey> {
        let keys: Vec<WindowKey> = self
            .windows
            .iter()
            .filter(|w| w.key.entity.as_ref() == Some(entity))
            .map(|w| w.key.clone())
            .collect();
        if keys.is_empty() {
            return keys;
        }
        let bound = |key: &WindowKey| key.entity.as_ref() == Some(entity);
        self.windows.retain(|w| !bound(&w.key));
        self.focus_history.retain(|k| !bound(k));
        if self.dragging.as_ref().is_some_and(|d| bound(&d.key)) {
            self.dragging = None;
        }
        debug!(entity = %entity, closed = keys.len(), "entity windows closed");
        self.normalize();
        keys
    }

    /// Raises and focuses a window. Returns `false` when it was already the focused top window.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn focus(&mut self, key: &WindowKey) -> DesktopResult<bool> {
        let index = self.index_of(key)?;
        let already_focused_top = index + 1 == self.windows.len()
            && self
                .windows
                .get(index)
                .map(|w| w.is_focused && !w.minimized)
                .unwrap_or(false);
        if already_focused_top {
            return Ok(false);
        }
        self.raise_and_focus(key);
        Ok(true)
    }

    /// Offsets a floating window. Returns `false` when ignored because it is maximized.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn move_by(&mut self, key: &WindowKey, dx: i32, dy: i32) -> DesktopResult<bool> {
        let window = self.find_mut(key)?;
        if window.maximized {
            return Ok(false);
        }
        window.rect = window.rect.offset(dx, dy);
        Ok(true)
    }

    /// Swaps between floating geometry and the workspace rect. Returns the new maximized state.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn toggle_maximize(&mut self, key: &WindowKey) -> DesktopResult<bool> {
        let workspace = self.workspace;
        let window = self.find_mut(key)?;
        if window.maximized {
            window.rect = window.restore_rect.take().unwrap_or(window.rect);
            window.maximized = false;
        } else {
            window.restore_rect = Some(window.rect);
            window.rect = workspace;
            window.maximized = true;
        }
        let maximized = window.maximized;
        self.raise_and_focus(key);
        Ok(maximized)
    }

    /// Hides a window to the taskbar; focus falls back through the focus history.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn minimize(&mut self, key: &WindowKey) -> DesktopResult<()> {
        let window = self.find_mut(key)?;
        window.minimized = true;
        window.is_focused = false;
        if self.dragging.as_ref().map(|d| &d.key) == Some(key) {
            self.dragging = None;
        }
        self.normalize();
        Ok(())
    }

    /// Shows a minimized window again and focuses it.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn restore(&mut self, key: &WindowKey) -> DesktopResult<()> {
        self.index_of(key)?;
        self.raise_and_focus(key);
        Ok(())
    }

    /// Taskbar button behavior: restore if minimized, minimize if focused, focus otherwise.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn toggle_taskbar(&mut self, key: &WindowKey) -> DesktopResult<()> {
        let (minimized, focused) = self
            .get(key)
            .map(|w| (w.minimized, w.is_focused))
            .ok_or_else(|| DesktopError::WindowNotFound(key.clone()))?;
        if minimized {
            self.restore(key)
        } else if focused {
            self.minimize(key)
        } else {
            self.focus(key).map(|_| ())
        }
    }

    /// Replaces the maximized geometry and re-fits windows that are currently maximized.
    pub fn set_workspace(&mut self, workspace: WindowRect) {
        self.workspace = workspace;
        for window in self.windows.iter_mut().filter(|w| w.maximized) {
            window.rect = workspace;
        }
    }

    /// Starts a title-bar drag and focuses the window.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn begin_window_drag(&mut self, key: &WindowKey, pointer: PointerPosition) -> DesktopResult<()> {
        let rect_start = self.find_mut(key)?.rect;
        self.raise_and_focus(key);
        self.dragging = Some(WindowDragSession {
            key: key.clone(),
            pointer_start: pointer,
            rect_start,
        });
        Ok(())
    }

    /// Moves the dragged window to follow `pointer`. Returns `false` when the window is maximized.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without a drag in progress.
    pub fn update_window_drag(&mut self, pointer: PointerPosition) -> DesktopResult<bool> {
        let session = self
            .dragging
            .clone()
            .ok_or(DesktopError::NoActiveSession("window drag"))?;
        let dx = pointer.x.saturating_sub(session.pointer_start.x);
        let dy = pointer.y.saturating_sub(session.pointer_start.y);
        let window = self.find_mut(&session.key)?;
        if window.maximized {
            return Ok(false);
        }
        window.rect = session.rect_start.offset(dx, dy);
        Ok(true)
    }

    /// Ends the title-bar drag, returning the window that was being dragged.
    pub fn end_window_drag(&mut self) -> Option<WindowKey> {
        self.dragging.take().map(|session| session.key)
    }

    /// Opens the rename gate for `entity`, replacing any rename already in progress.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when the entity does not exist.
    pub fn start_rename(&mut self, store: &EntityStore, entity: &EntityId) -> DesktopResult<()> {
        let current = store
            .get(entity)
            .ok_or_else(|| DesktopError::EntityNotFound(entity.clone()))?;
        self.rename = Some(RenameSession {
            entity: entity.clone(),
            original: current.name.clone(),
            draft: current.name.clone(),
        });
        Ok(())
    }

    /// Replaces the draft text of the active rename.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] when no rename is in progress.
    pub fn update_rename(&mut self, draft: impl Into<String>) -> DesktopResult<()> {
        let session = self
            .rename
            .as_mut()
            .ok_or(DesktopError::NoActiveSession("rename"))?;
        session.draft = draft.into();
        Ok(())
    }

    /// Writes the draft through [`EntityStore::rename`] and retitles bound windows.
    ///
    /// A blank or unchanged draft closes the gate without touching the store. When the store
    /// rejects the name the gate stays open so the user can keep editing.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without an active rename, or the store's error.
    pub fn commit_rename(&mut self, store: &mut EntityStore) -> DesktopResult<RenameOutcome> {
        let session = self
            .rename
            .take()
            .ok_or(DesktopError::NoActiveSession("rename"))?;
        let draft = session.draft.trim();
        if draft.is_empty() || draft == session.original {
            return Ok(RenameOutcome::Unchanged(session.entity));
        }
        if let Err(err) = store.rename(&session.entity, draft) {
            self.rename = Some(session);
            return Err(err);
        }
        let name = store
            .get(&session.entity)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| draft.to_string());
        self.retitle_entity_windows(&session.entity, &name);
        Ok(RenameOutcome::Renamed {
            entity: session.entity,
            name,
        })
    }

    /// Closes the rename gate without touching the store.
    pub fn cancel_rename(&mut self) -> Option<RenameSession> {
        self.rename.take()
    }

    /// Sets the title of every window bound to `entity`.
    pub fn retitle_entity_windows(&mut self, entity: &EntityId, title: &str) {
        for window in self
            .windows
            .iter_mut()
            .filter(|w| w.key.entity.as_ref() == Some(entity))
        {
            window.title = title.to_string();
        }
    }

    fn index_of(&self, key: &WindowKey) -> DesktopResult<usize> {
        self.windows
            .iter()
            .position(|w| &w.key == key)
            .ok_or_else(|| DesktopError::WindowNotFound(key.clone()))
    }

    fn find_mut(&mut self, key: &WindowKey) -> DesktopResult<&mut WindowRecord> {
        self.windows
            .iter_mut()
            .find(|w| &w.key == key)
            .ok_or_else(|| DesktopError::WindowNotFound(key.clone()))
    }

    fn raise_and_focus(&mut self, key: &WindowKey) {
        let Some(index) = self.windows.iter().position(|w| &w.key == key) else {
            return;
        };
        for window in &mut self.windows {
            window.is_focused = false;
        }
        let mut window = self.windows.remove(index);
        window.is_focused = true;
        window.minimized = false;
        self.windows.push(window);

        self.focus_history.retain(|k| k != key);
        self.focus_history.push(key.clone());
        self.normalize();
    }

    /// Re-derives z-indices and guarantees a single focused, visible window when any exists.
    fn normalize(&mut self) {
        let mut has_focused = false;
        for (idx, window) in self.windows.iter_mut().enumerate() {
            window.z_index = (idx + 1) as u32;
            if window.minimized {
                window.is_focused = false;
            }
            if window.is_focused {
                if has_focused {
                    window.is_focused = false;
                } else {
                    has_focused = true;
                }
            }
        }
        if has_focused {
            return;
        }

        let fallback = self
            .focus_history
            .iter()
            .rev()
            .find(|k| self.windows.iter().any(|w| &w.key == *k && !w.minimized))
            .cloned()
            .or_else(|| {
                self.windows
                    .iter()
                    .rev()
                    .find(|w| !w.minimized)
                    .map(|w| w.key.clone())
            });
        if let Some(key) = fallback {
            self.raise_and_focus(&key);
        }
    }
}
