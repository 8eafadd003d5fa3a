//! Explicitly owned desktop session tying the subsystems together.
//!
//! Every cross-cutting rule lives here: editor windows own an edit buffer, removing an entity
//! closes what was bound to it, opening a window dismisses the start menu, and clicks resolve into
//! selection or activation.

use std::collections::HashMap;

use tracing::debug;

use crate::click::{ClickResolution, ClickTracker};
use crate::config::DesktopConfig;
use crate::drag_drop::{DragDropCoordinator, DropOutcome, DropTarget};
use crate::edit_buffer::EditBuffer;
use crate::entity_store::{DeletePolicy, EntityStore, RemovalReport};
use crate::error::{DesktopError, DesktopResult};
use crate::model::{Entity, EntityId, EntityKind, PointerPosition, WindowKey, WindowKind, WindowRect};
use crate::theme::{SystemSettings, ThemeState};
use crate::window_manager::{OpenOutcome, RenameOutcome, WindowManager};

/// Name given to folders created from the desktop context menu.
pub const DEFAULT_FOLDER_NAME: &str = "My Folder.dir";
/// Name given to text files created from the desktop context menu.
pub const DEFAULT_TEXT_FILE_NAME: &str = "New File.txt";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Everything torn down by [`DesktopSession::remove_entity`].
pub struct RemovalOutcome {
    /// Store-level effect of the removal.
    pub report: RemovalReport,
    /// Windows closed because their entity was removed.
    pub closed_windows: Vec<WindowKey>,
    /// Buffers dropped while they still had unsaved edits.
    pub discarded_edits: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side effects of closing a window.
pub struct ClosedWindow {
    pub key: WindowKey,
    /// Set when a text editor was closed with unsaved edits.
    pub discarded_edits: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// What a click (or a click-timer poll) resolved into.
pub struct ClickReport {
    /// The resolved click, if the state machine produced one.
    pub resolution: Option<ClickResolution>,
    /// Window opened or focused by a double click.
    pub opened: Option<WindowKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopSession {
    config: DesktopConfig,
    store: EntityStore,
    windows: WindowManager,
    drag_drop: DragDropCoordinator,
    buffers: HashMap<EntityId, EditBuffer>,
    clicks: ClickTracker,
    theme: ThemeState,
    settings: SystemSettings,
    selected: Option<EntityId>,
    start_menu_open: bool,
}

impl Default for DesktopSession {
    fn default() -> Self {
        Self::new(DesktopConfig::default())
    }
}

impl DesktopSession {
    pub fn new(config: DesktopConfig) -> Self {
        let settings = SystemSettings {
            double_click_speed: config.input.double_click_speed,
            ..SystemSettings::default()
        };
        Self {
            store: EntityStore::with_delete_policy(config.entities.delete_policy),
            windows: WindowManager::new(&config),
            drag_drop: DragDropCoordinator::new(),
            buffers: HashMap::new(),
            clicks: ClickTracker::new(settings.double_click_speed),
            theme: ThemeState::default(),
            settings,
            selected: None,
            start_menu_open: false,
            config,
        }
    }

    /// Builds a session and seeds it with `entities`, parents first.
    ///
    /// # Errors
    ///
    /// The first [`EntityStore::create`] failure.
    pub fn with_entities(
        config: DesktopConfig,
        entities: impl IntoIterator<Item = Entity>,
    ) -> DesktopResult<Self> {
        let mut session = Self::new(config);
        for entity in entities {
            session.store.create(entity)?;
        }
        Ok(session)
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn drag_drop(&self) -> &DragDropCoordinator {
        &self.drag_drop
    }

    pub fn buffer(&self, entity: &EntityId) -> Option<&EditBuffer> {
        self.buffers.get(entity)
    }

    pub fn has_unsaved_edits(&self) -> bool {
        self.buffers.values().any(EditBuffer::is_dirty)
    }

    pub fn clicks(&self) -> &ClickTracker {
        &self.clicks
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeState {
        &mut self.theme
    }

    pub fn settings(&self) -> SystemSettings {
        self.settings
    }

    pub fn selected(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    pub fn start_menu_open(&self) -> bool {
        self.start_menu_open
    }

    /// Replaces the system settings; the click tracker picks up the new speed.
    pub fn set_settings(&mut self, settings: SystemSettings) {
        self.clicks.set_speed(settings.double_click_speed);
        self.settings = settings;
    }

    pub fn set_delete_policy(&mut self, policy: DeletePolicy) {
        self.config.entities.delete_policy = policy;
        self.store.set_delete_policy(policy);
    }

    pub fn set_workspace(&mut self, workspace: WindowRect) {
        self.windows.set_workspace(workspace);
    }

    // Entities

    /// # Errors
    ///
    /// See [`EntityStore::create`].
    pub fn create_entity(&mut self, entity: Entity) -> DesktopResult<EntityId> {
        Ok(self.store.create(entity)?.id.clone())
    }

    /// Creates an empty folder with the default name under `parent`.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::create`].
    pub fn create_folder(&mut self, parent: Option<&EntityId>) -> DesktopResult<EntityId> {
        self.create_under(
            Entity::folder(EntityId::generate(), DEFAULT_FOLDER_NAME),
            parent,
        )
    }

    /// Creates an empty text file with the default name under `parent`.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::create`].
    pub fn create_text_file(&mut self, parent: Option<&EntityId>) -> DesktopResult<EntityId> {
        self.create_under(
            Entity::text(EntityId::generate(), DEFAULT_TEXT_FILE_NAME, ""),
            parent,
        )
    }

    fn create_under(&mut self, mut entity: Entity, parent: Option<&EntityId>) -> DesktopResult<EntityId> {
        entity.parent = parent.cloned();
        self.create_entity(entity)
    }

    /// Renames an entity directly and retitles its windows.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::rename`].
    pub fn rename_entity(&mut self, id: &EntityId, name: &str) -> DesktopResult<()> {
        self.store.rename(id, name)?;
        self.refresh_entity_titles(id);
        Ok(())
    }

    /// # Errors
    ///
    /// See [`EntityStore::move_entity`].
    pub fn move_entity(&mut self, id: &EntityId, new_parent: Option<&EntityId>) -> DesktopResult<()> {
        self.store.move_entity(id, new_parent)
    }

    /// Removes an entity and tears down windows, buffers, selection, and drags bound to
    /// whatever the store deleted.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when `id` is unknown.
    pub fn remove_entity(&mut self, id: &EntityId) -> DesktopResult<RemovalOutcome> {
        let report = self.store.remove(id)?;
        let mut outcome = RemovalOutcome::default();
        for removed in &report.removed {
            outcome
                .closed_windows
                .extend(self.windows.close_for_entity(removed));
            if let Some(buffer) = self.buffers.remove(removed) {
                if buffer.is_dirty() {
                    outcome.discarded_edits.push(removed.clone());
                }
            }
            if self.selected.as_ref() == Some(removed) {
                self.selected = None;
            }
            if self
                .windows
                .rename_session()
                .map(|rename| &rename.entity == removed)
                .unwrap_or(false)
            {
                self.windows.cancel_rename();
            }
            if self
                .drag_drop
                .session()
                .map(|drag| &drag.source == removed)
                .unwrap_or(false)
            {
                self.drag_drop.cancel();
            }
        }
        outcome.report = report;
        Ok(outcome)
    }

    // Windows

    /// Opens the window that presents `id`: a folder browser or a text editor with a fresh buffer.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`], or [`DesktopError::InvalidType`] for entities with no
    /// window of their own.
    pub fn open_entity(&mut self, id: &EntityId) -> DesktopResult<WindowKey> {
        let entity = self
            .store
            .get(id)
            .ok_or_else(|| DesktopError::EntityNotFound(id.clone()))?;
        let kind = match entity.kind {
            EntityKind::Folder => WindowKind::Folder,
            EntityKind::Text => WindowKind::TextEditor,
            actual => {
                return Err(DesktopError::InvalidType {
                    id: id.clone(),
                    actual,
                })
            }
        };
        let title = entity.name.clone();

        if kind == WindowKind::TextEditor && !self.buffers.contains_key(id) {
            let buffer = EditBuffer::load(&self.store, id)?;
            self.buffers.insert(id.clone(), buffer);
        }
        self.windows.open(kind, Some(id.clone()), &title)?;
        self.start_menu_open = false;
        Ok(WindowKey::new(kind, Some(id.clone())))
    }

    /// Opens (or focuses) a settings-style panel.
    ///
    /// # Errors
    ///
    /// [`DesktopError::InvalidInput`] for entity-bound window kinds.
    pub fn open_panel(&mut self, kind: WindowKind) -> DesktopResult<(WindowKey, OpenOutcome)> {
        let outcome = self.windows.open(kind, None, "")?;
        self.start_menu_open = false;
        Ok((WindowKey::panel(kind), outcome))
    }

    /// Closes a window, dropping the buffer of a text editor.
    ///
    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn close_window(&mut self, key: &WindowKey) -> DesktopResult<ClosedWindow> {
        self.windows.close(key)?;
        let discarded_edits = match (&key.kind, &key.entity) {
            (WindowKind::TextEditor, Some(entity)) => self
                .buffers
                .remove(entity)
                .filter(EditBuffer::is_dirty)
                .map(|_| entity.clone()),
            _ => None,
        };
        if let Some(entity) = &discarded_edits {
            debug!(entity = %entity, "closed editor with unsaved edits");
        }
        Ok(ClosedWindow {
            key: key.clone(),
            discarded_edits,
        })
    }

    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn focus_window(&mut self, key: &WindowKey) -> DesktopResult<bool> {
        self.windows.focus(key)
    }

    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn move_window(&mut self, key: &WindowKey, dx: i32, dy: i32) -> DesktopResult<bool> {
        self.windows.move_by(key, dx, dy)
    }

    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn toggle_maximize(&mut self, key: &WindowKey) -> DesktopResult<bool> {
        self.windows.toggle_maximize(key)
    }

    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn minimize_window(&mut self, key: &WindowKey) -> DesktopResult<()> {
        self.windows.minimize(key)
    }

    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn restore_window(&mut self, key: &WindowKey) -> DesktopResult<()> {
        self.windows.restore(key)
    }

    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn toggle_taskbar_window(&mut self, key: &WindowKey) -> DesktopResult<()> {
        self.windows.toggle_taskbar(key)
    }

    /// # Errors
    ///
    /// [`DesktopError::WindowNotFound`] when the window is not open.
    pub fn begin_window_drag(&mut self, key: &WindowKey, pointer: PointerPosition) -> DesktopResult<()> {
        self.windows.begin_window_drag(key, pointer)
    }

    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without a window drag.
    pub fn update_window_drag(&mut self, pointer: PointerPosition) -> DesktopResult<bool> {
        self.windows.update_window_drag(pointer)
    }

    pub fn end_window_drag(&mut self) -> Option<WindowKey> {
        self.windows.end_window_drag()
    }

    // Rename gate

    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when the entity does not exist.
    pub fn start_rename(&mut self, id: &EntityId) -> DesktopResult<()> {
        self.windows.start_rename(&self.store, id)
    }

    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without an active rename.
    pub fn update_rename(&mut self, draft: impl Into<String>) -> DesktopResult<()> {
        self.windows.update_rename(draft)
    }

    /// # Errors
    ///
    /// See [`WindowManager::commit_rename`].
    pub fn commit_rename(&mut self) -> DesktopResult<RenameOutcome> {
        let outcome = self.windows.commit_rename(&mut self.store)?;
        if let RenameOutcome::Renamed { entity, .. } = &outcome {
            self.refresh_entity_titles(entity);
        }
        Ok(outcome)
    }

    pub fn cancel_rename(&mut self) {
        self.windows.cancel_rename();
    }

    // Drag and drop

    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when `source` does not exist.
    pub fn begin_entity_drag(&mut self, source: &EntityId, origin: PointerPosition) -> DesktopResult<()> {
        self.drag_drop.begin_drag(&self.store, source, origin)
    }

    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without a drag in progress.
    pub fn update_entity_drag(&mut self, candidate: Option<DropTarget>) -> DesktopResult<bool> {
        self.drag_drop.update_drag_target(&self.store, candidate)
    }

    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without a drag in progress.
    pub fn end_entity_drag(&mut self, committed: bool) -> DesktopResult<DropOutcome> {
        self.drag_drop.end_drag(&mut self.store, committed)
    }

    pub fn cancel_entity_drag(&mut self) -> Option<DropOutcome> {
        self.drag_drop.cancel()
    }

    // Edit buffers

    /// Replaces the text of the open editor buffer for `entity`.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] when no editor is open for `entity`.
    pub fn edit_text(&mut self, entity: &EntityId, text: impl Into<String>) -> DesktopResult<()> {
        self.buffer_mut(entity)?.set_text(text);
        self.refresh_entity_titles(entity);
        Ok(())
    }

    /// Commits the buffer for `entity` to the store.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without an open buffer, or the store's error.
    pub fn save_buffer(&mut self, entity: &EntityId) -> DesktopResult<()> {
        let buffer = self
            .buffers
            .get_mut(entity)
            .ok_or(DesktopError::NoActiveSession("edit buffer"))?;
        buffer.save(&mut self.store)?;
        self.refresh_entity_titles(entity);
        Ok(())
    }

    /// Reverts the buffer for `entity` to its last saved text.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without an open buffer.
    pub fn discard_buffer(&mut self, entity: &EntityId) -> DesktopResult<()> {
        self.buffer_mut(entity)?.discard();
        self.refresh_entity_titles(entity);
        Ok(())
    }

    fn buffer_mut(&mut self, entity: &EntityId) -> DesktopResult<&mut EditBuffer> {
        self.buffers
            .get_mut(entity)
            .ok_or(DesktopError::NoActiveSession("edit buffer"))
    }

    /// Retitles the entity's windows from its current name, keeping the unsaved marker of an
    /// open buffer.
    fn refresh_entity_titles(&mut self, entity: &EntityId) {
        let Some(name) = self.store.get(entity).map(|e| e.name.as_str()) else {
            return;
        };
        let title = match self.buffers.get(entity) {
            Some(buffer) => buffer.decorate_title(name),
            None => name.to_string(),
        };
        self.windows.retitle_entity_windows(entity, &title);
    }

    // Selection and clicks

    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when selecting an unknown entity.
    pub fn select(&mut self, id: Option<&EntityId>) -> DesktopResult<()> {
        if let Some(id) = id {
            if !self.store.contains(id) {
                return Err(DesktopError::EntityNotFound(id.clone()));
            }
        }
        self.selected = id.cloned();
        Ok(())
    }

    /// Feeds a click on `id` at `now_ms` through the click state machine and applies whatever it
    /// resolved: a single click selects, a double click opens.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when `id` does not exist; errors from opening the entity.
    pub fn click_entity(&mut self, id: &EntityId, now_ms: u64) -> DesktopResult<ClickReport> {
        if !self.store.contains(id) {
            return Err(DesktopError::EntityNotFound(id.clone()));
        }
        let resolution = self.clicks.register(id.clone(), now_ms);
        self.apply_click(resolution)
    }

    /// Resolves an expired pending click.
    ///
    /// # Errors
    ///
    /// Never fails for a single click; kept fallible for symmetry with [`Self::click_entity`].
    pub fn poll_clicks(&mut self, now_ms: u64) -> DesktopResult<ClickReport> {
        let resolution = self.clicks.poll(now_ms);
        self.apply_click(resolution)
    }

    fn apply_click(&mut self, resolution: Option<ClickResolution>) -> DesktopResult<ClickReport> {
        let opened = match &resolution {
            None => None,
            Some(ClickResolution::Single(id)) => {
                // The entity may have been removed while the click was pending.
                if self.store.contains(id) {
                    self.selected = Some(id.clone());
                }
                None
            }
            Some(ClickResolution::Double(id)) => {
                self.selected = Some(id.clone());
                self.activate(id)?
            }
        };
        Ok(ClickReport { resolution, opened })
    }

    /// Opens `id` when it has a window kind; other entities are only selected.
    fn activate(&mut self, id: &EntityId) -> DesktopResult<Option<WindowKey>> {
        match self.store.get(id).map(|e| e.kind) {
            Some(EntityKind::Folder | EntityKind::Text) => self.open_entity(id).map(Some),
            Some(kind) => {
                debug!(entity = %id, ?kind, "entity has no window to open");
                Ok(None)
            }
            None => Err(DesktopError::EntityNotFound(id.clone())),
        }
    }

    // Start menu

    pub fn toggle_start_menu(&mut self) -> bool {
        self.start_menu_open = !self.start_menu_open;
        self.start_menu_open
    }

    pub fn close_start_menu(&mut self) {
        self.start_menu_open = false;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::click::DOUBLE_CLICK_WINDOW_MS;

    fn id(raw: &str) -> EntityId {
        EntityId::new(raw)
    }

    fn session() -> DesktopSession {
        DesktopSession::with_entities(
            DesktopConfig::default(),
            [
                Entity::folder("docs", "Documents"),
                Entity::text("f1", "notes.txt", "").with_parent("docs"),
                Entity::new("pic", "photo.png", EntityKind::Image),
            ],
        )
        .unwrap()
    }

    #[test]
    fn opening_text_entity_creates_editor_and_buffer() {
        let mut s = session();
        s.toggle_start_menu();

        let key = s.open_entity(&id("f1")).unwrap();

        assert_eq!(key, WindowKey::text_editor("f1"));
        assert_eq!(s.windows().get(&key).unwrap().title, "notes.txt");
        assert_eq!(s.buffer(&id("f1")).unwrap().text(), "");
        assert!(!s.start_menu_open());
    }

    #[test]
    fn opening_image_has_no_window() {
        let mut s = session();
        assert_eq!(
            s.open_entity(&id("pic")),
            Err(DesktopError::InvalidType {
                id: id("pic"),
                actual: EntityKind::Image,
            })
        );
        assert!(s.windows().windows().is_empty());
    }

    #[test]
    fn reopening_editor_keeps_unsaved_buffer() {
        let mut s = session();
        s.open_entity(&id("f1")).unwrap();
        s.edit_text(&id("f1"), "draft").unwrap();

        s.open_entity(&id("docs")).unwrap();
        s.open_entity(&id("f1")).unwrap();

        assert_eq!(s.buffer(&id("f1")).unwrap().text(), "draft");
        assert_eq!(s.windows().windows().len(), 2);
    }

    #[test]
    fn edit_and_save_update_title_marker() {
        let mut s = session();
        let key = s.open_entity(&id("f1")).unwrap();

        s.edit_text(&id("f1"), "hello").unwrap();
        assert_eq!(s.windows().get(&key).unwrap().title, "notes.txt *");
        assert_eq!(s.store().get(&id("f1")).unwrap().content.as_deref(), Some(""));

        s.save_buffer(&id("f1")).unwrap();
        assert_eq!(s.windows().get(&key).unwrap().title, "notes.txt");
        assert_eq!(
            s.store().get(&id("f1")).unwrap().content.as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn renaming_a_dirty_file_keeps_the_unsaved_marker() {
        let mut s = session();
        let key = s.open_entity(&id("f1")).unwrap();
        s.edit_text(&id("f1"), "x").unwrap();

        s.rename_entity(&id("f1"), "g.txt").unwrap();
        assert_eq!(s.windows().get(&key).unwrap().title, "g.txt *");

        s.start_rename(&id("f1")).unwrap();
        s.update_rename("h.txt").unwrap();
        s.commit_rename().unwrap();
        assert_eq!(s.windows().get(&key).unwrap().title, "h.txt *");

        s.save_buffer(&id("f1")).unwrap();
        s.rename_entity(&id("f1"), "i.txt").unwrap();
        assert_eq!(s.windows().get(&key).unwrap().title, "i.txt");
    }

    #[test]
    fn closing_dirty_editor_reports_discarded_edits() {
        let mut s = session();
        let key = s.open_entity(&id("f1")).unwrap();
        s.edit_text(&id("f1"), "lost").unwrap();

        let closed = s.close_window(&key).unwrap();

        assert_eq!(closed.discarded_edits, Some(id("f1")));
        assert!(s.buffer(&id("f1")).is_none());
        assert_eq!(s.store().get(&id("f1")).unwrap().content.as_deref(), Some(""));
    }

    #[test]
    fn removing_folder_closes_only_its_own_windows() {
        let mut s = session();
        s.open_entity(&id("docs")).unwrap();
        s.open_entity(&id("f1")).unwrap();
        s.select(Some(&id("docs"))).unwrap();

        let outcome = s.remove_entity(&id("docs")).unwrap();

        assert_eq!(outcome.closed_windows, vec![WindowKey::folder("docs")]);
        assert_eq!(outcome.report.orphaned, vec![id("f1")]);
        assert!(s.windows().is_open(&WindowKey::text_editor("f1")));
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn cascade_removal_tears_down_descendant_editors() {
        let mut s = session();
        s.set_delete_policy(DeletePolicy::Cascade);
        s.open_entity(&id("f1")).unwrap();
        s.edit_text(&id("f1"), "unsaved").unwrap();

        let outcome = s.remove_entity(&id("docs")).unwrap();

        assert_eq!(outcome.closed_windows, vec![WindowKey::text_editor("f1")]);
        assert_eq!(outcome.discarded_edits, vec![id("f1")]);
        assert!(s.windows().windows().is_empty());
    }

    #[test]
    fn double_click_opens_and_single_click_selects() {
        let mut s = session();

        let first = s.click_entity(&id("docs"), 1_000).unwrap();
        assert_eq!(first, ClickReport::default());
        let second = s
            .click_entity(&id("docs"), 1_000 + DOUBLE_CLICK_WINDOW_MS)
            .unwrap();
        assert_eq!(second.resolution, Some(ClickResolution::Double(id("docs"))));
        assert_eq!(second.opened, Some(WindowKey::folder("docs")));

        s.click_entity(&id("pic"), 5_000).unwrap();
        let polled = s.poll_clicks(5_000 + DOUBLE_CLICK_WINDOW_MS + 1).unwrap();
        assert_eq!(polled.resolution, Some(ClickResolution::Single(id("pic"))));
        assert_eq!(s.selected(), Some(&id("pic")));
    }

    #[test]
    fn double_click_on_image_only_selects() {
        let mut s = session();
        s.click_entity(&id("pic"), 0).unwrap();
        let report = s.click_entity(&id("pic"), 10).unwrap();

        assert_eq!(report.opened, None);
        assert_eq!(s.selected(), Some(&id("pic")));
        assert!(s.windows().windows().is_empty());
    }

    #[test]
    fn created_entities_use_default_names() {
        let mut s = session();
        let folder = s.create_folder(None).unwrap();
        let file = s.create_text_file(Some(&folder)).unwrap();

        assert_eq!(s.store().get(&folder).unwrap().name, DEFAULT_FOLDER_NAME);
        let created = s.store().get(&file).unwrap();
        assert_eq!(created.name, DEFAULT_TEXT_FILE_NAME);
        assert_eq!(created.parent.as_ref(), Some(&folder));
        assert_eq!(created.content.as_deref(), Some(""));
    }

    #[test]
    fn opening_panel_closes_start_menu() {
        let mut s = session();
        assert!(s.toggle_start_menu());

        let (key, outcome) = s.open_panel(WindowKind::Settings).unwrap();

        assert_eq!(key, WindowKey::panel(WindowKind::Settings));
        assert_eq!(outcome, OpenOutcome::Created);
        assert!(!s.start_menu_open());
        assert!(s.open_panel(WindowKind::Folder).is_err());
    }

    #[test]
    fn settings_change_double_click_speed() {
        let mut s = session();
        s.set_settings(SystemSettings {
            double_click_speed: crate::click::DoubleClickSpeed::Fast,
            ..SystemSettings::default()
        });
        assert_eq!(s.clicks().window_ms(), 150);
    }
}
