//! Entity, window, and geometry value types shared by every engine component.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;

/// Stable identifier for a virtual file-system entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wraps a caller-chosen identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Canonical entity type.
pub enum EntityKind {
    /// Container entity; the only kind that may act as a parent.
    Folder,
    /// Plain-text document with an optional content payload.
    #[serde(alias = "txt")]
    Text,
    /// Image file.
    Image,
    /// Anything else.
    Other,
}

impl EntityKind {
    /// Returns `true` when entities of this kind may contain children.
    pub fn can_parent(self) -> bool {
        matches!(self, Self::Folder)
    }

    /// Guesses a kind from the conventional file-name suffix.
    ///
    /// The explicit kind stored on an [`Entity`] always wins; this is only used when the shell
    /// creates an entity from a bare name.
    pub fn from_name_suffix(name: &str) -> Self {
        let Some((_, ext)) = name.trim().rsplit_once('.') else {
            return Self::Other;
        };
        match ext.to_ascii_lowercase().as_str() {
            "dir" => Self::Folder,
            "txt" | "md" | "log" => Self::Text,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" => Self::Image,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One node in the virtual file system.
pub struct Entity {
    /// Unique identifier, immutable once assigned.
    pub id: EntityId,
    /// Display/file name.
    pub name: String,
    /// Canonical type.
    pub kind: EntityKind,
    /// Parent folder, `None` for desktop (root) entities.
    pub parent: Option<EntityId>,
    /// Unix milliseconds of the last rename, content edit, or reparent.
    pub date_modified: u64,
    /// Text payload; only meaningful for [`EntityKind::Text`].
    pub content: Option<String>,
}

impl Entity {
    /// Builds a root-level entity with no content.
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            parent: None,
            date_modified: 0,
            content: None,
        }
    }

    /// Builds a root-level folder.
    pub fn folder(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self::new(id, name, EntityKind::Folder)
    }

    /// Builds a root-level text document.
    pub fn text(id: impl Into<EntityId>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::new(id, name, EntityKind::Text)
        }
    }

    /// Sets the parent folder.
    pub fn with_parent(mut self, parent: impl Into<EntityId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Returns `true` for folder entities.
    pub fn is_folder(&self) -> bool {
        self.kind.can_parent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Kind of top-level UI surface managed by the window manager.
pub enum WindowKind {
    /// Folder browser bound to a folder entity.
    Folder,
    /// Text editor bound to a text entity.
    TextEditor,
    /// System settings panel.
    Settings,
    /// Personalization panel.
    Personalize,
}

impl WindowKind {
    /// Returns the stable token used in window keys.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::TextEditor => "text-editor",
            Self::Settings => "settings",
            Self::Personalize => "personalize",
        }
    }

    /// Returns `true` when windows of this kind are bound to an entity.
    pub fn is_entity_bound(self) -> bool {
        matches!(self, Self::Folder | Self::TextEditor)
    }

    /// Default title for windows that are not bound to an entity.
    pub fn panel_title(self) -> &'static str {
        match self {
            Self::Folder => "Folder",
            Self::TextEditor => "Text Editor",
            Self::Settings => "Settings",
            Self::Personalize => "Personalize",
        }
    }

    /// Default floating geometry of the first window of this kind.
    pub fn default_rect(self) -> WindowRect {
        match self {
            Self::Folder => WindowRect::new(100, 100, 600, 400),
            Self::TextEditor => WindowRect::new(150, 150, 700, 500),
            Self::Settings => WindowRect::new(150, 80, 750, 550),
            Self::Personalize => WindowRect::new(200, 100, 800, 600),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identity of a window: its kind plus the entity it is bound to, if any.
pub struct WindowKey {
    /// Window kind.
    pub kind: WindowKind,
    /// Bound entity.
    pub entity: Option<EntityId>,
}

impl WindowKey {
    /// Builds a key from its parts.
    pub fn new(kind: WindowKind, entity: Option<EntityId>) -> Self {
        Self { kind, entity }
    }

    /// Key of the folder browser for `folder`.
    pub fn folder(folder: impl Into<EntityId>) -> Self {
        Self::new(WindowKind::Folder, Some(folder.into()))
    }

    /// Key of the text editor for `file`.
    pub fn text_editor(file: impl Into<EntityId>) -> Self {
        Self::new(WindowKind::TextEditor, Some(file.into()))
    }

    /// Key of an unbound panel window.
    pub fn panel(kind: WindowKind) -> Self {
        Self::new(kind, None)
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(entity) => write!(f, "{}:{entity}", self.kind.token()),
            None => f.write_str(self.kind.token()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One open window.
pub struct WindowRecord {
    /// Window identity.
    pub key: WindowKey,
    /// Title-bar text.
    pub title: String,
    /// Current geometry.
    pub rect: WindowRect,
    /// Floating geometry to return to when leaving the maximized state.
    pub restore_rect: Option<WindowRect>,
    /// 1-based stacking position; larger is closer to the front.
    pub z_index: u32,
    /// Whether this window holds input focus.
    pub is_focused: bool,
    /// Whether the window is hidden to the taskbar.
    pub minimized: bool,
    /// Whether the window fills the workspace.
    pub maximized: bool,
}
