//! In-memory edit buffers for open text-editor windows.
//!
//! Typing only touches the buffer. The store sees the text when [`EditBuffer::save`] runs.

use crate::entity_store::EntityStore;
use crate::error::{DesktopError, DesktopResult};
use crate::model::{EntityId, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    entity: EntityId,
    text: String,
    committed: String,
    dirty: bool,
}

impl EditBuffer {
    /// Copies the current content of a text entity into a clean buffer.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] or, for non-text entities, [`DesktopError::InvalidType`].
    pub fn load(store: &EntityStore, entity: &EntityId) -> DesktopResult<Self> {
        let source = store
            .get(entity)
            .ok_or_else(|| DesktopError::EntityNotFound(entity.clone()))?;
        if source.kind != EntityKind::Text {
            return Err(DesktopError::InvalidType {
                id: entity.clone(),
                actual: source.kind,
            });
        }
        let text = source.content.clone().unwrap_or_default();
        Ok(Self {
            entity: entity.clone(),
            committed: text.clone(),
            text,
            dirty: false,
        })
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replaces the buffer text. Any edit marks the buffer dirty until the next save or discard.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// Commits the buffer through [`EntityStore::update_content`].
    ///
    /// # Errors
    ///
    /// Propagates the store error; the buffer stays dirty in that case.
    pub fn save(&mut self, store: &mut EntityStore) -> DesktopResult<()> {
        store.update_content(&self.entity, self.text.clone())?;
        self.committed = self.text.clone();
        self.dirty = false;
        Ok(())
    }

    /// Throws away unsaved edits, reverting to the last committed text.
    pub fn discard(&mut self) {
        self.text = self.committed.clone();
        self.dirty = false;
    }

    /// Title-bar text with an unsaved-changes marker.
    pub fn decorate_title(&self, title: &str) -> String {
        if self.dirty {
            format!("{title} *")
        } else {
            title.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Entity;

    fn id(raw: &str) -> EntityId {
        EntityId::new(raw)
    }

    #[test]
    fn load_copies_content_and_defaults_to_empty() {
        let mut store = EntityStore::new();
        store.create(Entity::text("a", "a.txt", "draft")).unwrap();
        store
            .create(Entity::new("b", "b.txt", EntityKind::Text))
            .unwrap();

        assert_eq!(EditBuffer::load(&store, &id("a")).unwrap().text(), "draft");
        assert_eq!(EditBuffer::load(&store, &id("b")).unwrap().text(), "");
    }

    #[test]
    fn load_rejects_missing_and_non_text_entities() {
        let mut store = EntityStore::new();
        store.create(Entity::folder("dir", "Dir")).unwrap();

        assert_eq!(
            EditBuffer::load(&store, &id("nope")).unwrap_err(),
            DesktopError::EntityNotFound(id("nope"))
        );
        assert_eq!(
            EditBuffer::load(&store, &id("dir")).unwrap_err(),
            DesktopError::InvalidType {
                id: id("dir"),
                actual: EntityKind::Folder,
            }
        );
    }

    #[test]
    fn typing_marks_dirty_without_touching_store_until_save() {
        let mut store = EntityStore::new();
        store.create(Entity::text("f1", "f1.txt", "")).unwrap();
        let mut buffer = EditBuffer::load(&store, &id("f1")).unwrap();

        buffer.set_text("hello");
        assert!(buffer.is_dirty());
        assert_eq!(buffer.decorate_title("f1.txt"), "f1.txt *");
        assert_eq!(store.get(&id("f1")).unwrap().content.as_deref(), Some(""));

        buffer.save(&mut store).unwrap();
        assert!(!buffer.is_dirty());
        assert_eq!(store.get(&id("f1")).unwrap().content.as_deref(), Some("hello"));
    }

    #[test]
    fn setting_identical_text_still_marks_dirty() {
        let mut store = EntityStore::new();
        store.create(Entity::text("f1", "f1.txt", "abc")).unwrap();
        let mut buffer = EditBuffer::load(&store, &id("f1")).unwrap();

        buffer.set_text("abc");
        assert!(buffer.is_dirty());
        assert_eq!(buffer.decorate_title("f1.txt"), "f1.txt *");

        buffer.set_text("abcd");
        buffer.set_text("abc");
        assert!(buffer.is_dirty());
    }

    #[test]
    fn discard_reverts_to_last_save() {
        let mut store = EntityStore::new();
        store.create(Entity::text("f1", "f1.txt", "one")).unwrap();
        let mut buffer = EditBuffer::load(&store, &id("f1")).unwrap();
        buffer.set_text("two");
        buffer.save(&mut store).unwrap();
        buffer.set_text("three");

        buffer.discard();

        assert_eq!(buffer.text(), "two");
        assert!(!buffer.is_dirty());
        assert_eq!(store.get(&id("f1")).unwrap().content.as_deref(), Some("two"));
    }

    #[test]
    fn failed_save_keeps_buffer_dirty() {
        let mut store = EntityStore::new();
        store.create(Entity::text("f1", "f1.txt", "")).unwrap();
        let mut buffer = EditBuffer::load(&store, &id("f1")).unwrap();
        buffer.set_text("orphaned");
        store.remove(&id("f1")).unwrap();

        assert_eq!(
            buffer.save(&mut store),
            Err(DesktopError::EntityNotFound(id("f1")))
        );
        assert!(buffer.is_dirty());
    }
}
