//! Drag-and-drop reparenting of entities between icons and folder windows.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entity_store::EntityStore;
use crate::error::{DesktopError, DesktopResult};
use crate::model::{EntityId, PointerPosition};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "id")]
/// Surface currently under the pointer during an entity drag.
pub enum DropTarget {
    /// A desktop or folder-window icon.
    Icon(EntityId),
    /// The content area of an open folder window.
    FolderWindow(EntityId),
}

impl DropTarget {
    pub fn entity(&self) -> &EntityId {
        match self {
            Self::Icon(id) | Self::FolderWindow(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDragSession {
    /// Entity being dragged.
    pub source: EntityId,
    /// Icon position when the drag started; restored on cancel.
    pub origin: PointerPosition,
    /// Candidate under the pointer; `None` over the desktop background.
    pub target: Option<DropTarget>,
    /// Whether dropping on `target` would be accepted.
    pub eligible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// How an entity drag ended.
pub enum DropOutcome {
    /// The source was reparented into `target`.
    Moved {
        /// Dragged entity.
        source: EntityId,
        /// Its new parent folder.
        target: EntityId,
    },
    /// Released over nothing droppable, or not committed; the icon snaps back.
    Cancelled {
        /// Dragged entity.
        source: EntityId,
        /// Position to restore the icon to.
        restore_to: PointerPosition,
    },
    /// The store refused the move at drop time; the icon snaps back.
    Rejected {
        /// Dragged entity.
        source: EntityId,
        /// Position to restore the icon to.
        restore_to: PointerPosition,
        /// Store error.
        error: DesktopError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragDropCoordinator {
    session: Option<EntityDragSession>,
}

impl DragDropCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EntityDragSession> {
        self.session.as_ref()
    }

    /// Folder that should be highlighted as a drop target, if any.
    pub fn highlighted_target(&self) -> Option<&EntityId> {
        self.session
            .as_ref()
            .filter(|s| s.eligible)
            .and_then(|s| s.target.as_ref())
            .map(DropTarget::entity)
    }

    /// Starts dragging `source`, replacing any previous session.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when `source` does not exist.
    pub fn begin_drag(
        &mut self,
        store: &EntityStore,
        source: &EntityId,
        origin: PointerPosition,
    ) -> DesktopResult<()> {
        if !store.contains(source) {
            return Err(DesktopError::EntityNotFound(source.clone()));
        }
        debug!(entity = %source, "entity drag started");
        self.session = Some(EntityDragSession {
            source: source.clone(),
            origin,
            target: None,
            eligible: false,
        });
        Ok(())
    }

    /// Records the candidate under the pointer and returns whether it is drop-eligible.
    ///
    /// A candidate is eligible when it names an existing folder other than the source that is
    /// not below the source.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without a drag in progress.
    pub fn update_drag_target(
        &mut self,
        store: &EntityStore,
        candidate: Option<DropTarget>,
    ) -> DesktopResult<bool> {
        let session = self
            .session
            .as_mut()
            .ok_or(DesktopError::NoActiveSession("drag"))?;
        session.eligible = candidate
            .as_ref()
            .map(|target| accepts_drop(store, &session.source, target.entity()))
            .unwrap_or(false);
        session.target = candidate;
        Ok(session.eligible)
    }

    /// Ends the drag. A committed drop over an eligible folder moves the source into it.
    ///
    /// # Errors
    ///
    /// [`DesktopError::NoActiveSession`] without a drag in progress.
    pub fn end_drag(&mut self, store: &mut EntityStore, committed: bool) -> DesktopResult<DropOutcome> {
        let session = self
            .session
            .take()
            .ok_or(DesktopError::NoActiveSession("drag"))?;
        let target = match session.target {
            Some(target) if committed && session.eligible => target.entity().clone(),
            _ => {
                debug!(entity = %session.source, "entity drag cancelled");
                return Ok(DropOutcome::Cancelled {
                    source: session.source,
                    restore_to: session.origin,
                });
            }
        };

        match store.move_entity(&session.source, Some(&target)) {
            Ok(()) => Ok(DropOutcome::Moved {
                source: session.source,
                target,
            }),
            Err(error) => {
                warn!(entity = %session.source, target = %target, %error, "drop rejected");
                Ok(DropOutcome::Rejected {
                    source: session.source,
                    restore_to: session.origin,
                    error,
                })
            }
        }
    }

    /// Abandons the drag without a drop.
    pub fn cancel(&mut self) -> Option<DropOutcome> {
        self.session.take().map(|session| DropOutcome::Cancelled {
            source: session.source,
            restore_to: session.origin,
        })
    }
}

fn accepts_drop(store: &EntityStore, source: &EntityId, target: &EntityId) -> bool {
    target != source
        && store.get(target).map(|e| e.is_folder()).unwrap_or(false)
        && !store.is_descendant_of(target, source)
}
