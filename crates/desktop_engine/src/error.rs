//! Error types returned by engine operations.

use thiserror::Error;

use crate::model::{EntityId, EntityKind, WindowKey};

/// Coarse error categories the desktop shell maps to user-visible feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The operation referenced an unknown entity or window.
    NotFound,
    /// An entity with the same id already exists.
    DuplicateId,
    /// A move or create named a parent that cannot hold children.
    InvalidTarget,
    /// A move would make an entity its own ancestor.
    CycleDetected,
    /// A content edit targeted a non-text entity, or an entity cannot be opened.
    InvalidType,
    /// Malformed caller input such as a blank name or bad color.
    InvalidInput,
    /// The operation requires an interaction session that is not active.
    InvalidState,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Rejection reasons for engine operations. A rejected call leaves all state unchanged.
pub enum DesktopError {
    #[error("entity `{0}` not found")]
    EntityNotFound(EntityId),
    #[error("window `{0}` is not open")]
    WindowNotFound(WindowKey),
    #[error("entity id `{0}` already exists")]
    DuplicateId(EntityId),
    #[error("`{target}` is not a valid parent: {reason}")]
    InvalidTarget {
        /// The rejected parent.
        target: EntityId,
        /// Why it was rejected.
        reason: &'static str,
    },
    #[error("moving `{id}` into `{target}` would create a cycle")]
    CycleDetected {
        /// Entity being moved.
        id: EntityId,
        /// Requested new parent.
        target: EntityId,
    },
    #[error("entity `{id}` has type {actual:?}")]
    InvalidType {
        /// Entity the operation referenced.
        id: EntityId,
        /// Its actual type.
        actual: EntityKind,
    },
    #[error("entity names must not be blank")]
    InvalidName,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no active {0} session")]
    NoActiveSession(&'static str),
}

impl DesktopError {
    /// Returns the coarse category for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EntityNotFound(_) | Self::WindowNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::InvalidTarget { .. } => ErrorKind::InvalidTarget,
            Self::CycleDetected { .. } => ErrorKind::CycleDetected,
            Self::InvalidType { .. } => ErrorKind::InvalidType,
            Self::InvalidName | Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NoActiveSession(_) => ErrorKind::InvalidState,
        }
    }
}

/// Convenience result type for engine operations.
pub type DesktopResult<T> = Result<T, DesktopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_offending_ids() {
        let err = DesktopError::CycleDetected {
            id: EntityId::new("a"),
            target: EntityId::new("b"),
        };
        assert_eq!(err.to_string(), "moving `a` into `b` would create a cycle");
        assert_eq!(err.kind(), ErrorKind::CycleDetected);

        let err = DesktopError::WindowNotFound(WindowKey::folder("docs"));
        assert_eq!(err.to_string(), "window `folder:docs` is not open");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
