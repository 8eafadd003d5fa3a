//! Runtime provider and context wiring for a desktop session.
//!
//! The session lives in a single signal. Each dispatch reduces a clone and commits it only when
//! the reducer accepts the action, so a rejected action never leaves partial state behind.

use std::collections::HashMap;

use desktop_engine::{
    reduce_desktop, DesktopAction, DesktopConfig, DesktopSession, Entity, EntityId,
    PointerPosition, RuntimeEffect,
};
use leptos::*;

use crate::effect_executor;
use crate::host::DesktopHost;

#[derive(Clone, Copy)]
/// Leptos context for reading the session and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Browser hooks used to execute effects.
    pub host: StoredValue<DesktopHost>,
    /// Reactive desktop session.
    pub session: RwSignal<DesktopSession>,
    /// Queue of runtime effects emitted by the reducer and drained by the executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Icon positions to snap back to after a cancelled or rejected drag, consumed through
    /// [`Self::take_icon_restore`].
    pub icon_restores: RwSignal<HashMap<EntityId, PointerPosition>>,
    /// Entities whose unsaved edits were discarded, oldest first. Drained by
    /// [`Self::clear_discarded_edits`].
    pub discarded_edits: RwSignal<Vec<EntityId>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Creates the signals and dispatch loop around `session`. Must run inside a reactive owner.
    pub fn new(session: DesktopSession) -> Self {
        let host = store_value(DesktopHost);
        let session = create_rw_signal(session);
        let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
        let icon_restores = create_rw_signal(HashMap::new());
        let discarded_edits = create_rw_signal(Vec::new());

        let dispatch = Callback::new(move |action: DesktopAction| {
            let mut next = session.get_untracked();
            match reduce_desktop(&mut next, action) {
                Ok(new_effects) => {
                    if session.with_untracked(|current| current != &next) {
                        session.set(next);
                    }
                    if !new_effects.is_empty() {
                        effects.update(|queue| queue.extend(new_effects));
                    }
                }
                Err(err) => logging::warn!("desktop reducer error: {err}"),
            }
        });

        Self {
            host,
            session,
            effects,
            icon_restores,
            discarded_edits,
            dispatch,
        }
    }

    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Removes and returns the pending snap-back position for `entity` once the icon has been
    /// placed.
    pub fn take_icon_restore(&self, entity: &EntityId) -> Option<PointerPosition> {
        if !self
            .icon_restores
            .with_untracked(|restores| restores.contains_key(entity))
        {
            return None;
        }
        self.icon_restores
            .try_update(|restores| restores.remove(entity))
            .flatten()
    }

    /// Drains the discarded-edit notices, oldest first.
    pub fn clear_discarded_edits(&self) -> Vec<EntityId> {
        if self.discarded_edits.with_untracked(Vec::is_empty) {
            return Vec::new();
        }
        self.discarded_edits
            .try_update(std::mem::take)
            .unwrap_or_default()
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components.
pub fn DesktopProvider(
    /// Session configuration; defaults apply when omitted.
    #[prop(optional)]
    config: Option<DesktopConfig>,
    /// Entities to seed the store with, parents first.
    #[prop(optional)]
    entities: Vec<Entity>,
    children: Children,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let taskbar_height = config.workspace.taskbar_height;
    let session = match DesktopSession::with_entities(config.clone(), entities) {
        Ok(session) => session,
        Err(err) => {
            logging::warn!("desktop seed rejected: {err}");
            DesktopSession::new(config)
        }
    };

    let runtime = DesktopRuntimeContext::new(session);
    provide_context(runtime);
    effect_executor::install(runtime);

    if let Some(viewport) = runtime.host.get_value().desktop_viewport_rect(taskbar_height) {
        runtime.dispatch_action(DesktopAction::SetWorkspace(viewport));
    }

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
