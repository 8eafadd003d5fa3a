//! Explicit runtime effect-queue executor for reducer-emitted side effects.

use desktop_engine::RuntimeEffect;
use leptos::*;

use crate::runtime_context::DesktopRuntimeContext;

/// Installs the effect executor that drains reducer-emitted runtime effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the queue before processing so nested dispatches enqueue a fresh batch.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        for effect in queued {
            run_runtime_effect(runtime, effect);
        }
    });
}

/// Executes one effect against the host and the shell-facing signals.
pub fn run_runtime_effect(runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
    let host = runtime.host.get_value();
    match effect {
        RuntimeEffect::FocusWindowInput(key) => host.focus_window_input(&key),
        RuntimeEffect::DiscardedUnsavedEdits(entity) => {
            logging::warn!("editor for `{entity}` closed with unsaved edits");
            runtime.discarded_edits.update(|list| list.push(entity));
        }
        RuntimeEffect::RestoreIconPosition { entity, position } => {
            runtime.icon_restores.update(|restores| {
                restores.insert(entity, position);
            });
        }
        RuntimeEffect::ThemeChanged => runtime
            .session
            .with_untracked(|session| host.apply_theme(session.theme())),
        RuntimeEffect::WindowClosed(_)
        | RuntimeEffect::EntityActivated(_)
        | RuntimeEffect::PlaySound(_) => {}
    }
}
