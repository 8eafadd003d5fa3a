//! Reducer actions, side-effect intents, and transition logic for a desktop session.

use tracing::debug;

use crate::drag_drop::{DropOutcome, DropTarget};
use crate::entity_store::DeletePolicy;
use crate::error::DesktopError;
use crate::model::{Entity, EntityId, PointerPosition, WindowKey, WindowKind, WindowRect};
use crate::session::{ClickReport, DesktopSession};
use crate::theme::{BackgroundKind, SystemSettings};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate a [`DesktopSession`].
pub enum DesktopAction {
    /// Insert a fully specified entity.
    CreateEntity(Entity),
    /// Create a default-named folder.
    CreateFolder {
        /// Parent folder, or the desktop root.
        parent: Option<EntityId>,
    },
    /// Create a default-named, empty text file.
    CreateTextFile {
        /// Parent folder, or the desktop root.
        parent: Option<EntityId>,
    },
    RenameEntity {
        entity: EntityId,
        name: String,
    },
    /// Reparent an entity; `None` moves it to the root.
    MoveEntity {
        entity: EntityId,
        parent: Option<EntityId>,
    },
    RemoveEntity {
        entity: EntityId,
    },
    /// Open the window presenting an entity.
    OpenEntity {
        entity: EntityId,
    },
    /// Open a settings-style panel.
    OpenPanel {
        kind: WindowKind,
    },
    CloseWindow {
        key: WindowKey,
    },
    FocusWindow {
        key: WindowKey,
    },
    /// Offset a floating window.
    MoveWindow {
        key: WindowKey,
        dx: i32,
        dy: i32,
    },
    ToggleMaximize {
        key: WindowKey,
    },
    MinimizeWindow {
        key: WindowKey,
    },
    RestoreWindow {
        key: WindowKey,
    },
    /// Taskbar button press for a window.
    ToggleTaskbarWindow {
        key: WindowKey,
    },
    /// Begin a title-bar drag.
    BeginMove {
        key: WindowKey,
        pointer: PointerPosition,
    },
    UpdateMove {
        pointer: PointerPosition,
    },
    EndMove,
    /// Replace the maximized-window geometry after a viewport change.
    SetWorkspace(WindowRect),
    StartRename {
        entity: EntityId,
    },
    UpdateRename {
        draft: String,
    },
    CommitRename,
    CancelRename,
    /// Begin dragging an entity icon.
    BeginEntityDrag {
        entity: EntityId,
        origin: PointerPosition,
    },
    /// Report the drop candidate under the pointer.
    UpdateEntityDrag {
        target: Option<DropTarget>,
    },
    /// Release the pointer; `committed` is false when the drag was aborted.
    EndEntityDrag {
        committed: bool,
    },
    CancelEntityDrag,
    /// Replace the text of an open editor buffer.
    EditText {
        entity: EntityId,
        text: String,
    },
    SaveBuffer {
        entity: EntityId,
    },
    DiscardBuffer {
        entity: EntityId,
    },
    Select {
        entity: Option<EntityId>,
    },
    /// Pointer click on an entity icon at a monotonic timestamp.
    Click {
        entity: EntityId,
        now_ms: u64,
    },
    /// Click-timer tick used to resolve a pending single click.
    PollClicks {
        now_ms: u64,
    },
    ToggleStartMenu,
    CloseStartMenu,
    SetBackground(BackgroundKind),
    SetBackgroundImage(String),
    SetAccentColor(String),
    ApplyThemePreset(String),
    ResetTheme,
    SetSettings(SystemSettings),
    SetDeletePolicy(DeletePolicy),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by the reducer for the shell to execute.
pub enum RuntimeEffect {
    /// Move focus into the newly focused window's primary input.
    FocusWindowInput(WindowKey),
    /// A window went away; the shell may drop per-window UI state.
    WindowClosed(WindowKey),
    /// Unsaved editor text was dropped.
    DiscardedUnsavedEdits(EntityId),
    /// Snap a dragged icon back to where the drag started.
    RestoreIconPosition {
        /// Dragged entity.
        entity: EntityId,
        /// Icon position at drag start.
        position: PointerPosition,
    },
    /// An entity was opened by the user.
    EntityActivated(EntityId),
    /// Theme colors or wallpaper changed.
    ThemeChanged,
    /// Play a named UI sound effect.
    PlaySound(&'static str),
}

/// Applies a [`DesktopAction`] to the session and collects resulting side effects.
///
/// # Errors
///
/// Returns the [`DesktopError`] of the rejected operation. Callers that need all-or-nothing
/// commits reduce into a clone of the session and keep it only on success.
pub fn reduce_desktop(
    session: &mut DesktopSession,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, DesktopError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::CreateEntity(entity) => {
            session.create_entity(entity)?;
        }
        DesktopAction::CreateFolder { parent } => {
            session.create_folder(parent.as_ref())?;
        }
        DesktopAction::CreateTextFile { parent } => {
            session.create_text_file(parent.as_ref())?;
        }
        DesktopAction::RenameEntity { entity, name } => {
            session.rename_entity(&entity, &name)?;
        }
        DesktopAction::MoveEntity { entity, parent } => {
            session.move_entity(&entity, parent.as_ref())?;
        }
        DesktopAction::RemoveEntity { entity } => {
            let outcome = session.remove_entity(&entity)?;
            effects.extend(outcome.closed_windows.into_iter().map(RuntimeEffect::WindowClosed));
            effects.extend(
                outcome
                    .discarded_edits
                    .into_iter()
                    .map(RuntimeEffect::DiscardedUnsavedEdits),
            );
            push_focused_input(session, &mut effects);
            play(session, &mut effects, "recycle");
        }
        DesktopAction::OpenEntity { entity } => {
            let key = session.open_entity(&entity)?;
            effects.push(RuntimeEffect::FocusWindowInput(key));
            effects.push(RuntimeEffect::EntityActivated(entity));
            play(session, &mut effects, "window-open");
        }
        DesktopAction::OpenPanel { kind } => {
            let (key, _) = session.open_panel(kind)?;
            effects.push(RuntimeEffect::FocusWindowInput(key));
            play(session, &mut effects, "window-open");
        }
        DesktopAction::CloseWindow { key } => {
            let closed = session.close_window(&key)?;
            effects.push(RuntimeEffect::WindowClosed(closed.key));
            if let Some(entity) = closed.discarded_edits {
                effects.push(RuntimeEffect::DiscardedUnsavedEdits(entity));
            }
            push_focused_input(session, &mut effects);
            play(session, &mut effects, "window-close");
        }
        DesktopAction::FocusWindow { key } => {
            if session.focus_window(&key)? {
                effects.push(RuntimeEffect::FocusWindowInput(key));
            }
        }
        DesktopAction::MoveWindow { key, dx, dy } => {
            session.move_window(&key, dx, dy)?;
        }
        DesktopAction::ToggleMaximize { key } => {
            session.toggle_maximize(&key)?;
            effects.push(RuntimeEffect::FocusWindowInput(key));
        }
        DesktopAction::MinimizeWindow { key } => {
            session.minimize_window(&key)?;
            push_focused_input(session, &mut effects);
        }
        DesktopAction::RestoreWindow { key } => {
            session.restore_window(&key)?;
            effects.push(RuntimeEffect::FocusWindowInput(key));
        }
        DesktopAction::ToggleTaskbarWindow { key } => {
            session.toggle_taskbar_window(&key)?;
            push_focused_input(session, &mut effects);
        }
        DesktopAction::BeginMove { key, pointer } => {
            session.begin_window_drag(&key, pointer)?;
        }
        DesktopAction::UpdateMove { pointer } => {
            session.update_window_drag(pointer)?;
        }
        DesktopAction::EndMove => {
            session.end_window_drag();
        }
        DesktopAction::SetWorkspace(rect) => {
            session.set_workspace(rect);
        }
        DesktopAction::StartRename { entity } => {
            session.start_rename(&entity)?;
        }
        DesktopAction::UpdateRename { draft } => {
            session.update_rename(draft)?;
        }
        DesktopAction::CommitRename => {
            let outcome = session.commit_rename()?;
            debug!(?outcome, "rename committed");
        }
        DesktopAction::CancelRename => {
            session.cancel_rename();
        }
        DesktopAction::BeginEntityDrag { entity, origin } => {
            session.begin_entity_drag(&entity, origin)?;
        }
        DesktopAction::UpdateEntityDrag { target } => {
            session.update_entity_drag(target)?;
        }
        DesktopAction::EndEntityDrag { committed } => {
            let outcome = session.end_entity_drag(committed)?;
            push_drop_outcome(session, &mut effects, outcome);
        }
        DesktopAction::CancelEntityDrag => {
            if let Some(outcome) = session.cancel_entity_drag() {
                push_drop_outcome(session, &mut effects, outcome);
            }
        }
        DesktopAction::EditText { entity, text } => {
            session.edit_text(&entity, text)?;
        }
        DesktopAction::SaveBuffer { entity } => {
            session.save_buffer(&entity)?;
        }
        DesktopAction::DiscardBuffer { entity } => {
            session.discard_buffer(&entity)?;
        }
        DesktopAction::Select { entity } => {
            session.select(entity.as_ref())?;
        }
        DesktopAction::Click { entity, now_ms } => {
            let report = session.click_entity(&entity, now_ms)?;
            push_click_report(session, &mut effects, report);
        }
        DesktopAction::PollClicks { now_ms } => {
            let report = session.poll_clicks(now_ms)?;
            push_click_report(session, &mut effects, report);
        }
        DesktopAction::ToggleStartMenu => {
            session.toggle_start_menu();
        }
        DesktopAction::CloseStartMenu => {
            session.close_start_menu();
        }
        DesktopAction::SetBackground(background) => {
            session.theme_mut().set_background(background);
            effects.push(RuntimeEffect::ThemeChanged);
        }
        DesktopAction::SetBackgroundImage(url) => {
            session.theme_mut().set_background_image(&url)?;
            effects.push(RuntimeEffect::ThemeChanged);
        }
        DesktopAction::SetAccentColor(color) => {
            session.theme_mut().set_accent_color(&color)?;
            effects.push(RuntimeEffect::ThemeChanged);
        }
        DesktopAction::ApplyThemePreset(name) => {
            session.theme_mut().apply_preset(&name)?;
            effects.push(RuntimeEffect::ThemeChanged);
        }
        DesktopAction::ResetTheme => {
            session.theme_mut().reset();
            effects.push(RuntimeEffect::ThemeChanged);
        }
        DesktopAction::SetSettings(settings) => {
            session.set_settings(settings);
        }
        DesktopAction::SetDeletePolicy(policy) => {
            session.set_delete_policy(policy);
        }
    }
    Ok(effects)
}

fn play(session: &DesktopSession, effects: &mut Vec<RuntimeEffect>, name: &'static str) {
    if session.settings().sound_enabled {
        effects.push(RuntimeEffect::PlaySound(name));
    }
}

fn push_focused_input(session: &DesktopSession, effects: &mut Vec<RuntimeEffect>) {
    if let Some(key) = session.windows().focused() {
        effects.push(RuntimeEffect::FocusWindowInput(key.clone()));
    }
}

fn push_drop_outcome(session: &DesktopSession, effects: &mut Vec<RuntimeEffect>, outcome: DropOutcome) {
    match outcome {
        DropOutcome::Moved { .. } => {}
        DropOutcome::Cancelled { source, restore_to } => {
            effects.push(RuntimeEffect::RestoreIconPosition {
                entity: source,
                position: restore_to,
            });
        }
        DropOutcome::Rejected {
            source, restore_to, ..
        } => {
            effects.push(RuntimeEffect::RestoreIconPosition {
                entity: source,
                position: restore_to,
            });
            play(session, effects, "error");
        }
    }
}

fn push_click_report(session: &DesktopSession, effects: &mut Vec<RuntimeEffect>, report: ClickReport) {
    if let Some(key) = report.opened {
        if let Some(entity) = key.entity.clone() {
            effects.push(RuntimeEffect::EntityActivated(entity));
        }
        effects.push(RuntimeEffect::FocusWindowInput(key));
        play(session, effects, "window-open");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::DesktopConfig;
    use crate::model::EntityKind;

    fn id(raw: &str) -> EntityId {
        EntityId::new(raw)
    }

    fn session() -> DesktopSession {
        DesktopSession::with_entities(
            DesktopConfig::default(),
            [
                Entity::folder("folderA", "Folder A"),
                Entity::text("file1", "file1.txt", ""),
                Entity::new("pic", "pic.png", EntityKind::Image),
            ],
        )
        .expect("seed session")
    }

    fn open(session: &mut DesktopSession, entity: &str) -> WindowKey {
        let effects = reduce_desktop(
            session,
            DesktopAction::OpenEntity {
                entity: id(entity),
            },
        )
        .expect("open entity");
        effects
            .into_iter()
            .find_map(|effect| match effect {
                RuntimeEffect::FocusWindowInput(key) => Some(key),
                _ => None,
            })
            .expect("focus effect")
    }

    #[test]
    fn open_entity_focuses_new_window_and_updates_stack() {
        let mut s = session();

        let first = open(&mut s, "folderA");
        let second = open(&mut s, "file1");

        let windows = s.windows().windows();
        assert_eq!(s.windows().focused(), Some(&second));
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].key, first);
        assert_eq!(windows[1].key, second);
        assert_eq!(windows[1].z_index, 2);
    }

    #[test]
    fn opening_open_entity_twice_raises_instead_of_duplicating() {
        let mut s = session();
        let folder = open(&mut s, "folderA");
        open(&mut s, "file1");

        open(&mut s, "folderA");

        assert_eq!(s.windows().windows().len(), 2);
        assert_eq!(s.windows().focused(), Some(&folder));
    }

    #[test]
    fn taskbar_toggle_minimizes_if_focused_and_restores_if_minimized() {
        let mut s = session();
        let key = open(&mut s, "folderA");

        reduce_desktop(&mut s, DesktopAction::ToggleTaskbarWindow { key: key.clone() })
            .expect("minimize");
        assert!(s.windows().get(&key).unwrap().minimized);
        assert_eq!(s.windows().focused(), None);

        let effects =
            reduce_desktop(&mut s, DesktopAction::ToggleTaskbarWindow { key: key.clone() })
                .expect("restore");
        assert!(!s.windows().get(&key).unwrap().minimized);
        assert_eq!(effects, vec![RuntimeEffect::FocusWindowInput(key)]);
    }

    #[test]
    fn closing_focused_window_moves_focus_input_to_previous_window() {
        let mut s = session();
        let first = open(&mut s, "folderA");
        let second = open(&mut s, "file1");

        let effects = reduce_desktop(&mut s, DesktopAction::CloseWindow { key: second.clone() })
            .expect("close");

        assert_eq!(
            effects,
            vec![
                RuntimeEffect::WindowClosed(second),
                RuntimeEffect::FocusWindowInput(first.clone()),
                RuntimeEffect::PlaySound("window-close"),
            ]
        );
        assert_eq!(s.windows().focused(), Some(&first));
    }

    #[test]
    fn sounds_are_suppressed_when_disabled() {
        let mut s = session();
        reduce_desktop(
            &mut s,
            DesktopAction::SetSettings(SystemSettings {
                sound_enabled: false,
                ..SystemSettings::default()
            }),
        )
        .expect("settings");

        let effects = reduce_desktop(
            &mut s,
            DesktopAction::OpenPanel {
                kind: WindowKind::Personalize,
            },
        )
        .expect("open panel");

        assert_eq!(
            effects,
            vec![RuntimeEffect::FocusWindowInput(WindowKey::panel(
                WindowKind::Personalize
            ))]
        );
    }

    #[test]
    fn closing_dirty_editor_emits_discarded_edits() {
        let mut s = session();
        let key = open(&mut s, "file1");
        reduce_desktop(
            &mut s,
            DesktopAction::EditText {
                entity: id("file1"),
                text: "unsaved".to_string(),
            },
        )
        .expect("edit");

        let effects = reduce_desktop(&mut s, DesktopAction::CloseWindow { key }).expect("close");

        assert!(effects.contains(&RuntimeEffect::DiscardedUnsavedEdits(id("file1"))));
    }

    #[test]
    fn uncommitted_entity_drag_restores_icon_position() {
        let mut s = session();
        let origin = PointerPosition::new(16, 96);
        reduce_desktop(
            &mut s,
            DesktopAction::BeginEntityDrag {
                entity: id("file1"),
                origin,
            },
        )
        .expect("begin drag");
        reduce_desktop(
            &mut s,
            DesktopAction::UpdateEntityDrag {
                target: Some(DropTarget::Icon(id("pic"))),
            },
        )
        .expect("hover");

        let effects =
            reduce_desktop(&mut s, DesktopAction::EndEntityDrag { committed: true }).expect("drop");

        assert_eq!(
            effects,
            vec![RuntimeEffect::RestoreIconPosition {
                entity: id("file1"),
                position: origin,
            }]
        );
        assert_eq!(s.store().get(&id("file1")).unwrap().parent, None);
    }

    #[test]
    fn double_click_activates_entity() {
        let mut s = session();
        reduce_desktop(
            &mut s,
            DesktopAction::Click {
                entity: id("folderA"),
                now_ms: 0,
            },
        )
        .expect("first click");
        let effects = reduce_desktop(
            &mut s,
            DesktopAction::Click {
                entity: id("folderA"),
                now_ms: 100,
            },
        )
        .expect("second click");

        assert_eq!(
            effects,
            vec![
                RuntimeEffect::EntityActivated(id("folderA")),
                RuntimeEffect::FocusWindowInput(WindowKey::folder("folderA")),
                RuntimeEffect::PlaySound("window-open"),
            ]
        );
    }

    #[test]
    fn rejected_theme_input_reports_error_without_effects() {
        let mut s = session();
        let before = s.theme().clone();

        let err = reduce_desktop(&mut s, DesktopAction::SetAccentColor("blue".to_string()))
            .unwrap_err();

        assert!(matches!(err, DesktopError::InvalidInput(_)));
        assert_eq!(s.theme(), &before);
    }

    #[test]
    fn window_moves_by_extreme_deltas_are_clamped_not_fatal() {
        let mut s = session();
        let key = open(&mut s, "folderA");

        reduce_desktop(
            &mut s,
            DesktopAction::MoveWindow {
                key: key.clone(),
                dx: i32::MAX,
                dy: i32::MAX,
            },
        )
        .expect("move by i32::MAX");
        let rect = s.windows().get(&key).unwrap().rect;
        assert_eq!((rect.x, rect.y), (i32::MAX, i32::MAX));

        reduce_desktop(
            &mut s,
            DesktopAction::BeginMove {
                key: key.clone(),
                pointer: PointerPosition::new(-10, 0),
            },
        )
        .expect("begin move");
        reduce_desktop(
            &mut s,
            DesktopAction::UpdateMove {
                pointer: PointerPosition::new(i32::MAX, 0),
            },
        )
        .expect("update move");
        assert_eq!(s.windows().get(&key).unwrap().rect.x, i32::MAX);
    }

    #[test]
    fn missing_window_is_an_error() {
        let mut s = session();
        assert_eq!(
            reduce_desktop(
                &mut s,
                DesktopAction::FocusWindow {
                    key: WindowKey::folder("folderA"),
                },
            ),
            Err(DesktopError::WindowNotFound(WindowKey::folder("folderA")))
        );
    }
}
