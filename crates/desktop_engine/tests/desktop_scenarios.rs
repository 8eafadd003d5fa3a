use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use desktop_engine::{
    reduce_desktop, ClickResolution, ConfigError, DeletePolicy, DesktopAction, DesktopConfig,
    DesktopSession, DoubleClickSpeed, DropTarget, Entity, EntityId, PointerPosition, RuntimeEffect,
    WindowKey, DOUBLE_CLICK_WINDOW_MS,
};

fn id(raw: &str) -> EntityId {
    EntityId::new(raw)
}

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("{prefix}_{}_{}", process::id(), nanos));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

fn desktop() -> DesktopSession {
    DesktopSession::with_entities(
        DesktopConfig::default(),
        [
            Entity::folder("folderA", "Folder A"),
            Entity::folder("folderB", "Folder B"),
            Entity::text("f1", "f1.txt", ""),
            Entity::text("file1", "file1.txt", "x"),
        ],
    )
    .expect("seed desktop")
}

fn dispatch(session: &mut DesktopSession, action: DesktopAction) -> Vec<RuntimeEffect> {
    reduce_desktop(session, action).expect("action accepted")
}

#[test]
fn save_scenario_commits_buffer_only_on_save() {
    let mut s = desktop();
    dispatch(&mut s, DesktopAction::OpenEntity { entity: id("f1") });

    dispatch(
        &mut s,
        DesktopAction::EditText {
            entity: id("f1"),
            text: "hello".to_string(),
        },
    );
    assert!(s.buffer(&id("f1")).expect("buffer").is_dirty());
    assert_eq!(s.store().get(&id("f1")).expect("f1").content.as_deref(), Some(""));

    dispatch(&mut s, DesktopAction::SaveBuffer { entity: id("f1") });
    assert!(!s.buffer(&id("f1")).expect("buffer").is_dirty());
    assert_eq!(
        s.store().get(&id("f1")).expect("f1").content.as_deref(),
        Some("hello")
    );
}

#[test]
fn drag_scenario_moves_into_folder_and_ignores_non_folder_target() {
    let mut s = desktop();

    dispatch(
        &mut s,
        DesktopAction::BeginEntityDrag {
            entity: id("file1"),
            origin: PointerPosition::new(10, 10),
        },
    );
    dispatch(
        &mut s,
        DesktopAction::UpdateEntityDrag {
            target: Some(DropTarget::Icon(id("folderA"))),
        },
    );
    assert_eq!(s.drag_drop().highlighted_target(), Some(&id("folderA")));
    let effects = dispatch(&mut s, DesktopAction::EndEntityDrag { committed: true });
    assert!(effects.is_empty());
    assert_eq!(
        s.store().get(&id("file1")).expect("file1").parent,
        Some(id("folderA"))
    );

    dispatch(
        &mut s,
        DesktopAction::BeginEntityDrag {
            entity: id("file1"),
            origin: PointerPosition::new(10, 10),
        },
    );
    dispatch(
        &mut s,
        DesktopAction::UpdateEntityDrag {
            target: Some(DropTarget::Icon(id("f1"))),
        },
    );
    dispatch(&mut s, DesktopAction::EndEntityDrag { committed: true });
    assert_eq!(
        s.store().get(&id("file1")).expect("file1").parent,
        Some(id("folderA"))
    );
}

#[test]
fn folder_window_accepts_drop_from_desktop() {
    let mut s = desktop();
    dispatch(&mut s, DesktopAction::OpenEntity { entity: id("folderB") });

    dispatch(
        &mut s,
        DesktopAction::BeginEntityDrag {
            entity: id("folderA"),
            origin: PointerPosition::new(0, 0),
        },
    );
    dispatch(
        &mut s,
        DesktopAction::UpdateEntityDrag {
            target: Some(DropTarget::FolderWindow(id("folderB"))),
        },
    );
    dispatch(&mut s, DesktopAction::EndEntityDrag { committed: true });

    let children: Vec<&EntityId> = s
        .store()
        .list_children(Some(&id("folderB")))
        .into_iter()
        .map(|entity| &entity.id)
        .collect();
    assert_eq!(children, vec![&id("folderA")]);
}

#[test]
fn opening_same_entity_twice_keeps_one_window() {
    let mut s = desktop();
    dispatch(&mut s, DesktopAction::OpenEntity { entity: id("folderA") });
    dispatch(&mut s, DesktopAction::OpenEntity { entity: id("folderA") });

    assert_eq!(s.windows().windows().len(), 1);
}

#[test]
fn closing_focused_window_returns_focus_to_previous() {
    let mut s = desktop();
    dispatch(&mut s, DesktopAction::OpenEntity { entity: id("folderA") });
    dispatch(&mut s, DesktopAction::OpenEntity { entity: id("folderB") });
    dispatch(&mut s, DesktopAction::OpenEntity { entity: id("f1") });
    dispatch(
        &mut s,
        DesktopAction::FocusWindow {
            key: WindowKey::folder("folderA"),
        },
    );
    dispatch(
        &mut s,
        DesktopAction::FocusWindow {
            key: WindowKey::text_editor("f1"),
        },
    );

    dispatch(
        &mut s,
        DesktopAction::CloseWindow {
            key: WindowKey::text_editor("f1"),
        },
    );

    assert_eq!(s.windows().focused(), Some(&WindowKey::folder("folderA")));
}

#[test]
fn slow_clicks_resolve_as_two_singles() {
    let mut s = desktop();
    let late = DOUBLE_CLICK_WINDOW_MS + 1;

    dispatch(
        &mut s,
        DesktopAction::Click {
            entity: id("folderA"),
            now_ms: 0,
        },
    );
    let second = reduce_desktop(
        &mut s,
        DesktopAction::Click {
            entity: id("folderA"),
            now_ms: late,
        },
    )
    .expect("second click");
    assert!(second.is_empty());
    assert_eq!(s.selected(), Some(&id("folderA")));

    let polled = s.poll_clicks(late * 2 + 1).expect("poll");
    assert_eq!(polled.resolution, Some(ClickResolution::Single(id("folderA"))));
    assert!(s.windows().windows().is_empty());
}

#[test]
fn removing_open_folder_closes_its_window() {
    let mut s = desktop();
    dispatch(&mut s, DesktopAction::OpenEntity { entity: id("folderA") });
    dispatch(
        &mut s,
        DesktopAction::MoveEntity {
            entity: id("file1"),
            parent: Some(id("folderA")),
        },
    );

    let effects = dispatch(&mut s, DesktopAction::RemoveEntity { entity: id("folderA") });

    assert!(effects.contains(&RuntimeEffect::WindowClosed(WindowKey::folder("folderA"))));
    assert_eq!(s.store().get(&id("file1")).expect("file1").parent, None);
}

#[test]
fn config_file_drives_session_policies() {
    let root = temp_dir("desktop_engine_config");
    let path = root.join("desktop.toml");
    fs::write(
        &path,
        r#"
[workspace]
width = 1024
height = 768
taskbar_height = 40

[entities]
delete_policy = "cascade"

[input]
double_click_speed = "slow"
"#,
    )
    .expect("write config");

    let config = DesktopConfig::load(&path).expect("load config");
    let session = DesktopSession::new(config);

    assert_eq!(session.store().delete_policy(), DeletePolicy::Cascade);
    assert_eq!(session.clicks().window_ms(), DoubleClickSpeed::Slow.window_ms());
    assert_eq!(session.windows().workspace().h, 728);
    assert_eq!(session.config().windows.cascade_slots, 8);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_config_file_is_a_read_error() {
    let root = temp_dir("desktop_engine_config_missing");

    let err = DesktopConfig::load(&root.join("absent.toml")).expect_err("missing file");

    assert!(matches!(err, ConfigError::Read { .. }));
    let _ = fs::remove_dir_all(root);
}
