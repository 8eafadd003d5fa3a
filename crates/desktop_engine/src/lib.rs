//! Headless state engine for a browser desktop: a virtual entity tree, a window manager, icon
//! drag-and-drop, text edit buffers, and click disambiguation, all owned by one
//! [`DesktopSession`] and driven through [`reduce_desktop`].
//!
//! The crate performs no I/O besides optional config loading and installs no `tracing`
//! subscriber.

pub mod click;
pub mod config;
pub mod drag_drop;
pub mod edit_buffer;
pub mod entity_store;
pub mod error;
pub mod model;
pub mod reducer;
pub mod session;
pub mod theme;
pub mod time;
pub mod window_manager;

pub use click::{ClickResolution, ClickState, ClickTracker, DoubleClickSpeed, DOUBLE_CLICK_WINDOW_MS};
pub use config::{ConfigError, DesktopConfig};
pub use drag_drop::{DragDropCoordinator, DropOutcome, DropTarget, EntityDragSession};
pub use edit_buffer::EditBuffer;
pub use entity_store::{DeletePolicy, EntityStore, RemovalReport};
pub use error::{DesktopError, DesktopResult, ErrorKind};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, RuntimeEffect};
pub use session::{ClickReport, ClosedWindow, DesktopSession, RemovalOutcome};
pub use theme::{BackgroundKind, SystemSettings, ThemeColors, ThemeState};
pub use time::{unix_time_ms_now, ModifiedClock};
pub use window_manager::{OpenOutcome, RenameOutcome, RenameSession, WindowDragSession, WindowManager};
