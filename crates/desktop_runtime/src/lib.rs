//! Leptos runtime around [`desktop_engine::DesktopSession`]: a context provider, dispatch loop,
//! and effect executor for browser shells.

pub mod effect_executor;
pub mod host;
pub mod runtime_context;

pub use host::{window_primary_input_dom_id, DesktopHost};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
