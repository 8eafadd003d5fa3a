//! Browser-facing execution of reducer effects.
//!
//! Everything here is a no-op off `wasm32` so the runtime can be driven from native tests.

use desktop_engine::{ThemeState, WindowKey, WindowRect};
#[cfg(target_arch = "wasm32")]
use leptos::logging;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

/// DOM id of the element that should receive keyboard focus when `key` is focused.
pub fn window_primary_input_dom_id(key: &WindowKey) -> String {
    format!("desktop-window-input-{}", key.to_string().replace(':', "-"))
}

#[derive(Debug, Clone, Copy, Default)]
/// Host hooks used by the effect executor.
pub struct DesktopHost;

impl DesktopHost {
    /// Current browser viewport minus the taskbar strip, if a window is available.
    pub fn desktop_viewport_rect(&self, taskbar_height_px: i32) -> Option<WindowRect> {
        #[cfg(target_arch = "wasm32")]
        {
            let window = web_sys::window()?;
            let width = window.inner_width().ok()?.as_f64()? as i32;
            let height = window.inner_height().ok()?.as_f64()? as i32;
            Some(WindowRect::new(
                0,
                0,
                width.max(320),
                (height - taskbar_height_px).max(220),
            ))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = taskbar_height_px;
            None
        }
    }

    pub fn focus_window_input(&self, key: &WindowKey) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Some(document) = window.document() else {
                return;
            };
            let Some(element) = document.get_element_by_id(&window_primary_input_dom_id(key)) else {
                return;
            };
            let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() else {
                return;
            };
            let callback = Closure::once_into_js(move || {
                let _ = element.focus();
            });
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = key;
    }

    /// Publishes palette colors as CSS custom properties on the document root.
    pub fn apply_theme(&self, theme: &ThemeState) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(root) = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.document_element())
                .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
            else {
                return;
            };
            let style = root.style();
            let colors = &theme.colors;
            for (name, value) in [
                ("--desktop-primary", colors.primary.as_str()),
                ("--desktop-secondary", colors.secondary.as_str()),
                ("--desktop-accent", colors.accent.as_str()),
                ("--desktop-background", colors.background.as_str()),
                ("--desktop-text", colors.text.as_str()),
            ] {
                if let Err(err) = style.set_property(name, value) {
                    logging::warn!("failed to set {name}: {err:?}");
                }
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = theme;
    }
}
