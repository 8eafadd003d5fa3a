//! Desktop theme and system preferences owned by a session.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::click::DoubleClickSpeed;
use crate::error::{DesktopError, DesktopResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundKind {
    GradientBlue,
    GradientPink,
    GradientGreen,
    Dark,
    Ocean,
    Sunset,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeState {
    pub name: String,
    pub colors: ThemeColors,
    pub background: BackgroundKind,
    /// Wallpaper URL; only meaningful when `background` is [`BackgroundKind::Image`].
    pub background_image: Option<String>,
}

/// Built-in preset, kept as static data so lookup does not allocate.
struct ThemePreset {
    name: &'static str,
    colors: [&'static str; 5],
    background: BackgroundKind,
}

const PRESETS: [ThemePreset; 5] = [
    ThemePreset {
        name: "Dark Mode",
        colors: ["#3B82F6", "#8B5CF6", "#3B82F6", "#111827", "#F9FAFB"],
        background: BackgroundKind::Dark,
    },
    ThemePreset {
        name: "Ocean Blue",
        colors: ["#0EA5E9", "#06B6D4", "#0EA5E9", "#0C4A6E", "#F0F9FF"],
        background: BackgroundKind::Ocean,
    },
    ThemePreset {
        name: "Purple Dream",
        colors: ["#8B5CF6", "#A855F7", "#8B5CF6", "#581C87", "#FAF5FF"],
        background: BackgroundKind::GradientBlue,
    },
    ThemePreset {
        name: "Sunset Glow",
        colors: ["#F59E0B", "#EF4444", "#F59E0B", "#7C2D12", "#FFF7ED"],
        background: BackgroundKind::Sunset,
    },
    ThemePreset {
        name: "Forest Green",
        colors: ["#10B981", "#84CC16", "#10B981", "#14532D", "#F0FDF4"],
        background: BackgroundKind::GradientGreen,
    },
];

impl ThemePreset {
    fn to_state(&self) -> ThemeState {
        let [primary, secondary, accent, background, text] = self.colors.map(str::to_string);
        ThemeState {
            name: self.name.to_string(),
            colors: ThemeColors {
                primary,
                secondary,
                accent,
                background,
                text,
            },
            background: self.background,
            background_image: None,
        }
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        PRESETS[0].to_state()
    }
}

impl ThemeState {
    /// Names of the built-in presets in display order.
    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|preset| preset.name)
    }

    pub fn set_background(&mut self, background: BackgroundKind) {
        self.background = background;
    }

    /// Switches to an image wallpaper.
    ///
    /// # Errors
    ///
    /// [`DesktopError::InvalidInput`] for a blank URL.
    pub fn set_background_image(&mut self, url: &str) -> DesktopResult<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DesktopError::InvalidInput(
                "background image url is empty".to_string(),
            ));
        }
        self.background = BackgroundKind::Image;
        self.background_image = Some(url.to_string());
        Ok(())
    }

    /// Sets the accent color from a `#RRGGBB` literal.
    ///
    /// # Errors
    ///
    /// [`DesktopError::InvalidInput`] for anything else.
    pub fn set_accent_color(&mut self, color: &str) -> DesktopResult<()> {
        if !is_hex_color(color) {
            return Err(DesktopError::InvalidInput(format!(
                "accent color `{color}` is not #RRGGBB"
            )));
        }
        self.colors.accent = color.to_ascii_uppercase();
        Ok(())
    }

    /// Replaces the whole theme with a built-in preset.
    ///
    /// # Errors
    ///
    /// [`DesktopError::InvalidInput`] when no preset has that name.
    pub fn apply_preset(&mut self, name: &str) -> DesktopResult<()> {
        let preset = PRESETS
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| DesktopError::InvalidInput(format!("unknown theme preset `{name}`")))?;
        *self = preset.to_state();
        debug!(theme = preset.name, "theme preset applied");
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn is_hex_color(raw: &str) -> bool {
    raw.strip_prefix('#')
        .map(|digits| digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
    pub double_click_speed: DoubleClickSpeed,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            notifications_enabled: true,
            double_click_speed: DoubleClickSpeed::Medium,
        }
    }
}
