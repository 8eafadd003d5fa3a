//! Single/double click disambiguation as an explicit state machine.
//!
//! `Idle → AwaitingSecondClick { target, deadline } → resolved`. Callers feed monotonic
//! millisecond timestamps (pointer event time stamps), so the tracker itself never reads a clock.

use serde::{Deserialize, Serialize};

use crate::model::EntityId;

/// Double-click window for the default (`medium`) speed.
pub const DOUBLE_CLICK_WINDOW_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// User-selectable double-click speed.
pub enum DoubleClickSpeed {
    /// Generous window for slower clickers.
    Slow,
    /// Default window.
    #[default]
    Medium,
    /// Tight window.
    Fast,
}

impl DoubleClickSpeed {
    /// Window length in milliseconds.
    pub const fn window_ms(self) -> u64 {
        match self {
            Self::Slow => 400,
            Self::Medium => DOUBLE_CLICK_WINDOW_MS,
            Self::Fast => 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClickState {
    #[default]
    Idle,
    AwaitingSecondClick { target: EntityId, deadline_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A fully disambiguated click.
pub enum ClickResolution {
    /// One click with no follow-up inside the window.
    Single(EntityId),
    /// Two clicks on the same target inside the window.
    Double(EntityId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTracker {
    state: ClickState,
    window_ms: u64,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DoubleClickSpeed::default())
    }
}

impl ClickTracker {
    pub fn new(speed: DoubleClickSpeed) -> Self {
        Self {
            state: ClickState::Idle,
            window_ms: speed.window_ms(),
        }
    }

    pub fn state(&self) -> &ClickState {
        &self.state
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Changes the window length; a pending click keeps the deadline it started with.
    pub fn set_speed(&mut self, speed: DoubleClickSpeed) {
        self.window_ms = speed.window_ms();
    }

    /// Feeds a click on `target` at `now_ms`.
    ///
    /// Returns the resolution this click completed, if any: `Double` when it paired with a
    /// pending click on the same target at or before the deadline, or `Single` for a pending
    /// click it superseded (other target, or deadline already passed). In the superseding case
    /// the new click becomes the pending one.
    pub fn register(&mut self, target: EntityId, now_ms: u64) -> Option<ClickResolution> {
        match std::mem::take(&mut self.state) {
            ClickState::AwaitingSecondClick {
                target: pending,
                deadline_ms,
            } if pending == target && now_ms <= deadline_ms => Some(ClickResolution::Double(target)),
            ClickState::AwaitingSecondClick { target: pending, .. } => {
                self.await_second(target, now_ms);
                Some(ClickResolution::Single(pending))
            }
            ClickState::Idle => {
                self.await_second(target, now_ms);
                None
            }
        }
    }

    /// Resolves a pending click as `Single` once `now_ms` is past its deadline.
    pub fn poll(&mut self, now_ms: u64) -> Option<ClickResolution> {
        let expired = matches!(
            &self.state,
            ClickState::AwaitingSecondClick { deadline_ms, .. } if now_ms > *deadline_ms
        );
        if !expired {
            return None;
        }
        match std::mem::take(&mut self.state) {
            ClickState::AwaitingSecondClick { target, .. } => Some(ClickResolution::Single(target)),
            ClickState::Idle => None,
        }
    }

    /// Drops any pending click without resolving it.
    pub fn reset(&mut self) {
        self.state = ClickState::Idle;
    }

    fn await_second(&mut self, target: EntityId, now_ms: u64) {
        self.state = ClickState::AwaitingSecondClick {
            target,
            deadline_ms: now_ms.saturating_add(self.window_ms),
        };
    }
}
