#![forbid(unsafe_code)]

//! Overlay presentation: one step on screen at a time.
//!
//! The presenter owns the full-screen overlay node's contents: the dimmed
//! backdrop with its cutout, and the tooltip with its fades. It is driven
//! entirely from outside: the engine hands it validated geometry via
//! [`OverlayPresenter::present`], the host forwards taps and clock ticks, and
//! the presenter answers with at most one [`PresenterSignal::Dismissed`] per
//! presentation.
//!
//! # Invariants
//! - `Dismissed` fires exactly once per `present` call, on the tick the exit
//!   fade completes, never on the tap itself.
//! - A second tap (or any other dismiss trigger) during the exit fade is a
//!   no-op; the `dismiss_in_progress` / `dismissed` pair guards it.
//! - `cleanup` never fires a signal: it cancels, it does not dismiss.

use std::time::Duration;

use tracing::debug;
use waymark_core::{OverlayId, Point, Rect, Size};

use crate::placement::{PlacementMetrics, PreferredSide, place};
use crate::scene::{DrawCommand, OverlayTheme, push_backdrop, push_tooltip};
use crate::tooltip::{TooltipLayout, TooltipMetrics, layout, measure};

/// Fade phase of the tooltip node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipPhase {
    /// No tooltip on screen.
    #[default]
    Hidden,
    /// Enter fade running (opacity 0 → 1).
    FadingIn { elapsed: Duration },
    /// Fully opaque and interactive.
    Visible,
    /// Exit fade running (opacity 1 → 0).
    FadingOut { elapsed: Duration },
}

impl TooltipPhase {
    /// Whether the tooltip should be rendered at all.
    #[inline]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Whether a fade is currently running.
    #[inline]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::FadingIn { .. } | Self::FadingOut { .. })
    }
}

/// Durations, theme, and metrics bundled for one presenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenterConfig {
    /// Enter fade duration.
    pub fade_in: Duration,
    /// Exit fade duration.
    pub fade_out: Duration,
    /// Overlay colors and highlight spacing.
    pub theme: OverlayTheme,
    /// Tooltip text metrics.
    pub tooltip: TooltipMetrics,
    /// Placement margins.
    pub placement: PlacementMetrics,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            fade_in: Duration::from_millis(300),
            fade_out: Duration::from_millis(200),
            theme: OverlayTheme::default(),
            tooltip: TooltipMetrics::default(),
            placement: PlacementMetrics::default(),
        }
    }
}

impl PresenterConfig {
    /// Override the enter fade duration.
    #[must_use]
    pub fn with_fade_in(mut self, duration: Duration) -> Self {
        self.fade_in = duration;
        self
    }

    /// Override the exit fade duration.
    #[must_use]
    pub fn with_fade_out(mut self, duration: Duration) -> Self {
        self.fade_out = duration;
        self
    }
}

/// Raised by [`OverlayPresenter::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterSignal {
    /// The exit fade finished and the tooltip was torn down.
    Dismissed,
}

/// What a pointer tap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Tap landed inside the tooltip; swallowed.
    Swallowed,
    /// Tap landed outside; the exit fade has started.
    DismissStarted,
    /// Nothing to dismiss (no tooltip, or dismissal already underway).
    Ignored,
}

#[derive(Debug)]
struct PresentedStep {
    target: Rect,
    layout: TooltipLayout,
}

/// Owns the overlay node's contents for the duration of one tutorial run.
#[derive(Debug)]
pub struct OverlayPresenter {
    id: OverlayId,
    config: PresenterConfig,
    phase: TooltipPhase,
    current: Option<PresentedStep>,
    dismiss_in_progress: bool,
    dismissed: bool,
}

impl OverlayPresenter {
    /// Create a presenter with default timing and theme.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PresenterConfig::default())
    }

    /// Create a presenter with explicit configuration.
    #[must_use]
    pub fn with_config(config: PresenterConfig) -> Self {
        Self {
            id: OverlayId::next(),
            config,
            phase: TooltipPhase::Hidden,
            current: None,
            dismiss_in_progress: false,
            dismissed: false,
        }
    }

    /// Identity of the overlay node this presenter fills.
    #[inline]
    pub fn overlay_id(&self) -> OverlayId {
        self.id
    }

    /// Current fade phase.
    #[inline]
    pub fn phase(&self) -> TooltipPhase {
        self.phase
    }

    /// Whether a step is currently on screen (in any fade phase).
    #[inline]
    pub fn is_presenting(&self) -> bool {
        self.current.is_some()
    }

    /// The rect currently highlighted, if any.
    pub fn highlight(&self) -> Option<Rect> {
        self.current.as_ref().map(|step| step.target)
    }

    /// Show a step: measure, place, lay out, and start the enter fade.
    ///
    /// Any previously shown tooltip is torn down first; its pending dismissal
    /// (if one was mid-fade) is cancelled, not signaled.
    pub fn present(
        &mut self,
        target: Rect,
        title: &str,
        message: &str,
        preferred: PreferredSide,
        screen: Size,
    ) {
        let measured = measure(title, message, screen, &self.config.tooltip);
        let placed = place(
            target,
            measured.outer,
            screen,
            preferred,
            &self.config.placement,
        );
        let laid = layout(placed, measured, target.center_x(), &self.config.tooltip);

        debug!(
            overlay = self.id.get(),
            x = placed.x,
            y = placed.y,
            above = placed.above_target,
            "presenting step"
        );

        self.current = Some(PresentedStep {
            target,
            layout: laid,
        });
        self.phase = TooltipPhase::FadingIn {
            elapsed: Duration::ZERO,
        };
        self.dismiss_in_progress = false;
        self.dismissed = false;
    }

    /// Route a pointer tap.
    ///
    /// Inside the tooltip: swallowed. Anywhere else on the overlay: starts the
    /// exit fade, unless one is already running or done.
    pub fn pointer_tap(&mut self, p: Point) -> TapOutcome {
        let Some(step) = &self.current else {
            return TapOutcome::Ignored;
        };
        if step.layout.contains(p) {
            return TapOutcome::Swallowed;
        }
        if self.dismiss() {
            TapOutcome::DismissStarted
        } else {
            debug!(overlay = self.id.get(), "tap ignored, dismissal underway");
            TapOutcome::Ignored
        }
    }

    /// Start the exit fade without a pointer event.
    ///
    /// Hosts route hardware back buttons or accessibility dismiss actions
    /// here. Returns `false` when nothing is showing or a dismissal is
    /// already underway, so duplicate requests collapse into one.
    pub fn dismiss(&mut self) -> bool {
        if self.current.is_none() || self.dismiss_in_progress || self.dismissed {
            return false;
        }
        self.begin_dismiss();
        true
    }

    /// Advance whichever fade is running.
    ///
    /// Returns [`PresenterSignal::Dismissed`] on the tick the exit fade
    /// completes; the tooltip and highlight are already gone by then.
    pub fn tick(&mut self, delta: Duration) -> Option<PresenterSignal> {
        match self.phase {
            TooltipPhase::FadingIn { elapsed } => {
                let elapsed = elapsed + delta;
                if elapsed >= self.config.fade_in {
                    self.phase = TooltipPhase::Visible;
                } else {
                    self.phase = TooltipPhase::FadingIn { elapsed };
                }
                None
            }
            TooltipPhase::FadingOut { elapsed } => {
                let elapsed = elapsed + delta;
                if elapsed >= self.config.fade_out {
                    self.complete_dismiss();
                    Some(PresenterSignal::Dismissed)
                } else {
                    self.phase = TooltipPhase::FadingOut { elapsed };
                    None
                }
            }
            TooltipPhase::Hidden | TooltipPhase::Visible => None,
        }
    }

    /// Current tooltip opacity in `[0.0, 1.0]`.
    pub fn opacity(&self) -> f32 {
        match self.phase {
            TooltipPhase::Hidden => 0.0,
            TooltipPhase::Visible => 1.0,
            TooltipPhase::FadingIn { elapsed } => {
                fade_progress(elapsed, self.config.fade_in).clamp(0.0, 1.0)
            }
            TooltipPhase::FadingOut { elapsed } => {
                (1.0 - fade_progress(elapsed, self.config.fade_out)).clamp(0.0, 1.0)
            }
        }
    }

    /// Build this frame's draw commands in paint order.
    pub fn scene(&self, screen: Size) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        push_backdrop(&mut commands, screen, self.highlight(), &self.config.theme);
        if let Some(step) = &self.current {
            push_tooltip(
                &mut commands,
                &step.layout,
                self.opacity(),
                &self.config.theme,
                &self.config.tooltip,
            );
        }
        commands
    }

    /// Reset to the empty state: no tooltip, no highlight, no pending fade.
    ///
    /// Idempotent and signal-free; an in-flight dismissal is cancelled rather
    /// than completed.
    pub fn cleanup(&mut self) {
        if self.current.is_some() || self.phase.is_visible() {
            debug!(overlay = self.id.get(), "presenter cleanup");
        }
        self.current = None;
        self.phase = TooltipPhase::Hidden;
        self.dismiss_in_progress = false;
        self.dismissed = false;
    }

    fn begin_dismiss(&mut self) {
        self.dismiss_in_progress = true;
        self.dismissed = true;

        // Mirror the remaining enter progress so opacity stays continuous
        // when a tap lands mid-fade-in.
        let start = match self.phase {
            TooltipPhase::FadingIn { elapsed } => {
                let shown = fade_progress(elapsed, self.config.fade_in).clamp(0.0, 1.0);
                self.config.fade_out.mul_f32(1.0 - shown)
            }
            _ => Duration::ZERO,
        };
        debug!(overlay = self.id.get(), "exit fade started");
        self.phase = TooltipPhase::FadingOut { elapsed: start };
    }

    fn complete_dismiss(&mut self) {
        // Tooltip first, then the highlight reference: the hole must be gone
        // before the engine hears about the dismissal.
        self.current = None;
        self.phase = TooltipPhase::Hidden;
        self.dismiss_in_progress = false;
        debug!(overlay = self.id.get(), "dismissal complete");
    }
}

impl Default for OverlayPresenter {
    fn default() -> Self {
        Self::new()
    }
}

fn fade_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    elapsed.as_secs_f32() / duration.as_secs_f32()
}
