#![forbid(unsafe_code)]

//! Tutorial state machine.
//!
//! # Role
//! Drives one tutorial at a time from [`start`](TutorialEngine::start) to a
//! terminal [`TutorialEvent`]. The engine owns step ordering, the settle
//! delay before the first step, the gap between steps, skip-on-invalid
//! target resolution, and the shown-flag write on completion. Rendering and
//! hit-testing of the single visible step live in the
//! [`OverlayPresenter`] it carries.
//!
//! # Invariants
//! - At most one run is active; starting another aborts the first with
//!   [`AbortReason::Superseded`] before the new one begins.
//! - Steps present in index order. A step whose target cannot be resolved
//!   is skipped and never revisited, even if the target appears later.
//! - The shown flag is written exactly when `Completed` fires. Cancellation
//!   and aborts leave it untouched, so the tutorial may run again.
//! - All timing flows through [`tick`](TutorialEngine::tick). The engine
//!   never reads a clock and never spawns a thread.
//!
//! # Failure Modes
//! - A dropped host surface aborts the run with `SurfaceUnavailable`.
//! - A host that detaches the overlay gets one reattach attempt per step;
//!   if that also fails the run aborts with `SurfaceDetached`.
//! - Flag-store write failures are logged and swallowed; a tutorial that
//!   completed but could not be recorded simply replays next launch.
//!
//! # Example
//! ```ignore
//! let mut engine = TutorialEngine::new(registry, Box::new(resolver));
//! engine.start(tutorial, &surface);
//! loop {
//!     engine.tick(frame_delta);
//!     for event in engine.take_events() {
//!         println!("{event:?}");
//!     }
//!     host.draw(engine.scene());
//! }
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};
use waymark_core::{
    AbortReason, HostSurface, OverlayId, Point, StoreError, SurfaceHandle, TargetResolver,
    TargetSnapshot, Tutorial, TutorialEvent, TutorialId,
};
use waymark_overlay::{
    DrawCommand, OverlayPresenter, PresenterConfig, PresenterSignal, TapOutcome,
    preferred_side_for,
};

use crate::registry::ShownRegistry;

/// Timing knobs for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Wait after attach before the first step, so host layout can settle.
    pub settle_delay: Duration,
    /// Pause between a step's exit fade and the next step's enter fade.
    pub step_gap: Duration,
    /// Fades, colors, and text metrics for the presenter.
    pub presenter: PresenterConfig,
}

impl EngineConfig {
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    #[must_use]
    pub fn with_step_gap(mut self, gap: Duration) -> Self {
        self.step_gap = gap;
        self
    }

    #[must_use]
    pub fn with_presenter(mut self, presenter: PresenterConfig) -> Self {
        self.presenter = presenter;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
            step_gap: Duration::from_millis(100),
            presenter: PresenterConfig::default(),
        }
    }
}

#[derive(Debug)]
struct ActiveRun {
    tutorial: Tutorial,
    step_index: usize,
    presenter: OverlayPresenter,
    /// Time left before the next step evaluation: the settle delay right
    /// after start, the step gap after a dismissal, `None` while a step is
    /// on screen.
    pending: Option<Duration>,
    /// Set while a dismissal is being turned into the next step, so a
    /// duplicate dismiss signal in that window cannot double-advance.
    advancing: bool,
}

#[derive(Debug)]
enum EngineState {
    Idle,
    Active(ActiveRun),
}

enum Wake {
    Evaluate,
    Advance,
}

/// Drives tutorials against host-provided target resolution and surfaces.
///
/// Single-threaded by construction: every method takes `&mut self` or
/// `&self`, events queue up inside, and the host drains them with
/// [`take_events`](TutorialEngine::take_events) whenever convenient.
pub struct TutorialEngine {
    registry: ShownRegistry,
    resolver: Box<dyn TargetResolver>,
    /// Non-owning reference to the surface the current (or last) run
    /// attached to.
    surface: Option<SurfaceHandle>,
    config: EngineConfig,
    state: EngineState,
    events: Vec<TutorialEvent>,
}

impl TutorialEngine {
    pub fn new(registry: ShownRegistry, resolver: Box<dyn TargetResolver>) -> Self {
        Self::with_config(registry, resolver, EngineConfig::default())
    }

    pub fn with_config(
        registry: ShownRegistry,
        resolver: Box<dyn TargetResolver>,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            resolver,
            surface: None,
            config,
            state: EngineState::Idle,
            events: Vec::new(),
        }
    }

    /// Begin a run on `surface`.
    ///
    /// A tutorial that already completed is ignored. An active run is
    /// aborted with [`AbortReason::Superseded`] first. The first step
    /// appears after the configured settle delay; until then the overlay
    /// shows only the dim layer.
    pub fn start(&mut self, tutorial: Tutorial, surface: &Rc<RefCell<dyn HostSurface>>) {
        if self.registry.has_shown(&tutorial.id) {
            debug!(tutorial = %tutorial.id, "already shown, ignoring start");
            return;
        }
        if self.is_active() {
            self.abort(AbortReason::Superseded);
        }

        let presenter = OverlayPresenter::with_config(self.config.presenter);
        let overlay_id = presenter.overlay_id();
        if let Err(err) = surface.borrow_mut().attach_overlay(overlay_id) {
            warn!(tutorial = %tutorial.id, error = %err, "overlay attach failed");
            self.events.push(TutorialEvent::Aborted {
                tutorial: tutorial.id,
                reason: AbortReason::SurfaceDetached,
            });
            return;
        }

        info!(
            tutorial = %tutorial.id,
            steps = tutorial.len(),
            settle = ?self.config.settle_delay,
            "tutorial started"
        );
        self.surface = Some(SurfaceHandle::new(surface));
        self.state = EngineState::Active(ActiveRun {
            tutorial,
            step_index: 0,
            presenter,
            pending: Some(self.config.settle_delay),
            advancing: false,
        });
    }

    /// Tear down the active run without recording completion.
    ///
    /// Emits no event; cancellation is something the host did, not
    /// something it needs to be told about. The tutorial may run again.
    pub fn cancel(&mut self) {
        let EngineState::Active(mut run) = std::mem::replace(&mut self.state, EngineState::Idle)
        else {
            return;
        };
        run.presenter.cleanup();
        self.detach_overlay(run.presenter.overlay_id());
        info!(tutorial = %run.tutorial.id, "tutorial cancelled");
    }

    /// Advance timers and fades by `delta`.
    ///
    /// A pending settle or gap timer that elapses evaluates the next step;
    /// otherwise the presenter's fade advances, and a completed exit fade
    /// moves the run forward. A timer consumes the whole tick it fires on.
    pub fn tick(&mut self, delta: Duration) {
        let wake = match &mut self.state {
            EngineState::Idle => return,
            EngineState::Active(run) => {
                if let Some(remaining) = run.pending.as_mut() {
                    if *remaining > delta {
                        *remaining -= delta;
                        None
                    } else {
                        run.pending = None;
                        Some(Wake::Evaluate)
                    }
                } else if run.presenter.tick(delta) == Some(PresenterSignal::Dismissed) {
                    Some(Wake::Advance)
                } else {
                    None
                }
            }
        };

        match wake {
            Some(Wake::Evaluate) => self.evaluate_current(),
            Some(Wake::Advance) => self.advance(),
            None => {}
        }
    }

    /// Route a pointer tap into the overlay.
    ///
    /// Returns whether the tap was consumed. While a run is active the dim
    /// layer covers the whole surface, so the answer is always `true`;
    /// when idle the host should deliver the tap to its own widgets.
    pub fn pointer_tap(&mut self, point: Point) -> bool {
        let EngineState::Active(run) = &mut self.state else {
            return false;
        };
        match run.presenter.pointer_tap(point) {
            TapOutcome::DismissStarted => {
                debug!(tutorial = %run.tutorial.id, step = run.step_index, "tap dismissed step");
            }
            TapOutcome::Swallowed | TapOutcome::Ignored => {}
        }
        true
    }

    /// Dismiss the visible step without a pointer event.
    ///
    /// For hosts wiring hardware back buttons or accessibility dismiss
    /// actions. Duplicate requests while a dismissal or advance is already
    /// in flight collapse into the first one.
    pub fn notify_step_dismissed(&mut self) {
        let EngineState::Active(run) = &mut self.state else {
            return;
        };
        if run.advancing || !run.presenter.dismiss() {
            debug!(tutorial = %run.tutorial.id, "duplicate dismiss ignored");
        }
    }

    /// Draw list for the current frame, empty when idle or the surface is
    /// gone.
    pub fn scene(&self) -> Vec<DrawCommand> {
        let EngineState::Active(run) = &self.state else {
            return Vec::new();
        };
        let Some(handle) = self.surface.as_ref() else {
            return Vec::new();
        };
        let Ok(surface) = handle.upgrade() else {
            return Vec::new();
        };
        let screen = surface.borrow().surface_size();
        run.presenter.scene(screen)
    }

    /// Drain events emitted since the last call, in emission order.
    pub fn take_events(&mut self) -> Vec<TutorialEvent> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.state, EngineState::Active(_))
    }

    /// Id of the running tutorial, if any.
    pub fn active_tutorial(&self) -> Option<&TutorialId> {
        match &self.state {
            EngineState::Active(run) => Some(&run.tutorial.id),
            EngineState::Idle => None,
        }
    }

    /// Whether `id` is the tutorial currently running.
    pub fn is_tutorial_active(&self, id: &TutorialId) -> bool {
        self.active_tutorial() == Some(id)
    }

    /// Whether `id` has completed before. See [`ShownRegistry::has_shown`].
    pub fn has_shown(&self, id: &TutorialId) -> bool {
        self.registry.has_shown(id)
    }

    /// Record `id` as shown without running it.
    pub fn mark_shown(&mut self, id: &TutorialId) -> Result<(), StoreError> {
        self.registry.mark_shown(id)
    }

    /// Clear the shown flag so `id` may run again.
    pub fn reset_shown(&mut self, id: &TutorialId) -> Result<(), StoreError> {
        self.registry.reset(id)
    }

    /// Find the first presentable step at or after the current index and
    /// show it, or complete the run when none remains.
    fn evaluate_current(&mut self) {
        let found = {
            let EngineState::Active(run) = &self.state else {
                return;
            };
            let total = run.tutorial.len();
            let mut index = run.step_index;
            let mut found = None;
            while index < total {
                let step = &run.tutorial.steps[index];
                match self.resolver.resolve(&step.target) {
                    Some(snapshot) if snapshot.is_presentable() => {
                        found = Some((index, snapshot));
                        break;
                    }
                    _ => {
                        debug!(
                            tutorial = %run.tutorial.id,
                            step = index,
                            target_id = %step.target,
                            "target unavailable, skipping step"
                        );
                        index += 1;
                    }
                }
            }
            found
        };

        match found {
            Some((index, snapshot)) => self.present_step(index, snapshot),
            None => self.complete(),
        }
    }

    fn present_step(&mut self, index: usize, snapshot: TargetSnapshot) {
        let surface = match self.surface.as_ref() {
            Some(handle) => match handle.upgrade() {
                Ok(surface) => surface,
                Err(err) => {
                    warn!(error = %err, "surface gone before step presentation");
                    self.abort(AbortReason::SurfaceUnavailable);
                    return;
                }
            },
            None => {
                self.abort(AbortReason::SurfaceUnavailable);
                return;
            }
        };

        let overlay_id = {
            let EngineState::Active(run) = &self.state else {
                return;
            };
            run.presenter.overlay_id()
        };

        // One reattach attempt when the host pulled the overlay out from
        // under us (recreated window, restored navigation stack).
        if !surface.borrow().is_overlay_attached(overlay_id) {
            warn!(overlay = overlay_id.get(), "overlay detached, reattaching");
            // Bind the result so the borrow ends before `abort` re-borrows
            // the surface to detach.
            let reattached = surface.borrow_mut().attach_overlay(overlay_id);
            if let Err(err) = reattached {
                warn!(overlay = overlay_id.get(), error = %err, "reattach failed");
                self.abort(AbortReason::SurfaceDetached);
                return;
            }
        }

        let screen = surface.borrow().surface_size();

        let event = {
            let EngineState::Active(run) = &mut self.state else {
                return;
            };
            run.step_index = index;
            run.advancing = false;
            let step = &run.tutorial.steps[index];
            let preferred = preferred_side_for(snapshot.rect, screen);
            run.presenter
                .present(snapshot.rect, &step.title, &step.message, preferred, screen);
            info!(
                tutorial = %run.tutorial.id,
                step = index,
                total = run.tutorial.len(),
                "step presented"
            );
            TutorialEvent::StepPresented {
                tutorial: run.tutorial.id.clone(),
                step: index,
            }
        };
        self.events.push(event);
    }

    /// Move past the step that just dismissed.
    fn advance(&mut self) {
        let gap = self.config.step_gap;
        let finished = {
            let EngineState::Active(run) = &mut self.state else {
                return;
            };
            if run.advancing {
                debug!(tutorial = %run.tutorial.id, "duplicate advance ignored");
                return;
            }
            run.advancing = true;
            run.step_index += 1;
            if run.step_index >= run.tutorial.len() {
                true
            } else {
                // Brief pause so the exit and enter fades read as two
                // motions instead of one.
                run.pending = Some(gap);
                debug!(tutorial = %run.tutorial.id, next = run.step_index, "step gap armed");
                false
            }
        };
        if finished {
            self.complete();
        }
    }

    fn complete(&mut self) {
        let EngineState::Active(mut run) = std::mem::replace(&mut self.state, EngineState::Idle)
        else {
            return;
        };
        run.presenter.cleanup();
        self.detach_overlay(run.presenter.overlay_id());
        if let Err(err) = self.registry.mark_shown(&run.tutorial.id) {
            // Worst case the tutorial replays next launch, which beats
            // failing the run after the user already finished it.
            warn!(tutorial = %run.tutorial.id, error = %err, "failed to persist shown flag");
        }
        info!(tutorial = %run.tutorial.id, "tutorial completed");
        self.events.push(TutorialEvent::Completed {
            tutorial: run.tutorial.id,
        });
    }

    fn abort(&mut self, reason: AbortReason) {
        let EngineState::Active(mut run) = std::mem::replace(&mut self.state, EngineState::Idle)
        else {
            return;
        };
        run.presenter.cleanup();
        self.detach_overlay(run.presenter.overlay_id());
        warn!(tutorial = %run.tutorial.id, %reason, "tutorial aborted");
        self.events.push(TutorialEvent::Aborted {
            tutorial: run.tutorial.id,
            reason,
        });
    }

    fn detach_overlay(&self, overlay_id: OverlayId) {
        let Some(handle) = self.surface.as_ref() else {
            return;
        };
        match handle.upgrade() {
            Ok(surface) => {
                if let Err(err) = surface.borrow_mut().detach_overlay(overlay_id) {
                    debug!(overlay = overlay_id.get(), error = %err, "detach failed");
                }
            }
            Err(_) => {
                // Surface already dropped; the overlay went with it.
                debug!(overlay = overlay_id.get(), "surface gone, nothing to detach");
            }
        }
    }
}

impl std::fmt::Debug for TutorialEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorialEngine")
            .field("state", &self.state)
            .field("queued_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use waymark_core::{Rect, Size, Step, TargetId, TutorialError};

    const SCREEN: Size = Size::new(400, 800);

    struct StubResolver {
        targets: HashMap<String, TargetSnapshot>,
    }

    impl StubResolver {
        fn with_targets(names: &[&str]) -> Self {
            let mut targets = HashMap::new();
            for (i, name) in names.iter().enumerate() {
                let rect = Rect::new(100, 100 + (i as i32) * 60, 80, 40);
                targets.insert((*name).to_owned(), TargetSnapshot::visible_at(rect));
            }
            Self { targets }
        }
    }

    impl TargetResolver for StubResolver {
        fn resolve(&self, target: &TargetId) -> Option<TargetSnapshot> {
            self.targets.get(target.as_str()).copied()
        }
    }

    #[derive(Debug)]
    struct StubSurface {
        size: Size,
        attached: Vec<OverlayId>,
        fail_attach: bool,
    }

    impl StubSurface {
        fn shared() -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                size: SCREEN,
                attached: Vec::new(),
                fail_attach: false,
            }))
        }
    }

    impl HostSurface for StubSurface {
        fn surface_size(&self) -> Size {
            self.size
        }

        fn attach_overlay(&mut self, id: OverlayId) -> Result<(), TutorialError> {
            if self.fail_attach {
                return Err(TutorialError::SurfaceDetached);
            }
            self.attached.push(id);
            Ok(())
        }

        fn detach_overlay(&mut self, id: OverlayId) -> Result<(), TutorialError> {
            self.attached.retain(|attached| *attached != id);
            Ok(())
        }

        fn is_overlay_attached(&self, id: OverlayId) -> bool {
            self.attached.contains(&id)
        }
    }

    fn tutorial(id: &str, targets: &[&str]) -> Tutorial {
        let steps = targets
            .iter()
            .map(|target| Step::new(*target, format!("About {target}"), "Tap to continue"))
            .collect();
        Tutorial::new(TutorialId::new(id), steps)
    }

    fn engine_for(targets: &[&str]) -> TutorialEngine {
        TutorialEngine::new(
            ShownRegistry::in_memory(),
            Box::new(StubResolver::with_targets(targets)),
        )
    }

    fn as_dyn(concrete: &Rc<RefCell<StubSurface>>) -> Rc<RefCell<dyn HostSurface>> {
        Rc::clone(concrete) as Rc<RefCell<dyn HostSurface>>
    }

    // --- lifecycle tests ---

    #[test]
    fn new_engine_is_idle() {
        let engine = engine_for(&[]);
        assert!(!engine.is_active());
        assert!(engine.active_tutorial().is_none());
        assert!(engine.scene().is_empty());
    }

    #[test]
    fn start_attaches_overlay_and_goes_active() {
        let mut engine = engine_for(&["send"]);
        let host = StubSurface::shared();
        engine.start(tutorial("intro", &["send"]), &as_dyn(&host));

        assert!(engine.is_active());
        assert_eq!(
            engine.active_tutorial().map(TutorialId::as_str),
            Some("intro")
        );
        assert_eq!(host.borrow().attached.len(), 1);
    }

    #[test]
    fn start_is_ignored_when_already_shown() {
        let mut engine = engine_for(&["send"]);
        let host = StubSurface::shared();
        engine.mark_shown(&TutorialId::new("intro")).unwrap();

        engine.start(tutorial("intro", &["send"]), &as_dyn(&host));

        assert!(!engine.is_active());
        assert!(host.borrow().attached.is_empty());
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn settle_delay_defers_first_presentation() {
        let mut engine = engine_for(&["send"]);
        let host = StubSurface::shared();
        engine.start(tutorial("intro", &["send"]), &as_dyn(&host));

        engine.tick(Duration::from_millis(499));
        assert!(engine.take_events().is_empty());

        engine.tick(Duration::from_millis(1));
        assert_eq!(
            engine.take_events(),
            vec![TutorialEvent::StepPresented {
                tutorial: TutorialId::new("intro"),
                step: 0,
            }]
        );
    }

    #[test]
    fn tap_during_settle_is_consumed_but_changes_nothing() {
        let mut engine = engine_for(&["send"]);
        let host = StubSurface::shared();
        engine.start(tutorial("intro", &["send"]), &as_dyn(&host));

        assert!(engine.pointer_tap(Point::new(10, 10)));
        engine.tick(Duration::from_millis(500));
        let events = engine.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            TutorialEvent::StepPresented { step: 0, .. }
        ));
    }

    #[test]
    fn cancel_detaches_without_events_or_flag() {
        let mut engine = engine_for(&["send"]);
        let host = StubSurface::shared();
        let id = TutorialId::new("intro");
        engine.start(tutorial("intro", &["send"]), &as_dyn(&host));
        engine.tick(Duration::from_millis(500));
        engine.take_events();

        engine.cancel();

        assert!(!engine.is_active());
        assert!(host.borrow().attached.is_empty());
        assert!(engine.take_events().is_empty());
        assert!(!engine.has_shown(&id));
    }

    #[test]
    fn starting_b_supersedes_a() {
        let mut engine = engine_for(&["send", "search"]);
        let host = StubSurface::shared();
        engine.start(tutorial("a", &["send"]), &as_dyn(&host));
        engine.tick(Duration::from_millis(500));
        engine.take_events();

        engine.start(tutorial("b", &["search"]), &as_dyn(&host));
        engine.tick(Duration::from_millis(500));

        let events = engine.take_events();
        assert_eq!(
            events[0],
            TutorialEvent::Aborted {
                tutorial: TutorialId::new("a"),
                reason: AbortReason::Superseded,
            }
        );
        assert_eq!(
            events[1],
            TutorialEvent::StepPresented {
                tutorial: TutorialId::new("b"),
                step: 0,
            }
        );
        // A's overlay went away; only B's remains.
        assert_eq!(host.borrow().attached.len(), 1);
        assert!(!engine.has_shown(&TutorialId::new("a")));
    }

    #[test]
    fn empty_tutorial_completes_and_marks_shown() {
        let mut engine = engine_for(&[]);
        let host = StubSurface::shared();
        let id = TutorialId::new("empty");
        engine.start(tutorial("empty", &[]), &as_dyn(&host));
        engine.tick(Duration::from_millis(500));

        assert_eq!(
            engine.take_events(),
            vec![TutorialEvent::Completed {
                tutorial: id.clone()
            }]
        );
        assert!(engine.has_shown(&id));
        assert!(!engine.is_active());
        assert!(host.borrow().attached.is_empty());
    }

    #[test]
    fn attach_failure_aborts_before_running() {
        let mut engine = engine_for(&["send"]);
        let host = StubSurface::shared();
        host.borrow_mut().fail_attach = true;

        engine.start(tutorial("intro", &["send"]), &as_dyn(&host));

        assert!(!engine.is_active());
        assert_eq!(
            engine.take_events(),
            vec![TutorialEvent::Aborted {
                tutorial: TutorialId::new("intro"),
                reason: AbortReason::SurfaceDetached,
            }]
        );
    }

    #[test]
    fn reset_shown_allows_a_rerun() {
        let mut engine = engine_for(&["send"]);
        let host = StubSurface::shared();
        let id = TutorialId::new("intro");
        engine.mark_shown(&id).unwrap();
        engine.start(tutorial("intro", &["send"]), &as_dyn(&host));
        assert!(!engine.is_active());

        engine.reset_shown(&id).unwrap();
        engine.start(tutorial("intro", &["send"]), &as_dyn(&host));
        assert!(engine.is_active());
    }

    #[test]
    fn scene_is_dim_only_during_settle() {
        let mut engine = engine_for(&["send"]);
        let host = StubSurface::shared();
        engine.start(tutorial("intro", &["send"]), &as_dyn(&host));

        let scene = engine.scene();
        assert_eq!(scene.len(), 1);
        assert!(matches!(scene[0], DrawCommand::Dim { .. }));

        engine.tick(Duration::from_millis(500));
        assert!(engine.scene().len() > 1);
    }
}
