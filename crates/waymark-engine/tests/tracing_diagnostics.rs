//! Assertions on the diagnostics the engine emits through `tracing`.
//!
//! A capture layer records every event raised during a scripted run so these
//! tests can check the engine narrates its fallbacks: a failed shown-flag
//! write warns while the run still completes, a skipped step names the target
//! it could not resolve, and cancellation logs without raising events.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use waymark_core::{
    FlagStore, HostSurface, OverlayId, Point, Rect, Size, Step, StoreError, TargetId,
    TargetResolver, TargetSnapshot, Tutorial, TutorialError, TutorialEvent, TutorialId,
};
use waymark_engine::{ShownRegistry, TutorialEngine};

// ============================================================================
// Tracing capture infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct LogRecord {
    level: tracing::Level,
    message: Option<String>,
    fields: HashMap<String, String>,
}

struct CaptureLayer {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl CaptureLayer {
    fn new() -> (Self, Arc<Mutex<Vec<LogRecord>>>) {
        let records = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                records: records.clone(),
            },
            records,
        )
    }
}

struct FieldCollector(Vec<(String, String)>);

impl tracing::field::Visit for FieldCollector {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for CaptureLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut collector = FieldCollector(Vec::new());
        event.record(&mut collector);

        let fields: HashMap<String, String> = collector.0.into_iter().collect();
        let message = fields.get("message").cloned();

        self.records.lock().unwrap().push(LogRecord {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn capture_logs<F>(f: F) -> Vec<LogRecord>
where
    F: FnOnce(),
{
    let (layer, records) = CaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = records.lock().unwrap().clone();
    captured
}

// ============================================================================
// Fixtures
// ============================================================================

/// Resolves exactly one known target name.
struct OneTarget {
    name: &'static str,
}

impl TargetResolver for OneTarget {
    fn resolve(&self, target: &TargetId) -> Option<TargetSnapshot> {
        (target.as_str() == self.name)
            .then(|| TargetSnapshot::visible_at(Rect::new(100, 100, 80, 40)))
    }
}

struct Window {
    attached: Vec<OverlayId>,
}

impl Window {
    fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            attached: Vec::new(),
        }))
    }
}

impl HostSurface for Window {
    fn surface_size(&self) -> Size {
        Size::new(400, 800)
    }

    fn attach_overlay(&mut self, id: OverlayId) -> Result<(), TutorialError> {
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

/// Reads succeed, writes fail, like a full disk or a revoked bridge.
struct WriteFailStore;

impl FlagStore for WriteFailStore {
    fn get_bool(&self, _key: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn set_bool(&mut self, _key: &str, _value: bool) -> Result<(), StoreError> {
        Err(StoreError::Backend("preferences bridge rejected write".into()))
    }
}

fn tutorial(id: &str, targets: &[&str]) -> Tutorial {
    let steps = targets
        .iter()
        .map(|target| Step::new(*target, format!("About {target}"), "Tap anywhere to continue"))
        .collect();
    Tutorial::new(TutorialId::new(id), steps)
}

fn as_dyn(window: &Rc<RefCell<Window>>) -> Rc<RefCell<dyn HostSurface>> {
    Rc::clone(window) as Rc<RefCell<dyn HostSurface>>
}

// ============================================================================
// Diagnostics tests
// ============================================================================

#[test]
fn flag_write_failure_warns_but_run_completes() {
    let logs = capture_logs(|| {
        let mut engine = TutorialEngine::new(
            ShownRegistry::new(Box::new(WriteFailStore)),
            Box::new(OneTarget { name: "anchor" }),
        );
        let window = Window::shared();

        engine.start(tutorial("intro", &["anchor"]), &as_dyn(&window));
        engine.tick(Duration::from_millis(500));
        engine.pointer_tap(Point::new(390, 780));
        engine.tick(Duration::from_millis(200));

        let events = engine.take_events();
        assert!(
            matches!(events.last(), Some(TutorialEvent::Completed { .. })),
            "run should complete despite the failed write, got {events:?}"
        );
    });

    let warning = logs
        .iter()
        .find(|record| record.level == tracing::Level::WARN)
        .expect("the failed flag write should produce a warning");
    assert_eq!(
        warning.message.as_deref(),
        Some("failed to persist shown flag")
    );
    assert!(
        warning
            .fields
            .get("tutorial")
            .is_some_and(|id| id.contains("intro")),
        "warning should name the tutorial: {warning:?}"
    );
}

#[test]
fn skipped_step_log_names_the_unresolvable_target() {
    let logs = capture_logs(|| {
        let mut engine = TutorialEngine::new(
            ShownRegistry::in_memory(),
            Box::new(OneTarget { name: "anchor" }),
        );
        let window = Window::shared();

        engine.start(tutorial("intro", &["phantom", "anchor"]), &as_dyn(&window));
        engine.tick(Duration::from_millis(500));

        // The run skipped straight to the resolvable step.
        assert_eq!(
            engine.take_events(),
            vec![TutorialEvent::StepPresented {
                tutorial: TutorialId::new("intro"),
                step: 1,
            }]
        );
    });

    let skip = logs
        .iter()
        .find(|record| record.message.as_deref() == Some("target unavailable, skipping step"))
        .expect("the skipped step should be logged");
    assert_eq!(skip.level, tracing::Level::DEBUG);
    assert!(
        skip.fields
            .get("target_id")
            .is_some_and(|target| target.contains("phantom")),
        "skip log should name the target: {skip:?}"
    );
}

#[test]
fn cancellation_logs_without_raising_events() {
    let logs = capture_logs(|| {
        let mut engine = TutorialEngine::new(
            ShownRegistry::in_memory(),
            Box::new(OneTarget { name: "anchor" }),
        );
        let window = Window::shared();

        engine.start(tutorial("intro", &["anchor"]), &as_dyn(&window));
        engine.tick(Duration::from_millis(500));
        engine.take_events();

        engine.cancel();

        assert!(engine.take_events().is_empty());
        assert!(window.borrow().attached.is_empty());
    });

    assert!(
        logs.iter()
            .any(|record| record.message.as_deref() == Some("tutorial cancelled")),
        "cancel should leave a log trail even though it emits no event"
    );
}
