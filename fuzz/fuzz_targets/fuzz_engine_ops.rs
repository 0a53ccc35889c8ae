#![no_main]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use waymark_core::{
    HostSurface, OverlayId, Point, Rect, Size, Step, TargetId, TargetResolver, TargetSnapshot,
    Tutorial, TutorialError, TutorialEvent, TutorialId,
};
use waymark_engine::{ShownRegistry, TutorialEngine};

#[derive(Debug, Arbitrary)]
enum Op {
    Start { steps: u8, valid_mask: u16 },
    Tick { ms: u16 },
    Tap { x: i16, y: i16 },
    Dismiss,
    Cancel,
    Drain,
}

const SCREEN: Size = Size::new(400, 800);

/// Resolver whose validity mask the driver can flip between ops, so targets
/// appear and disappear mid-run.
#[derive(Clone)]
struct SharedMask(Rc<Cell<u16>>);

impl TargetResolver for SharedMask {
    fn resolve(&self, target: &TargetId) -> Option<TargetSnapshot> {
        let index: usize = target.as_str().strip_prefix('t')?.parse().ok()?;
        (index < 16 && self.0.get() & (1u16 << index) != 0).then(|| {
            TargetSnapshot::visible_at(Rect::new(
                50 + (index as i32 % 4) * 80,
                100 + (index as i32 / 4) * 150,
                64,
                32,
            ))
        })
    }
}

#[derive(Debug, Default)]
struct FuzzHost {
    attached: Vec<OverlayId>,
}

impl HostSurface for FuzzHost {
    fn surface_size(&self) -> Size {
        SCREEN
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

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 64 {
        return;
    }

    let mask = SharedMask(Rc::new(Cell::new(0)));
    let mut engine = TutorialEngine::new(ShownRegistry::in_memory(), Box::new(mask.clone()));
    let host: Rc<RefCell<FuzzHost>> = Rc::new(RefCell::new(FuzzHost::default()));
    let surface = Rc::clone(&host) as Rc<RefCell<dyn HostSurface>>;

    let mut runs = 0u32;
    let mut longest = 0usize;

    for op in ops {
        match op {
            Op::Start { steps, valid_mask } => {
                let count = usize::from(steps % 12);
                mask.0.set(valid_mask);
                runs += 1;
                longest = longest.max(count);
                let steps = (0..count)
                    .map(|i| Step::new(format!("t{i}"), format!("Step {i}"), "body"))
                    .collect();
                engine.start(Tutorial::new(TutorialId::new(format!("run{runs}")), steps), &surface);
            }
            Op::Tick { ms } => engine.tick(Duration::from_millis(u64::from(ms % 2048))),
            Op::Tap { x, y } => {
                engine.pointer_tap(Point::new(i32::from(x), i32::from(y)));
            }
            Op::Dismiss => engine.notify_step_dismissed(),
            Op::Cancel => engine.cancel(),
            Op::Drain => {
                for event in engine.take_events() {
                    if let TutorialEvent::StepPresented { step, .. } = event {
                        assert!(step < longest, "step {step} out of range {longest}");
                    }
                }
            }
        }

        // Post-conditions that must always hold:
        assert!(
            host.borrow().attached.len() <= 1,
            "more than one overlay attached"
        );
        let _ = engine.scene();
    }

    // Drained queue stays drained.
    engine.take_events();
    assert!(engine.take_events().is_empty());
});
