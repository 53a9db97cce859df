use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use blind_jump_core::Event;
use blind_jump_rendering::{InputSnapshot, RenderTarget, ResourceHandler};
use blind_jump_world::World;
use tracing::{debug, info};

use crate::{Scene, SharedScene};

/// Cooperative stop request shared between threads.
///
/// Loops only look at the signal between frames, so a frame that has
/// started always completes.
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Creates a signal that has not fired.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every loop holding a clone of this signal to stop.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Reports whether a stop was requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Supplies the input for each frame.
pub trait InputSource {
    /// Input for frame `frame`, given the world as the previous frame left it.
    fn sample(&mut self, frame: u64, world: &World) -> InputSnapshot;
}

impl<F> InputSource for F
where
    F: FnMut(u64, &World) -> InputSnapshot,
{
    fn sample(&mut self, frame: u64, world: &World) -> InputSnapshot {
        self(frame, world)
    }
}

/// What a loop did before it stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopReport {
    /// Logic frames run.
    pub frames: u64,
    /// Frames submitted to the render target.
    pub rendered: u64,
    /// Levels entered, the initial one included.
    pub levels_entered: u32,
    /// Whether the loop stopped because of the shutdown signal.
    pub stopped_by_signal: bool,
}

impl LoopReport {
    fn observe(&mut self, event: &Event) {
        if matches!(event, Event::LevelEntered { .. }) {
            self.levels_entered += 1;
        }
    }
}

/// Raises the flag when dropped, so the render side also stops after a
/// panic on the logic thread.
struct DoneOnDrop<'a>(&'a AtomicBool);

impl Drop for DoneOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Fixed-step frame driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLoop {
    dt: Duration,
    max_frames: Option<u64>,
}

impl FrameLoop {
    /// Creates a loop advancing `dt` per frame until shut down.
    #[must_use]
    pub const fn new(dt: Duration) -> Self {
        Self {
            dt,
            max_frames: None,
        }
    }

    /// Returns the loop with a frame limit.
    #[must_use]
    pub const fn with_max_frames(self, max_frames: u64) -> Self {
        Self {
            max_frames: Some(max_frames),
            ..self
        }
    }

    /// Time advanced per frame.
    #[must_use]
    pub const fn dt(&self) -> Duration {
        self.dt
    }

    fn should_stop(&self, frames: u64, shutdown: &ShutdownSignal, report: &mut LoopReport) -> bool {
        if shutdown.is_requested() {
            report.stopped_by_signal = true;
            return true;
        }
        self.max_frames.map_or(false, |limit| frames >= limit)
    }

    /// Runs update then draw on the calling thread.
    pub fn run(
        &self,
        scene: &mut Scene,
        input: &mut dyn InputSource,
        resources: &dyn ResourceHandler,
        target: &mut dyn RenderTarget,
        shutdown: &ShutdownSignal,
        on_event: &mut dyn FnMut(&Event),
    ) -> LoopReport {
        let mut report = LoopReport::default();
        let mut events = Vec::new();
        while !self.should_stop(report.frames, shutdown, &mut report) {
            let snapshot = input.sample(report.frames, scene.world());
            scene.update(self.dt, &snapshot, &mut events);
            for event in events.drain(..) {
                report.observe(&event);
                on_event(&event);
            }
            scene.draw(resources, target);
            report.frames += 1;
            report.rendered += 1;
        }
        info!(frames = report.frames, levels = report.levels_entered, "frame loop stopped");
        report
    }

    /// Runs logic on a worker thread while the calling thread renders.
    ///
    /// The render side draws snapshots as fast as it can until the logic
    /// thread stops, then presents the final frame once more. A panic on
    /// the logic thread stops the render side and is resumed on the caller.
    pub fn run_threaded(
        &self,
        scene: &SharedScene,
        input: &mut (dyn InputSource + Send),
        resources: &dyn ResourceHandler,
        target: &mut dyn RenderTarget,
        shutdown: &ShutdownSignal,
        on_event: &mut (dyn FnMut(&Event) + Send),
    ) -> LoopReport {
        let logic_done = AtomicBool::new(false);
        let (mut report, rendered) = thread::scope(|scope| {
            let logic = scope.spawn(|| {
                let _done = DoneOnDrop(&logic_done);
                let mut report = LoopReport::default();
                let mut events = Vec::new();
                while !self.should_stop(report.frames, shutdown, &mut report) {
                    let snapshot = scene.with_world(|world| input.sample(report.frames, world));
                    scene.update(self.dt, &snapshot, &mut events);
                    for event in events.drain(..) {
                        report.observe(&event);
                        on_event(&event);
                    }
                    report.frames += 1;
                }
                report
            });

            let mut rendered = 0u64;
            while !logic_done.load(Ordering::SeqCst) {
                scene.draw(resources, target);
                rendered += 1;
                thread::yield_now();
            }
            scene.draw(resources, target);
            rendered += 1;

            let report = match logic.join() {
                Ok(report) => report,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            (report, rendered)
        });
        report.rendered = rendered;
        debug!(rendered, "render thread stopped");
        info!(frames = report.frames, levels = report.levels_entered, "frame loop stopped");
        report
    }
}
