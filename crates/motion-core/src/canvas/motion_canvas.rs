//! The motion canvas: frame pass, validity aggregation, and eviction.
//!
//! The canvas owns its drawable tasks and the clock. Hosts never draw on
//! invalidation; they pull frames with [`MotionCanvas::draw_frame`] on their
//! own cadence until a frame comes back valid.
//!
//! # Usage
//!
//! ```ignore
//! let mut canvas = MotionCanvas::new();
//! let bar = share(RectangleGeometry::new(rect).with_animation(animation));
//! let mut task = DrawableTask::new(Paint::fill(color));
//! task.add_geometry(bar.clone());
//! canvas.add_task(task);
//!
//! // Layout pass retargets the bar, then asks for a redraw
//! bar.lock().set_rect(new_rect);
//! canvas.invalidate();
//!
//! while !canvas.draw_frame(&mut backend, &config)?.is_valid {
//!     sleep(frame_interval);
//! }
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use motion_config::RenderConfig;

use super::events::{CanvasEvent, CanvasSignal};
use crate::drawing::{DrawArgs, DrawCommand, DrawableTask, DrawingContext, GeometryId, TaskId};
use crate::error::Result;
use crate::time::{Clock, MonotonicClock, TimeMs};

/// Outcome of one frame pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// Sequence number of the frame, starting at 1.
    pub frame: u64,
    /// Time shared by every task and geometry in the pass.
    pub now: TimeMs,
    /// Whether nothing is left to animate and nothing was evicted.
    pub is_valid: bool,
    /// Geometries drawn in the pass.
    pub drawn: usize,
    pub removed_geometries: Vec<GeometryId>,
    pub removed_tasks: Vec<TaskId>,
}

/// What a visitation found, applied only after every task was visited.
#[derive(Debug, Default)]
struct Visit {
    valid: bool,
    drawn: usize,
    geometries: Vec<(TaskId, GeometryId)>,
    tasks: Vec<TaskId>,
}

/// Owns drawable tasks and drives them one frame at a time.
pub struct MotionCanvas {
    /// Registration order; z-order is applied per frame.
    tasks: Vec<DrawableTask>,
    clock: Arc<dyn Clock>,
    signal: Arc<CanvasSignal>,
    sync: Arc<Mutex<()>>,
    frame: u64,
}

impl MotionCanvas {
    /// A canvas on the process monotonic clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: Vec::new(),
            clock,
            signal: Arc::new(CanvasSignal::new()),
            sync: Arc::new(Mutex::new(())),
            frame: 0,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Lock held for a whole pass when the backend needs serialized access.
    pub fn sync(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.sync)
    }

    /// Shared validity flag and event channel.
    pub fn signal(&self) -> Arc<CanvasSignal> {
        Arc::clone(&self.signal)
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&CanvasEvent) + Send + Sync + 'static,
    {
        self.signal.subscribe(listener);
    }

    pub fn drain_events(&self) -> Vec<CanvasEvent> {
        self.signal.drain()
    }

    pub fn is_valid(&self) -> bool {
        self.signal.is_valid()
    }

    /// Number of frames drawn so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Request a redraw. Nothing is drawn until the host pulls a frame.
    pub fn invalidate(&self) {
        self.signal.invalidate();
    }

    pub fn add_task(&mut self, task: DrawableTask) -> TaskId {
        let id = task.id();
        self.tasks.push(task);
        self.invalidate();
        id
    }

    pub fn remove_task(&mut self, id: TaskId) -> Option<DrawableTask> {
        let index = self.tasks.iter().position(|task| task.id() == id)?;
        let task = self.tasks.remove(index);
        self.invalidate();
        Some(task)
    }

    /// Swap the whole task set, returning the previous one.
    pub fn replace_tasks(&mut self, tasks: Vec<DrawableTask>) -> Vec<DrawableTask> {
        let previous = std::mem::replace(&mut self.tasks, tasks);
        self.invalidate();
        previous
    }

    pub fn task(&self, id: TaskId) -> Option<&DrawableTask> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut DrawableTask> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    /// Tasks in registration order.
    pub fn tasks(&self) -> &[DrawableTask] {
        &self.tasks
    }

    pub fn drawables_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn count_geometries(&self) -> usize {
        self.tasks.iter().map(DrawableTask::geometry_count).sum()
    }

    /// Draw one frame.
    ///
    /// The clock is sampled once and that time is used for every task and
    /// geometry. Tasks are visited by ascending z-index, ties in registration
    /// order. Settled entities flagged for removal are evicted after the
    /// visitation, and any eviction leaves the frame invalid so one more
    /// frame is drawn without them.
    ///
    /// A failing geometry aborts the pass: nothing is evicted and the canvas
    /// stays invalid.
    pub fn draw_frame(
        &mut self,
        ctx: &mut dyn DrawingContext,
        config: &RenderConfig,
    ) -> Result<FrameReport> {
        let now = self.clock.now_ms();
        self.frame += 1;
        let frame = self.frame;

        let sync = Arc::clone(&self.sync);
        let _guard = ctx.requires_serialized_access().then(|| sync.lock());

        ctx.begin_frame(now);
        let visit = match self.visit(ctx, config, now) {
            Ok(visit) => visit,
            Err(err) => {
                ctx.end_frame();
                self.signal.mark_invalid();
                warn!(frame, now, %err, "frame aborted");
                return Err(err);
            }
        };

        let mut valid = visit.valid;
        let mut removed_geometries = Vec::with_capacity(visit.geometries.len());
        for (task_id, geometry_id) in visit.geometries {
            let removed = self
                .task_mut(task_id)
                .and_then(|task| task.remove_geometry(geometry_id));
            if removed.is_some() {
                trace!(frame, ?task_id, ?geometry_id, "geometry evicted");
                removed_geometries.push(geometry_id);
                valid = false;
            }
        }

        let mut removed_tasks = Vec::with_capacity(visit.tasks.len());
        for task_id in visit.tasks {
            if let Some(index) = self.tasks.iter().position(|task| task.id() == task_id) {
                self.tasks.remove(index);
                trace!(frame, ?task_id, "task evicted");
                removed_tasks.push(task_id);
                valid = false;
            }
        }

        ctx.end_frame();
        self.signal.finish_frame(frame, valid);

        debug!(
            frame,
            now,
            valid,
            drawn = visit.drawn,
            removed = removed_geometries.len() + removed_tasks.len(),
            "frame drawn"
        );

        Ok(FrameReport {
            frame,
            now,
            is_valid: valid,
            drawn: visit.drawn,
            removed_geometries,
            removed_tasks,
        })
    }

    fn visit(
        &mut self,
        ctx: &mut dyn DrawingContext,
        config: &RenderConfig,
        now: TimeMs,
    ) -> Result<Visit> {
        let mut order: Vec<usize> = (0..self.tasks.len()).collect();
        order.sort_by_key(|&index| self.tasks[index].z_index());

        let mut visit = Visit {
            valid: true,
            ..Visit::default()
        };

        for index in order {
            let task = &mut self.tasks[index];
            if config.disable_animations {
                task.complete_transition();
            }

            let paint_valid = task.advance(now);
            visit.valid &= paint_valid;
            if paint_valid && task.remove_on_completed() {
                visit.tasks.push(task.id());
            }
            if task.is_paused() {
                continue;
            }

            let args = DrawArgs::new(now, task.paint().brush(), config);
            for (geometry_id, geometry) in task.geometries() {
                let mut geometry = geometry.lock();
                if config.disable_animations {
                    geometry.complete_all();
                }
                let valid = geometry.advance(now);

                geometry.draw(ctx, &args)?;
                if config.show_debug_lines {
                    ctx.submit(DrawCommand::DebugOutline {
                        bounds: geometry.bounds(),
                        transform: args.resolve(&geometry.transform()),
                    })?;
                }

                visit.drawn += 1;
                visit.valid &= valid;
                if valid && geometry.remove_on_completed() {
                    visit.geometries.push((task.id(), geometry_id));
                }
            }
        }

        Ok(visit)
    }
}

impl Default for MotionCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MotionCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionCanvas")
            .field("tasks", &self.tasks)
            .field("frame", &self.frame)
            .field("signal", &self.signal)
            .finish()
    }
}

static_assertions::assert_impl_all!(MotionCanvas: Send, Sync);
