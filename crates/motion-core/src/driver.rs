//! Host-side frame pulling.
//!
//! [`RenderLoop`] is the smallest host a canvas needs: it pulls frames at
//! the configured interval until one comes back valid. Wrapped in an
//! [`ActionThrottler`] it becomes the coalesced redraw a layout pass
//! triggers after retargeting geometries.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use motion_config::{RenderConfig, ThrottleConfig};

use crate::canvas::{FrameReport, MotionCanvas};
use crate::drawing::DrawingContext;
use crate::error::Result;
use crate::throttle::ActionThrottler;

/// Canvas shared between the layout code and the render loop.
pub type SharedCanvas = Arc<Mutex<MotionCanvas>>;

/// Pulls frames from a canvas into a drawing context.
pub struct RenderLoop<C> {
    canvas: SharedCanvas,
    context: Arc<Mutex<C>>,
    config: RenderConfig,
    frame_limit: Option<u64>,
}

impl<C> RenderLoop<C>
where
    C: DrawingContext + Send + 'static,
{
    pub fn new(canvas: SharedCanvas, context: C, config: RenderConfig) -> Self {
        Self {
            canvas,
            context: Arc::new(Mutex::new(context)),
            config,
            frame_limit: None,
        }
    }

    /// Stop each run after `frames` frames even if the canvas never settles.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn canvas(&self) -> &SharedCanvas {
        &self.canvas
    }

    pub fn context(&self) -> Arc<Mutex<C>> {
        Arc::clone(&self.context)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw a single frame.
    pub fn draw_once(&self) -> Result<FrameReport> {
        let mut canvas = self.canvas.lock();
        let mut context = self.context.lock();
        canvas.draw_frame(&mut *context, &self.config)
    }

    /// Pull frames until one validates and return how many were drawn.
    pub async fn run_until_valid(&self) -> Result<u64> {
        let interval = Duration::from_millis(self.config.frame_interval_ms.max(1));
        let mut frames = 0;

        loop {
            let report = self.draw_once()?;
            frames += 1;
            if report.is_valid {
                debug!(frames, "canvas settled");
                return Ok(frames);
            }
            if self.frame_limit.is_some_and(|limit| frames >= limit) {
                debug!(frames, "frame limit reached before the canvas settled");
                return Ok(frames);
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// A throttler whose action runs this loop.
    pub fn throttled(self: Arc<Self>, config: &ThrottleConfig) -> ActionThrottler {
        ActionThrottler::from_config(config, move || {
            let render_loop = Arc::clone(&self);
            async move {
                if let Err(err) = render_loop.run_until_valid().await {
                    warn!(%err, "redraw failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animation, EasingFunction, Rect};
    use crate::drawing::{DrawableTask, Paint, RecordingContext, RectangleGeometry, share};
    use crate::time::{Clock, TimeMs};

    /// Clock following tokio's (pausable) time.
    struct TokioClock {
        origin: tokio::time::Instant,
    }

    impl Clock for TokioClock {
        fn now_ms(&self) -> TimeMs {
            self.origin.elapsed().as_millis() as TimeMs
        }
    }

    fn animated_canvas() -> (SharedCanvas, crate::drawing::GeometryHandle<RectangleGeometry>) {
        let clock = Arc::new(TokioClock {
            origin: tokio::time::Instant::now(),
        });
        let mut canvas = MotionCanvas::with_clock(clock);
        let bar = share(
            RectangleGeometry::new(Rect::new(0.0, 0.0, 10.0, 0.0))
                .with_animation(Animation::new(EasingFunction::Linear, 100)),
        );
        let mut task = DrawableTask::new(Paint::default());
        task.add_geometry(bar.clone());
        canvas.add_task(task);
        (Arc::new(Mutex::new(canvas)), bar)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_until_settled() {
        let (canvas, bar) = animated_canvas();
        bar.lock().set_rect(Rect::new(0.0, 0.0, 10.0, 50.0));

        let config = RenderConfig {
            frame_interval_ms: 10,
            ..RenderConfig::default()
        };
        let render_loop = RenderLoop::new(canvas.clone(), RecordingContext::new(), config);
        let frames = render_loop.run_until_valid().await.unwrap();

        assert!(frames >= 10);
        assert!(canvas.lock().is_valid());
        assert_eq!(bar.lock().rect().height, 50.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_limit() {
        let (canvas, bar) = animated_canvas();
        bar.lock().set_rect(Rect::new(0.0, 0.0, 10.0, 50.0));

        let render_loop =
            RenderLoop::new(canvas.clone(), RecordingContext::new(), RenderConfig::default())
                .with_frame_limit(2);
        assert_eq!(render_loop.run_until_valid().await.unwrap(), 2);
        assert!(!canvas.lock().is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_redraw() {
        let (canvas, _bar) = animated_canvas();
        let render_loop = Arc::new(RenderLoop::new(
            canvas.clone(),
            RecordingContext::new(),
            RenderConfig::default(),
        ));
        let context = render_loop.context();
        let throttler = render_loop.throttled(&ThrottleConfig { delay_ms: 10 });

        throttler.schedule();
        throttler.schedule();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(canvas.lock().is_valid());
        assert_eq!(context.lock().frames(), 1);
    }
}
