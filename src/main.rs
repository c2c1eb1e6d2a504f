use anyhow::{Context, Result};
use motion_config::MotionConfig;
use motion_core::{
    Animation, CanvasEvent, Color, DrawableTask, Geometry, GeometryHandle, LabelGeometry, LineGeometry,
    MotionCanvas, Paint, Point, Rect, RecordingContext, RectangleGeometry, RenderLoop, share,
};
use parking_lot::Mutex;
use std::sync::Arc;

const PLOT_HEIGHT: f64 = 200.0;
const BAR_WIDTH: f64 = 24.0;
const BAR_GAP: f64 = 12.0;
const UNIT: f64 = 20.0;

fn bar_rect(index: usize, value: f64) -> Rect {
    let height = value * UNIT;
    let x = BAR_GAP + index as f64 * (BAR_WIDTH + BAR_GAP);
    Rect::new(x, PLOT_HEIGHT - height, BAR_WIDTH, height)
}

fn load_config() -> Result<MotionConfig> {
    let path = std::env::args().find_map(|a| a.strip_prefix("--config=").map(|s| s.to_string()));
    match path {
        Some(path) => {
            let mut config = MotionConfig::load_from_file(&path)
                .with_context(|| format!("loading configuration from {path}"))?;
            config.merge_with_env();
            Ok(config)
        }
        None => Ok(MotionConfig::load()),
    }
}

struct Chart {
    bars: Vec<GeometryHandle<RectangleGeometry>>,
    labels: Vec<GeometryHandle<LabelGeometry>>,
}

impl Chart {
    fn build(canvas: &mut MotionCanvas, animation: Animation, values: &[f64]) -> Self {
        let mut grid = DrawableTask::new(Paint::stroke(Color::rgba(200, 200, 200, 255), 1.0))
            .with_z_index(-1);
        for step in 0..=5 {
            let y = PLOT_HEIGHT - step as f64 * 2.0 * UNIT;
            grid.add_geometry(share(LineGeometry::new(
                Point::new(0.0, y),
                Point::new(300.0, y),
            )));
        }

        let mut bar_task = DrawableTask::new(
            Paint::fill(Color::rgba(33, 150, 243, 255)).with_animation(animation),
        );
        let mut label_task =
            DrawableTask::new(Paint::fill(Color::rgba(40, 40, 40, 255))).with_z_index(1);

        let mut bars = Vec::new();
        let mut labels = Vec::new();
        for (index, value) in values.iter().enumerate() {
            let bar = share(RectangleGeometry::new(bar_rect(index, 0.0)).with_animation(animation));
            bar.lock().set_rect(bar_rect(index, *value));
            bar_task.add_geometry(bar.clone());
            bars.push(bar);

            let top = bar_rect(index, *value);
            let label = share(
                LabelGeometry::new(format!("{value}"), Point::new(top.x, top.y - 14.0), 12.0)
                    .with_animation(animation),
            );
            label_task.add_geometry(label.clone());
            labels.push(label);
        }

        canvas.add_task(grid);
        canvas.add_task(bar_task);
        canvas.add_task(label_task);
        Self { bars, labels }
    }

    /// Retarget the chart to new values. Bars beyond `values` fade out and
    /// are evicted once their animation completes.
    fn update(&self, values: &[f64]) {
        for (index, (bar, label)) in self.bars.iter().zip(&self.labels).enumerate() {
            let mut bar = bar.lock();
            let mut label = label.lock();
            match values.get(index) {
                Some(value) => {
                    let rect = bar_rect(index, *value);
                    bar.set_rect(rect);
                    label.set_text(format!("{value}"));
                    label.set_origin(Point::new(rect.x, rect.y - 14.0));
                }
                None => {
                    bar.set_rect(bar_rect(index, 0.0));
                    bar.set_opacity(0.0);
                    bar.animatable_mut().set_remove_on_completed(true);
                    label.set_opacity(0.0);
                    label.animatable_mut().set_remove_on_completed(true);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = load_config()?;
    let animation =
        Animation::from_config(&config.animation).context("invalid default animation")?;
    log::info!(
        "animation: {:?} over {}ms, debug lines {}",
        animation.easing,
        animation.duration_ms,
        config.render.show_debug_lines
    );

    let mut canvas = MotionCanvas::new();
    canvas.subscribe(|event| match event {
        CanvasEvent::Invalidated => log::debug!("redraw requested"),
        CanvasEvent::Validated { frame } => log::info!("canvas settled at frame {frame}"),
    });
    let chart = Chart::build(&mut canvas, animation, &[3.0, 7.0, 2.0, 5.0]);
    let canvas = Arc::new(Mutex::new(canvas));
    let signal = canvas.lock().signal();

    // Bounded so indefinite repeats from configuration still terminate
    let render_loop = Arc::new(
        RenderLoop::new(canvas.clone(), RecordingContext::new(), config.render.clone())
            .with_frame_limit(10_000),
    );
    let frames = render_loop
        .run_until_valid()
        .await
        .context("initial render failed")?;
    log::info!("initial layout drawn in {frames} frames");

    let throttler = Arc::clone(&render_loop).throttled(&config.throttle);
    chart.update(&[6.0, 1.0, 4.0]);
    signal.invalidate();

    // A burst of redraw requests collapses into one run
    let handle = throttler.schedule();
    for _ in 0..3 {
        throttler.schedule();
    }
    if let Some(handle) = handle {
        handle.await.context("redraw task panicked")?;
    }

    let canvas = canvas.lock();
    let context = render_loop.context();
    let context = context.lock();
    log::info!(
        "after update: {} tasks, {} geometries, {} commands in the last frame, valid: {}",
        canvas.drawables_count(),
        canvas.count_geometries(),
        context.commands().len(),
        canvas.is_valid()
    );

    Ok(())
}
