use anyhow::Result;
use motion_core::{
    Animation, CanvasEvent, ContainerGeometry, DrawCommand, DrawableTask, EasingFunction,
    Geometry, LabelGeometry, ManualClock, MotionCanvas, MotionError, Paint, Point, Rect,
    RecordingContext, RectangleGeometry, RenderConfig, Repeat, TransitionTarget, share,
};
use std::sync::Arc;

const EPSILON: f64 = 1e-6;

fn linear(duration_ms: u64) -> Animation {
    Animation::new(EasingFunction::Linear, duration_ms)
}

fn canvas() -> (MotionCanvas, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    (MotionCanvas::with_clock(clock.clone()), clock)
}

/// A bar whose opacity fades from 0 to 1 with `animation`.
fn fading_bar(animation: Animation) -> Result<RectangleGeometry> {
    let mut bar = RectangleGeometry::new(Rect::new(0.0, 0.0, 10.0, 10.0));
    bar.set_opacity(0.0);
    bar.animatable_mut()
        .set_transition(animation, TransitionTarget::Named(&["Opacity"]))?;
    bar.set_opacity(1.0);
    Ok(bar)
}

fn opacity(bar: &RectangleGeometry) -> f64 {
    bar.animatable().scalar(RectangleGeometry::OPACITY)
}

#[test]
fn linear_opacity_follows_frame_time() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let bar = share(fading_bar(linear(1000))?);
    let mut task = DrawableTask::new(Paint::default());
    task.add_geometry(bar.clone());
    canvas.add_task(task);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();

    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert_eq!(opacity(&bar.lock()), 0.0);
    assert!(!report.is_valid);

    clock.set(500);
    canvas.draw_frame(&mut ctx, &config)?;
    assert!((opacity(&bar.lock()) - 0.5).abs() < EPSILON);

    clock.set(1000);
    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert_eq!(opacity(&bar.lock()), 1.0);
    assert!(bar.lock().is_valid());
    assert!(report.is_valid);

    clock.set(1500);
    canvas.draw_frame(&mut ctx, &config)?;
    assert_eq!(opacity(&bar.lock()), 1.0);

    Ok(())
}

#[test]
fn repeated_fade_restarts_each_cycle() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let bar = share(fading_bar(linear(1000).with_repeat(Repeat::times(2)))?);
    let mut task = DrawableTask::new(Paint::default());
    task.add_geometry(bar.clone());
    canvas.add_task(task);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();
    canvas.draw_frame(&mut ctx, &config)?;

    clock.set(900);
    canvas.draw_frame(&mut ctx, &config)?;
    assert!((opacity(&bar.lock()) - 0.9).abs() < EPSILON);

    clock.set(1000);
    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert!(opacity(&bar.lock()) < EPSILON);
    assert!(!report.is_valid);

    clock.set(1500);
    canvas.draw_frame(&mut ctx, &config)?;
    assert!((opacity(&bar.lock()) - 0.5).abs() < EPSILON);
    assert!(!bar.lock().is_valid());

    clock.set(2500);
    assert!(!canvas.draw_frame(&mut ctx, &config)?.is_valid);

    clock.set(3000);
    assert!(canvas.draw_frame(&mut ctx, &config)?.is_valid);
    assert_eq!(opacity(&bar.lock()), 1.0);

    Ok(())
}

#[test]
fn geometries_sharing_a_canvas_stay_in_step() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let first = share(RectangleGeometry::new(Rect::default()).with_animation(linear(1000)));
    let second = share(RectangleGeometry::new(Rect::default()).with_animation(linear(1000)));

    let mut low = DrawableTask::new(Paint::default());
    low.add_geometry(first.clone());
    let mut high = DrawableTask::new(Paint::default()).with_z_index(5);
    high.add_geometry(second.clone());
    canvas.add_task(low);
    canvas.add_task(high);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();
    canvas.draw_frame(&mut ctx, &config)?;

    first.lock().animatable_mut().set_value(RectangleGeometry::X, 100.0);
    second.lock().animatable_mut().set_value(RectangleGeometry::X, 100.0);

    for now in [16, 333, 700, 999, 1000] {
        clock.set(now);
        canvas.draw_frame(&mut ctx, &config)?;
        let a = first.lock().animatable().scalar(RectangleGeometry::X);
        let b = second.lock().animatable().scalar(RectangleGeometry::X);
        assert_eq!(a, b, "geometries diverged at {now}");

        let drawn: Vec<f64> = ctx
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Rect { rect, .. } => Some(rect.x),
                _ => None,
            })
            .collect();
        assert_eq!(drawn, vec![a, a]);
    }

    Ok(())
}

#[test]
fn validated_only_when_everything_settled() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let bar = share(fading_bar(linear(100))?);
    let mut task = DrawableTask::new(Paint::default());
    task.add_geometry(bar);
    canvas.add_task(task);
    assert_eq!(canvas.drain_events(), vec![CanvasEvent::Invalidated]);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();
    canvas.draw_frame(&mut ctx, &config)?;
    assert!(!canvas.is_valid());
    assert!(canvas.drain_events().is_empty());

    clock.set(100);
    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert!(report.is_valid);
    assert_eq!(
        canvas.drain_events(),
        vec![CanvasEvent::Validated {
            frame: report.frame
        }]
    );

    Ok(())
}

#[test]
fn completed_geometry_is_evicted_after_its_last_frame() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let keep = share(RectangleGeometry::new(Rect::default()));
    let fading = share(fading_bar(linear(1000))?);
    fading.lock().animatable_mut().set_remove_on_completed(true);

    let mut task = DrawableTask::new(Paint::default());
    task.add_geometry(keep);
    let fading_id = task.add_geometry(fading.clone());
    let task_id = canvas.add_task(task);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();

    for now in [0, 400, 999] {
        clock.set(now);
        let report = canvas.draw_frame(&mut ctx, &config)?;
        assert!(report.removed_geometries.is_empty());
        assert!(canvas.task(task_id).is_some_and(|t| t.contains(fading_id)));
    }

    // Settles here: drawn one last time, then evicted, frame stays invalid
    clock.set(1000);
    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert_eq!(report.drawn, 2);
    assert_eq!(report.removed_geometries, vec![fading_id]);
    assert!(!report.is_valid);
    assert!(!canvas.is_valid());
    assert!(!canvas.task(task_id).is_some_and(|t| t.contains(fading_id)));
    assert_eq!(canvas.count_geometries(), 1);

    clock.set(1016);
    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert!(report.is_valid);
    assert_eq!(report.drawn, 1);

    // The caller's handle outlives the eviction
    assert_eq!(opacity(&fading.lock()), 1.0);

    Ok(())
}

#[test]
fn indefinite_animation_is_never_evicted() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let pulsing = share(fading_bar(linear(100).with_repeat(Repeat::Indefinite))?);
    pulsing.lock().animatable_mut().set_remove_on_completed(true);

    let mut task = DrawableTask::new(Paint::default());
    let id = task.add_geometry(pulsing);
    let task_id = canvas.add_task(task);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();
    for now in (0..10_000).step_by(250) {
        clock.set(now);
        let report = canvas.draw_frame(&mut ctx, &config)?;
        assert!(!report.is_valid);
        assert!(report.removed_geometries.is_empty());
    }
    assert!(canvas.task(task_id).is_some_and(|t| t.contains(id)));

    Ok(())
}

#[test]
fn settled_task_flagged_for_removal_is_evicted() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let mut paint = Paint::default().with_animation(linear(200));
    paint.set_color(motion_core::Color::WHITE);
    let mut task = DrawableTask::new(paint);
    task.set_remove_on_completed(true);
    let id = canvas.add_task(task);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();

    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert!(report.removed_tasks.is_empty());
    assert_eq!(canvas.drawables_count(), 1);

    clock.set(200);
    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert_eq!(report.removed_tasks, vec![id]);
    assert!(!report.is_valid);
    assert_eq!(canvas.drawables_count(), 0);

    Ok(())
}

#[test]
fn paused_task_skips_its_geometries() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let bar = share(fading_bar(linear(1000))?);
    let mut task = DrawableTask::new(Paint::default());
    task.add_geometry(bar.clone());
    let id = canvas.add_task(task);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();
    canvas.draw_frame(&mut ctx, &config)?;
    if let Some(task) = canvas.task_mut(id) {
        task.set_paused(true);
    }

    clock.set(500);
    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert_eq!(report.drawn, 0);
    assert!(ctx.commands().is_empty());
    assert_eq!(bar.lock().animatable().current_time(), 0);

    if let Some(task) = canvas.task_mut(id) {
        task.set_paused(false);
    }
    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert_eq!(report.drawn, 1);
    assert!((opacity(&bar.lock()) - 0.5).abs() < EPSILON);

    Ok(())
}

#[test]
fn disabled_animations_settle_in_one_frame() -> Result<()> {
    let (mut canvas, _clock) = canvas();
    let bar = share(fading_bar(linear(1000))?);
    let mut task = DrawableTask::new(Paint::default());
    task.add_geometry(bar.clone());
    canvas.add_task(task);

    let config = RenderConfig {
        disable_animations: true,
        ..RenderConfig::default()
    };
    let mut ctx = RecordingContext::new();
    let report = canvas.draw_frame(&mut ctx, &config)?;

    assert!(report.is_valid);
    assert_eq!(opacity(&bar.lock()), 1.0);
    match &ctx.commands()[0] {
        DrawCommand::Rect { brush, .. } => assert_eq!(brush.color.a, 1.0),
        other => panic!("unexpected command {other:?}"),
    }

    Ok(())
}

#[test]
fn missing_content_aborts_the_frame() -> Result<()> {
    let (mut canvas, _clock) = canvas();
    let removable = share(RectangleGeometry::new(Rect::default()));
    removable.lock().animatable_mut().set_remove_on_completed(true);

    let mut first = DrawableTask::new(Paint::default()).with_z_index(0);
    let removable_id = first.add_geometry(removable);
    let first_id = canvas.add_task(first);

    let mut second = DrawableTask::new(Paint::default()).with_z_index(1);
    second.add_geometry(share(ContainerGeometry::new(Point::ORIGIN)));
    canvas.add_task(second);
    canvas.drain_events();

    let mut ctx = RecordingContext::new();
    let err = canvas
        .draw_frame(&mut ctx, &RenderConfig::default())
        .unwrap_err();

    assert_eq!(
        err,
        MotionError::MissingContent {
            container: "ContainerGeometry"
        }
    );
    assert!(!canvas.is_valid());
    assert!(canvas.drain_events().is_empty());
    assert!(canvas.task(first_id).is_some_and(|t| t.contains(removable_id)));

    Ok(())
}

#[test]
fn tasks_are_visited_by_z_index_then_registration() -> Result<()> {
    let (mut canvas, _clock) = canvas();
    for (text, z) in [("a", 2), ("b", 0), ("c", 0), ("d", -1)] {
        let mut task = DrawableTask::new(Paint::default()).with_z_index(z);
        task.add_geometry(share(LabelGeometry::new(text, Point::ORIGIN, 10.0)));
        canvas.add_task(task);
    }

    let mut ctx = RecordingContext::new();
    canvas.draw_frame(&mut ctx, &RenderConfig::default())?;

    let order: Vec<&str> = ctx
        .commands()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(order, vec!["d", "b", "c", "a"]);

    Ok(())
}

#[test]
fn retarget_from_another_thread_between_frames() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let bar = share(RectangleGeometry::new(Rect::default()).with_animation(linear(100)));
    let mut task = DrawableTask::new(Paint::default());
    task.add_geometry(bar.clone());
    canvas.add_task(task);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();
    assert!(canvas.draw_frame(&mut ctx, &config)?.is_valid);

    let signal = canvas.signal();
    let layout = std::thread::spawn(move || {
        bar.lock().set_rect(Rect::new(0.0, 0.0, 10.0, 40.0));
        signal.invalidate();
    });
    layout.join().expect("layout thread panicked");

    assert!(!canvas.is_valid());
    assert!(!canvas.draw_frame(&mut ctx, &config)?.is_valid);

    clock.set(100);
    assert!(canvas.draw_frame(&mut ctx, &config)?.is_valid);

    Ok(())
}

#[test]
fn retarget_after_idle_period_animates_from_next_frame() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let bar = share(RectangleGeometry::new(Rect::default()).with_animation(linear(1000)));
    let mut task = DrawableTask::new(Paint::default());
    task.add_geometry(bar.clone());
    canvas.add_task(task);

    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();
    assert!(canvas.draw_frame(&mut ctx, &config)?.is_valid);

    // No frames are pulled while the canvas is valid
    clock.set(5000);
    bar.lock().set_rect(Rect::new(0.0, 0.0, 10.0, 100.0));
    canvas.invalidate();

    let report = canvas.draw_frame(&mut ctx, &config)?;
    assert!(!report.is_valid);
    assert_eq!(bar.lock().rect().height, 0.0);

    clock.set(5500);
    canvas.draw_frame(&mut ctx, &config)?;
    assert!((bar.lock().rect().height - 50.0).abs() < EPSILON);

    clock.set(6000);
    assert!(canvas.draw_frame(&mut ctx, &config)?.is_valid);
    assert_eq!(bar.lock().rect().height, 100.0);

    Ok(())
}

#[test]
fn geometry_added_late_starts_at_its_first_frame() -> Result<()> {
    let (mut canvas, clock) = canvas();
    let config = RenderConfig::default();
    let mut ctx = RecordingContext::new();
    canvas.draw_frame(&mut ctx, &config)?;

    clock.set(60_000);
    let bar = share(fading_bar(linear(1000))?);
    let mut task = DrawableTask::new(Paint::default());
    task.add_geometry(bar.clone());
    canvas.add_task(task);

    canvas.draw_frame(&mut ctx, &config)?;
    assert_eq!(opacity(&bar.lock()), 0.0);

    clock.set(60_250);
    canvas.draw_frame(&mut ctx, &config)?;
    assert!((opacity(&bar.lock()) - 0.25).abs() < EPSILON);

    Ok(())
}
