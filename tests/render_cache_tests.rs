mod common;

use common::{CountingContent, MockBackend, MockFrame, Op};
use fastdraw::render_cache::{CacheStatus, RenderCache, RenderOutcome, SkipReason};
use fastdraw::transform::AffineTransform;
use fastdraw::utils::{Rectangle, Size};

fn cache(width: f32, height: f32) -> RenderCache<MockBackend> {
    RenderCache::new(MockBackend::default(), Size::new(width, height))
}

#[test]
fn first_render_records_then_reuses() {
    let mut cache = cache(800.0, 600.0);
    let content = CountingContent::default();
    let mut frame = MockFrame::cpu();

    assert_eq!(cache.status(), CacheStatus::Empty);
    assert_eq!(
        cache.render(&mut frame, &content),
        RenderOutcome::Composited { recorded: true }
    );
    assert_eq!(cache.status(), CacheStatus::Recorded);

    for _ in 0..5 {
        assert_eq!(
            cache.render(&mut frame, &content),
            RenderOutcome::Composited { recorded: false }
        );
    }

    assert_eq!(content.draws.get(), 1);
    let backend = cache.backend();
    assert_eq!(backend.recordings, 1);
    assert_eq!(backend.picture_draws, 1);
    assert_eq!(backend.surfaces_created, 1);
    assert_eq!(backend.snapshots, 6);
    assert_eq!(cache.stats().composites, 6);
}

#[test]
fn invalidate_forces_exactly_one_rerecord() {
    let mut cache = cache(800.0, 600.0);
    let content = CountingContent::default();
    let mut frame = MockFrame::cpu();

    cache.render(&mut frame, &content);
    cache.render(&mut frame, &content);
    cache.invalidate(Size::new(640.0, 480.0));
    assert_eq!(cache.status(), CacheStatus::Empty);
    assert_eq!(cache.backend().live_surfaces(), 0);

    assert_eq!(
        cache.render(&mut frame, &content),
        RenderOutcome::Composited { recorded: true }
    );
    assert_eq!(
        cache.render(&mut frame, &content),
        RenderOutcome::Composited { recorded: false }
    );

    assert_eq!(content.draws.get(), 2);
    assert_eq!(cache.backend().recordings, 2);
    assert_eq!(cache.backend().last_surface_size, Some((640, 480)));
}

#[test]
fn transform_updates_never_rerecord() {
    let mut cache = cache(300.0, 200.0);
    let content = CountingContent::default();
    let mut frame = MockFrame::cpu();
    cache.render(&mut frame, &content);

    for i in 0..50 {
        cache.set_transform(AffineTransform::from_translate(i as f32, -(i as f32)));
        cache.set_transform(AffineTransform::from_scale(1.5, 1.5));
        cache.render(&mut frame, &content);
    }

    assert_eq!(cache.backend().recordings, 1);
    assert_eq!(content.draws.get(), 1);
    assert_eq!(cache.status(), CacheStatus::Recorded);
}

#[test]
fn composite_applies_transform_around_blit() {
    let mut cache = cache(300.0, 200.0);
    let content = CountingContent::default();
    let mut frame = MockFrame::cpu();

    let t = AffineTransform::from_scale(2.0, 2.0)
        .post_concat(AffineTransform::from_translate(15.0, -5.0));
    cache.set_transform(t);
    cache.render(&mut frame, &content);

    let bounds = Rectangle::new(0.0, 0.0, 300.0, 200.0);
    assert_eq!(
        frame.canvas.ops,
        vec![
            Op::Save,
            Op::Translate(15.0, -5.0),
            Op::Scale(2.0, 2.0),
            Op::DrawImage {
                src: bounds,
                dst: bounds
            },
            Op::Restore,
        ]
    );
}

#[test]
fn degenerate_bounds_skip_without_allocating() {
    for size in [Size::new(0.0, 100.0), Size::new(100.0, 0.0), Size::new(-3.0, 5.0)] {
        let mut cache = cache(size.width, size.height);
        let content = CountingContent::default();
        let mut frame = MockFrame::cpu();

        assert_eq!(
            cache.render(&mut frame, &content),
            RenderOutcome::Skipped(SkipReason::Degenerate)
        );
        assert!(frame.canvas.ops.is_empty());
        assert_eq!(cache.backend().surfaces_created, 0);
        assert_eq!(content.draws.get(), 0);
        assert_eq!(cache.stats().skipped, 1);
    }
}

#[test]
fn missing_lease_skips_then_recovers() {
    let mut cache = cache(100.0, 100.0);
    let content = CountingContent::default();

    let mut refused = MockFrame::without_lease();
    assert_eq!(
        cache.render(&mut refused, &content),
        RenderOutcome::Skipped(SkipReason::NoLease)
    );
    assert_eq!(cache.status(), CacheStatus::Empty);
    assert_eq!(cache.backend().surfaces_created, 0);

    let mut frame = MockFrame::cpu();
    assert_eq!(
        cache.render(&mut frame, &content),
        RenderOutcome::Composited { recorded: true }
    );
}

#[test]
fn allocation_failure_retries_next_frame() {
    let mut cache = cache(100.0, 100.0);
    let content = CountingContent::default();
    let mut frame = MockFrame::cpu();

    cache.backend_mut().fail_allocation = true;
    assert_eq!(
        cache.render(&mut frame, &content),
        RenderOutcome::Skipped(SkipReason::SurfaceUnavailable)
    );
    assert_eq!(content.draws.get(), 0);
    assert!(frame.canvas.ops.is_empty());

    cache.backend_mut().fail_allocation = false;
    assert_eq!(
        cache.render(&mut frame, &content),
        RenderOutcome::Composited { recorded: true }
    );
}

#[test]
fn prefers_gpu_surface_when_context_present() {
    let content = CountingContent::default();

    let mut gpu_cache = cache(64.0, 32.0);
    gpu_cache.render(&mut MockFrame::gpu(), &content);
    assert_eq!(gpu_cache.backend().gpu_surfaces, 1);

    let mut cpu_cache = cache(64.0, 32.0);
    cpu_cache.render(&mut MockFrame::cpu(), &content);
    assert_eq!(cpu_cache.backend().gpu_surfaces, 0);
    assert_eq!(cpu_cache.backend().surfaces_created, 1);
}

#[test]
fn surface_matches_bounds_rounded_up() {
    let mut cache = cache(800.4, 600.0);
    cache.render(&mut MockFrame::cpu(), &CountingContent::default());
    assert_eq!(cache.backend().last_surface_size, Some((801, 600)));
}

#[test]
fn repeated_resizes_release_every_surface() {
    let mut cache = cache(100.0, 100.0);
    let content = CountingContent::default();
    let mut frame = MockFrame::cpu();

    for i in 1..=20 {
        cache.render(&mut frame, &content);
        assert_eq!(cache.backend().live_surfaces(), 1);
        cache.invalidate(Size::new(100.0 + i as f32, 100.0));
    }
    assert_eq!(cache.backend().live_surfaces(), 0);
    assert_eq!(cache.backend().surfaces_created, 20);
    assert_eq!(cache.stats().invalidations, 20);
}

#[test]
fn invalidate_before_any_render_is_harmless() {
    let mut cache = cache(0.0, 0.0);
    cache.invalidate(Size::new(10.0, 10.0));
    cache.invalidate(Size::new(20.0, 10.0));
    assert_eq!(cache.status(), CacheStatus::Empty);
    assert_eq!(cache.bounds(), Size::new(20.0, 10.0));
    assert_eq!(
        cache.render(&mut MockFrame::cpu(), &CountingContent::default()),
        RenderOutcome::Composited { recorded: true }
    );
}
