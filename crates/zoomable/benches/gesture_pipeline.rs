use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use zoomable::prelude::*;
use zoomable_core::FrameClock;
use zoomable_testing::TouchInjector;
use zoomable_ui_graphics::{Point, Size};

const VIEWPORT: Size = Size {
    width: 1080.0,
    height: 1920.0,
};
const CONTENT: Size = Size {
    width: 4000.0,
    height: 3000.0,
};
const DRAG_STEP_SAMPLES: &[usize] = &[16, 128];

struct SurfaceFixture {
    clock: FrameClock,
    state: ZoomState,
    node: ZoomableNode,
}

impl SurfaceFixture {
    fn new() -> Self {
        let clock = FrameClock::new();
        let state = ZoomState::new(
            clock.clone(),
            ZoomStateConfig::default().with_content_size(CONTENT),
        )
        .expect("zoom state");
        let mut node = ZoomableNode::new(state.clone(), ZoomableOptions::zoomable());
        node.on_measured(VIEWPORT);
        Self { clock, state, node }
    }

    fn settle(&self) {
        let mut time = self.clock.last_frame_nanos().unwrap_or(0);
        while self.state.is_animating() {
            time += 16_000_000;
            self.clock.drain_frame_callbacks(time);
        }
    }
}

fn bench_pinch_then_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture_pipeline");
    for &steps in DRAG_STEP_SAMPLES {
        group.bench_with_input(BenchmarkId::new("drag_steps", steps), &steps, |b, &steps| {
            let mut fixture = SurfaceFixture::new();
            b.iter(|| {
                fixture.state.reset();
                let mut touch = TouchInjector::new(VIEWPORT);
                let center = touch.center();
                touch.pinch(
                    center - Point::new(50.0, 0.0),
                    center - Point::new(150.0, 0.0),
                    center + Point::new(50.0, 0.0),
                    center + Point::new(150.0, 0.0),
                    160,
                );
                touch.down(0, center);
                for _ in 0..steps {
                    touch.move_by(0, Point::new(-12.0, 4.0));
                }
                touch.up(0);
                black_box(touch.flush_into(&mut fixture.node));
                fixture.settle();
                black_box(fixture.state.graphics_layer());
            });
        });
    }
    group.finish();
}

fn bench_apply_gesture(c: &mut Criterion) {
    let fixture = SurfaceFixture::new();
    let center = VIEWPORT.center();
    c.bench_function("apply_gesture", |b| {
        let mut uptime = 0;
        b.iter(|| {
            fixture.state.start_gesture();
            for step in 0..64 {
                uptime += 16;
                let zoom = if step % 2 == 0 { 1.05 } else { 0.97 };
                fixture.state.apply_gesture(
                    black_box(Point::new(3.0, -2.0)),
                    black_box(zoom),
                    center,
                    uptime,
                );
            }
        });
    });
}

criterion_group!(benches, bench_pinch_then_drag, bench_apply_gesture);
criterion_main!(benches);
