//! Throughput benches for the hot gesture paths: sample handling during a
//! drag and spring settling.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pincer_animation::{MotionSpec, SpringAnimator};
use pincer_core::{Point, Size, Transform};
use pincer_foundation::BoundaryPolicy;
use pincer_ui::{Draggable, DraggableCallbacks, DraggableConfig};

fn drag_move_throughput(c: &mut Criterion) {
    c.bench_function("draggable_1k_move_samples", |b| {
        b.iter(|| {
            let mut drag = Draggable::new(
                DraggableConfig {
                    element_size: Size::new(100.0, 100.0),
                    bounds: Some(BoundaryPolicy {
                        left: Some(0.0),
                        top: Some(0.0),
                        right: Some(800.0),
                        bottom: Some(600.0),
                        ..BoundaryPolicy::default()
                    }),
                    ..DraggableConfig::default()
                },
                DraggableCallbacks::default(),
            );
            drag.on_pointer_down(1, Point::new(0.0, 0.0), 0);
            for i in 0..1_000u64 {
                let x = (i % 700) as f32;
                drag.on_pointer_move(1, Point::new(x, 50.0), i * 8);
            }
            drag.on_pointer_up(1, Point::new(700.0, 50.0), 8_000);
            black_box(drag.transform());
        });
    });
}

fn spring_settle_throughput(c: &mut Criterion) {
    c.bench_function("spring_settle_full", |b| {
        b.iter(|| {
            let mut animator = SpringAnimator::new();
            animator.animate_to(
                Transform::IDENTITY,
                Transform::translation(300.0, 120.0),
                MotionSpec::default(),
            );
            let mut now = 0;
            loop {
                now += 16;
                match animator.on_frame(now) {
                    Some(frame) if frame.done => break black_box(frame.transform),
                    Some(_) => {}
                    None => unreachable!("animator lost its animation"),
                }
            }
        });
    });
}

criterion_group!(benches, drag_move_throughput, spring_settle_throughput);
criterion_main!(benches);
