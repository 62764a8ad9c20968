//! Benchmarks for the live frame pipeline and chart derivation
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use railcount::*;

fn create_train_frames(trains: usize, cars_per_train: usize) -> Vec<String> {
    let mut frames = Vec::new();
    for t in 0..trains {
        let id = format!("T{}", t);
        frames.push(format!(r#"{{"event":"train_start","train_id":"{}"}}"#, id));
        frames.push(format!(
            r#"{{"event":"engine_number","train_id":"{}","engine_number":"{}"}}"#,
            id,
            4000 + t
        ));
        for c in 0..cars_per_train {
            frames.push(format!(
                r#"{{"event":"count","train_id":"{}","class":"railcar","speed_mph":31.5,"totals":{{"locomotive":2,"railcar":{}}}}}"#,
                id,
                c + 1
            ));
        }
        frames.push(format!(
            r#"{{"event":"train_end","train_id":"{}","direction":"EB","avg_speed_mph":30.2}}"#,
            id
        ));
    }
    frames
}

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames");

    for capacity in [200, 0] {
        let frames = create_train_frames(10, 100);
        group.throughput(Throughput::Elements(frames.len() as u64));

        group.bench_function(format!("handle_capacity_{}", capacity), |b| {
            b.iter(|| {
                let mut dashboard = LiveDashboard::new(capacity);
                for frame in &frames {
                    let _ = dashboard.handle_frame(black_box(frame));
                }
                dashboard
            })
        });
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let events: Vec<StreamEvent> = create_train_frames(10, 100)
        .iter()
        .map(|f| serde_json::from_str(f).unwrap())
        .collect();

    c.bench_function("dispatch_decoded", |b| {
        b.iter(|| {
            let mut session = SessionState::new();
            let mut view = LiveView::default();
            for event in &events {
                dispatch(&mut session, &mut view, black_box(event));
            }
            view
        })
    });
}

fn bench_charts(c: &mut Criterion) {
    let mut group = c.benchmark_group("charts");

    let days: Vec<DailySummaryPoint> = (0..365)
        .map(|d| {
            let mut point = DailySummaryPoint::new(format!("day-{}", d));
            point.trains_eb = Some((d % 7) as f64);
            point.cars_wb = Some((d % 90) as f64);
            point
        })
        .collect();

    group.bench_function("daily_365", |b| {
        b.iter(|| daily_chart(black_box(&days)).y_max())
    });

    group.finish();
}

criterion_group!(benches, bench_frames, bench_dispatch, bench_charts);
criterion_main!(benches);
