use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};
use pitchside::bbox::BBox;
use pitchside::classifier::{HsvClassifier, JerseyRegion};
use pitchside::colors::TeamFilterRegistry;
use pitchside::filter::filter_by_overlap;

// Overlapping clusters of boxes, like a multi-scale detector produces
fn create_mock_boxes(count: usize) -> Vec<BBox> {
    (0..count)
        .map(|i| {
            let cluster = (i / 4) as f64;
            let jitter = (i % 4) as f64 * 2.0;
            BBox::new(cluster * 60.0 + jitter, 100.0 + jitter, 40.0 - jitter, 90.0 - jitter)
        })
        .collect()
}

fn create_mock_crop() -> RgbImage {
    RgbImage::from_fn(64, 128, |_, y| {
        if y < 64 { Rgb([100, 180, 230]) } else { Rgb([20, 20, 20]) }
    })
}

fn benchmark_overlap_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_filter");

    for box_count in [4, 22, 64, 256].iter() {
        let boxes = create_mock_boxes(*box_count);
        group.bench_with_input(
            BenchmarkId::new("filter_by_overlap", box_count),
            &boxes,
            |b, boxes| b.iter(|| black_box(filter_by_overlap(black_box(boxes.clone()), 0.5))),
        );
    }

    group.finish();
}

fn benchmark_hsv_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("hsv_classification");
    let crop = create_mock_crop();

    group.bench_function("whole_crop", |b| {
        let classifier = HsvClassifier::new(TeamFilterRegistry::with_defaults());
        b.iter(|| black_box(classifier.classify(black_box(&crop))))
    });

    group.bench_function("jersey_region", |b| {
        let classifier = HsvClassifier::new(TeamFilterRegistry::with_defaults())
            .with_jersey_region(Some(JerseyRegion::default()));
        b.iter(|| black_box(classifier.classify(black_box(&crop))))
    });

    group.finish();
}

criterion_group!(benches, benchmark_overlap_filter, benchmark_hsv_classification);
criterion_main!(benches);
