use camfilter::features::{FeatureExtractor, FeatureSet};
use camfilter::filter::{CurvePreset, MixerFilter, MixerMode, StrokeEdgesFilter};
use camfilter::{
    Category, DetectorConfig, Filter, FilterChain, Frame, GrayImage, ImageDetector,
    ReferenceTarget,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_frame(width: usize, height: usize) -> Frame {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.extend_from_slice(&[value as u8, (value as u8).wrapping_add(60), (x & 0xFF) as u8, 255]);
        }
    }
    Frame::from_rgba(data, width, height).unwrap()
}

fn extract_patch(frame: &Frame, x0: usize, y0: usize, width: usize, height: usize) -> Frame {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&frame.pixel(x0 + x, y0 + y).unwrap());
        }
    }
    Frame::from_rgba(data, width, height).unwrap()
}

fn bench_filters(c: &mut Criterion) {
    let src = make_frame(640, 480);
    let mut dst = src.clone();

    let mut curve = CurvePreset::Velvia.filter();
    c.bench_function("tone_curve_velvia_640x480", |b| {
        b.iter(|| curve.apply(black_box(&src), &mut dst));
    });

    let mut mixer = MixerFilter::new(MixerMode::Rc);
    c.bench_function("mixer_rc_640x480", |b| {
        b.iter(|| mixer.apply(black_box(&src), &mut dst));
    });

    let mut stroke = StrokeEdgesFilter::new();
    c.bench_function("stroke_edges_640x480", |b| {
        b.iter(|| stroke.apply(black_box(&src), &mut dst));
    });
}

fn bench_detection(c: &mut Criterion) {
    let scene = make_frame(640, 480);
    let reference = extract_patch(&scene, 200, 120, 192, 160);
    let cfg = DetectorConfig::default();

    let gray_data: Vec<u8> = scene.data().chunks_exact(4).map(|p| p[1]).collect();
    let gray = GrayImage::new(gray_data, scene.width(), scene.height()).unwrap();
    let mut extractor = FeatureExtractor::new(cfg.features.clone());
    let mut features = FeatureSet::default();
    c.bench_function("feature_extract_640x480", |b| {
        b.iter(|| extractor.extract(black_box(gray.view()), &mut features));
    });

    let target = ReferenceTarget::from_frame(reference, &cfg.features);
    let mut chain = FilterChain::standard(vec![ImageDetector::new("patch", target, cfg)]);
    chain.select_next(Category::Detection);
    let mut frame = scene.clone();
    c.bench_function("chain_detect_640x480", |b| {
        b.iter(|| {
            frame.copy_from(&scene);
            chain.apply_in_place(black_box(&mut frame));
        });
    });
}

criterion_group!(benches, bench_filters, bench_detection);
criterion_main!(benches);
