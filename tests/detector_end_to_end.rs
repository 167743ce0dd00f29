use camfilter::detect::render::{make_thumbnail, thumbnail_size};
use camfilter::geometry::{Point2, Quad};
use camfilter::image::resize::resize_area;
use camfilter::{
    Category, DetectorConfig, Filter, FilterChain, Frame, ImageDetector, ReferenceTarget,
    TrackedQuad, Transition,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bright squares on a black background with a black margin.
fn blob_reference(width: usize, height: usize) -> Frame {
    let mut frame = Frame::filled(width, height, [0, 0, 0, 255]).unwrap();
    for y in 8..height - 8 {
        for x in 8..width - 8 {
            if (x - 8) % 24 < 10 && (y - 8) % 24 < 10 {
                frame.put_pixel(x, y, [220, 200, 180, 255]);
            }
        }
    }
    frame
}

/// Random coloured squares on black, dense enough for dozens of corners.
fn textured_reference(width: usize, height: usize, seed: u64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut frame = Frame::filled(width, height, [0, 0, 0, 255]).unwrap();
    for _ in 0..60 {
        let size = rng.random_range(6..=18);
        let x0 = rng.random_range(0..width - size);
        let y0 = rng.random_range(0..height - size);
        let colour = [
            rng.random_range(60..=255),
            rng.random_range(60..=255),
            rng.random_range(60..=255),
            255,
        ];
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                frame.put_pixel(x, y, colour);
            }
        }
    }
    frame
}

fn add_noise(frame: &mut Frame, amplitude: i16, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for px in frame.data_mut().chunks_exact_mut(4) {
        for c in &mut px[..3] {
            let delta = rng.random_range(-amplitude..=amplitude);
            *c = (i16::from(*c) + delta).clamp(0, 255) as u8;
        }
    }
}

fn paste(scene: &mut Frame, patch: &Frame, x0: usize, y0: usize) {
    for y in 0..patch.height() {
        for x in 0..patch.width() {
            scene.put_pixel(x0 + x, y0 + y, patch.pixel(x, y).unwrap());
        }
    }
}

fn detector(reference: Frame) -> ImageDetector {
    let cfg = DetectorConfig::default();
    let target = ReferenceTarget::from_frame(reference, &cfg.features);
    ImageDetector::new("blobs", target, cfg)
}

#[test]
fn reference_extraction_records_features_and_corners() {
    let cfg = DetectorConfig::default();
    let target = ReferenceTarget::from_frame(blob_reference(96, 96), &cfg.features);
    assert!(target.features().len() >= 4);
    assert_eq!(
        target.features().keypoints().len(),
        target.features().descriptors().len()
    );
    assert_eq!(*target.corners(), Quad::from_size(96.0, 96.0));
    assert_eq!((target.width(), target.height()), (96, 96));
}

#[test]
fn blank_frame_keeps_absent_and_draws_thumbnail() {
    let reference = blob_reference(120, 96);
    let mut det = detector(reference.clone());
    assert_eq!(det.last_transition(), None);

    let blank = Frame::filled(160, 120, [30, 60, 90, 255]).unwrap();
    let mut out = Frame::filled(160, 120, [0; 4]).unwrap();
    det.apply(&blank, &mut out);

    assert_eq!(det.last_transition(), Some(Transition::TooFewMatches));
    assert_eq!(det.tracked(), TrackedQuad::Absent);

    let thumb = make_thumbnail(&reference, 160, 120).unwrap().unwrap();
    assert_eq!((thumb.width(), thumb.height()), (60, 48));
    for y in 0..thumb.height() {
        for x in 0..thumb.width() {
            assert_eq!(out.pixel(x, y), thumb.pixel(x, y));
        }
    }
    assert_eq!(out.pixel(60, 0), blank.pixel(60, 0));
    assert_eq!(out.pixel(0, 48), blank.pixel(0, 48));
    assert_eq!(out.pixel(159, 119), blank.pixel(159, 119));

    let mut in_place = blank.clone();
    det.apply_in_place(&mut in_place);
    assert_eq!(in_place, out);

    det.reset();
    assert_eq!(det.last_transition(), None);
}

#[test]
fn thumbnail_fits_half_of_short_side_with_aspect() {
    let cases = [
        (120, 96, 160, 120),
        (96, 120, 160, 120),
        (200, 50, 640, 480),
        (50, 200, 480, 640),
        (64, 64, 99, 300),
    ];
    for (rw, rh, fw, fh) in cases {
        let (tw, th) = thumbnail_size(rw, rh, fw, fh);
        let limit = fw.min(fh) / 2;
        assert_eq!(tw.max(th), limit);
        let want = rw as f64 / rh as f64;
        let got = tw as f64 / th as f64;
        let tol = want.max(1.0 / want) / th.min(tw) as f64;
        assert!((got - want).abs() <= tol + 1e-9, "{rw}x{rh} -> {tw}x{th}");
    }
}

#[test]
fn exact_copy_is_held_by_good_match_rule() {
    let reference = blob_reference(96, 96);
    let mut det = detector(reference.clone());
    let mut scene = Frame::filled(200, 160, [0, 0, 0, 255]).unwrap();
    paste(&mut scene, &reference, 40, 30);

    let t = det.process(&scene);
    assert_eq!(t, Transition::TooFewGood);
    assert_eq!(det.tracked(), TrackedQuad::Absent);
}

#[test]
fn chain_runs_detection_last() {
    let reference = blob_reference(96, 72);
    let mut chain = FilterChain::standard(vec![detector(reference.clone())]);
    assert_eq!(chain.len(Category::Detection), 2);
    chain.select_next(Category::Detection);
    assert_eq!(chain.active_names()[3], "blobs");

    let blank = Frame::filled(100, 80, [0, 0, 0, 255]).unwrap();
    let mut out = blank.clone();
    chain.apply(&blank, &mut out);

    let active = chain.active(Category::Detection).as_detector().unwrap();
    assert_eq!(active.last_transition(), Some(Transition::TooFewMatches));
    let thumb = make_thumbnail(&reference, 100, 80).unwrap().unwrap();
    assert_eq!((thumb.width(), thumb.height()), (40, 30));
    assert_eq!(out.pixel(20, 15), thumb.pixel(20, 15));
}

#[test]
#[should_panic(expected = "frame shape mismatch")]
fn detector_rejects_mismatched_frames() {
    let mut det = detector(blob_reference(64, 64));
    let src = Frame::filled(40, 40, [0; 4]).unwrap();
    let mut dst = Frame::filled(40, 41, [0; 4]).unwrap();
    det.apply(&src, &mut dst);
}

#[test]
fn resampled_noisy_target_is_tracked_and_outlined() {
    let reference = textured_reference(160, 120, 11);
    let mut det = detector(reference.clone());

    let (x0, y0) = (70usize, 60usize);
    let patch = resize_area(&reference, 144, 108).unwrap();
    let mut scene = Frame::filled(320, 240, [0, 0, 0, 255]).unwrap();
    paste(&mut scene, &patch, x0, y0);
    add_noise(&mut scene, 4, 12);

    let mut out = Frame::filled(320, 240, [0; 4]).unwrap();
    det.apply(&scene, &mut out);
    assert_eq!(det.last_transition(), Some(Transition::Updated));

    let quad = *det.tracked().quad().unwrap();
    let expected = Quad::new([
        Point2::new(x0 as f32, y0 as f32),
        Point2::new((x0 + 144) as f32, y0 as f32),
        Point2::new((x0 + 144) as f32, (y0 + 108) as f32),
        Point2::new(x0 as f32, (y0 + 108) as f32),
    ]);
    for (got, want) in quad.corners.iter().zip(expected.corners.iter()) {
        assert!(
            (got.x - want.x).abs() <= 6.0 && (got.y - want.y).abs() <= 6.0,
            "{quad:?}"
        );
    }

    let green = Some(DetectorConfig::default().line_color);
    for (a, b) in quad.edges() {
        let mid = Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let (mx, my) = mid.rounded();
        assert_eq!(out.pixel(mx as usize, my as usize), green);
    }
    assert_eq!(out.pixel(x0 + 72, y0 + 54), scene.pixel(x0 + 72, y0 + 54));
}
