use camfilter::{Correspondence, Point2, Quad, TrackedQuad, Tracker, TrackerConfig, Transition};

const REF_W: f32 = 100.0;
const REF_H: f32 = 80.0;

fn scale_map(p: Point2) -> Point2 {
    Point2::new(2.0 * p.x + 10.0, 2.0 * p.y + 20.0)
}

fn grid_matches(distance: f32) -> Vec<Correspondence> {
    let mut out = Vec::new();
    for j in 0..4 {
        for i in 0..5 {
            let reference = Point2::new(i as f32 * 25.0, j as f32 * 80.0 / 3.0);
            out.push(Correspondence {
                reference,
                scene: scale_map(reference),
                distance: distance + (i + j) as f32 * 0.25,
            });
        }
    }
    out
}

fn with_distance(matches: &[Correspondence], distance: f32) -> Vec<Correspondence> {
    matches
        .iter()
        .map(|m| Correspondence { distance, ..*m })
        .collect()
}

fn tracked_tracker() -> (Tracker, Quad) {
    let corners = Quad::from_size(REF_W, REF_H);
    let mut tracker = Tracker::new();
    let t = tracker.update(&grid_matches(10.0), &corners, &TrackerConfig::default());
    assert_eq!(t, Transition::Updated);
    (tracker, corners)
}

fn quad_bits(state: TrackedQuad) -> Option<[(u32, u32); 4]> {
    state
        .quad()
        .map(|q| q.corners.map(|p| (p.x.to_bits(), p.y.to_bits())))
}

#[test]
fn scaled_square_is_reproduced_and_convex() {
    let (tracker, corners) = tracked_tracker();
    let quad = *tracker.state().quad().unwrap();
    for (got, want) in quad.corners.iter().zip(corners.corners.map(scale_map)) {
        assert!((got.x - want.x).abs() < 0.05, "{got:?} vs {want:?}");
        assert!((got.y - want.y).abs() < 0.05, "{got:?} vs {want:?}");
    }
    assert!(quad.is_convex());
    assert_eq!(
        quad.rounded(),
        [(10, 20), (210, 20), (210, 180), (10, 180)]
    );
}

#[test]
fn four_exact_corner_matches_are_enough() {
    let corners = Quad::from_size(REF_W, REF_H);
    let matches: Vec<_> = corners
        .corners
        .iter()
        .map(|&p| Correspondence {
            reference: p,
            scene: scale_map(p),
            distance: 12.0,
        })
        .collect();
    let mut tracker = Tracker::new();
    let t = tracker.update(&matches, &corners, &TrackerConfig::default());
    assert_eq!(t, Transition::Updated);
    assert!(tracker.state().quad().unwrap().is_convex());
}

#[test]
fn fewer_than_four_matches_keep_state() {
    let (mut tracker, corners) = tracked_tracker();
    let before = quad_bits(tracker.state());
    let all = grid_matches(10.0);
    for n in 0..4 {
        let t = tracker.update(&all[..n], &corners, &TrackerConfig::default());
        assert_eq!(t, Transition::TooFewMatches);
        assert_eq!(quad_bits(tracker.state()), before);
    }

    let mut absent = Tracker::new();
    let t = absent.update(&all[..3], &corners, &TrackerConfig::default());
    assert_eq!(t, Transition::TooFewMatches);
    assert_eq!(absent.state(), TrackedQuad::Absent);
}

#[test]
fn weak_best_match_clears_state() {
    let (mut tracker, corners) = tracked_tracker();
    let matches = with_distance(&grid_matches(0.0), 60.0);
    let t = tracker.update(&matches, &corners, &TrackerConfig::default());
    assert_eq!(t, Transition::Cleared);
    assert_eq!(tracker.state(), TrackedQuad::Absent);
}

#[test]
fn ambiguous_best_match_keeps_state_bit_identical() {
    let (mut tracker, corners) = tracked_tracker();
    let before = quad_bits(tracker.state());
    let matches = with_distance(&grid_matches(0.0), 30.0);
    let t = tracker.update(&matches, &corners, &TrackerConfig::default());
    assert_eq!(t, Transition::Ambiguous);
    assert_eq!(quad_bits(tracker.state()), before);
}

#[test]
fn boundary_distances_follow_gating() {
    let corners = Quad::from_size(REF_W, REF_H);
    let cfg = TrackerConfig::default();

    let (mut tracker, _) = tracked_tracker();
    let t = tracker.update(&with_distance(&grid_matches(0.0), 50.0), &corners, &cfg);
    assert_eq!(t, Transition::Ambiguous);
    assert!(tracker.state().is_present());

    let t = tracker.update(&with_distance(&grid_matches(0.0), 25.0), &corners, &cfg);
    assert_eq!(t, Transition::Updated);
}

#[test]
fn too_few_good_matches_keep_state() {
    let (mut tracker, corners) = tracked_tracker();
    let before = quad_bits(tracker.state());
    let mut matches = with_distance(&grid_matches(0.0), 24.0);
    for m in matches.iter_mut().skip(3) {
        m.distance = 42.0;
    }
    let t = tracker.update(&matches, &corners, &TrackerConfig::default());
    assert_eq!(t, Transition::TooFewGood);
    assert_eq!(quad_bits(tracker.state()), before);
}

#[test]
fn self_intersecting_candidate_is_rejected() {
    let (mut tracker, corners) = tracked_tracker();
    let before = quad_bits(tracker.state());

    let mut scene = corners.corners.map(scale_map);
    scene.swap(2, 3);
    let matches: Vec<_> = corners
        .corners
        .iter()
        .zip(scene.iter())
        .map(|(&reference, &scene)| Correspondence {
            reference,
            scene,
            distance: 10.0,
        })
        .collect();

    let t = tracker.update(&matches, &corners, &TrackerConfig::default());
    assert_eq!(t, Transition::RejectedNonConvex);
    assert_eq!(quad_bits(tracker.state()), before);
}

#[test]
fn updates_are_deterministic() {
    let corners = Quad::from_size(REF_W, REF_H);
    let mut matches = grid_matches(10.0);
    matches.push(Correspondence {
        reference: Point2::new(50.0, 40.0),
        scene: Point2::new(400.0, 5.0),
        distance: 11.0,
    });
    let mut a = Tracker::new();
    let mut b = Tracker::new();
    let cfg = TrackerConfig::default();
    assert_eq!(a.update(&matches, &corners, &cfg), Transition::Updated);
    assert_eq!(b.update(&matches, &corners, &cfg), Transition::Updated);
    assert_eq!(quad_bits(a.state()), quad_bits(b.state()));
}

#[test]
fn far_away_corners_are_an_ordinary_outcome() {
    let corners = Quad::from_size(100.0, 100.0);
    let scene = [
        Point2::new(-3e9, 0.0),
        Point2::new(0.0, -10.0),
        Point2::new(3e9, 0.0),
        Point2::new(0.0, 10.0),
    ];
    let matches: Vec<_> = corners
        .corners
        .iter()
        .zip(scene.iter())
        .map(|(&reference, &scene)| Correspondence {
            reference,
            scene,
            distance: 10.0,
        })
        .collect();

    let mut tracker = Tracker::new();
    let t = tracker.update(&matches, &corners, &TrackerConfig::default());
    assert!(
        matches!(
            t,
            Transition::Updated | Transition::NoModel | Transition::RejectedNonConvex
        ),
        "{t:?}"
    );
    match tracker.state() {
        TrackedQuad::Present(quad) => {
            assert_eq!(t, Transition::Updated);
            assert!(quad.corners.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
            assert!(quad.is_convex());
        }
        TrackedQuad::Absent => assert_ne!(t, Transition::Updated),
    }
}
