//! Brute-force nearest-neighbour descriptor matching.

use crate::features::Descriptor;

/// Nearest reference feature for one scene feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Index into the scene feature set.
    pub scene_idx: usize,
    /// Index into the reference feature set.
    pub reference_idx: usize,
    /// Hamming distance between the two descriptors.
    pub distance: f32,
}

/// Matches every scene descriptor to its nearest reference descriptor.
///
/// The search is one-directional: several scene features may map to the same
/// reference feature and no cross-check is applied. Equal distances keep the
/// lowest reference index. `out` is cleared first and is left empty when the
/// reference set is empty.
pub fn match_nearest(scene: &[Descriptor], reference: &[Descriptor], out: &mut Vec<Match>) {
    out.clear();
    if reference.is_empty() {
        return;
    }
    for (scene_idx, query) in scene.iter().enumerate() {
        let mut best_idx = 0usize;
        let mut best_dist = u32::MAX;
        for (reference_idx, train) in reference.iter().enumerate() {
            let dist = query.hamming(train);
            if dist < best_dist {
                best_dist = dist;
                best_idx = reference_idx;
            }
        }
        out.push(Match {
            scene_idx,
            reference_idx: best_idx,
            distance: best_dist as f32,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::match_nearest;
    use crate::features::{Descriptor, DESCRIPTOR_BYTES};

    fn desc(fill: u8) -> Descriptor {
        Descriptor([fill; DESCRIPTOR_BYTES])
    }

    #[test]
    fn each_scene_feature_gets_one_match() {
        let reference = [desc(0x00), desc(0xFF), desc(0x0F)];
        let scene = [desc(0x01), desc(0xFE), desc(0x0F), desc(0x01)];
        let mut out = Vec::new();
        match_nearest(&scene, &reference, &mut out);
        assert_eq!(out.len(), scene.len());
        let picks: Vec<_> = out.iter().map(|m| m.reference_idx).collect();
        assert_eq!(picks, vec![0, 1, 2, 0]);
        assert_eq!(out[0].distance, 32.0);
        assert_eq!(out[2].distance, 0.0);
    }

    #[test]
    fn empty_reference_yields_no_matches() {
        let mut out = vec![];
        match_nearest(&[desc(1)], &[], &mut out);
        assert!(out.is_empty());
    }
}
