//! Geometric filtering of detections: minimum area and greedy overlap suppression

use crate::bbox::BBox;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Keeps the boxes whose area is at least `min_area`, preserving input order
pub fn filter_by_area<B: AsRef<BBox>>(boxes: Vec<B>, min_area: f64) -> Vec<B> {
    boxes
        .into_iter()
        .filter(|b| b.as_ref().area() >= min_area)
        .collect()
}

/// Greedy non-maximum suppression keyed on area.
///
/// Boxes are visited largest first (equal areas keep their input order) and a
/// box survives only if its IoU with every box kept so far is at most
/// `iou_threshold`. The result is ordered by descending area.
pub fn filter_by_overlap<B: AsRef<BBox>>(boxes: Vec<B>, iou_threshold: f64) -> Vec<B> {
    let mut sorted = boxes;
    sorted.sort_by(|a, b| b.as_ref().area().total_cmp(&a.as_ref().area()));

    let mut kept: Vec<B> = Vec::with_capacity(sorted.len());
    for candidate in sorted {
        let overlapping = kept
            .iter()
            .any(|k| candidate.as_ref().iou(k.as_ref()) > iou_threshold);
        if overlapping {
            debug!("suppressed overlapping box {:?}", candidate.as_ref().points());
        } else {
            kept.push(candidate);
        }
    }
    kept
}

/// Area and overlap thresholds applied together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxFilter {
    pub min_area: f64,
    pub iou_threshold: f64,
}

impl Default for BoxFilter {
    fn default() -> Self {
        Self {
            min_area: 1000.0,
            iou_threshold: 0.5,
        }
    }
}

impl BoxFilter {
    pub fn new(min_area: f64, iou_threshold: f64) -> Self {
        Self {
            min_area,
            iou_threshold,
        }
    }

    /// Drops tiny boxes first, then suppresses duplicates among the rest
    pub fn apply<B: AsRef<BBox>>(&self, boxes: Vec<B>) -> Vec<B> {
        let before = boxes.len();
        let kept = filter_by_overlap(filter_by_area(boxes, self.min_area), self.iou_threshold);
        debug!("box filter kept {} of {} boxes", kept.len(), before);
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_boxes() -> Vec<BBox> {
        vec![
            BBox::new(100.0, 100.0, 50.0, 50.0), // area = 2500
            BBox::new(200.0, 200.0, 30.0, 30.0), // area = 900
            BBox::new(101.0, 101.0, 48.0, 48.0), // area = 2304, overlaps with first
            BBox::new(300.0, 300.0, 10.0, 10.0), // area = 100
        ]
    }

    #[test]
    fn test_filter_by_area_default_threshold() {
        let boxes = sample_boxes();
        let filtered = filter_by_area(boxes.clone(), 1000.0);
        assert_eq!(filtered, vec![boxes[0].clone(), boxes[2].clone()]);
    }

    #[test]
    fn test_filter_by_area_custom_thresholds() {
        assert_eq!(filter_by_area(sample_boxes(), 500.0).len(), 3);
        assert!(filter_by_area(sample_boxes(), 3000.0).is_empty());
    }

    #[test]
    fn test_filter_by_overlap_suppresses_smaller_duplicate() {
        let boxes = sample_boxes();
        let filtered = filter_by_overlap(boxes.clone(), 0.5);
        assert_eq!(
            filtered,
            vec![boxes[0].clone(), boxes[1].clone(), boxes[3].clone()]
        );
    }

    #[test]
    fn test_filter_by_overlap_thresholds() {
        assert_eq!(filter_by_overlap(sample_boxes(), 0.1).len(), 3);
        assert_eq!(filter_by_overlap(sample_boxes(), 0.99).len(), 4);
    }

    #[test]
    fn test_filter_empty_list() {
        assert!(filter_by_overlap(Vec::<BBox>::new(), 0.5).is_empty());
        assert!(filter_by_area(Vec::<BBox>::new(), 0.0).is_empty());
    }

    #[test]
    fn test_filter_single_box() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(filter_by_overlap(vec![bbox.clone()], 50.0), vec![bbox.clone()]);
        assert_eq!(filter_by_overlap(vec![bbox.clone()], 0.0), vec![bbox]);
    }

    #[test]
    fn test_equal_area_tie_keeps_first_seen() {
        let first = BBox::new(0.0, 0.0, 10.0, 10.0);
        let second = BBox::new(1.0, 0.0, 10.0, 10.0);
        let filtered = filter_by_overlap(vec![first.clone(), second], 0.5);
        assert_eq!(filtered, vec![first]);
    }

    #[test]
    fn test_box_filter_apply() {
        let filter = BoxFilter::default();
        let boxes = sample_boxes();
        assert_eq!(filter.apply(boxes.clone()), vec![boxes[0].clone()]);
    }

    fn arb_boxes() -> impl Strategy<Value = Vec<BBox>> {
        prop::collection::vec(
            (0.0f64..200.0, 0.0f64..200.0, 1.0f64..60.0, 1.0f64..60.0)
                .prop_map(|(x, y, w, h)| BBox::new(x, y, w, h)),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn prop_area_filter_is_monotonic(boxes in arb_boxes(), low in 0.0f64..2000.0, step in 0.0f64..2000.0) {
            let loose = filter_by_area(boxes.clone(), low);
            let strict = filter_by_area(boxes, low + step);
            prop_assert!(strict.len() <= loose.len());
            prop_assert!(strict.iter().all(|b| b.area() >= low + step));
        }

        #[test]
        fn prop_overlap_survivors_are_pairwise_below_threshold(boxes in arb_boxes(), threshold in 0.0f64..1.0) {
            let kept = filter_by_overlap(boxes, threshold);
            for (i, a) in kept.iter().enumerate() {
                for b in kept.iter().skip(i + 1) {
                    prop_assert!(a.iou(b) <= threshold);
                }
            }
        }
    }
}
