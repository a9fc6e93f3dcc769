//! Crop classification: the `Classifier` capability and the HSV color classifier

use crate::colors::{TeamFilterRegistry, rgb_to_hsv};
use crate::detection::TrackedDetection;
use crate::error::{Error, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Classification result for one crop
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Team(String),
    Unclassified,
}

impl Label {
    pub fn team(name: impl Into<String>) -> Self {
        Label::Team(name.into())
    }

    pub fn team_name(&self) -> Option<&str> {
        match self {
            Label::Team(name) => Some(name),
            Label::Unclassified => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Team(name) => write!(f, "{}", name),
            Label::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Anything that maps a batch of crops to labels, one per crop, in order
pub trait Classifier {
    fn predict(&self, crops: &[RgbImage]) -> Vec<Label>;

    /// Classifies each detection's region of `frame` and stores the label on it
    fn predict_from_detections(
        &mut self,
        detections: &mut [TrackedDetection],
        frame: &RgbImage,
    ) -> Result<()> {
        let crops = crop_detections(detections, frame)?;
        let labels = self.predict(&crops);
        assign_labels(detections, labels)
    }
}

/// Cuts the frame region of every detection, clamped to the frame
pub fn crop_detections(detections: &[TrackedDetection], frame: &RgbImage) -> Result<Vec<RgbImage>> {
    detections
        .iter()
        .map(|detection| {
            detection.validate()?;
            Ok(detection
                .bbox
                .clamp_to(frame.width(), frame.height())
                .cut(frame))
        })
        .collect()
}

pub(crate) fn assign_labels(detections: &mut [TrackedDetection], labels: Vec<Label>) -> Result<()> {
    if labels.len() != detections.len() {
        return Err(Error::ContractViolation(format!(
            "classifier returned {} labels for {} detections",
            labels.len(),
            detections.len()
        )));
    }
    for (detection, label) in detections.iter_mut().zip(labels) {
        detection.classification = Some(label);
    }
    Ok(())
}

/// Sub-region of a player crop where the shirt usually sits, as fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JerseyRegion {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for JerseyRegion {
    fn default() -> Self {
        Self {
            top: 0.15,
            bottom: 0.50,
            left: 0.15,
            right: 0.85,
        }
    }
}

impl JerseyRegion {
    /// Cuts the region out of `crop`; `None` when it would be empty
    pub fn apply(&self, crop: &RgbImage) -> Option<RgbImage> {
        let (width, height) = crop.dimensions();
        let x1 = (width as f64 * self.left) as u32;
        let x2 = (width as f64 * self.right) as u32;
        let y1 = (height as f64 * self.top) as u32;
        let y2 = (height as f64 * self.bottom) as u32;
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(image::imageops::crop_imm(crop, x1, y1, x2 - x1, y2 - y1).to_image())
    }
}

/// Classifies crops by the fraction of pixels falling in each team's HSV ranges.
///
/// A team scores the best fraction among its own ranges; the best-scoring
/// team wins, earlier registry entries winning exact ties. A winner whose
/// score does not exceed `min_coverage` yields [`Label::Unclassified`].
#[derive(Debug, Clone)]
pub struct HsvClassifier {
    filters: TeamFilterRegistry,
    min_coverage: f64,
    jersey_region: Option<JerseyRegion>,
}

impl HsvClassifier {
    pub fn new(filters: TeamFilterRegistry) -> Self {
        Self {
            filters,
            min_coverage: 0.0,
            jersey_region: None,
        }
    }

    pub fn with_min_coverage(mut self, min_coverage: f64) -> Self {
        self.min_coverage = min_coverage;
        self
    }

    pub fn with_jersey_region(mut self, region: Option<JerseyRegion>) -> Self {
        self.jersey_region = region;
        self
    }

    pub fn filters(&self) -> &TeamFilterRegistry {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut TeamFilterRegistry {
        &mut self.filters
    }

    /// Match score of every registered team, in registry order.
    ///
    /// Empty and all-black crops carry no usable color and score nothing.
    pub fn scores(&self, crop: &RgbImage) -> Vec<(&str, f64)> {
        let region = self.jersey_region.and_then(|r| r.apply(crop));
        let pixels: Vec<_> = region
            .as_ref()
            .unwrap_or(crop)
            .pixels()
            .map(|p| p.0)
            .collect();

        if pixels.iter().all(|p| *p == [0, 0, 0]) {
            return Vec::new();
        }

        let hsv: Vec<_> = pixels.into_iter().map(rgb_to_hsv).collect();
        let total = hsv.len() as f64;

        self.filters
            .iter()
            .map(|filter| {
                let score = filter
                    .colors
                    .iter()
                    .map(|color| hsv.iter().filter(|p| color.contains(**p)).count() as f64 / total)
                    .fold(0.0, f64::max);
                (filter.name.as_str(), score)
            })
            .collect()
    }

    pub fn classify(&self, crop: &RgbImage) -> Label {
        let mut best: Option<(&str, f64)> = None;
        for (name, score) in self.scores(crop) {
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((name, score));
            }
        }

        match best {
            Some((name, score)) if score > self.min_coverage => {
                debug!("crop classified as '{}' ({:.3})", name, score);
                Label::team(name)
            }
            _ => Label::Unclassified,
        }
    }
}

impl Classifier for HsvClassifier {
    fn predict(&self, crops: &[RgbImage]) -> Vec<Label> {
        crops.iter().map(|crop| self.classify(crop)).collect()
    }
}
