//! Temporal smoothing of per-track classifications

use crate::classifier::{Classifier, Label, assign_labels, crop_detections};
use crate::detection::TrackedDetection;
use crate::error::Result;
use crate::history::ClassificationHistory;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// When the wrapped classifier is consulted for an already-known track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Reclassify every frame and vote over a sliding window
    #[default]
    Window,
    /// Stop reclassifying once the window is full and vote over it forever
    FirstN,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingSettings {
    pub window: usize,
    pub mode: SmoothingMode,
    pub max_idle_frames: u64,
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        Self {
            window: 20,
            mode: SmoothingMode::Window,
            max_idle_frames: 30,
        }
    }
}

/// Wraps any classifier and stabilizes its labels per track by majority vote.
///
/// Detections without a track id bypass smoothing and get the raw label.
pub struct SmoothingClassifier<C: Classifier> {
    inner: C,
    history: ClassificationHistory,
    mode: SmoothingMode,
}

impl<C: Classifier> SmoothingClassifier<C> {
    pub fn new(inner: C, settings: SmoothingSettings) -> Self {
        Self {
            inner,
            history: ClassificationHistory::new(settings.window, settings.max_idle_frames),
            mode: settings.mode,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    pub fn history(&self) -> &ClassificationHistory {
        &self.history
    }

    fn should_classify(&self, detection: &TrackedDetection) -> bool {
        match (detection.id, self.mode) {
            (None, _) => true,
            (Some(_), SmoothingMode::Window) => true,
            (Some(id), SmoothingMode::FirstN) => self.history.len_of(id) < self.history.window(),
        }
    }
}

impl<C: Classifier> Classifier for SmoothingClassifier<C> {
    fn predict(&self, crops: &[RgbImage]) -> Vec<Label> {
        self.inner.predict(crops)
    }

    fn predict_from_detections(
        &mut self,
        detections: &mut [TrackedDetection],
        frame: &RgbImage,
    ) -> Result<()> {
        for detection in detections.iter() {
            detection.validate()?;
        }
        self.history.advance_frame();

        let selected: Vec<usize> = (0..detections.len())
            .filter(|&i| self.should_classify(&detections[i]))
            .collect();
        let mut to_classify: Vec<TrackedDetection> =
            selected.iter().map(|&i| detections[i].clone()).collect();
        let crops = crop_detections(&to_classify, frame)?;
        let raw = self.inner.predict(&crops);
        assign_labels(&mut to_classify, raw)?;

        for (index, classified) in selected.into_iter().zip(to_classify) {
            let label = classified.classification.unwrap_or(Label::Unclassified);
            match detections[index].id {
                Some(id) => self.history.push(id, label),
                None => detections[index].classification = Some(label),
            }
        }

        for detection in detections.iter_mut() {
            if let Some(id) = detection.id {
                self.history.touch(id);
                detection.classification = self.history.majority(id);
                debug!("track {} smoothed to {:?}", id, detection.classification);
            }
        }

        self.history.evict_stale();
        Ok(())
    }
}
