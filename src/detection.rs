//! Contracts with the external detector and tracker.
//!
//! The core never detects or tracks anything itself. A detector turns frames
//! into [`DetectionRow`]s, a tracker turns [`Detection`]s into
//! identity-bearing [`TrackedDetection`]s, and everything downstream works
//! on the latter.

use crate::bbox::{BBox, Point};
use crate::classifier::Label;
use crate::error::{Error, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Persistent identity assigned by the tracker
pub type TrackId = u64;

/// One row of detector output, in corner coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRow {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    pub confidence: f64,
    #[serde(alias = "name", alias = "class")]
    pub class_name: String,
}

impl DetectionRow {
    pub fn to_bbox(&self) -> BBox {
        BBox::from_corners((self.xmin, self.ymin), (self.xmax, self.ymax))
    }
}

/// A detector row converted to a box, carrying confidence and class unchanged
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BBox,
    pub confidence: f64,
    pub class_name: String,
}

impl Detection {
    /// Converts a row, rejecting coordinates that are not finite numbers
    pub fn from_row(row: &DetectionRow) -> Result<Self> {
        let bbox = row.to_bbox();
        if !bbox.is_finite() || !row.confidence.is_finite() {
            return Err(Error::ContractViolation(format!(
                "detection row has non-finite values: {:?}",
                row
            )));
        }
        Ok(Self {
            bbox,
            confidence: row.confidence,
            class_name: row.class_name.clone(),
        })
    }
}

impl AsRef<BBox> for Detection {
    fn as_ref(&self) -> &BBox {
        &self.bbox
    }
}

/// Anything that maps a batch of frames to detector rows, one list per frame
pub trait Detector {
    fn predict(&mut self, images: &[RgbImage]) -> anyhow::Result<Vec<Vec<DetectionRow>>>;
}

/// Anything that maps one frame's detections to identity-bearing detections
pub trait Tracker {
    fn update(&mut self, detections: &[Detection]) -> Vec<TrackedDetection>;
}

/// Keeps rows of `class_name` whose confidence is strictly above `min_confidence`
pub fn select_rows(
    rows: &[DetectionRow],
    class_name: &str,
    min_confidence: f64,
) -> Result<Vec<Detection>> {
    rows.iter()
        .filter(|row| row.class_name == class_name && row.confidence > min_confidence)
        .map(Detection::from_row)
        .collect()
}

/// Tracker output: a detection with an optional identity and both
/// frame-local and motion-compensated coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedDetection {
    pub id: Option<TrackId>,
    pub bbox: BBox,
    pub absolute_bbox: BBox,
    pub confidence: Option<f64>,
    pub class_name: Option<String>,
    /// Label written by a classifier
    pub classification: Option<Label>,
}

impl TrackedDetection {
    /// Builds a tracked detection; absolute coordinates default to the frame-local ones
    pub fn new(id: Option<TrackId>, points: [Point; 2], absolute_points: Option<[Point; 2]>) -> Self {
        let bbox = BBox::from_corners(points[0], points[1]);
        let absolute_bbox = absolute_points
            .map(|p| BBox::from_corners(p[0], p[1]))
            .unwrap_or_else(|| bbox.clone());
        Self {
            id,
            bbox,
            absolute_bbox,
            confidence: None,
            class_name: None,
            classification: None,
        }
    }

    pub fn with_detection(mut self, detection: &Detection) -> Self {
        self.confidence = Some(detection.confidence);
        self.class_name = Some(detection.class_name.clone());
        self
    }

    /// Frame-local corners, top-left first
    pub fn points(&self) -> [Point; 2] {
        self.bbox.corners()
    }

    /// Motion-compensated corners, top-left first
    pub fn absolute_points(&self) -> [Point; 2] {
        self.absolute_bbox.corners()
    }

    pub fn validate(&self) -> Result<()> {
        if self.bbox.is_finite() && self.absolute_bbox.is_finite() {
            Ok(())
        } else {
            Err(Error::ContractViolation(format!(
                "tracked detection {:?} has non-finite coordinates",
                self.id
            )))
        }
    }
}

impl AsRef<BBox> for TrackedDetection {
    fn as_ref(&self) -> &BBox {
        &self.bbox
    }
}

/// Serialized tracker output, as found in recorded tracking logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedRecord {
    #[serde(default)]
    pub id: Option<TrackId>,
    pub points: [[f64; 2]; 2],
    #[serde(default)]
    pub absolute_points: Option<[[f64; 2]; 2]>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub class_name: Option<String>,
}

impl From<TrackedRecord> for TrackedDetection {
    fn from(record: TrackedRecord) -> Self {
        let to_points = |p: [[f64; 2]; 2]| [(p[0][0], p[0][1]), (p[1][0], p[1][1])];
        let mut detection = TrackedDetection::new(
            record.id,
            to_points(record.points),
            record.absolute_points.map(to_points),
        );
        detection.confidence = record.confidence;
        detection.class_name = record.class_name;
        detection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(class_name: &str, confidence: f64) -> DetectionRow {
        DetectionRow {
            xmin: 10.0,
            ymin: 20.0,
            xmax: 40.0,
            ymax: 80.0,
            confidence,
            class_name: class_name.to_string(),
        }
    }

    #[test]
    fn test_row_to_detection() {
        let detection = Detection::from_row(&row("person", 0.9)).unwrap();
        assert_eq!(detection.bbox, BBox::new(10.0, 20.0, 30.0, 60.0));
        assert_eq!(detection.confidence, 0.9);
        assert_eq!(detection.class_name, "person");
    }

    #[test]
    fn test_non_finite_row_is_rejected() {
        let mut bad = row("person", 0.9);
        bad.xmax = f64::NAN;
        assert!(matches!(Detection::from_row(&bad), Err(Error::ContractViolation(_))));
    }

    #[test]
    fn test_select_rows_by_class_and_confidence() {
        let rows = vec![row("person", 0.9), row("person", 0.35), row("sports ball", 0.8)];
        let players = select_rows(&rows, "person", 0.35).unwrap();
        assert_eq!(players.len(), 1);
        let balls = select_rows(&rows, "sports ball", 0.3).unwrap();
        assert_eq!(balls.len(), 1);
    }

    #[test]
    fn test_row_deserializes_with_name_alias() {
        let json = r#"{"xmin":1,"ymin":2,"xmax":3,"ymax":4,"confidence":0.5,"name":"person"}"#;
        let parsed: DetectionRow = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.class_name, "person");
    }

    #[test]
    fn test_tracked_detection_defaults_absolute_points() {
        let detection = TrackedDetection::new(Some(3), [(250.0, 300.0), (200.0, 200.0)], None);
        assert_eq!(detection.points(), [(200.0, 200.0), (250.0, 300.0)]);
        assert_eq!(detection.absolute_points(), detection.points());
    }

    #[test]
    fn test_tracked_record_conversion() {
        let json = r#"{"id":7,"points":[[0,0],[10,20]],"absolute_points":[[100,0],[110,20]]}"#;
        let record: TrackedRecord = serde_json::from_str(json).unwrap();
        let detection = TrackedDetection::from(record);
        assert_eq!(detection.id, Some(7));
        assert_eq!(detection.absolute_points(), [(100.0, 0.0), (110.0, 20.0)]);
        assert!(detection.validate().is_ok());
    }
}
