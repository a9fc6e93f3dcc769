//! Team attribution for tracked soccer footage.
//!
//! Detector and tracker output goes in; team labels, possession counts,
//! passes and drawable descriptors come out.

pub mod ball;
pub mod bbox;
pub mod classifier;
pub mod colors;
pub mod config;
pub mod detection;
pub mod draw;
pub mod error;
pub mod filter;
pub mod history;
pub mod passes;
pub mod pipeline;
pub mod player;
pub mod possession;
pub mod replay;
pub mod smoothing;
pub mod team;

pub use ball::Ball;
pub use bbox::BBox;
pub use classifier::{Classifier, HsvClassifier, Label};
pub use colors::{TeamFilter, TeamFilterRegistry};
pub use detection::{Detection, DetectionRow, Detector, TrackedDetection, Tracker};
pub use error::{Error, Result};
pub use pipeline::{FramePipeline, FrameReport, PipelineSettings};
pub use player::Player;
pub use possession::Match;
pub use smoothing::SmoothingClassifier;
pub use team::Team;
