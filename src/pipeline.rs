//! Per-frame orchestration: filter, classify, attribute possession

use crate::ball::Ball;
use crate::classifier::{Classifier, HsvClassifier, JerseyRegion};
use crate::colors::TeamFilterRegistry;
use crate::detection::{Detector, TrackedDetection, Tracker, select_rows};
use crate::draw::Drawable;
use crate::error::Result;
use crate::filter::BoxFilter;
use crate::passes::Pass;
use crate::player::Player;
use crate::possession::{Match, PossessionSettings};
use crate::smoothing::{SmoothingClassifier, SmoothingSettings};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Every tunable of the pipeline; missing fields take their defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub player_class: String,
    pub player_confidence: f64,
    pub ball_class: String,
    pub ball_confidence: f64,
    pub filter: BoxFilter,
    pub min_coverage: f64,
    pub jersey_region: Option<JerseyRegion>,
    pub smoothing: SmoothingSettings,
    pub possession: PossessionSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            player_class: "person".to_string(),
            player_confidence: 0.35,
            ball_class: "sports ball".to_string(),
            ball_confidence: 0.3,
            filter: BoxFilter::default(),
            min_coverage: 0.0,
            jersey_region: None,
            smoothing: SmoothingSettings::default(),
            possession: PossessionSettings::default(),
        }
    }
}

impl PipelineSettings {
    /// The smoothed HSV classifier these settings describe
    pub fn classifier(&self, filters: TeamFilterRegistry) -> SmoothingClassifier<HsvClassifier> {
        let hsv = HsvClassifier::new(filters)
            .with_min_coverage(self.min_coverage)
            .with_jersey_region(self.jersey_region);
        SmoothingClassifier::new(hsv, self.smoothing)
    }
}

/// What one processed frame produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame: u64,
    pub drawables: Vec<Drawable>,
    pub team_possession: Option<String>,
    pub pass: Option<Pass>,
}

pub struct FramePipeline<C: Classifier> {
    classifier: C,
    filter: BoxFilter,
    game: Match,
    settings: PipelineSettings,
}

impl<C: Classifier> FramePipeline<C> {
    pub fn new(classifier: C, game: Match, settings: PipelineSettings) -> Self {
        let game = game.with_settings(settings.possession);
        Self {
            classifier,
            filter: settings.filter,
            game,
            settings,
        }
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn into_match(self) -> Match {
        self.game
    }

    /// Runs one frame of tracker output through filtering, classification and possession
    pub fn process_tracked(
        &mut self,
        frame: &RgbImage,
        players: Vec<TrackedDetection>,
        balls: Vec<TrackedDetection>,
    ) -> Result<FrameReport> {
        for ball in &balls {
            ball.validate()?;
        }

        let mut players = self.filter.apply(players);
        players.sort_by_key(|d| (d.id.is_none(), d.id));
        self.classifier.predict_from_detections(&mut players, frame)?;

        let players = Player::from_detections(players, self.game.teams());
        let mut ball = Ball::main_ball(balls, None);
        let pass = self.game.update(&players, &ball);
        ball.set_color(&self.game);

        let mut drawables: Vec<Drawable> = players
            .iter()
            .map(|p| p.drawable(self.game.teams()))
            .collect();
        drawables.extend(ball.drawable());

        let report = FrameReport {
            frame: self.game.duration(),
            drawables,
            team_possession: self.game.team_possession().map(|t| t.name.clone()),
            pass,
        };
        debug!(
            "frame {}: {} players, possession {:?}",
            report.frame,
            players.len(),
            report.team_possession
        );
        Ok(report)
    }

    /// Detects, tracks and processes one frame
    pub fn process_frame<D: Detector, P: Tracker, B: Tracker>(
        &mut self,
        frame: &RgbImage,
        detector: &mut D,
        player_tracker: &mut P,
        ball_tracker: &mut B,
    ) -> anyhow::Result<FrameReport> {
        let rows = detector
            .predict(std::slice::from_ref(frame))?
            .into_iter()
            .next()
            .unwrap_or_default();
        let players = select_rows(&rows, &self.settings.player_class, self.settings.player_confidence)?;
        let balls = select_rows(&rows, &self.settings.ball_class, self.settings.ball_confidence)?;

        let players = player_tracker.update(&players);
        let balls = ball_tracker.update(&balls);
        Ok(self.process_tracked(frame, players, balls)?)
    }
}
