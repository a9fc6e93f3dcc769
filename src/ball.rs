use crate::bbox::{BBox, Point};
use crate::detection::TrackedDetection;
use crate::draw::{DEFAULT_COLOR, Drawable, DrawableKind, Rgb};
use crate::error::{Error, Result};
use crate::possession::Match;

/// Where the ball's geometry comes from
#[derive(Debug, Clone, PartialEq)]
pub enum BallSource {
    Detection(TrackedDetection),
    Box(BBox),
}

/// The ball, colored by the team in possession once a match has set it
#[derive(Debug, Clone)]
pub struct Ball {
    source: BallSource,
    pub color: Option<Rgb>,
}

fn rounded_center([a, b]: [Point; 2]) -> Point {
    (((a.0 + b.0) / 2.0).round(), ((a.1 + b.1) / 2.0).round())
}

impl Ball {
    /// Builds a ball from exactly one source; the detection wins when both are given
    pub fn new(detection: Option<TrackedDetection>, bbox: Option<BBox>) -> Result<Self> {
        match (detection, bbox) {
            (Some(detection), _) => Ok(Self::from_detection(detection)),
            (None, Some(bbox)) => Ok(Self::from_box(bbox)),
            (None, None) => Err(Error::MissingBallSource),
        }
    }

    pub fn from_detection(detection: TrackedDetection) -> Self {
        Self {
            source: BallSource::Detection(detection),
            color: None,
        }
    }

    pub fn from_box(bbox: BBox) -> Self {
        Self {
            source: BallSource::Box(bbox),
            color: None,
        }
    }

    /// Placeholder used on frames without a ball detection
    pub fn placeholder() -> Self {
        Self::from_box(BBox::new(0.0, 0.0, 10.0, 10.0))
    }

    pub fn source(&self) -> &BallSource {
        &self.source
    }

    pub fn detection(&self) -> Option<&TrackedDetection> {
        match &self.source {
            BallSource::Detection(detection) => Some(detection),
            BallSource::Box(_) => None,
        }
    }

    /// Top-left corner of the ball's box
    pub fn position(&self) -> Point {
        match &self.source {
            BallSource::Box(bbox) => (bbox.x, bbox.y),
            BallSource::Detection(detection) => detection.points()[0],
        }
    }

    /// Rounded frame-local center; only tracked balls have one
    pub fn center(&self) -> Option<Point> {
        self.detection().map(|d| rounded_center(d.points()))
    }

    pub fn center_abs(&self) -> Option<Point> {
        self.detection().map(|d| rounded_center(d.absolute_points()))
    }

    /// Takes the color of the team currently in possession, if any
    pub fn set_color(&mut self, game: &Match) {
        if let Some(team) = game.team_possession() {
            self.color = Some(team.color);
        }
    }

    /// The first ball detection, or a placeholder without a center
    pub fn main_ball(detections: Vec<TrackedDetection>, game: Option<&Match>) -> Self {
        let mut ball = detections
            .into_iter()
            .next()
            .map_or_else(Self::placeholder, Self::from_detection);
        if let Some(game) = game {
            ball.set_color(game);
        }
        ball
    }

    /// Nothing is drawn for a placeholder ball
    pub fn drawable(&self) -> Option<Drawable> {
        let detection = self.detection()?;
        let bbox = &detection.bbox;
        Some(Drawable {
            kind: DrawableKind::Ball,
            id: detection.id,
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
            color: self.color.unwrap_or(DEFAULT_COLOR),
            label: None,
        })
    }
}
