use crate::ball::Ball;
use crate::bbox::Point;
use crate::detection::{TrackId, TrackedDetection};
use crate::draw::{DEFAULT_COLOR, Drawable, DrawableKind};
use crate::team::Team;
use tracing::warn;

/// A tracked person, optionally attributed to a team by name
#[derive(Debug, Clone)]
pub struct Player {
    pub detection: TrackedDetection,
    pub team: Option<String>,
}

fn distance(a: Point, b: Point) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

fn left_foot_of([top_left, bottom_right]: [Point; 2]) -> Point {
    (top_left.0, bottom_right.1)
}

fn right_foot_of([_, bottom_right]: [Point; 2]) -> Point {
    bottom_right
}

impl Player {
    pub fn new(detection: TrackedDetection) -> Self {
        Self {
            detection,
            team: None,
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn id(&self) -> Option<TrackId> {
        self.detection.id
    }

    pub fn left_foot(&self) -> Point {
        left_foot_of(self.detection.points())
    }

    pub fn right_foot(&self) -> Point {
        right_foot_of(self.detection.points())
    }

    pub fn left_foot_abs(&self) -> Point {
        left_foot_of(self.detection.absolute_points())
    }

    pub fn right_foot_abs(&self) -> Point {
        right_foot_of(self.detection.absolute_points())
    }

    pub fn feet(&self) -> [Point; 2] {
        [self.left_foot(), self.right_foot()]
    }

    /// Distance from the ball center to the nearer foot, `None` without a ball center
    pub fn distance_to_ball(&self, ball: &Ball) -> Option<f64> {
        let center = ball.center()?;
        Some(distance(center, self.left_foot()).min(distance(center, self.right_foot())))
    }

    pub fn closest_foot_to_ball(&self, ball: &Ball) -> Option<Point> {
        let center = ball.center()?;
        Some(closer(center, self.left_foot(), self.right_foot()))
    }

    /// Like [`Player::closest_foot_to_ball`] in motion-compensated coordinates
    pub fn closest_foot_to_ball_abs(&self, ball: &Ball) -> Option<Point> {
        let center = ball.center_abs()?;
        Some(closer(center, self.left_foot_abs(), self.right_foot_abs()))
    }

    /// True when both players exist and carry the same track id
    pub fn have_same_id(a: Option<&Player>, b: Option<&Player>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a.id().is_some() && a == b,
            _ => false,
        }
    }

    /// Builds players, resolving each detection's classification to a known team
    pub fn from_detections(detections: Vec<TrackedDetection>, teams: &[Team]) -> Vec<Player> {
        detections
            .into_iter()
            .map(|detection| {
                let team = detection
                    .classification
                    .as_ref()
                    .and_then(|label| label.team_name())
                    .and_then(|name| {
                        let team = Team::from_name(teams, name);
                        if team.is_none() && !name.eq_ignore_ascii_case("referee") {
                            warn!("classification '{}' does not name a team in the match", name);
                        }
                        team
                    })
                    .map(|team| team.name.clone());
                Player { detection, team }
            })
            .collect()
    }

    /// Draw instruction in the team color, or the default color without a team
    pub fn drawable(&self, teams: &[Team]) -> Drawable {
        let team = self.team.as_deref().and_then(|name| Team::from_name(teams, name));
        let bbox = &self.detection.bbox;
        Drawable {
            kind: DrawableKind::Player,
            id: self.id(),
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
            color: team.map_or(DEFAULT_COLOR, |t| t.color),
            label: team.map(|t| t.abbreviation.clone()),
        }
    }
}

fn closer(target: Point, left: Point, right: Point) -> Point {
    if distance(target, left) < distance(target, right) {
        left
    } else {
        right
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
