//! Pass detection from the sequence of players closest to the ball

use crate::ball::Ball;
use crate::bbox::Point;
use crate::player::Player;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completed pass in motion-compensated coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    pub start: Point,
    pub end: Point,
    pub team: String,
}

/// Watches who holds the ball and reports a pass when it moves between teammates.
///
/// A player holds the ball once they have been closest to it for
/// `hold_threshold` consecutive frames.
#[derive(Debug, Clone)]
pub struct PassDetector {
    hold_threshold: u64,
    holder: Option<Player>,
    candidate: Option<Player>,
    candidate_frames: u64,
}

impl Default for PassDetector {
    fn default() -> Self {
        Self::new(3)
    }
}

impl PassDetector {
    pub fn new(hold_threshold: u64) -> Self {
        Self {
            hold_threshold: hold_threshold.max(1),
            holder: None,
            candidate: None,
            candidate_frames: 0,
        }
    }

    pub fn holder(&self) -> Option<&Player> {
        self.holder.as_ref()
    }

    /// Feeds this frame's closest player, returning a pass if one just completed
    pub fn update(&mut self, closest: Option<&Player>, ball: &Ball) -> Option<Pass> {
        let Some(player) = closest else {
            self.candidate = None;
            self.candidate_frames = 0;
            return None;
        };

        if Player::have_same_id(Some(player), self.candidate.as_ref()) {
            self.candidate_frames += 1;
        } else {
            self.candidate_frames = 1;
        }
        self.candidate = Some(player.clone());

        if self.candidate_frames < self.hold_threshold {
            return None;
        }

        let previous = self.holder.replace(player.clone());
        let previous = previous.filter(|p| !Player::have_same_id(Some(p), Some(player)))?;
        let team = match (&previous.team, &player.team) {
            (Some(from), Some(to)) if from == to => from.clone(),
            _ => return None,
        };

        let pass = Pass {
            start: previous.closest_foot_to_ball_abs(ball)?,
            end: ball.center_abs()?,
            team,
        };
        debug!(
            "pass for '{}' from {:?} to {:?}",
            pass.team,
            previous.id(),
            player.id()
        );
        Some(pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::TrackedDetection;

    fn player(id: u64, team: &str, x: f64) -> Player {
        Player::new(TrackedDetection::new(
            Some(id),
            [(x, 100.0), (x + 20.0, 160.0)],
            Some([(x + 1000.0, 100.0), (x + 1020.0, 160.0)]),
        ))
        .with_team(team)
    }

    fn ball(x: f64) -> Ball {
        Ball::from_detection(TrackedDetection::new(
            Some(50),
            [(x, 155.0), (x + 10.0, 165.0)],
            Some([(x + 1000.0, 155.0), (x + 1010.0, 165.0)]),
        ))
    }

    fn hold(detector: &mut PassDetector, player: &Player, ball: &Ball, frames: usize) -> Vec<Pass> {
        (0..frames)
            .filter_map(|_| detector.update(Some(player), ball))
            .collect()
    }

    #[test]
    fn test_pass_between_teammates() {
        let mut detector = PassDetector::new(3);
        let a = player(1, "Home", 0.0);
        let b = player(2, "Home", 300.0);

        assert!(hold(&mut detector, &a, &ball(25.0), 3).is_empty());
        assert_eq!(detector.holder().and_then(Player::id), Some(1));

        let passes = hold(&mut detector, &b, &ball(325.0), 3);
        assert_eq!(
            passes,
            vec![Pass {
                start: (1020.0, 160.0),
                end: (1330.0, 160.0),
                team: "Home".to_string(),
            }]
        );
    }

    #[test]
    fn test_brief_touch_is_not_a_hold() {
        let mut detector = PassDetector::new(3);
        let a = player(1, "Home", 0.0);
        let b = player(2, "Home", 300.0);

        hold(&mut detector, &a, &ball(25.0), 3);
        assert!(hold(&mut detector, &b, &ball(325.0), 2).is_empty());
        assert!(hold(&mut detector, &a, &ball(25.0), 3).is_empty());
        assert_eq!(detector.holder().and_then(Player::id), Some(1));
    }

    #[test]
    fn test_change_of_team_is_not_a_pass() {
        let mut detector = PassDetector::new(2);
        hold(&mut detector, &player(1, "Home", 0.0), &ball(25.0), 2);
        let passes = hold(&mut detector, &player(7, "Away", 300.0), &ball(325.0), 2);
        assert!(passes.is_empty());
        assert_eq!(detector.holder().and_then(Player::id), Some(7));
    }

    #[test]
    fn test_missing_closest_player_resets_streak() {
        let mut detector = PassDetector::new(2);
        let a = player(1, "Home", 0.0);
        detector.update(Some(&a), &ball(25.0));
        detector.update(None, &ball(25.0));
        detector.update(Some(&a), &ball(25.0));
        assert!(detector.holder().is_none());
    }
}
