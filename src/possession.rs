//! Match state and per-frame possession attribution

use crate::ball::Ball;
use crate::error::{Error, Result};
use crate::passes::{Pass, PassDetector};
use crate::player::Player;
use crate::team::Team;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PossessionSettings {
    /// Farthest a foot may be from the ball center for its player to have the ball
    pub ball_distance_bound: f64,
    /// Consecutive frames a team must be nearest before possession switches
    pub switch_after_frames: u64,
    /// Consecutive frames a player must be nearest to hold the ball for passes
    pub pass_hold_frames: u64,
}

impl Default for PossessionSettings {
    fn default() -> Self {
        Self {
            ball_distance_bound: 45.0,
            switch_after_frames: 1,
            pass_hold_frames: 3,
        }
    }
}

/// A match between two teams, accumulating possession frame by frame.
///
/// Teams are owned here and referenced by index; players and labels refer to
/// them by name.
#[derive(Debug, Clone)]
pub struct Match {
    teams: Vec<Team>,
    home: usize,
    away: usize,
    fps: u32,
    duration: u64,
    team_possession: Option<usize>,
    current_team: Option<usize>,
    possession_streak: u64,
    closest_player: Option<Player>,
    settings: PossessionSettings,
    passes: PassDetector,
}

impl Match {
    /// Creates a match over `teams` with `home` and `away` given as indices into it
    pub fn new(teams: Vec<Team>, home: usize, away: usize, fps: u32) -> Result<Self> {
        if home >= teams.len() || away >= teams.len() {
            return Err(Error::UnresolvedTeams);
        }
        Ok(Self {
            teams,
            home,
            away,
            fps,
            duration: 0,
            team_possession: None,
            current_team: None,
            possession_streak: 0,
            closest_player: None,
            settings: PossessionSettings::default(),
            passes: PassDetector::default(),
        })
    }

    pub fn with_settings(mut self, settings: PossessionSettings) -> Self {
        self.passes = PassDetector::new(settings.pass_hold_frames);
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PossessionSettings {
        &self.settings
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        Team::from_name(&self.teams, name)
    }

    pub fn home(&self) -> &Team {
        &self.teams[self.home]
    }

    pub fn away(&self) -> &Team {
        &self.teams[self.away]
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames processed so far
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn team_possession(&self) -> Option<&Team> {
        self.team_possession.map(|i| &self.teams[i])
    }

    pub fn set_team_possession(&mut self, name: &str) -> Result<()> {
        let index = self.index_of(name).ok_or_else(|| Error::UnknownTeam(name.to_string()))?;
        self.team_possession = Some(index);
        Ok(())
    }

    /// Player attributed with the ball on the last frame, if any
    pub fn closest_player(&self) -> Option<&Player> {
        self.closest_player.as_ref()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.teams.iter().position(|t| t.name == name)
    }

    /// Attributes this frame's possession.
    ///
    /// The player with a known team whose nearer foot is closest to the ball
    /// center wins, first in input order on ties. Nothing changes without a
    /// ball center, without such a player, or when the winner is farther than
    /// the distance bound. Returns the pass completed on this frame, if any.
    pub fn update(&mut self, players: &[Player], ball: &Ball) -> Option<Pass> {
        self.duration += 1;

        let mut nearest: Option<(&Player, usize, f64)> = None;
        for player in players {
            let Some(team) = player.team.as_deref().and_then(|name| self.index_of(name)) else {
                continue;
            };
            let Some(distance) = player.distance_to_ball(ball) else {
                continue;
            };
            if nearest.is_none_or(|(_, _, best)| distance < best) {
                nearest = Some((player, team, distance));
            }
        }

        let Some((player, team, distance)) = nearest.filter(|(_, _, d)| *d <= self.settings.ball_distance_bound)
        else {
            self.closest_player = None;
            self.passes.update(None, ball);
            return None;
        };

        if self.current_team == Some(team) {
            self.possession_streak += 1;
        } else {
            self.current_team = Some(team);
            self.possession_streak = 1;
        }
        if self.possession_streak >= self.settings.switch_after_frames
            && self.team_possession != Some(team)
        {
            debug!("possession switches to '{}'", self.teams[team].name);
            self.team_possession = Some(team);
        }
        if let Some(holder) = self.team_possession {
            self.teams[holder].possession += 1;
        }

        if let Some(id) = player.id() {
            self.teams[team].register_player(id);
        }
        debug!(
            "player {:?} of '{}' nearest to ball at {:.1}px",
            player.id(),
            self.teams[team].name,
            distance
        );
        let player = player.clone();
        let pass = self.passes.update(Some(&player), ball);
        if let Some(pass) = &pass {
            if let Some(index) = self.index_of(&pass.team) {
                self.teams[index].passes.push(pass.clone());
            }
        }
        self.closest_player = Some(player);
        pass
    }
}
