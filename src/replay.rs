//! Replaying recorded tracker output through the pipeline

use crate::classifier::Classifier;
use crate::detection::{TrackedDetection, TrackedRecord};
use crate::pipeline::{FramePipeline, FrameReport};
use crate::possession::Match;
use anyhow::{Context, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One line of a frames file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub image: PathBuf,
    #[serde(default)]
    pub players: Vec<TrackedRecord>,
    #[serde(default)]
    pub balls: Vec<TrackedRecord>,
}

impl ReplayFrame {
    /// Loads the frame image; relative paths resolve against `base`
    pub fn load_image(&self, base: &Path) -> Result<RgbImage> {
        let path = if self.image.is_absolute() {
            self.image.clone()
        } else {
            base.join(&self.image)
        };
        let image = image::open(&path)
            .with_context(|| format!("Failed to open frame image {}", path.display()))?;
        Ok(image.to_rgb8())
    }

    pub fn detections(&self) -> (Vec<TrackedDetection>, Vec<TrackedDetection>) {
        let convert = |records: &[TrackedRecord]| {
            records
                .iter()
                .cloned()
                .map(TrackedDetection::from)
                .collect::<Vec<_>>()
        };
        (convert(&self.players), convert(&self.balls))
    }
}

/// Reads a JSON-lines frames file, skipping blank lines
pub fn read_frames(path: impl AsRef<Path>) -> Result<Vec<ReplayFrame>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read frames file {}", path.display()))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Invalid frame on line {} of {}", index + 1, path.display()))
        })
        .collect()
}

/// Runs every frame through the pipeline, handing each report to `on_frame`
pub fn run_replay<C: Classifier>(
    pipeline: &mut FramePipeline<C>,
    frames: &[ReplayFrame],
    base: &Path,
    mut on_frame: impl FnMut(&FrameReport) -> Result<()>,
) -> Result<()> {
    for frame in frames {
        let image = frame.load_image(base)?;
        let (players, balls) = frame.detections();
        let report = pipeline
            .process_tracked(&image, players, balls)
            .with_context(|| format!("Failed to process frame {}", frame.image.display()))?;
        on_frame(&report)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub name: String,
    pub abbreviation: String,
    pub possession_frames: u64,
    pub possession_percentage: f64,
    pub possession_time: String,
    pub passes: usize,
    pub players: usize,
}

/// End-of-run possession figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub fps: u32,
    pub duration: u64,
    pub home: String,
    pub away: String,
    pub teams: Vec<TeamSummary>,
}

impl MatchSummary {
    pub fn from_match(game: &Match) -> Self {
        let teams = game
            .teams()
            .iter()
            .map(|team| TeamSummary {
                name: team.name.clone(),
                abbreviation: team.abbreviation.clone(),
                possession_frames: team.possession,
                possession_percentage: team.percentage_possession(game.duration()),
                possession_time: team.time_possession(game.fps()),
                passes: team.passes.len(),
                players: team.players.len(),
            })
            .collect();
        Self {
            fps: game.fps(),
            duration: game.duration(),
            home: game.home().name.clone(),
            away: game.away().name.clone(),
            teams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Team;

    #[test]
    fn test_frame_line_parses() {
        let line = r#"{"image": "f0.png", "players": [{"id": 1, "points": [[0, 0], [10, 30]]}]}"#;
        let frame: ReplayFrame = serde_json::from_str(line).unwrap();
        let (players, balls) = frame.detections();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, Some(1));
        assert!(balls.is_empty());
    }

    #[test]
    fn test_summary_from_match() {
        let teams = vec![
            Team::new("Home", "HOM", [1, 1, 1], None, [0, 0, 0]).unwrap(),
            Team::new("Away", "AWY", [2, 2, 2], None, [0, 0, 0]).unwrap(),
        ];
        let game = Match::new(teams, 0, 1, 25).unwrap();
        let summary = MatchSummary::from_match(&game);
        assert_eq!(summary.home, "Home");
        assert_eq!(summary.teams.len(), 2);
        assert_eq!(summary.teams[1].possession_time, "00:00");
        assert_eq!(summary.teams[1].possession_percentage, 0.0);
    }
}
