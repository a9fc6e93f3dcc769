//! Declarative JSON configuration: teams and match, team filters, pipeline settings

use crate::colors::{TeamFilterConfig, TeamFilterRegistry};
use crate::draw::Rgb;
use crate::error::{Error, Result};
use crate::pipeline::PipelineSettings;
use crate::possession::Match;
use crate::team::Team;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One entry of the `teams` list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub color: Option<Rgb>,
    pub board_color: Option<Rgb>,
    pub text_color: Option<Rgb>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSection {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub initial_possession: Option<String>,
}

/// Contents of a team/match configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub teams: Option<Vec<TeamConfig>>,
    #[serde(default, rename = "match")]
    pub match_section: MatchSection,
}

impl TeamConfig {
    fn is_referee(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case("referee"))
    }

    fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }

    fn into_team(self) -> Result<Team> {
        let entry = self.describe();
        let name = self.name.ok_or_else(|| Error::MissingTeamField {
            field: "name",
            entry: entry.clone(),
        })?;
        let abbreviation = self.abbreviation.ok_or(Error::MissingTeamField {
            field: "abbreviation",
            entry,
        })?;
        Team::new(
            name,
            abbreviation,
            self.color.unwrap_or([0, 0, 0]),
            self.board_color,
            self.text_color.unwrap_or([0, 0, 0]),
        )
    }
}

impl MatchConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the match.
    ///
    /// Referee entries are skipped. Home and away fall back to the first and
    /// second listed teams when not named, and possession starts with the away
    /// team unless `initial_possession` names another.
    pub fn into_match(self, fps: u32) -> Result<Match> {
        let entries = self.teams.ok_or(Error::MissingTeams)?;
        let teams = entries
            .into_iter()
            .filter(|entry| !entry.is_referee())
            .map(TeamConfig::into_team)
            .collect::<Result<Vec<_>>>()?;

        let position = |name: &Option<String>| {
            name.as_deref()
                .and_then(|name| teams.iter().position(|t| t.name == name))
        };
        let section = &self.match_section;
        let home = position(&section.home_team)
            .or((!teams.is_empty()).then_some(0))
            .ok_or(Error::UnresolvedTeams)?;
        let away = position(&section.away_team)
            .or((teams.len() > 1).then_some(1))
            .ok_or(Error::UnresolvedTeams)?;
        let initial = position(&section.initial_possession).unwrap_or(away);
        let initial = teams[initial].name.clone();

        let mut game = Match::new(teams, home, away, fps)?;
        game.set_team_possession(&initial)?;
        debug!(
            "match {} vs {}, '{}' starts with the ball",
            game.home(),
            game.away(),
            initial
        );
        Ok(game)
    }
}

/// Loads teams and match from a JSON file
pub fn load_teams_from_config(path: impl AsRef<Path>, fps: u32) -> Result<Match> {
    let path = path.as_ref();
    let game = MatchConfig::from_json(&fs::read_to_string(path)?)?.into_match(fps)?;
    info!("Loaded {} teams from {}", game.teams().len(), path.display());
    Ok(game)
}

/// Contents of a team filter configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamFilterFile {
    pub filters: Vec<TeamFilterConfig>,
}

/// Loads team filters, resolving color names against the catalogue
pub fn load_team_filters(path: impl AsRef<Path>) -> Result<TeamFilterRegistry> {
    let file: TeamFilterFile = serde_json::from_str(&fs::read_to_string(path)?)?;
    TeamFilterRegistry::from_configs(file.filters)
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<PipelineSettings> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}
