use crate::detection::TrackId;
use crate::draw::Rgb;
use crate::error::{Error, Result};
use crate::passes::Pass;
use std::fmt;

/// A side in the match. Identity is the name alone.
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    pub abbreviation: String,
    pub color: Rgb,
    pub board_color: Rgb,
    pub text_color: Rgb,
    /// Frames during which this team held the ball
    pub possession: u64,
    /// Track ids seen playing for this team
    pub players: Vec<TrackId>,
    pub passes: Vec<Pass>,
}

impl Team {
    /// Creates a team, validating that the abbreviation is three uppercase characters
    pub fn new(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        color: Rgb,
        board_color: Option<Rgb>,
        text_color: Rgb,
    ) -> Result<Self> {
        let abbreviation = abbreviation.into();
        if !is_valid_abbreviation(&abbreviation) {
            return Err(Error::InvalidAbbreviation(abbreviation));
        }
        Ok(Self {
            name: name.into(),
            abbreviation,
            color,
            board_color: board_color.unwrap_or(color),
            text_color,
            possession: 0,
            players: Vec::new(),
            passes: Vec::new(),
        })
    }

    /// Share of `duration` frames spent in possession, rounded to two decimals
    pub fn percentage_possession(&self, duration: u64) -> f64 {
        if duration == 0 {
            return 0.0;
        }
        (self.possession as f64 / duration as f64 * 100.0).round() / 100.0
    }

    /// Possession time as `mm:ss` at the given frame rate
    pub fn time_possession(&self, fps: u32) -> String {
        let seconds = if fps == 0 {
            0
        } else {
            (self.possession as f64 / fps as f64).round() as u64
        };
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }

    pub fn register_player(&mut self, id: TrackId) {
        if !self.players.contains(&id) {
            self.players.push(id);
        }
    }

    pub fn from_name<'a>(teams: &'a [Team], name: &str) -> Option<&'a Team> {
        teams.iter().find(|t| t.name == name)
    }
}

fn is_valid_abbreviation(abbreviation: &str) -> bool {
    abbreviation.chars().count() == 3
        && abbreviation.chars().any(char::is_uppercase)
        && !abbreviation.chars().any(char::is_lowercase)
}

impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Team {}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
