use thiserror::Error;

/// Errors raised by the attribution core.
///
/// Configuration problems are fatal at load time, contract violations are
/// rejected at the call boundary. Degenerate geometry and unresolvable
/// possession are not errors at all.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration must contain a 'teams' key")]
    MissingTeams,

    #[error("team entry is missing '{field}': {entry}")]
    MissingTeamField { field: &'static str, entry: String },

    #[error("abbreviation must be length 3 and uppercase, got '{0}'")]
    InvalidAbbreviation(String),

    #[error("unknown color '{0}'")]
    UnknownColor(String),

    #[error("unknown team filter '{0}'")]
    UnknownTeamFilter(String),

    #[error("team filter '{0}' is already registered")]
    DuplicateTeam(String),

    #[error("unknown team '{0}'")]
    UnknownTeam(String),

    #[error("unable to determine home and away teams from configuration")]
    UnresolvedTeams,

    #[error("either a detection or a box must be provided for a ball")]
    MissingBallSource,

    #[error("input contract violation: {0}")]
    ContractViolation(String),
}

impl Error {
    /// Configuration errors abort startup; everything else is per-call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingTeams
                | Error::MissingTeamField { .. }
                | Error::InvalidAbbreviation(_)
                | Error::UnknownColor(_)
                | Error::UnknownTeamFilter(_)
                | Error::DuplicateTeam(_)
                | Error::UnknownTeam(_)
                | Error::UnresolvedTeams
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
