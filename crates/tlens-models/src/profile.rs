//! Player profile models.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Field position of the analyzed player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    Defender,
    #[default]
    Midfielder,
    Forward,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "goalkeeper",
            Position::Defender => "defender",
            Position::Midfielder => "midfielder",
            Position::Forward => "forward",
        }
    }

    /// Human-readable label used in prompts and exported documents.
    pub fn label(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse error for [`Position`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown position: {0}")]
pub struct InvalidPosition(pub String);

impl FromStr for Position {
    type Err = InvalidPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "goalkeeper" => Ok(Position::Goalkeeper),
            "defender" => Ok(Position::Defender),
            "midfielder" => Ok(Position::Midfielder),
            "forward" => Ok(Position::Forward),
            other => Err(InvalidPosition(other.to_string())),
        }
    }
}

/// Player metadata collected once per analysis run.
///
/// Immutable for the duration of a run; nothing here is persisted across
/// requests.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct PlayerProfile {
    /// Player name
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    /// Age in years
    #[validate(range(min = 5, max = 60))]
    pub age: u32,

    /// Field position
    #[serde(default)]
    pub position: Position,

    /// Height in centimeters
    #[validate(range(min = 100.0, max = 230.0))]
    pub height_cm: f64,

    /// Weight in kilograms
    #[validate(range(min = 30.0, max = 150.0))]
    pub weight_kg: f64,

    /// Team name (free text, may be empty)
    #[serde(default)]
    #[validate(length(max = 120))]
    pub team: String,
}

impl PlayerProfile {
    /// Filesystem-safe stem derived from the player name, used for the
    /// download filename of the exported document.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let stem = stem.trim_matches('_').to_string();
        if stem.is_empty() {
            "player".to_string()
        } else {
            stem
        }
    }
}
