//! Tutor configuration types.

use crate::error::{ParseError, Result};
use crate::logic::Proposition;
use crate::parser::parse;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Defaults applied when a snapshot leaves something out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Start proposition of a snapshot without `startProp`
    pub default_start: String,
    /// End proposition of a snapshot without `endProp`
    pub default_end: String,
    /// Whether the open goal of a fresh tree proof is worked backward
    pub goal_direction_backward: bool,
}

impl Default for TutorConfig {
    fn default() -> Self {
        TutorConfig {
            default_start: "P implies Q implies R".to_string(),
            default_end: "Q implies P implies R".to_string(),
            goal_direction_backward: true,
        }
    }
}

impl TutorConfig {
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&text)?)
    }

    /// The default start and end propositions
    pub fn default_statement(&self) -> std::result::Result<(Proposition, Proposition), ParseError> {
        Ok((parse(&self.default_start)?, parse(&self.default_end)?))
    }
}
